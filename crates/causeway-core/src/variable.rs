//! Variable identifiers: dataset columns and synthetic intervention nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a variable participating in discovery.
///
/// `Ord` is derived so that pools, separating sets, and edge listings can be
/// iterated in a reproducible order regardless of insertion history.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variable {
    /// A named column of the dataset.
    Column(String),
    /// Synthetic intervention indicator ("F-node"). The index identifies the
    /// unordered pair of distributions it compares via the context sigma-map.
    FNode(usize),
}

impl Variable {
    /// Shorthand for a named column.
    pub fn column(name: impl Into<String>) -> Self {
        Variable::Column(name.into())
    }

    /// Shorthand for an F-node.
    pub fn f_node(index: usize) -> Self {
        Variable::FNode(index)
    }

    pub fn is_f_node(&self) -> bool {
        matches!(self, Variable::FNode(_))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Column(name) => write!(f, "{name}"),
            Variable::FNode(index) => write!(f, "F{index}"),
        }
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Variable::Column(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(Variable::column("age").to_string(), "age");
        assert_eq!(Variable::f_node(2).to_string(), "F2");
    }

    #[test]
    fn f_nodes_serialize_distinct_from_columns() {
        let f = serde_json::to_string(&Variable::f_node(1)).unwrap();
        let c = serde_json::to_string(&Variable::column("F1")).unwrap();
        assert_ne!(f, c);
        let back: Variable = serde_json::from_str(&f).unwrap();
        assert!(back.is_f_node());
    }

    #[test]
    fn ordering_is_stable_across_kinds() {
        let mut vars = vec![
            Variable::f_node(1),
            Variable::column("b"),
            Variable::column("a"),
            Variable::f_node(0),
        ];
        vars.sort();
        assert_eq!(
            vars,
            vec![
                Variable::column("a"),
                Variable::column("b"),
                Variable::f_node(0),
                Variable::f_node(1),
            ]
        );
    }
}
