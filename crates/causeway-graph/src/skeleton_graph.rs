//! The annotated undirected working graph pruned by the skeleton search.
//!
//! A petgraph stable graph wrapped with a variable→index map, so edges can
//! be removed across rounds without invalidating the ids the search reasons
//! about.

use std::collections::BTreeSet;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use causeway_core::{CausewayError, CausewayResult, Variable};

/// Per-edge running summary of the tests seen so far.
///
/// `pvalue` only ever grows and `test_stat` only ever shrinks, so the pair
/// always reflects the strongest evidence of independence observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeStats {
    pub test_stat: f64,
    pub pvalue: f64,
}

impl EdgeStats {
    /// Sentinel carried by edges that have not been tested yet. The negative
    /// p-value is distinguishable from any real p-value in [0, 1].
    pub const UNSET: EdgeStats = EdgeStats {
        test_stat: f64::INFINITY,
        pvalue: -1e-5,
    };

    pub fn is_unset(&self) -> bool {
        self.test_stat == f64::INFINITY && self.pvalue < 0.0
    }

    /// Fold one test result in, keeping the largest p-value and the smallest
    /// statistic.
    pub fn absorb(&mut self, statistic: f64, pvalue: f64) {
        if pvalue > self.pvalue {
            self.pvalue = pvalue;
        }
        if statistic < self.test_stat {
            self.test_stat = statistic;
        }
    }
}

impl Default for EdgeStats {
    fn default() -> Self {
        EdgeStats::UNSET
    }
}

/// Undirected working graph over variables, with per-edge test annotations.
#[derive(Debug, Clone, Default)]
pub struct SkeletonGraph {
    graph: StableUnGraph<Variable, EdgeStats>,
    index: FxHashMap<Variable, NodeIndex>,
}

impl SkeletonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully connected graph over `vars`, every edge unannotated.
    pub fn complete(vars: &[Variable]) -> Self {
        let mut graph = SkeletonGraph::new();
        for var in vars {
            graph.ensure_node(var);
        }
        for (i, a) in vars.iter().enumerate() {
            for b in &vars[i + 1..] {
                graph.add_edge(a, b, EdgeStats::UNSET);
            }
        }
        graph
    }

    /// Insert the node if absent; return its index either way.
    pub fn ensure_node(&mut self, var: &Variable) -> NodeIndex {
        if let Some(&idx) = self.index.get(var) {
            return idx;
        }
        let idx = self.graph.add_node(var.clone());
        self.index.insert(var.clone(), idx);
        idx
    }

    /// Insert an edge (and its endpoints if absent). Re-adding an existing
    /// edge leaves its annotations untouched.
    pub fn add_edge(&mut self, a: &Variable, b: &Variable, stats: EdgeStats) {
        if a == b {
            return;
        }
        let ia = self.ensure_node(a);
        let ib = self.ensure_node(b);
        if self.graph.find_edge(ia, ib).is_none() {
            self.graph.add_edge(ia, ib, stats);
        }
    }

    pub fn has_node(&self, var: &Variable) -> bool {
        self.index.contains_key(var)
    }

    pub fn has_edge(&self, a: &Variable, b: &Variable) -> bool {
        self.edge_index(a, b).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All variables, in a reproducible (sorted) order.
    pub fn nodes(&self) -> Vec<Variable> {
        let mut nodes: Vec<Variable> = self
            .graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect();
        nodes.sort();
        nodes
    }

    /// Current neighbors of `var`, in a reproducible (sorted) order.
    pub fn neighbors(&self, var: &Variable) -> Vec<Variable> {
        let Some(&idx) = self.index.get(var) else {
            return Vec::new();
        };
        let mut nbrs: Vec<Variable> = self
            .graph
            .neighbors(idx)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect();
        nbrs.sort();
        nbrs
    }

    /// All edges as normalized `(min, max)` pairs, sorted.
    pub fn edges(&self) -> Vec<(Variable, Variable)> {
        let mut edges: Vec<(Variable, Variable)> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.graph.edge_endpoints(e)?;
                let a = self.graph.node_weight(a)?.clone();
                let b = self.graph.node_weight(b)?.clone();
                Some(if a <= b { (a, b) } else { (b, a) })
            })
            .collect();
        edges.sort();
        edges
    }

    pub fn stats(&self, a: &Variable, b: &Variable) -> Option<EdgeStats> {
        self.edge_index(a, b)
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }

    /// Fold a test result into the edge's running annotations.
    pub fn absorb_result(
        &mut self,
        a: &Variable,
        b: &Variable,
        statistic: f64,
        pvalue: f64,
    ) -> CausewayResult<()> {
        let edge = self
            .edge_index(a, b)
            .ok_or_else(|| CausewayError::GraphInconsistency {
                details: format!("no edge between {a} and {b} to annotate"),
            })?;
        let stats = self
            .graph
            .edge_weight_mut(edge)
            .expect("edge index resolved above");
        stats.absorb(statistic, pvalue);
        Ok(())
    }

    /// Remove a batch of edges. Missing edges are ignored (an edge queued
    /// twice in one round is removed once). Returns how many were removed.
    pub fn remove_edges<'a>(
        &mut self,
        edges: impl IntoIterator<Item = &'a (Variable, Variable)>,
    ) -> usize {
        let targets: Vec<EdgeIndex> = edges
            .into_iter()
            .filter_map(|(a, b)| self.edge_index(a, b))
            .collect();
        let mut removed = 0;
        for edge in targets {
            if self.graph.remove_edge(edge).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Whether any edge carries annotations from a previous run.
    pub fn has_annotations(&self) -> bool {
        self.graph
            .edge_indices()
            .filter_map(|idx| self.graph.edge_weight(idx))
            .any(|stats| !stats.is_unset())
    }

    /// Reset every edge to the untested sentinel.
    pub fn reset_annotations(&mut self) {
        let edges: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        for idx in edges {
            if let Some(stats) = self.graph.edge_weight_mut(idx) {
                *stats = EdgeStats::UNSET;
            }
        }
    }

    /// Induced subgraph over `keep`, annotations carried over.
    pub fn subgraph(&self, keep: &BTreeSet<Variable>) -> SkeletonGraph {
        let mut out = SkeletonGraph::new();
        for var in self.nodes() {
            if keep.contains(&var) {
                out.ensure_node(&var);
            }
        }
        for (a, b) in self.edges() {
            if keep.contains(&a) && keep.contains(&b) {
                let stats = self.stats(&a, &b).unwrap_or(EdgeStats::UNSET);
                out.add_edge(&a, &b, stats);
            }
        }
        out
    }

    fn edge_index(&self, a: &Variable, b: &Variable) -> Option<EdgeIndex> {
        let ia = *self.index.get(a)?;
        let ib = *self.index.get(b)?;
        self.graph.find_edge(ia, ib)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Variable {
        Variable::column(name)
    }

    #[test]
    fn complete_graph_connects_all_pairs() {
        let vars = [v("a"), v("b"), v("c")];
        let graph = SkeletonGraph::complete(&vars);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_edge(&v("a"), &v("c")));
    }

    #[test]
    fn annotations_are_monotone() {
        let mut graph = SkeletonGraph::complete(&[v("a"), v("b")]);
        graph.absorb_result(&v("a"), &v("b"), 5.0, 0.2).unwrap();
        graph.absorb_result(&v("a"), &v("b"), 9.0, 0.1).unwrap();

        let stats = graph.stats(&v("a"), &v("b")).unwrap();
        assert_eq!(stats.pvalue, 0.2);
        assert_eq!(stats.test_stat, 5.0);

        graph.absorb_result(&v("a"), &v("b"), 1.0, 0.9).unwrap();
        let stats = graph.stats(&v("a"), &v("b")).unwrap();
        assert_eq!(stats.pvalue, 0.9);
        assert_eq!(stats.test_stat, 1.0);
    }

    #[test]
    fn batch_removal_tolerates_duplicates() {
        let mut graph = SkeletonGraph::complete(&[v("a"), v("b"), v("c")]);
        let batch = vec![(v("a"), v("b")), (v("b"), v("a")), (v("a"), v("c"))];
        assert_eq!(graph.remove_edges(batch.iter()), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(&v("b"), &v("c")));
    }

    #[test]
    fn fresh_graph_has_no_annotations() {
        let mut graph = SkeletonGraph::complete(&[v("a"), v("b")]);
        assert!(!graph.has_annotations());
        graph.absorb_result(&v("a"), &v("b"), 1.0, 0.5).unwrap();
        assert!(graph.has_annotations());
        graph.reset_annotations();
        assert!(!graph.has_annotations());
    }

    #[test]
    fn subgraph_keeps_annotations() {
        let mut graph = SkeletonGraph::complete(&[v("a"), v("b"), v("c")]);
        graph.absorb_result(&v("a"), &v("b"), 2.0, 0.3).unwrap();

        let keep: BTreeSet<Variable> = [v("a"), v("b")].into_iter().collect();
        let sub = graph.subgraph(&keep);
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.stats(&v("a"), &v("b")).unwrap().pvalue, 0.3);
    }
}
