//! The causal context threaded through a discovery run.
//!
//! Owns the working graph, protected background edges, F-node bookkeeping,
//! and the staged state produced between learner phases (intermediate PAG,
//! path-length bound, observational skeleton). Learners clone the caller's
//! context and only ever mutate their private copy.

use std::collections::{BTreeMap, BTreeSet};

use causeway_core::{CausewayError, CausewayResult, Variable};

use crate::pag::Pag;
use crate::skeleton_graph::SkeletonGraph;

/// Mutable state object for one discovery run. `Clone` is a deep copy.
#[derive(Debug, Clone, Default)]
pub struct Context {
    graph: SkeletonGraph,
    included_edges: BTreeSet<(Variable, Variable)>,
    f_nodes: BTreeSet<Variable>,
    sigma_map: BTreeMap<Variable, (usize, usize)>,
    obs_distribution: bool,
    num_distributions: usize,
    pag: Option<Pag>,
    max_path_length: Option<usize>,
    obs_skeleton: Option<SkeletonGraph>,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Rebuild a builder carrying everything except the staged state, for
    /// re-contexting between learner phases.
    pub fn to_builder(&self) -> ContextBuilder {
        ContextBuilder {
            graph: self.graph.clone(),
            included_edges: self.included_edges.clone(),
            f_nodes: self.f_nodes.clone(),
            sigma_map: self.sigma_map.clone(),
            obs_distribution: self.obs_distribution,
            num_distributions: self.num_distributions,
            max_path_length: self.max_path_length,
        }
    }

    pub fn graph(&self) -> &SkeletonGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SkeletonGraph {
        &mut self.graph
    }

    /// Whether the edge is background knowledge that must never be tested.
    pub fn is_protected(&self, a: &Variable, b: &Variable) -> bool {
        self.included_edges.contains(&normalize(a, b))
    }

    pub fn f_nodes(&self) -> &BTreeSet<Variable> {
        &self.f_nodes
    }

    /// Variables that are not F-nodes.
    pub fn non_f_nodes(&self) -> BTreeSet<Variable> {
        self.graph
            .nodes()
            .into_iter()
            .filter(|var| !self.f_nodes.contains(var))
            .collect()
    }

    pub fn sigma_map(&self) -> &BTreeMap<Variable, (usize, usize)> {
        &self.sigma_map
    }

    /// Distribution pair compared by an F-node. A missing entry means the
    /// context was corrupted externally.
    pub fn sigma(&self, f_node: &Variable) -> CausewayResult<(usize, usize)> {
        self.sigma_map
            .get(f_node)
            .copied()
            .ok_or_else(|| CausewayError::GraphInconsistency {
                details: format!("no sigma-map entry for F-node {f_node}"),
            })
    }

    pub fn has_obs_distribution(&self) -> bool {
        self.obs_distribution
    }

    pub fn num_distributions(&self) -> usize {
        self.num_distributions
    }

    pub fn max_path_length(&self) -> Option<usize> {
        self.max_path_length
    }

    /// Intermediate PAG staged for PDS-based pool selection.
    pub fn pag(&self) -> CausewayResult<&Pag> {
        self.pag.as_ref().ok_or(CausewayError::MissingState { name: "PAG" })
    }

    pub fn set_pag(&mut self, pag: Pag) {
        self.pag = Some(pag);
    }

    /// Observational skeleton staged by the interventional workflow.
    pub fn obs_skeleton(&self) -> Option<&SkeletonGraph> {
        self.obs_skeleton.as_ref()
    }

    pub fn set_obs_skeleton(&mut self, skeleton: SkeletonGraph) {
        self.obs_skeleton = Some(skeleton);
    }
}

/// Builder for `Context`.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    graph: SkeletonGraph,
    included_edges: BTreeSet<(Variable, Variable)>,
    f_nodes: BTreeSet<Variable>,
    sigma_map: BTreeMap<Variable, (usize, usize)>,
    obs_distribution: bool,
    num_distributions: usize,
    max_path_length: Option<usize>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            graph: SkeletonGraph::new(),
            included_edges: BTreeSet::new(),
            f_nodes: BTreeSet::new(),
            sigma_map: BTreeMap::new(),
            obs_distribution: true,
            num_distributions: 1,
            max_path_length: None,
        }
    }

    /// Use an explicit starting graph.
    pub fn graph(mut self, graph: SkeletonGraph) -> Self {
        self.graph = graph;
        self
    }

    /// Start from the fully connected graph over `vars`.
    pub fn complete_graph(mut self, vars: &[Variable]) -> Self {
        self.graph = SkeletonGraph::complete(vars);
        self
    }

    /// Protect an edge as background knowledge: never tested, never removed.
    pub fn included_edge(mut self, a: &Variable, b: &Variable) -> Self {
        self.included_edges.insert(normalize(a, b));
        self
    }

    /// Declare an F-node comparing the two given distribution indices.
    pub fn f_node(mut self, f_node: Variable, distributions: (usize, usize)) -> Self {
        self.f_nodes.insert(f_node.clone());
        self.sigma_map.insert(f_node, distributions);
        self
    }

    /// Whether the first dataset is observational.
    pub fn obs_distribution(mut self, obs: bool) -> Self {
        self.obs_distribution = obs;
        self
    }

    pub fn num_distributions(mut self, n: usize) -> Self {
        self.num_distributions = n;
        self
    }

    /// Bound on PDS traversal path length.
    pub fn max_path_length(mut self, bound: Option<usize>) -> Self {
        self.max_path_length = bound;
        self
    }

    pub fn build(self) -> CausewayResult<Context> {
        for (f_node, (i, j)) in &self.sigma_map {
            if *i >= self.num_distributions || *j >= self.num_distributions {
                return Err(CausewayError::InvalidConfig {
                    reason: format!(
                        "F-node {f_node} compares distributions ({i}, {j}) but only {} declared",
                        self.num_distributions
                    ),
                });
            }
        }
        Ok(Context {
            graph: self.graph,
            included_edges: self.included_edges,
            f_nodes: self.f_nodes,
            sigma_map: self.sigma_map,
            obs_distribution: self.obs_distribution,
            num_distributions: self.num_distributions,
            pag: None,
            max_path_length: self.max_path_length,
            obs_skeleton: None,
        })
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(a: &Variable, b: &Variable) -> (Variable, Variable) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Variable {
        Variable::column(name)
    }

    #[test]
    fn protected_edges_are_order_insensitive() {
        let ctx = Context::builder()
            .complete_graph(&[v("a"), v("b")])
            .included_edge(&v("b"), &v("a"))
            .build()
            .unwrap();
        assert!(ctx.is_protected(&v("a"), &v("b")));
        assert!(ctx.is_protected(&v("b"), &v("a")));
    }

    #[test]
    fn sigma_map_validated_against_distribution_count() {
        let result = Context::builder()
            .f_node(Variable::f_node(0), (0, 2))
            .num_distributions(2)
            .build();
        assert!(matches!(result, Err(CausewayError::InvalidConfig { .. })));
    }

    #[test]
    fn missing_pag_is_reported() {
        let ctx = Context::builder().build().unwrap();
        assert!(matches!(
            ctx.pag(),
            Err(CausewayError::MissingState { name: "PAG" })
        ));
    }
}
