//! Conditioning-set pool selection strategies.
//!
//! One closed set of variants, dispatched by `match`: each answers "from
//! which variables may a conditioning set for the (x, y) edge be drawn".

use causeway_core::{CausewayError, CausewayResult, Variable};
use causeway_graph::{Context, SkeletonGraph};

/// How candidate conditioning pools are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditioningStrategy {
    /// Every variable in the working graph (SGS-style exhaustive search).
    Complete,
    /// Current working-graph neighbors of x (classic PC).
    Neighbors,
    /// Neighbors of x that lie on some non-trivial path to y (RFCI variant).
    NeighborsOnPath,
    /// Possibly-d-separating set from the staged PAG.
    Pds,
    /// Possibly-d-separating set restricted to nodes on a path toward y.
    PdsPath,
}

impl ConditioningStrategy {
    /// Whether the strategy needs an intermediate PAG staged in the context.
    pub fn requires_pag(&self) -> bool {
        matches!(self, ConditioningStrategy::Pds | ConditioningStrategy::PdsPath)
    }

    /// Candidate pool for conditioning the (x, y) edge. Never contains x or
    /// y. Returned sorted; with `keep_sorted`, reordered so the strongest
    /// remaining dependencies of x come first (largest edge `test_stat`),
    /// ties keeping the sorted base order.
    pub fn compute_pool(
        &self,
        ctx: &Context,
        x: &Variable,
        y: &Variable,
        keep_sorted: bool,
    ) -> CausewayResult<Vec<Variable>> {
        let mut pool: Vec<Variable> = match self {
            ConditioningStrategy::Complete => ctx.graph().nodes(),
            ConditioningStrategy::Neighbors => ctx.graph().neighbors(x),
            ConditioningStrategy::NeighborsOnPath => neighbors_along_path(ctx.graph(), x, y)?,
            ConditioningStrategy::Pds => ctx
                .pag()?
                .pds(x, y, ctx.max_path_length())
                .into_iter()
                .collect(),
            ConditioningStrategy::PdsPath => ctx
                .pag()?
                .pds_path(x, y, ctx.max_path_length())
                .into_iter()
                .collect(),
        };
        pool.retain(|candidate| candidate != x && candidate != y);
        pool.sort();
        pool.dedup();

        if keep_sorted {
            let strength = |candidate: &Variable| {
                ctx.graph()
                    .stats(x, candidate)
                    .map(|stats| stats.test_stat)
                    // Untested or non-adjacent candidates rank as strongest.
                    .unwrap_or(f64::INFINITY)
            };
            pool.sort_by(|a, b| strength(b).total_cmp(&strength(a)));
        }
        Ok(pool)
    }
}

/// Neighbors of `x` that lie on some simple path from `x` to `y` other than
/// the trivial neighbor→x→y routing.
fn neighbors_along_path(
    graph: &SkeletonGraph,
    x: &Variable,
    y: &Variable,
) -> CausewayResult<Vec<Variable>> {
    let mut nbrs = Vec::new();
    for node in graph.neighbors(x) {
        if !graph.has_edge(x, &node) {
            return Err(CausewayError::GraphInconsistency {
                details: format!("{x} and {node} are not connected, but they are assumed to be"),
            });
        }
        if node == *y {
            continue;
        }
        let mut path = vec![node.clone()];
        if any_nontrivial_path(graph, &node, y, x, &mut path) {
            nbrs.push(node);
        }
    }
    Ok(nbrs)
}

/// Depth-first search for a simple path `start, …, end` that is not exactly
/// `(start, x, end)`. Stops at the first qualifying path.
fn any_nontrivial_path(
    graph: &SkeletonGraph,
    current: &Variable,
    end: &Variable,
    x: &Variable,
    path: &mut Vec<Variable>,
) -> bool {
    for next in graph.neighbors(current) {
        if path.contains(&next) {
            continue;
        }
        if next == *end {
            // Reaching end via exactly (start, x, end) is the trivial path.
            let trivial = path.len() == 2 && path[1] == *x;
            if !trivial {
                return true;
            }
            continue;
        }
        path.push(next.clone());
        if any_nontrivial_path(graph, &next, end, x, path) {
            return true;
        }
        path.pop();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_graph::EdgeStats;

    fn v(name: &str) -> Variable {
        Variable::column(name)
    }

    fn ctx_from_edges(edges: &[(&str, &str)]) -> Context {
        let mut graph = SkeletonGraph::new();
        for (a, b) in edges {
            graph.add_edge(&v(a), &v(b), EdgeStats::UNSET);
        }
        Context::builder().graph(graph).build().unwrap()
    }

    #[test]
    fn complete_pool_excludes_the_pair() {
        let ctx = ctx_from_edges(&[("x", "y"), ("y", "a"), ("a", "b")]);
        let pool = ConditioningStrategy::Complete
            .compute_pool(&ctx, &v("x"), &v("y"), false)
            .unwrap();
        assert_eq!(pool, vec![v("a"), v("b")]);
    }

    #[test]
    fn neighbor_pool_tracks_the_working_graph() {
        let ctx = ctx_from_edges(&[("x", "y"), ("x", "a"), ("x", "b"), ("b", "y")]);
        let pool = ConditioningStrategy::Neighbors
            .compute_pool(&ctx, &v("x"), &v("y"), false)
            .unwrap();
        assert_eq!(pool, vec![v("a"), v("b")]);
    }

    #[test]
    fn path_pool_drops_dead_end_neighbors() {
        // a's only route to y is the trivial a-x-y path.
        let ctx = ctx_from_edges(&[("x", "y"), ("x", "a")]);
        let pool = ConditioningStrategy::NeighborsOnPath
            .compute_pool(&ctx, &v("x"), &v("y"), false)
            .unwrap();
        assert!(pool.is_empty());
    }

    #[test]
    fn path_pool_keeps_neighbors_with_their_own_route() {
        let ctx = ctx_from_edges(&[("x", "y"), ("x", "b"), ("b", "y")]);
        let pool = ConditioningStrategy::NeighborsOnPath
            .compute_pool(&ctx, &v("x"), &v("y"), false)
            .unwrap();
        assert_eq!(pool, vec![v("b")]);
    }

    #[test]
    fn path_pool_accepts_detours_through_x() {
        // a-c-x-y is a non-trivial path even though it passes through x.
        let ctx = ctx_from_edges(&[("x", "y"), ("x", "a"), ("a", "c"), ("c", "x")]);
        let pool = ConditioningStrategy::NeighborsOnPath
            .compute_pool(&ctx, &v("x"), &v("y"), false)
            .unwrap();
        assert!(pool.contains(&v("a")));
        assert!(pool.contains(&v("c")));
    }

    #[test]
    fn keep_sorted_orders_by_descending_test_stat() {
        let mut graph = SkeletonGraph::new();
        graph.add_edge(&v("x"), &v("y"), EdgeStats::UNSET);
        graph.add_edge(&v("x"), &v("a"), EdgeStats::UNSET);
        graph.add_edge(&v("x"), &v("b"), EdgeStats::UNSET);
        graph.absorb_result(&v("x"), &v("a"), 1.0, 0.5).unwrap();
        graph.absorb_result(&v("x"), &v("b"), 7.0, 0.1).unwrap();
        let ctx = Context::builder().graph(graph).build().unwrap();

        let pool = ConditioningStrategy::Neighbors
            .compute_pool(&ctx, &v("x"), &v("y"), true)
            .unwrap();
        assert_eq!(pool, vec![v("b"), v("a")]);
    }

    #[test]
    fn pds_strategy_requires_staged_pag() {
        let ctx = ctx_from_edges(&[("x", "y")]);
        let result = ConditioningStrategy::Pds.compute_pool(&ctx, &v("x"), &v("y"), false);
        assert!(matches!(result, Err(CausewayError::MissingState { .. })));
    }
}
