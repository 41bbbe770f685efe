//! Per-round pair generation.
//!
//! Each round re-scans the working graph for testable (x, y) edges and
//! attaches each pair's candidate conditioning pool. Pools depend only on
//! the graph as it stands at the start of the round, so the scan is
//! collected eagerly into the task batch the round drivers fan out over.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use tracing::debug;

use causeway_core::{CausewayError, CausewayResult, Variable};
use causeway_graph::Context;

use crate::engine::SearchState;
use crate::strategy::ConditioningStrategy;

/// One unit of round work: a surviving edge plus its candidate pool.
#[derive(Debug, Clone)]
pub struct PairTask {
    pub x: Variable,
    pub y: Variable,
    pub pool: Vec<Variable>,
}

/// Collect the round's testable pairs.
///
/// Emits each present undirected edge at most once, skipping excluded
/// y-nodes, protected background edges, and pairs whose pool cannot supply
/// a conditioning set of the current size. Every pair that survives the
/// pool-size check sets the state's continuation flag, which is what keeps
/// the outer loop alive for the next size.
pub fn collect_pairs(
    ctx: &Context,
    strategy: ConditioningStrategy,
    x_nodes: &[Variable],
    skip_y: &BTreeSet<Variable>,
    skip_z: &BTreeSet<Variable>,
    keep_sorted: bool,
    state: &mut SearchState,
) -> CausewayResult<Vec<PairTask>> {
    let mut seen: FxHashSet<(Variable, Variable)> = FxHashSet::default();
    let mut tasks = Vec::new();

    for x in x_nodes {
        for y in ctx.graph().neighbors(x) {
            if skip_y.contains(&y) {
                continue;
            }
            if y == *x {
                continue;
            }
            if seen.contains(&(x.clone(), y.clone())) || seen.contains(&(y.clone(), x.clone())) {
                continue;
            }
            if ctx.is_protected(x, &y) {
                continue;
            }
            if ctx.f_nodes().contains(x) && ctx.f_nodes().contains(&y) {
                return Err(CausewayError::GraphInconsistency {
                    details: format!("edge between F-nodes {x} and {y} should not exist"),
                });
            }

            let mut pool = strategy.compute_pool(ctx, x, &y, keep_sorted)?;
            pool.retain(|candidate| !skip_z.contains(candidate));

            if pool.len() < state.size_cond_set {
                debug!(
                    x = %x, y = %y,
                    pool = pool.len(),
                    size = state.size_cond_set,
                    "pool too small, skipping pair"
                );
                continue;
            }
            state.cont = true;

            seen.insert((x.clone(), y.clone()));
            tasks.push(PairTask {
                x: x.clone(),
                y,
                pool,
            });
        }
    }
    Ok(tasks)
}
