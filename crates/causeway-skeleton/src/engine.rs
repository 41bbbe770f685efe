//! The round-based skeleton search engine.
//!
//! Round k: collect testable pairs, run each pair's conditioning-set inner
//! loop (sequentially or fanned out over rayon), then apply all removals in
//! one batch. Deferring removal to the round boundary makes the removal set
//! independent of the order pairs are visited in.

use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, warn};

use causeway_core::{CausewayResult, CondSet, SeparatingSets, SkeletonConfig, TestOutcome, Variable};
use causeway_graph::Context;

use crate::combinations::CondSetIter;
use crate::evaluate::EdgeEvaluator;
use crate::pairs::{collect_pairs, PairTask};
use crate::strategy::ConditioningStrategy;

/// Explicit cursor of the outer loop, threaded through each round.
#[derive(Debug, Clone, Copy)]
pub struct SearchState {
    /// Conditioning-set size tested this round.
    pub size_cond_set: usize,
    /// Set when at least one pair could still be tested at the current
    /// size; cleared at the start of every round.
    pub cont: bool,
    /// Completed engine passes.
    pub n_iters: usize,
}

impl SearchState {
    pub fn new(min_size: usize) -> Self {
        SearchState {
            size_cond_set: min_size,
            cont: false,
            n_iters: 0,
        }
    }

    /// Rewind the size cursor for another engine pass, keeping the pass
    /// count.
    pub fn rewind(&mut self, min_size: usize) {
        self.size_cond_set = min_size;
        self.cont = false;
    }
}

/// Result of one pair's inner loop.
#[derive(Debug, Clone)]
struct PairOutcome {
    x: Variable,
    y: Variable,
    statistic: f64,
    pvalue: f64,
    cond_set: CondSet,
}

/// One engine: a configuration plus a pool-selection strategy. The edge
/// evaluator is injected per run.
pub struct SkeletonEngine<'a> {
    config: &'a SkeletonConfig,
    strategy: ConditioningStrategy,
}

impl<'a> SkeletonEngine<'a> {
    pub fn new(config: &'a SkeletonConfig, strategy: ConditioningStrategy) -> Self {
        Self { config, strategy }
    }

    /// Run rounds until the size bound is hit or no pair qualifies, pruning
    /// the context's working graph in place and recording separating sets.
    #[allow(clippy::too_many_arguments)]
    pub fn run<E: EdgeEvaluator>(
        &self,
        ctx: &mut Context,
        evaluator: &E,
        sep_sets: &mut SeparatingSets,
        x_nodes: &[Variable],
        skip_y: &BTreeSet<Variable>,
        skip_z: &BTreeSet<Variable>,
        state: &mut SearchState,
    ) -> CausewayResult<()> {
        let max_size = self.config.max_cond_set_size.unwrap_or(usize::MAX);

        loop {
            state.cont = false;
            let tasks = collect_pairs(
                ctx,
                self.strategy,
                x_nodes,
                skip_y,
                skip_z,
                self.config.keep_sorted,
                state,
            )?;

            let size = state.size_cond_set;
            let outcomes: Vec<PairOutcome> = if self.config.parallel {
                tasks
                    .par_iter()
                    .map(|task| self.test_pair(task, evaluator, size))
                    .collect()
            } else {
                tasks
                    .iter()
                    .map(|task| self.test_pair(task, evaluator, size))
                    .collect()
            };

            let mut remove: Vec<(Variable, Variable)> = Vec::new();
            for outcome in outcomes {
                ctx.graph_mut().absorb_result(
                    &outcome.x,
                    &outcome.y,
                    outcome.statistic,
                    outcome.pvalue,
                )?;
                if outcome.pvalue > self.config.alpha {
                    sep_sets.record(&outcome.x, &outcome.y, outcome.cond_set);
                    remove.push((outcome.x, outcome.y));
                }
            }

            let removed = ctx.graph_mut().remove_edges(remove.iter());
            debug!(
                size,
                pairs = tasks.len(),
                removed,
                "skeleton round complete"
            );

            state.size_cond_set += 1;
            if state.size_cond_set > max_size || !state.cont {
                break;
            }
        }

        state.n_iters += 1;
        Ok(())
    }

    /// Inner loop for one pair: enumerate conditioning sets of the current
    /// size, stop at the first p-value above alpha, otherwise carry the
    /// largest p-value and smallest statistic seen.
    fn test_pair<E: EdgeEvaluator>(
        &self,
        task: &PairTask,
        evaluator: &E,
        size_cond_set: usize,
    ) -> PairOutcome {
        let cap = self.config.max_combinations.unwrap_or(usize::MAX);
        let sets = CondSetIter::new(&task.pool, &task.x, &task.y, size_cond_set);

        let mut best_pvalue = 0.0_f64;
        let mut best_statistic = f64::INFINITY;
        let mut last_set = CondSet::new();

        for (index, cond_set) in sets.enumerate() {
            if index >= cap {
                break;
            }
            let outcome = match evaluator.evaluate(&task.x, &task.y, &cond_set) {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(
                        x = %task.x, y = %task.y, %error,
                        "edge test failed, treating as dependent"
                    );
                    TestOutcome::DEPENDENT
                }
            };

            last_set = cond_set;
            if outcome.pvalue > self.config.alpha {
                // First separating set wins; no search for a better one.
                return PairOutcome {
                    x: task.x.clone(),
                    y: task.y.clone(),
                    statistic: outcome.statistic,
                    pvalue: outcome.pvalue,
                    cond_set: last_set,
                };
            }
            best_pvalue = best_pvalue.max(outcome.pvalue);
            best_statistic = best_statistic.min(outcome.statistic);
        }

        PairOutcome {
            x: task.x.clone(),
            y: task.y.clone(),
            statistic: best_statistic,
            pvalue: best_pvalue,
            cond_set: last_set,
        }
    }
}
