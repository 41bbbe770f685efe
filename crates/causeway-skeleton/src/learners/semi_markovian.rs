//! Semi-Markovian skeleton learner: two engine passes.
//!
//! Stage 1 prunes with neighbor-derived pools. The survivors are cast into
//! a circle-circle PAG, unshielded colliders are oriented from the recorded
//! separating sets, and stage 2 re-tests every remaining edge against
//! possibly-d-separating pools read off that PAG. Valid under latent
//! confounding, where neighbor pools alone are not sufficient.

use std::collections::BTreeSet;

use tracing::info;

use causeway_core::{
    CausewayError, CausewayResult, Dataset, ICondIndTest, SeparatingSets, SkeletonConfig,
};
use causeway_graph::Context;

use crate::engine::{SearchState, SkeletonEngine};
use crate::evaluate::CiEdgeEvaluator;
use crate::learners::{collider_oriented_pag, guard_fresh_graph, SkeletonResult};
use crate::strategy::ConditioningStrategy;

/// Two-stage learner for semi-Markovian causal models.
pub struct SemiMarkovianLearner<'a, T: ICondIndTest> {
    test: &'a T,
    config: SkeletonConfig,
    strategy: ConditioningStrategy,
    second_stage: Option<ConditioningStrategy>,
    max_path_length: Option<usize>,
}

impl<'a, T: ICondIndTest> SemiMarkovianLearner<'a, T> {
    pub fn new(test: &'a T) -> Self {
        Self {
            test,
            config: SkeletonConfig::default(),
            strategy: ConditioningStrategy::Neighbors,
            second_stage: Some(ConditioningStrategy::Pds),
            max_path_length: None,
        }
    }

    pub fn with_config(mut self, config: SkeletonConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_strategy(mut self, strategy: ConditioningStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Strategy for the PDS-based second stage; `None` disables it.
    pub fn with_second_stage(mut self, strategy: Option<ConditioningStrategy>) -> Self {
        self.second_stage = strategy;
        self
    }

    /// Bound on PDS traversal path length.
    pub fn with_max_path_length(mut self, bound: Option<usize>) -> Self {
        self.max_path_length = bound;
        self
    }

    pub fn fit(&self, data: &Dataset, context: &Context) -> CausewayResult<SkeletonResult> {
        self.config.validate()?;
        if let Some(second) = self.second_stage {
            if !second.requires_pag() {
                return Err(CausewayError::InvalidConfig {
                    reason: format!("second-stage strategy {second:?} is not PDS-based"),
                });
            }
        }

        // Stage 1: neighbor-based pruning.
        let mut ctx = context.clone();
        guard_fresh_graph(&ctx)?;
        ctx.graph_mut().reset_annotations();

        let mut sep_sets = SeparatingSets::new();
        let mut state = SearchState::new(self.config.min_cond_set_size);
        let x_nodes = ctx.graph().nodes();

        let evaluator = CiEdgeEvaluator::new(data, self.test);
        SkeletonEngine::new(&self.config, self.strategy).run(
            &mut ctx,
            &evaluator,
            &mut sep_sets,
            &x_nodes,
            &BTreeSet::new(),
            &BTreeSet::new(),
            &mut state,
        )?;

        let Some(second) = self.second_stage else {
            return Ok(SkeletonResult {
                graph: ctx.graph().clone(),
                sep_sets,
                context: ctx,
                n_iters: state.n_iters,
            });
        };

        // Stage 2: re-test the survivors against PDS pools.
        let pag = collider_oriented_pag(ctx.graph(), &sep_sets);
        info!(
            edges = ctx.graph().edge_count(),
            "stage one complete, starting PDS stage"
        );

        let bound = self.max_path_length.or(context.max_path_length());
        let mut second_ctx = ctx.to_builder().max_path_length(bound).build()?;
        second_ctx.graph_mut().reset_annotations();
        second_ctx.set_pag(pag);

        let x_nodes = second_ctx.graph().nodes();
        state.rewind(self.config.min_cond_set_size);
        SkeletonEngine::new(&self.config, second).run(
            &mut second_ctx,
            &evaluator,
            &mut sep_sets,
            &x_nodes,
            &BTreeSet::new(),
            &BTreeSet::new(),
            &mut state,
        )?;

        info!(
            nodes = second_ctx.graph().node_count(),
            edges = second_ctx.graph().edge_count(),
            "semi-markovian skeleton complete"
        );
        Ok(SkeletonResult {
            graph: second_ctx.graph().clone(),
            sep_sets,
            context: second_ctx,
            n_iters: state.n_iters,
        })
    }
}
