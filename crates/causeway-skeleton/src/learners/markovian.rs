//! Markovian skeleton learner: one engine pass, no latent confounding.

use std::collections::BTreeSet;

use tracing::info;

use causeway_core::{CausewayResult, Dataset, ICondIndTest, SeparatingSets, SkeletonConfig};
use causeway_graph::Context;

use crate::engine::{SearchState, SkeletonEngine};
use crate::evaluate::CiEdgeEvaluator;
use crate::learners::{guard_fresh_graph, SkeletonResult};
use crate::strategy::ConditioningStrategy;

/// Learns the skeleton of a Markovian causal model by conditional
/// independence testing against neighbor-derived conditioning pools.
pub struct SkeletonLearner<'a, T: ICondIndTest> {
    test: &'a T,
    config: SkeletonConfig,
    strategy: ConditioningStrategy,
}

impl<'a, T: ICondIndTest> SkeletonLearner<'a, T> {
    pub fn new(test: &'a T) -> Self {
        Self {
            test,
            config: SkeletonConfig::default(),
            strategy: ConditioningStrategy::Neighbors,
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

    /// Learn the skeleton. The caller's context is copied, never mutated.
    pub fn fit(&self, data: &Dataset, context: &Context) -> CausewayResult<SkeletonResult> {
        self.config.validate()?;

        let mut ctx = context.clone();
        guard_fresh_graph(&ctx)?;
        ctx.graph_mut().reset_annotations();

        let mut sep_sets = SeparatingSets::new();
        let mut state = SearchState::new(self.config.min_cond_set_size);
        let x_nodes = ctx.graph().nodes();

        let engine = SkeletonEngine::new(&self.config, self.strategy);
        let evaluator = CiEdgeEvaluator::new(data, self.test);
        engine.run(
            &mut ctx,
            &evaluator,
            &mut sep_sets,
            &x_nodes,
            &BTreeSet::new(),
            &BTreeSet::new(),
            &mut state,
        )?;

        info!(
            nodes = ctx.graph().node_count(),
            edges = ctx.graph().edge_count(),
            "markovian skeleton pass complete"
        );
        Ok(SkeletonResult {
            graph: ctx.graph().clone(),
            sep_sets,
            context: ctx,
            n_iters: state.n_iters,
        })
    }
}
