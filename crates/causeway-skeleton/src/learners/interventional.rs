//! Interventional / multi-domain skeleton learner.
//!
//! Two phases over a list of per-distribution datasets. Phase one learns an
//! observational skeleton over the regular variables. Phase two wires every
//! F-node to every regular variable, stages a collider-oriented PAG with
//! the F-node edges forced directed, and re-tests the F-node edges with the
//! cross-distribution discrepancy evaluator: an F-node keeps its edge to a
//! variable exactly when that variable's conditional law differs between
//! the two distributions the F-node compares.

use std::collections::BTreeSet;

use tracing::info;

use causeway_core::{
    CausewayError, CausewayResult, Dataset, ICondDiscrepancyTest, ICondIndTest, SeparatingSets,
    SkeletonConfig,
};
use causeway_graph::{Context, EdgeStats};

use crate::engine::{SearchState, SkeletonEngine};
use crate::evaluate::{CiEdgeEvaluator, CrossDistributionEvaluator};
use crate::learners::{collider_oriented_pag, guard_fresh_graph, SkeletonResult};
use crate::strategy::ConditioningStrategy;

/// Skeleton learner over observational plus interventional distributions.
pub struct InterventionalLearner<'a, T: ICondIndTest, D: ICondDiscrepancyTest> {
    ci_test: &'a T,
    cd_test: &'a D,
    config: SkeletonConfig,
    strategy: ConditioningStrategy,
    second_stage: ConditioningStrategy,
    max_path_length: Option<usize>,
}

impl<'a, T: ICondIndTest, D: ICondDiscrepancyTest> InterventionalLearner<'a, T, D> {
    pub fn new(ci_test: &'a T, cd_test: &'a D) -> Self {
        Self {
            ci_test,
            cd_test,
            config: SkeletonConfig::default(),
            strategy: ConditioningStrategy::Neighbors,
            second_stage: ConditioningStrategy::Pds,
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

    /// PDS-based strategy used for the F-node pass.
    pub fn with_second_stage(mut self, strategy: ConditioningStrategy) -> Self {
        self.second_stage = strategy;
        self
    }

    pub fn with_max_path_length(mut self, bound: Option<usize>) -> Self {
        self.max_path_length = bound;
        self
    }

    /// Learn the augmented skeleton from one dataset per distribution.
    pub fn fit(&self, data: &[Dataset], context: &Context) -> CausewayResult<SkeletonResult> {
        self.config.validate()?;
        if !self.second_stage.requires_pag() {
            return Err(CausewayError::InvalidConfig {
                reason: format!(
                    "F-node stage strategy {:?} is not PDS-based",
                    self.second_stage
                ),
            });
        }
        if data.len() != context.num_distributions() {
            return Err(CausewayError::DistributionMismatch {
                n_datasets: data.len(),
                n_distributions: context.num_distributions(),
            });
        }
        if data.is_empty() {
            return Err(CausewayError::InvalidConfig {
                reason: "at least one dataset is required".to_string(),
            });
        }

        let ctx = context.clone();
        guard_fresh_graph(&ctx)?;

        let f_nodes = ctx.f_nodes().clone();
        let non_f_nodes = ctx.non_f_nodes();

        // The observational distribution if declared, otherwise the largest
        // experimental dataset stands in for it.
        let mut obs_data = &data[0];
        if !ctx.has_obs_distribution() {
            for dataset in &data[1..] {
                if dataset.n_rows() > obs_data.n_rows() {
                    obs_data = dataset;
                }
            }
        }

        // Phase one: observational skeleton over the regular variables.
        let mut obs_ctx = ctx
            .to_builder()
            .graph(ctx.graph().subgraph(&non_f_nodes))
            .build()?;
        obs_ctx.graph_mut().reset_annotations();

        let mut sep_sets = SeparatingSets::new();
        let mut state = SearchState::new(self.config.min_cond_set_size);
        let x_nodes = obs_ctx.graph().nodes();

        let obs_evaluator = CiEdgeEvaluator::new(obs_data, self.ci_test);
        SkeletonEngine::new(&self.config, self.strategy).run(
            &mut obs_ctx,
            &obs_evaluator,
            &mut sep_sets,
            &x_nodes,
            &BTreeSet::new(),
            &BTreeSet::new(),
            &mut state,
        )?;

        let obs_skeleton = obs_ctx.graph().clone();
        info!(
            edges = obs_skeleton.edge_count(),
            "observational skeleton complete"
        );

        // Every recorded separating set is augmented with all F-nodes,
        // keeping the sets consistent with the augmented graph where
        // F-nodes are never colliders between regular variables.
        sep_sets.augment_all(&f_nodes);

        // Phase two graph: observational skeleton plus a fully connected
        // F-node to regular-node layer.
        let mut augmented = obs_skeleton.clone();
        for f_node in &f_nodes {
            for node in &non_f_nodes {
                augmented.add_edge(f_node, node, EdgeStats::UNSET);
            }
        }

        // The staged PAG keeps the collider orientations of the
        // observational stage and forces every F-node edge directed, which
        // preserves PDS sets for the augmented graph.
        let mut pag = collider_oriented_pag(&obs_skeleton, &sep_sets);
        for f_node in &f_nodes {
            for node in &non_f_nodes {
                pag.add_directed_edge(f_node, node);
            }
        }

        let bound = self.max_path_length.or(context.max_path_length());
        let mut interv_ctx = ctx.to_builder().graph(augmented).max_path_length(bound).build()?;
        interv_ctx.set_pag(pag);
        interv_ctx.set_obs_skeleton(obs_skeleton);

        // Phase two: test every F-node edge across its distribution pair,
        // with F-nodes barred from conditioning pools.
        let cross_evaluator =
            CrossDistributionEvaluator::new(data, interv_ctx.sigma_map().clone(), self.cd_test);
        let x_nodes: Vec<_> = f_nodes.iter().cloned().collect();
        state.rewind(self.config.min_cond_set_size);
        SkeletonEngine::new(&self.config, self.second_stage).run(
            &mut interv_ctx,
            &cross_evaluator,
            &mut sep_sets,
            &x_nodes,
            &BTreeSet::new(),
            &f_nodes,
            &mut state,
        )?;

        info!(
            nodes = interv_ctx.graph().node_count(),
            edges = interv_ctx.graph().edge_count(),
            "interventional skeleton complete"
        );
        Ok(SkeletonResult {
            graph: interv_ctx.graph().clone(),
            sep_sets,
            context: interv_ctx,
            n_iters: state.n_iters,
        })
    }
}
