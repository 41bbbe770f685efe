//! # causeway-skeleton
//!
//! The skeleton discovery engine: iterates conditioning-set sizes, tests
//! every surviving edge against candidate conditioning sets, and prunes the
//! working graph round by round. Three learner workflows compose the same
//! engine:
//! - `SkeletonLearner`: one pass, Markovian setting
//! - `SemiMarkovianLearner`: two passes, PDS pools from an intermediate PAG
//! - `InterventionalLearner`: observational pass plus a cross-distribution
//!   F-node pass over multiple datasets

pub mod combinations;
pub mod engine;
pub mod evaluate;
pub mod learners;
pub mod pairs;
pub mod strategy;

pub use engine::{SearchState, SkeletonEngine};
pub use evaluate::{CiEdgeEvaluator, CrossDistributionEvaluator, EdgeEvaluator};
pub use learners::{
    InterventionalLearner, SemiMarkovianLearner, SkeletonLearner, SkeletonResult,
};
pub use strategy::ConditioningStrategy;
