//! # causeway-core
//!
//! Foundation crate for the Causeway causal discovery workspace.
//! Defines variable identifiers, the tabular dataset type, separating-set
//! records, errors, search configuration, and the statistical test traits.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod dataset;
pub mod errors;
pub mod sepset;
pub mod traits;
pub mod variable;

// Re-export the most commonly used types at the crate root.
pub use config::SkeletonConfig;
pub use dataset::Dataset;
pub use errors::{CausewayError, CausewayResult};
pub use sepset::{CondSet, SeparatingSets};
pub use traits::{ICondDiscrepancyTest, ICondIndTest, TestOutcome};
pub use variable::Variable;
