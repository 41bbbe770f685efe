//! Error taxonomy for the discovery workspace.
//!
//! Configuration, re-entrancy, and graph-consistency problems are fatal and
//! abort a fit call. Per-edge statistical test failures are NOT represented
//! here: evaluators surface them as `anyhow::Error` and the search engine
//! absorbs them as maximal dependence.

/// Fatal errors surfaced by discovery runs.
#[derive(Debug, thiserror::Error)]
pub enum CausewayError {
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid dataset: {reason}")]
    InvalidDataset { reason: String },

    #[error("{n_datasets} datasets passed for {n_distributions} declared distributions")]
    DistributionMismatch {
        n_datasets: usize,
        n_distributions: usize,
    },

    #[error("working graph already carries test annotations from a previous run")]
    AnnotatedGraph,

    #[error("graph inconsistency: {details}")]
    GraphInconsistency { details: String },

    #[error("missing staged state: {name}")]
    MissingState { name: &'static str },
}

pub type CausewayResult<T> = Result<T, CausewayError>;
