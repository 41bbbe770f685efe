//! Statistical test traits implemented by injected collaborators.
//!
//! Implementations may be real statistical tests or graph oracles. Failures
//! cross this boundary as `anyhow::Error`; the search engine treats a failed
//! test as maximal evidence of dependence rather than aborting.

use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::variable::Variable;

/// Outcome of one statistical test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    pub statistic: f64,
    pub pvalue: f64,
}

impl TestOutcome {
    /// The outcome substituted when an underlying test fails: maximal
    /// dependence, so the edge is kept.
    pub const DEPENDENT: TestOutcome = TestOutcome {
        statistic: f64::INFINITY,
        pvalue: 0.0,
    };
}

/// Conditional independence test: X ⟂ Y | Z over one dataset.
pub trait ICondIndTest: Send + Sync {
    fn test(
        &self,
        data: &Dataset,
        x: &Variable,
        y: &Variable,
        z: &BTreeSet<Variable>,
    ) -> anyhow::Result<TestOutcome>;
}

/// Conditional discrepancy test: whether the conditional law of Y given Z is
/// invariant across the binary `group` column.
pub trait ICondDiscrepancyTest: Send + Sync {
    fn test(
        &self,
        data: &Dataset,
        y: &Variable,
        group: &Variable,
        z: &BTreeSet<Variable>,
    ) -> anyhow::Result<TestOutcome>;
}
