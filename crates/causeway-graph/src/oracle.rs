//! Graph-faithful test oracles.
//!
//! Stand-ins for statistical tests when the true graph is known: the oracle
//! answers exactly what a faithful test would conclude, with p-value 1 for
//! independence and 0 for dependence.

use std::collections::BTreeSet;

use anyhow::bail;

use causeway_core::{Dataset, ICondDiscrepancyTest, ICondIndTest, TestOutcome, Variable};

use crate::dag::Dag;

const INDEPENDENT: TestOutcome = TestOutcome {
    statistic: 0.0,
    pvalue: 1.0,
};

/// Conditional independence oracle over a known DAG.
#[derive(Debug, Clone)]
pub struct OracleCi {
    dag: Dag,
}

impl OracleCi {
    pub fn new(dag: Dag) -> Self {
        Self { dag }
    }
}

impl ICondIndTest for OracleCi {
    fn test(
        &self,
        _data: &Dataset,
        x: &Variable,
        y: &Variable,
        z: &BTreeSet<Variable>,
    ) -> anyhow::Result<TestOutcome> {
        for var in [x, y].into_iter().chain(z.iter()) {
            if !self.dag.has_node(var) {
                bail!("variable {var} not present in the oracle graph");
            }
        }
        if self.dag.d_separated(x, y, z) {
            Ok(INDEPENDENT)
        } else {
            Ok(TestOutcome::DEPENDENT)
        }
    }
}

/// Conditional discrepancy oracle over a known F-node-augmented DAG.
///
/// Invariance of Y across the two distributions an F-node compares holds
/// exactly when Y is d-separated from the F-node in the augmented graph.
#[derive(Debug, Clone)]
pub struct OracleCd {
    augmented: Dag,
}

impl OracleCd {
    pub fn new(augmented: Dag) -> Self {
        Self { augmented }
    }
}

impl ICondDiscrepancyTest for OracleCd {
    fn test(
        &self,
        _data: &Dataset,
        y: &Variable,
        group: &Variable,
        z: &BTreeSet<Variable>,
    ) -> anyhow::Result<TestOutcome> {
        for var in [y, group].into_iter().chain(z.iter()) {
            if !self.augmented.has_node(var) {
                bail!("variable {var} not present in the augmented oracle graph");
            }
        }
        if self.augmented.d_separated(group, y, z) {
            Ok(INDEPENDENT)
        } else {
            Ok(TestOutcome::DEPENDENT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Variable {
        Variable::column(name)
    }

    #[test]
    fn oracle_reports_collider_independence() {
        let mut dag = Dag::new();
        dag.add_edge(&v("x"), &v("m")).unwrap();
        dag.add_edge(&v("z"), &v("m")).unwrap();
        let oracle = OracleCi::new(dag);
        let data = Dataset::new();

        let marginal = oracle.test(&data, &v("x"), &v("z"), &BTreeSet::new()).unwrap();
        assert!(marginal.pvalue > 0.5);

        let conditioned = oracle
            .test(&data, &v("x"), &v("z"), &[v("m")].into_iter().collect())
            .unwrap();
        assert_eq!(conditioned.pvalue, 0.0);
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let mut dag = Dag::new();
        dag.add_edge(&v("x"), &v("y")).unwrap();
        let oracle = OracleCi::new(dag);
        let result = oracle.test(&Dataset::new(), &v("x"), &v("ghost"), &BTreeSet::new());
        assert!(result.is_err());
    }
}
