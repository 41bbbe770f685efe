//! Edge evaluators: how one (x, y, z) test is actually carried out.
//!
//! The engine is generic over this seam. Evaluator errors never abort a
//! round; the engine absorbs them as maximal dependence.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context as _};

use causeway_core::{CondSet, Dataset, ICondDiscrepancyTest, ICondIndTest, TestOutcome, Variable};

/// One edge test under one conditioning set.
pub trait EdgeEvaluator: Sync {
    fn evaluate(&self, x: &Variable, y: &Variable, z: &CondSet) -> anyhow::Result<TestOutcome>;
}

/// Direct conditional-independence evaluation over a single dataset.
pub struct CiEdgeEvaluator<'a, T: ICondIndTest> {
    data: &'a Dataset,
    test: &'a T,
}

impl<'a, T: ICondIndTest> CiEdgeEvaluator<'a, T> {
    pub fn new(data: &'a Dataset, test: &'a T) -> Self {
        Self { data, test }
    }
}

impl<T: ICondIndTest> EdgeEvaluator for CiEdgeEvaluator<'_, T> {
    fn evaluate(&self, x: &Variable, y: &Variable, z: &CondSet) -> anyhow::Result<TestOutcome> {
        self.test.test(self.data, x, y, z)
    }
}

/// Cross-distribution invariance evaluation for F-node edges.
///
/// The F-node's sigma-map entry names two distributions; their datasets are
/// tagged with a 0/1 group column named after the F-node, stacked, and
/// handed to the discrepancy test comparing y across the group given z.
pub struct CrossDistributionEvaluator<'a, T: ICondDiscrepancyTest> {
    datasets: &'a [Dataset],
    sigma_map: BTreeMap<Variable, (usize, usize)>,
    test: &'a T,
}

impl<'a, T: ICondDiscrepancyTest> CrossDistributionEvaluator<'a, T> {
    pub fn new(
        datasets: &'a [Dataset],
        sigma_map: BTreeMap<Variable, (usize, usize)>,
        test: &'a T,
    ) -> Self {
        Self {
            datasets,
            sigma_map,
            test,
        }
    }
}

impl<T: ICondDiscrepancyTest> EdgeEvaluator for CrossDistributionEvaluator<'_, T> {
    fn evaluate(&self, x: &Variable, y: &Variable, z: &CondSet) -> anyhow::Result<TestOutcome> {
        let (i, j) = self
            .sigma_map
            .get(x)
            .copied()
            .ok_or_else(|| anyhow!("no sigma-map entry for F-node {x}"))?;
        let left = self
            .datasets
            .get(i)
            .ok_or_else(|| anyhow!("sigma-map names distribution {i}, none loaded"))?;
        let right = self
            .datasets
            .get(j)
            .ok_or_else(|| anyhow!("sigma-map names distribution {j}, none loaded"))?;

        let tagged_left = left.with_constant_column(x.clone(), 0.0)?;
        let tagged_right = right.with_constant_column(x.clone(), 1.0)?;
        let merged = tagged_left
            .concat_rows(&tagged_right)
            .context("stacking distribution pair for cross-distribution test")?;

        self.test.test(&merged, y, x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn v(name: &str) -> Variable {
        Variable::column(name)
    }

    /// Captures what the discrepancy test was handed.
    struct Probe {
        calls: AtomicUsize,
    }

    impl ICondDiscrepancyTest for Probe {
        fn test(
            &self,
            data: &Dataset,
            _y: &Variable,
            group: &Variable,
            _z: &BTreeSet<Variable>,
        ) -> anyhow::Result<TestOutcome> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let indicator = data.column(group).expect("group column present");
            assert_eq!(indicator, &[0.0, 0.0, 1.0]);
            Ok(TestOutcome {
                statistic: 1.0,
                pvalue: 0.5,
            })
        }
    }

    #[test]
    fn cross_distribution_split_tags_and_stacks() {
        let obs = Dataset::from_columns([(v("y"), vec![1.0, 2.0])]).unwrap();
        let interv = Dataset::from_columns([(v("y"), vec![3.0])]).unwrap();
        let datasets = vec![obs, interv];

        let f = Variable::f_node(0);
        let sigma: BTreeMap<Variable, (usize, usize)> =
            [(f.clone(), (0, 1))].into_iter().collect();
        let probe = Probe {
            calls: AtomicUsize::new(0),
        };
        let evaluator = CrossDistributionEvaluator::new(&datasets, sigma, &probe);

        let outcome = evaluator.evaluate(&f, &v("y"), &CondSet::new()).unwrap();
        assert_eq!(outcome.pvalue, 0.5);
        assert_eq!(probe.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn missing_sigma_entry_is_an_error() {
        let datasets: Vec<Dataset> = Vec::new();
        let probe = Probe {
            calls: AtomicUsize::new(0),
        };
        let evaluator = CrossDistributionEvaluator::new(&datasets, BTreeMap::new(), &probe);
        let result = evaluator.evaluate(&Variable::f_node(0), &v("y"), &CondSet::new());
        assert!(result.is_err());
    }
}
