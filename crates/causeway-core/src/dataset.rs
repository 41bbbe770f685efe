//! Column-major tabular dataset keyed by `Variable`.
//!
//! The search engine only needs column lookup, row counts, and the
//! relabel-and-concat operation used by cross-distribution tests, so the
//! type is deliberately small rather than a full dataframe.

use rustc_hash::FxHashMap;

use crate::errors::{CausewayError, CausewayResult};
use crate::variable::Variable;

/// A numeric table: named columns of equal length.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Column order, preserved for reproducible concatenation.
    order: Vec<Variable>,
    columns: FxHashMap<Variable, Vec<f64>>,
    n_rows: usize,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(variable, values)` pairs. All columns must share one length.
    pub fn from_columns(
        columns: impl IntoIterator<Item = (Variable, Vec<f64>)>,
    ) -> CausewayResult<Self> {
        let mut dataset = Dataset::new();
        for (var, values) in columns {
            dataset.push_column(var, values)?;
        }
        Ok(dataset)
    }

    /// Append a column; the first column fixes the row count.
    pub fn push_column(&mut self, var: Variable, values: Vec<f64>) -> CausewayResult<()> {
        if self.columns.contains_key(&var) {
            return Err(CausewayError::InvalidDataset {
                reason: format!("duplicate column {var}"),
            });
        }
        if self.order.is_empty() {
            self.n_rows = values.len();
        } else if values.len() != self.n_rows {
            return Err(CausewayError::InvalidDataset {
                reason: format!(
                    "column {var} has {} rows, expected {}",
                    values.len(),
                    self.n_rows
                ),
            });
        }
        self.order.push(var.clone());
        self.columns.insert(var, values);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.order.len()
    }

    /// Column order as declared.
    pub fn variables(&self) -> &[Variable] {
        &self.order
    }

    pub fn column(&self, var: &Variable) -> Option<&[f64]> {
        self.columns.get(var).map(Vec::as_slice)
    }

    pub fn has_column(&self, var: &Variable) -> bool {
        self.columns.contains_key(var)
    }

    /// Copy of this dataset with one extra constant-valued column.
    ///
    /// Used to tag each half of a cross-distribution comparison with the
    /// group indicator named after the F-node being tested.
    pub fn with_constant_column(&self, var: Variable, value: f64) -> CausewayResult<Self> {
        let mut out = self.clone();
        out.push_column(var, vec![value; out.n_rows])?;
        Ok(out)
    }

    /// Stack the rows of `other` under `self`. Column sets must match; the
    /// column order of `self` wins.
    pub fn concat_rows(&self, other: &Dataset) -> CausewayResult<Self> {
        if self.n_cols() != other.n_cols() {
            return Err(CausewayError::InvalidDataset {
                reason: format!(
                    "cannot concat: {} columns vs {}",
                    self.n_cols(),
                    other.n_cols()
                ),
            });
        }
        let mut out = Dataset::new();
        for var in &self.order {
            let left = self.column(var).expect("declared column present");
            let right = other
                .column(var)
                .ok_or_else(|| CausewayError::InvalidDataset {
                    reason: format!("cannot concat: missing column {var}"),
                })?;
            let mut values = Vec::with_capacity(left.len() + right.len());
            values.extend_from_slice(left);
            values.extend_from_slice(right);
            out.push_column(var.clone(), values)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Variable {
        Variable::column(name)
    }

    #[test]
    fn ragged_columns_rejected() {
        let result = Dataset::from_columns([
            (v("a"), vec![1.0, 2.0]),
            (v("b"), vec![1.0]),
        ]);
        assert!(matches!(result, Err(CausewayError::InvalidDataset { .. })));
    }

    #[test]
    fn duplicate_column_rejected() {
        let mut data = Dataset::new();
        data.push_column(v("a"), vec![1.0]).unwrap();
        assert!(data.push_column(v("a"), vec![2.0]).is_err());
    }

    #[test]
    fn tag_and_concat_builds_group_column() {
        let obs = Dataset::from_columns([(v("y"), vec![1.0, 2.0])]).unwrap();
        let interv = Dataset::from_columns([(v("y"), vec![3.0])]).unwrap();

        let f = Variable::f_node(0);
        let tagged_obs = obs.with_constant_column(f.clone(), 0.0).unwrap();
        let tagged_interv = interv.with_constant_column(f.clone(), 1.0).unwrap();
        let merged = tagged_obs.concat_rows(&tagged_interv).unwrap();

        assert_eq!(merged.n_rows(), 3);
        assert_eq!(merged.column(&f).unwrap(), &[0.0, 0.0, 1.0]);
        assert_eq!(merged.column(&v("y")).unwrap(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn concat_requires_matching_columns() {
        let a = Dataset::from_columns([(v("x"), vec![1.0])]).unwrap();
        let b = Dataset::from_columns([(v("y"), vec![1.0])]).unwrap();
        assert!(a.concat_rows(&b).is_err());
    }
}
