//! Separating-set bookkeeping.
//!
//! Records, for every unordered variable pair found independent, the
//! conditioning sets that separated them. Symmetric and append-only: the
//! search never retracts a recorded set.

use std::collections::{BTreeMap, BTreeSet};

use crate::variable::Variable;

/// A conditioning set. Ordered so iteration and comparison are reproducible.
pub type CondSet = BTreeSet<Variable>;

/// Map from variable to variable to the list of separating sets recorded for
/// that pair, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct SeparatingSets {
    sets: BTreeMap<Variable, BTreeMap<Variable, Vec<CondSet>>>,
}

impl SeparatingSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `x` and `y` were separated by `z`, in both directions.
    pub fn record(&mut self, x: &Variable, y: &Variable, z: CondSet) {
        self.sets
            .entry(x.clone())
            .or_default()
            .entry(y.clone())
            .or_default()
            .push(z.clone());
        self.sets
            .entry(y.clone())
            .or_default()
            .entry(x.clone())
            .or_default()
            .push(z);
    }

    /// All sets recorded for the pair, oldest first. Empty if none.
    pub fn get(&self, x: &Variable, y: &Variable) -> &[CondSet] {
        self.sets
            .get(x)
            .and_then(|inner| inner.get(y))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `node` appears in ANY recorded separating set of `(x, y)`.
    ///
    /// This is the membership mode collider orientation relies on: a node
    /// absent from every separating set of a non-adjacent pair is a collider.
    pub fn contains_in_any(&self, node: &Variable, x: &Variable, y: &Variable) -> bool {
        self.get(x, y).iter().any(|z| z.contains(node))
    }

    /// Whether anything has been recorded for the pair.
    pub fn has_pair(&self, x: &Variable, y: &Variable) -> bool {
        !self.get(x, y).is_empty()
    }

    /// Add `extra` to every separating set of every pair that has at least
    /// one recorded set. Used to keep separating sets consistent with
    /// F-nodes before the interventional pass.
    pub fn augment_all(&mut self, extra: &BTreeSet<Variable>) {
        if extra.is_empty() {
            return;
        }
        for inner in self.sets.values_mut() {
            for sets in inner.values_mut() {
                for set in sets.iter_mut() {
                    set.extend(extra.iter().cloned());
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of directed entries (each pair counts twice).
    pub fn len(&self) -> usize {
        self.sets.values().map(|inner| inner.len()).sum()
    }

    /// Iterate `(x, y, sets)` over every directed entry, in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Variable, &[CondSet])> {
        self.sets.iter().flat_map(|(x, inner)| {
            inner.iter().map(move |(y, sets)| (x, y, sets.as_slice()))
        })
    }
}
