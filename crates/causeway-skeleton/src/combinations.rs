//! Lazy enumeration of fixed-size conditioning sets from a candidate pool.

use causeway_core::{CondSet, Variable};

/// Iterator over all size-k subsets of a pool, in lexicographic index order.
///
/// Deterministic for a fixed pool ordering. The caller bounds how many
/// subsets are drawn; the iterator itself is exhaustive.
pub struct CondSetIter {
    pool: Vec<Variable>,
    indices: Vec<usize>,
    k: usize,
    started: bool,
    done: bool,
}

impl CondSetIter {
    /// Subsets of size `k` drawn from `pool` with `x` and `y` excluded.
    pub fn new(pool: &[Variable], x: &Variable, y: &Variable, k: usize) -> Self {
        let pool: Vec<Variable> = pool
            .iter()
            .filter(|candidate| *candidate != x && *candidate != y)
            .cloned()
            .collect();
        let done = k > pool.len();
        CondSetIter {
            indices: (0..k).collect(),
            pool,
            k,
            started: false,
            done,
        }
    }

    fn current(&self) -> CondSet {
        self.indices.iter().map(|&i| self.pool[i].clone()).collect()
    }

    /// Advance `indices` to the next combination; false when exhausted.
    fn advance(&mut self) -> bool {
        let n = self.pool.len();
        let mut i = self.k;
        loop {
            if i == 0 {
                return false;
            }
            i -= 1;
            if self.indices[i] != i + n - self.k {
                break;
            }
        }
        self.indices[i] += 1;
        for j in i + 1..self.k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl Iterator for CondSetIter {
    type Item = CondSet;

    fn next(&mut self) -> Option<CondSet> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }
        if self.advance() {
            Some(self.current())
        } else {
            self.done = true;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Variable {
        Variable::column(name)
    }

    fn pool(names: &[&str]) -> Vec<Variable> {
        names.iter().map(|n| v(n)).collect()
    }

    #[test]
    fn size_zero_yields_one_empty_set() {
        let sets: Vec<CondSet> = CondSetIter::new(&pool(&["a", "b"]), &v("x"), &v("y"), 0).collect();
        assert_eq!(sets, vec![CondSet::new()]);
    }

    #[test]
    fn enumerates_all_pairs() {
        let sets: Vec<CondSet> =
            CondSetIter::new(&pool(&["a", "b", "c"]), &v("x"), &v("y"), 2).collect();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0], [v("a"), v("b")].into_iter().collect());
        assert_eq!(sets[1], [v("a"), v("c")].into_iter().collect());
        assert_eq!(sets[2], [v("b"), v("c")].into_iter().collect());
    }

    #[test]
    fn excludes_the_tested_pair() {
        let sets: Vec<CondSet> =
            CondSetIter::new(&pool(&["a", "x", "y"]), &v("x"), &v("y"), 1).collect();
        assert_eq!(sets, vec![[v("a")].into_iter().collect()]);
    }

    #[test]
    fn oversized_request_yields_nothing() {
        let sets: Vec<CondSet> = CondSetIter::new(&pool(&["a"]), &v("x"), &v("y"), 2).collect();
        assert!(sets.is_empty());
    }

    #[test]
    fn deterministic_for_fixed_pool_order() {
        let first: Vec<CondSet> =
            CondSetIter::new(&pool(&["c", "a", "b"]), &v("x"), &v("y"), 2).collect();
        let second: Vec<CondSet> =
            CondSetIter::new(&pool(&["c", "a", "b"]), &v("x"), &v("y"), 2).collect();
        assert_eq!(first, second);
    }
}
