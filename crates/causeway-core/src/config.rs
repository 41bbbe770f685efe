//! Search configuration shared by all skeleton learners.

use serde::{Deserialize, Serialize};

use crate::errors::{CausewayError, CausewayResult};

/// Knobs of the conditioning-set search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkeletonConfig {
    /// Significance threshold: a p-value above this declares independence.
    pub alpha: f64,
    /// Smallest conditioning-set size tested.
    pub min_cond_set_size: usize,
    /// Largest conditioning-set size tested; `None` means unbounded.
    pub max_cond_set_size: Option<usize>,
    /// Cap on how many conditioning sets are drawn per pair per round.
    /// `None` means exhaust the pool. The only backpressure against
    /// combinatorial blow-up.
    pub max_combinations: Option<usize>,
    /// Order candidate pools by decreasing edge test statistic, so a
    /// `max_combinations` cap tests the strongest dependencies first.
    pub keep_sorted: bool,
    /// Fan the per-pair inner loops of each round out over a rayon pool.
    pub parallel: bool,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            min_cond_set_size: 0,
            max_cond_set_size: None,
            max_combinations: None,
            keep_sorted: false,
            parallel: false,
        }
    }
}

impl SkeletonConfig {
    /// Reject configurations the search cannot run with. Called once at the
    /// start of every fit, before any testing.
    pub fn validate(&self) -> CausewayResult<()> {
        if let Some(cap) = self.max_combinations {
            if cap == 0 {
                return Err(CausewayError::InvalidConfig {
                    reason: "max_combinations must be at least 1".to_string(),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(CausewayError::InvalidConfig {
                reason: format!("alpha must be within [0, 1], got {}", self.alpha),
            });
        }
        if let Some(max) = self.max_cond_set_size {
            if max < self.min_cond_set_size {
                return Err(CausewayError::InvalidConfig {
                    reason: format!(
                        "max_cond_set_size {} below min_cond_set_size {}",
                        max, self.min_cond_set_size
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SkeletonConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_combination_cap_rejected() {
        let config = SkeletonConfig {
            max_combinations: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CausewayError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn inverted_size_bounds_rejected() {
        let config = SkeletonConfig {
            min_cond_set_size: 3,
            max_cond_set_size: Some(1),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
