//! Centralized balancing configuration.
//!
//! Every numeric knob the engine uses lives here instead of as a hardcoded
//! magic number: rating weights, consensus thresholds, position gap limits
//! and the optimizer budget. Values can be configured via presets or an
//! environment variable.
//!
//! ## Usage
//!
//! ```rust
//! use tb_core::config::BalanceConfig;
//!
//! // Default thresholds
//! let config = BalanceConfig::default();
//!
//! // Casual preset (looser position constraints, fewer swaps)
//! let casual = BalanceConfig::casual();
//!
//! // From environment variable
//! let from_env = BalanceConfig::from_env_or_default();
//! ```
//!
//! ## Environment Variables
//!
//! - `TB_BALANCE_PROFILE`: Select preset (casual, competitive, default)

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{BalanceError, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BalanceConfig {
    /// Players per skill tier; the final tier absorbs any remainder.
    pub tier_size: usize,
    pub rating: RatingWeights,
    pub momentum: MomentumConfig,
    pub consensus: ConsensusConfig,
    pub evaluator: EvaluatorWeights,
    pub constraints: ConstraintConfig,
    pub optimizer: OptimizerConfig,
    /// Rating-point margin for draft value-pick / reach detection.
    pub value_margin: f32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            tier_size: 4,
            rating: RatingWeights::default(),
            momentum: MomentumConfig::default(),
            consensus: ConsensusConfig::default(),
            evaluator: EvaluatorWeights::default(),
            constraints: ConstraintConfig::default(),
            optimizer: OptimizerConfig::default(),
            value_margin: 0.25,
        }
    }
}

/// Weights for the three-layer rating combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RatingWeights {
    /// Rating points per win-rate percentage point above/below 50%.
    pub win_rate_weight: f32,
    /// Rating points per goal of average goal differential.
    pub goal_diff_weight: f32,
    /// Cap on the combined performance adjustment, in rating points.
    pub performance_cap: f32,
    /// Rating points added (hot) or subtracted (cold) for momentum.
    pub momentum_bonus: f32,
}

impl Default for RatingWeights {
    fn default() -> Self {
        Self {
            win_rate_weight: 0.02,
            goal_diff_weight: 0.10,
            performance_cap: 1.0,
            momentum_bonus: 0.25,
        }
    }
}

/// Thresholds for deriving the hot/cold/steady momentum label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MomentumConfig {
    /// Recent-vs-overall win-rate delta (percentage points) that counts
    /// as materially above/below.
    pub win_rate_delta: f32,
    /// Recent-vs-overall goal-differential delta that counts as material.
    pub goal_diff_delta: f32,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self { win_rate_delta: 10.0, goal_diff_delta: 0.5 }
    }
}

/// Participation-adaptive classification thresholds for position votes.
///
/// The primary cutoff is a pure function of how many peers rated the
/// player: sparse data gets a lower bar so an early primary position can
/// still surface, dense data gets a stricter one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Minimum raters before a classification counts as sufficient data.
    pub min_raters: u32,
    /// Primary cutoff (%) at 1-2 raters.
    pub primary_sparse: f32,
    /// Primary cutoff (%) at 3-4 raters.
    pub primary_low: f32,
    /// Primary cutoff (%) at 5-7 raters.
    pub primary_medium: f32,
    /// Primary cutoff (%) at 8+ raters.
    pub primary_high: f32,
    /// Fixed secondary cutoff (%), strictly below every primary cutoff.
    pub secondary_threshold: f32,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            min_raters: 5,
            primary_sparse: 25.0,
            primary_low: 33.0,
            primary_medium: 40.0,
            primary_high: 50.0,
            secondary_threshold: 20.0,
        }
    }
}

impl ConsensusConfig {
    /// Primary threshold for a given rater count.
    pub fn primary_threshold(&self, total_raters: u32) -> f32 {
        match total_raters {
            0..=2 => self.primary_sparse,
            3..=4 => self.primary_low,
            5..=7 => self.primary_medium,
            _ => self.primary_high,
        }
    }

    fn min_primary_threshold(&self) -> f32 {
        self.primary_sparse
            .min(self.primary_low)
            .min(self.primary_medium)
            .min(self.primary_high)
    }
}

/// Per-metric weights and scales for the aggregate balance score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvaluatorWeights {
    pub attack: f32,
    pub defense: f32,
    pub game_iq: f32,
    pub win_rate: f32,
    pub goal_diff: f32,
    /// Weight shared by each present detailed-skill metric.
    pub detailed: f32,
    /// Goal-differential difference treated as "whole scale" when
    /// normalizing (skill metrics normalize by 10, win rate by 100).
    pub goal_diff_scale: f32,
}

impl Default for EvaluatorWeights {
    fn default() -> Self {
        Self {
            attack: 1.0,
            defense: 1.0,
            game_iq: 1.0,
            win_rate: 0.5,
            goal_diff: 0.5,
            detailed: 0.25,
            goal_diff_scale: 5.0,
        }
    }
}

/// Hard position-balance constraints enforced on candidate swaps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConstraintConfig {
    /// Maximum allowed |blue - orange| per position category.
    pub max_position_gap: u32,
    /// Maximum allowed |blue - orange| per specific position code.
    pub max_individual_position_gap: u32,
    /// Fraction of a team that must have a classifiable primary position
    /// before the checks are enforced at all.
    pub min_classified_ratio: f32,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            max_position_gap: 2,
            max_individual_position_gap: 1,
            min_classified_ratio: 0.5,
        }
    }
}

/// Local-search budget and acceptance tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Maximum accepted swaps before the search stops.
    pub max_swaps: u32,
    /// Maximum search iterations (accepted or not).
    pub max_iterations: u32,
    /// Candidate swaps evaluated per iteration, enumeration cut off past
    /// this bound to control cost.
    pub max_candidates_per_iteration: usize,
    /// Minimum aggregate-score improvement an accepted swap must deliver.
    pub improvement_epsilon: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_swaps: 6,
            max_iterations: 24,
            max_candidates_per_iteration: 128,
            improvement_epsilon: 0.05,
        }
    }
}

impl BalanceConfig {
    /// Casual preset - looser position constraints, shorter search.
    pub fn casual() -> Self {
        Self {
            constraints: ConstraintConfig {
                max_position_gap: 3,
                max_individual_position_gap: 2,
                ..ConstraintConfig::default()
            },
            optimizer: OptimizerConfig {
                max_swaps: 3,
                max_iterations: 10,
                ..OptimizerConfig::default()
            },
            ..Self::default()
        }
    }

    /// Competitive preset - tighter convergence, longer search.
    pub fn competitive() -> Self {
        Self {
            optimizer: OptimizerConfig {
                max_swaps: 10,
                max_iterations: 48,
                max_candidates_per_iteration: 256,
                improvement_epsilon: 0.01,
            },
            ..Self::default()
        }
    }

    /// Load from environment variable TB_BALANCE_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        match env::var("TB_BALANCE_PROFILE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "casual" => Self::casual(),
            "competitive" => Self::competitive(),
            _ => Self::default(),
        }
    }

    /// Reject structurally invalid configuration before any computation.
    pub fn validate(&self) -> Result<()> {
        if self.tier_size == 0 {
            return Err(BalanceError::InvalidConfig("tier_size must be >= 1".into()));
        }
        let pct = |name: &str, value: f32| -> Result<()> {
            if !(0.0..=100.0).contains(&value) {
                return Err(BalanceError::InvalidConfig(format!(
                    "{name} must be within 0..=100, got {value}"
                )));
            }
            Ok(())
        };
        pct("consensus.primary_sparse", self.consensus.primary_sparse)?;
        pct("consensus.primary_low", self.consensus.primary_low)?;
        pct("consensus.primary_medium", self.consensus.primary_medium)?;
        pct("consensus.primary_high", self.consensus.primary_high)?;
        pct("consensus.secondary_threshold", self.consensus.secondary_threshold)?;

        if self.consensus.secondary_threshold >= self.consensus.min_primary_threshold() {
            return Err(BalanceError::InvalidConfig(
                "consensus.secondary_threshold must be below every primary threshold".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.constraints.min_classified_ratio) {
            return Err(BalanceError::InvalidConfig(
                "constraints.min_classified_ratio must be within 0..=1".into(),
            ));
        }
        if self.optimizer.max_iterations == 0 {
            return Err(BalanceError::InvalidConfig(
                "optimizer.max_iterations must be >= 1".into(),
            ));
        }
        if self.optimizer.max_candidates_per_iteration == 0 {
            return Err(BalanceError::InvalidConfig(
                "optimizer.max_candidates_per_iteration must be >= 1".into(),
            ));
        }
        if !self.optimizer.improvement_epsilon.is_finite()
            || self.optimizer.improvement_epsilon < 0.0
        {
            return Err(BalanceError::InvalidConfig(
                "optimizer.improvement_epsilon must be a non-negative number".into(),
            ));
        }
        if !self.rating.performance_cap.is_finite() || self.rating.performance_cap < 0.0 {
            return Err(BalanceError::InvalidConfig(
                "rating.performance_cap must be a non-negative number".into(),
            ));
        }
        if self.value_margin < 0.0 {
            return Err(BalanceError::InvalidConfig(
                "value_margin must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(BalanceConfig::default().validate().is_ok());
        assert!(BalanceConfig::casual().validate().is_ok());
        assert!(BalanceConfig::competitive().validate().is_ok());
    }

    #[test]
    fn zero_tier_size_is_rejected() {
        let config = BalanceConfig { tier_size: 0, ..BalanceConfig::default() };
        assert!(matches!(config.validate(), Err(BalanceError::InvalidConfig(_))));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let mut config = BalanceConfig::default();
        config.consensus.primary_high = 130.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn secondary_must_stay_below_primary() {
        let mut config = BalanceConfig::default();
        config.consensus.secondary_threshold = 30.0; // >= primary_sparse (25)
        assert!(config.validate().is_err());
    }

    #[test]
    fn primary_threshold_adapts_to_participation() {
        let consensus = ConsensusConfig::default();
        assert_eq!(consensus.primary_threshold(1), 25.0);
        assert_eq!(consensus.primary_threshold(2), 25.0);
        assert_eq!(consensus.primary_threshold(4), 33.0);
        assert_eq!(consensus.primary_threshold(6), 40.0);
        assert_eq!(consensus.primary_threshold(8), 50.0);
        assert_eq!(consensus.primary_threshold(20), 50.0);
    }
}
