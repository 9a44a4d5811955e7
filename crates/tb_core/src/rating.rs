//! Three-layer player rating.
//!
//! `rating = base skill + bounded performance adjustment + momentum adjustment`,
//! clamped to the 0-10 skill scale. Deterministic and monotonic: a better
//! win rate or goal differential never lowers the rating.

use serde::{Deserialize, Serialize};

use crate::config::{BalanceConfig, MomentumConfig, RatingWeights};
use crate::models::{Momentum, Performance, Player, PlayerInput};

pub const RATING_MIN: f32 = 0.0;
pub const RATING_MAX: f32 = 10.0;

/// Full breakdown of one rating computation, kept for the decision trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingBreakdown {
    pub base: f32,
    pub performance_adj: f32,
    pub momentum: Momentum,
    pub momentum_adj: f32,
    pub rating: f32,
    pub is_new: bool,
}

/// Derive the momentum label by comparing recent figures against overall.
///
/// Material movement on either axis (win rate or goal differential) is
/// enough; when the two axes disagree the win-rate axis wins, since it is
/// the less noisy signal.
pub fn derive_momentum(perf: &Performance, config: &MomentumConfig) -> Momentum {
    let win_delta = perf.recent_win_rate - perf.overall_win_rate;
    let goal_delta = perf.recent_goal_diff - perf.overall_goal_diff;

    if win_delta >= config.win_rate_delta {
        Momentum::Hot
    } else if win_delta <= -config.win_rate_delta {
        Momentum::Cold
    } else if goal_delta >= config.goal_diff_delta {
        Momentum::Hot
    } else if goal_delta <= -config.goal_diff_delta {
        Momentum::Cold
    } else {
        Momentum::Steady
    }
}

/// Bounded adjustment from overall performance history, in rating points.
fn performance_adjustment(perf: &Performance, weights: &RatingWeights) -> f32 {
    let win_component = (perf.overall_win_rate - 50.0) * weights.win_rate_weight;
    let goal_component = perf.overall_goal_diff * weights.goal_diff_weight;
    (win_component + goal_component).clamp(-weights.performance_cap, weights.performance_cap)
}

/// Compute the rating breakdown for one player.
///
/// Players without performance history get the base-skill-only rating and
/// are flagged `is_new`; they always receive a valid, comparable number.
pub fn rate(input: &PlayerInput, config: &BalanceConfig) -> RatingBreakdown {
    let base = input.base_skill.mean();

    let (performance_adj, momentum, is_new) = match &input.performance {
        Some(perf) => {
            let adj = performance_adjustment(perf, &config.rating);
            (adj, derive_momentum(perf, &config.momentum), false)
        }
        None => (0.0, Momentum::Steady, true),
    };

    let momentum_adj = match momentum {
        Momentum::Hot => config.rating.momentum_bonus,
        Momentum::Cold => -config.rating.momentum_bonus,
        Momentum::Steady => 0.0,
    };

    let rating = (base + performance_adj + momentum_adj).clamp(RATING_MIN, RATING_MAX);

    RatingBreakdown { base, performance_adj, momentum, momentum_adj, rating, is_new }
}

/// Build the engine-internal [`Player`] from a caller-supplied input.
pub fn build_player(input: &PlayerInput, config: &BalanceConfig) -> (Player, RatingBreakdown) {
    let breakdown = rate(input, config);
    let detailed_skill = input.detailed_skill.filter(|d| !d.is_empty());
    let player = Player {
        id: input.id,
        name: input.name.clone(),
        base_skill: input.base_skill,
        detailed_skill,
        performance: input.performance,
        momentum: breakdown.momentum,
        rating: breakdown.rating,
        positions: input.positions.clone(),
        is_new: breakdown.is_new,
    };
    (player, breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseSkill, PlayerId};

    fn input(base: f32, performance: Option<Performance>) -> PlayerInput {
        PlayerInput {
            id: PlayerId(1),
            name: "Tester".to_string(),
            base_skill: BaseSkill { attack: base, defense: base, game_iq: base },
            detailed_skill: None,
            performance,
            positions: Vec::new(),
        }
    }

    #[test]
    fn new_player_gets_base_only_rating() {
        let breakdown = rate(&input(7.0, None), &BalanceConfig::default());
        assert!(breakdown.is_new);
        assert_eq!(breakdown.performance_adj, 0.0);
        assert_eq!(breakdown.momentum, Momentum::Steady);
        assert!((breakdown.rating - 7.0).abs() < 1e-6);
    }

    #[test]
    fn winning_record_raises_rating() {
        let perf = Performance {
            overall_win_rate: 70.0,
            overall_goal_diff: 1.0,
            recent_win_rate: 70.0,
            recent_goal_diff: 1.0,
        };
        let breakdown = rate(&input(6.0, Some(perf)), &BalanceConfig::default());
        assert!(!breakdown.is_new);
        assert!(breakdown.performance_adj > 0.0);
        assert!(breakdown.rating > 6.0);
    }

    #[test]
    fn performance_adjustment_is_capped() {
        let perf = Performance {
            overall_win_rate: 100.0,
            overall_goal_diff: 50.0,
            recent_win_rate: 100.0,
            recent_goal_diff: 50.0,
        };
        let config = BalanceConfig::default();
        let breakdown = rate(&input(5.0, Some(perf)), &config);
        assert_eq!(breakdown.performance_adj, config.rating.performance_cap);
    }

    #[test]
    fn rating_is_monotonic_in_win_rate() {
        let config = BalanceConfig::default();
        let mut last = f32::MIN;
        for win_rate in [10.0, 30.0, 50.0, 70.0, 90.0] {
            let perf = Performance {
                overall_win_rate: win_rate,
                overall_goal_diff: 0.0,
                recent_win_rate: win_rate,
                recent_goal_diff: 0.0,
            };
            let rating = rate(&input(5.0, Some(perf)), &config).rating;
            assert!(rating >= last, "rating dropped at win rate {win_rate}");
            last = rating;
        }
    }

    #[test]
    fn rating_stays_within_bounds() {
        let perf = Performance {
            overall_win_rate: 100.0,
            overall_goal_diff: 10.0,
            recent_win_rate: 100.0,
            recent_goal_diff: 10.0,
        };
        let breakdown = rate(&input(10.0, Some(perf)), &BalanceConfig::default());
        assert!(breakdown.rating <= RATING_MAX);

        let perf = Performance {
            overall_win_rate: 0.0,
            overall_goal_diff: -10.0,
            recent_win_rate: 0.0,
            recent_goal_diff: -10.0,
        };
        let breakdown = rate(&input(0.0, Some(perf)), &BalanceConfig::default());
        assert!(breakdown.rating >= RATING_MIN);
    }

    #[test]
    fn momentum_labels() {
        let config = MomentumConfig::default();
        let steady = Performance {
            overall_win_rate: 50.0,
            overall_goal_diff: 0.0,
            recent_win_rate: 55.0,
            recent_goal_diff: 0.2,
        };
        assert_eq!(derive_momentum(&steady, &config), Momentum::Steady);

        let hot = Performance { recent_win_rate: 65.0, ..steady };
        assert_eq!(derive_momentum(&hot, &config), Momentum::Hot);

        let cold = Performance { recent_win_rate: 35.0, ..steady };
        assert_eq!(derive_momentum(&cold, &config), Momentum::Cold);

        // goal-diff axis alone can flip the label
        let hot_goals = Performance { recent_goal_diff: 1.0, ..steady };
        assert_eq!(derive_momentum(&hot_goals, &config), Momentum::Hot);
    }
}
