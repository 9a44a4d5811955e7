//! Skill balance evaluation.
//!
//! For a pair of rosters, each tracked metric is aggregated per team
//! (mean over the players that carry it), the absolute differences are
//! normalized to their metric's scale, and a weighted combination yields
//! one aggregate 0-100 score where lower is better. Pure and cheap: the
//! optimizer calls this once per candidate swap.

use serde::{Deserialize, Serialize};

use crate::config::EvaluatorWeights;
use crate::models::{Player, Team};

/// Score at or below which the split counts as excellent / good / fair.
pub const EXCELLENT_CUTOFF: f32 = 10.0;
pub const GOOD_CUTOFF: f32 = 25.0;
pub const FAIR_CUTOFF: f32 = 50.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BalanceQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl BalanceQuality {
    pub fn from_score(score: f32) -> Self {
        if score <= EXCELLENT_CUTOFF {
            BalanceQuality::Excellent
        } else if score <= GOOD_CUTOFF {
            BalanceQuality::Good
        } else if score <= FAIR_CUTOFF {
            BalanceQuality::Fair
        } else {
            BalanceQuality::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BalanceQuality::Excellent => "Excellent",
            BalanceQuality::Good => "Good",
            BalanceQuality::Fair => "Fair",
            BalanceQuality::Poor => "Poor",
        }
    }
}

/// Per-metric team aggregate pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricComparison {
    pub blue_value: f32,
    pub orange_value: f32,
    pub difference: f32,
}

impl MetricComparison {
    pub fn new(blue_value: f32, orange_value: f32) -> Self {
        Self { blue_value, orange_value, difference: (blue_value - orange_value).abs() }
    }
}

/// Optional finer-attribute comparisons; a metric appears only when both
/// teams have at least one player carrying it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailedComparison {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<MetricComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shooting: Option<MetricComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing: Option<MetricComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dribbling: Option<MetricComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defending: Option<MetricComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical: Option<MetricComparison>,
}

impl DetailedComparison {
    fn is_empty(&self) -> bool {
        self.pace.is_none()
            && self.shooting.is_none()
            && self.passing.is_none()
            && self.dribbling.is_none()
            && self.defending.is_none()
            && self.physical.is_none()
    }
}

/// Complete balance breakdown for one roster pair. Recomputable from the
/// rosters alone, with no hidden state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceScore {
    pub attack: MetricComparison,
    pub defense: MetricComparison,
    pub game_iq: MetricComparison,
    /// Missing when no player on one of the teams has performance history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<MetricComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_diff: Option<MetricComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<DetailedComparison>,
    /// Aggregate 0-100 imbalance score; lower is better.
    pub aggregate: f32,
    pub quality: BalanceQuality,
}

const SKILL_SCALE: f32 = 10.0;
const WIN_RATE_SCALE: f32 = 100.0;

fn both(blue: Option<f32>, orange: Option<f32>) -> Option<MetricComparison> {
    match (blue, orange) {
        (Some(b), Some(o)) => Some(MetricComparison::new(b, o)),
        _ => None,
    }
}

/// Score how skill-balanced two rosters are.
pub fn evaluate(blue: &Team, orange: &Team, weights: &EvaluatorWeights) -> BalanceScore {
    let attack = MetricComparison::new(
        blue.mean_of(|p| Some(p.base_skill.attack)).unwrap_or(0.0),
        orange.mean_of(|p| Some(p.base_skill.attack)).unwrap_or(0.0),
    );
    let defense = MetricComparison::new(
        blue.mean_of(|p| Some(p.base_skill.defense)).unwrap_or(0.0),
        orange.mean_of(|p| Some(p.base_skill.defense)).unwrap_or(0.0),
    );
    let game_iq = MetricComparison::new(
        blue.mean_of(|p| Some(p.base_skill.game_iq)).unwrap_or(0.0),
        orange.mean_of(|p| Some(p.base_skill.game_iq)).unwrap_or(0.0),
    );
    let win_rate = both(
        blue.mean_of(|p| p.performance.map(|perf| perf.overall_win_rate)),
        orange.mean_of(|p| p.performance.map(|perf| perf.overall_win_rate)),
    );
    let goal_diff = both(
        blue.mean_of(|p| p.performance.map(|perf| perf.overall_goal_diff)),
        orange.mean_of(|p| p.performance.map(|perf| perf.overall_goal_diff)),
    );

    let detail = |metric: fn(&Player) -> Option<f32>| -> Option<MetricComparison> {
        both(blue.mean_of(metric), orange.mean_of(metric))
    };
    let detailed = DetailedComparison {
        pace: detail(|p| p.detailed_skill.and_then(|d| d.pace)),
        shooting: detail(|p| p.detailed_skill.and_then(|d| d.shooting)),
        passing: detail(|p| p.detailed_skill.and_then(|d| d.passing)),
        dribbling: detail(|p| p.detailed_skill.and_then(|d| d.dribbling)),
        defending: detail(|p| p.detailed_skill.and_then(|d| d.defending)),
        physical: detail(|p| p.detailed_skill.and_then(|d| d.physical)),
    };

    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    let mut add = |comparison: Option<&MetricComparison>, scale: f32, weight: f32| {
        if let Some(c) = comparison {
            weighted += (c.difference / scale).min(1.0) * weight;
            weight_sum += weight;
        }
    };
    add(Some(&attack), SKILL_SCALE, weights.attack);
    add(Some(&defense), SKILL_SCALE, weights.defense);
    add(Some(&game_iq), SKILL_SCALE, weights.game_iq);
    add(win_rate.as_ref(), WIN_RATE_SCALE, weights.win_rate);
    add(goal_diff.as_ref(), weights.goal_diff_scale, weights.goal_diff);
    for metric in [
        detailed.pace,
        detailed.shooting,
        detailed.passing,
        detailed.dribbling,
        detailed.defending,
        detailed.physical,
    ] {
        add(metric.as_ref(), SKILL_SCALE, weights.detailed);
    }

    let aggregate = if weight_sum > 0.0 {
        (weighted / weight_sum * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    BalanceScore {
        attack,
        defense,
        game_iq,
        win_rate,
        goal_diff,
        detailed: if detailed.is_empty() { None } else { Some(detailed) },
        aggregate,
        quality: BalanceQuality::from_score(aggregate),
    }
}
