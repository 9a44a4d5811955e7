//! Position balance constraints.
//!
//! Two independent hard checks on a roster pair, both gated by data
//! sufficiency: a category-level gap check (goalkeeper / defense /
//! midfield / attack) and a stricter individual-position gap check. When
//! fewer than the configured share of a team's players have a classifiable
//! primary position, enforcement is skipped entirely rather than fabricating
//! a verdict from missing data.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::{ConsensusConfig, ConstraintConfig};
use crate::models::{PositionCategory, PositionCode, Team};
use crate::positions::classify;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GapLevel {
    Category,
    Individual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CategoryGap {
    pub category: PositionCategory,
    pub blue: u32,
    pub orange: u32,
    pub gap: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndividualGap {
    pub position: PositionCode,
    pub blue: u32,
    pub orange: u32,
    pub gap: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GapViolation {
    pub level: GapLevel,
    pub label: String,
    pub gap: u32,
    pub limit: u32,
}

/// Full position-balance assessment of one roster pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstraintReport {
    /// False when either team lacks classifiable-position coverage; gaps
    /// are still reported, but nothing is enforced.
    pub enforced: bool,
    pub blue_coverage: f32,
    pub orange_coverage: f32,
    pub category_gaps: Vec<CategoryGap>,
    /// Only positions at least one team fields are listed.
    pub individual_gaps: Vec<IndividualGap>,
    pub max_category_gap: u32,
    pub max_individual_gap: u32,
    pub violations: Vec<GapViolation>,
}

impl ConstraintReport {
    pub fn is_satisfied(&self) -> bool {
        self.violations.is_empty()
    }
}

/// (primary position counts, share of players with a classifiable primary)
fn primary_counts(
    team: &Team,
    consensus: &ConsensusConfig,
) -> (FxHashMap<PositionCode, u32>, f32) {
    let mut counts: FxHashMap<PositionCode, u32> = FxHashMap::default();
    let mut classified = 0u32;
    for player in &team.players {
        let classification = classify(&player.positions, consensus);
        if !classification.has_sufficient_data {
            continue;
        }
        if let Some(position) = classification.primary_position() {
            *counts.entry(position).or_insert(0) += 1;
            classified += 1;
        }
    }
    let coverage = if team.players.is_empty() {
        0.0
    } else {
        classified as f32 / team.players.len() as f32
    };
    (counts, coverage)
}

/// Assess both constraint levels for a roster pair.
pub fn assess(
    blue: &Team,
    orange: &Team,
    consensus: &ConsensusConfig,
    config: &ConstraintConfig,
) -> ConstraintReport {
    let (blue_counts, blue_coverage) = primary_counts(blue, consensus);
    let (orange_counts, orange_coverage) = primary_counts(orange, consensus);

    let enforced = blue_coverage >= config.min_classified_ratio
        && orange_coverage >= config.min_classified_ratio;

    let count_category = |counts: &FxHashMap<PositionCode, u32>, category: PositionCategory| {
        counts
            .iter()
            .filter(|(position, _)| position.category() == category)
            .map(|(_, n)| *n)
            .sum::<u32>()
    };

    let mut category_gaps = Vec::with_capacity(PositionCategory::ALL.len());
    for category in PositionCategory::ALL {
        let b = count_category(&blue_counts, category);
        let o = count_category(&orange_counts, category);
        category_gaps.push(CategoryGap { category, blue: b, orange: o, gap: b.abs_diff(o) });
    }

    // Fixed position-code order keeps the report deterministic.
    let mut individual_gaps = Vec::new();
    for position in PositionCode::ALL {
        let b = blue_counts.get(&position).copied().unwrap_or(0);
        let o = orange_counts.get(&position).copied().unwrap_or(0);
        if b == 0 && o == 0 {
            continue;
        }
        individual_gaps.push(IndividualGap { position, blue: b, orange: o, gap: b.abs_diff(o) });
    }

    let max_category_gap = category_gaps.iter().map(|g| g.gap).max().unwrap_or(0);
    let max_individual_gap = individual_gaps.iter().map(|g| g.gap).max().unwrap_or(0);

    let mut violations = Vec::new();
    if enforced {
        for gap in &category_gaps {
            if gap.gap > config.max_position_gap {
                violations.push(GapViolation {
                    level: GapLevel::Category,
                    label: gap.category.label().to_string(),
                    gap: gap.gap,
                    limit: config.max_position_gap,
                });
            }
        }
        for gap in &individual_gaps {
            if gap.gap > config.max_individual_position_gap {
                violations.push(GapViolation {
                    level: GapLevel::Individual,
                    label: gap.position.abbreviation().to_string(),
                    gap: gap.gap,
                    limit: config.max_individual_position_gap,
                });
            }
        }
    }

    ConstraintReport {
        enforced,
        blue_coverage,
        orange_coverage,
        category_gaps,
        individual_gaps,
        max_category_gap,
        max_individual_gap,
        violations,
    }
}

/// Verdict on a candidate swap, from the position-balance point of view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapGate {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SwapGate {
    fn allowed() -> Self {
        Self { allowed: true, reason: None }
    }

    fn rejected(reason: String) -> Self {
        Self { allowed: false, reason: Some(reason) }
    }
}

fn check_level(
    name: &str,
    before_max: u32,
    after_max: u32,
    limit: u32,
) -> Result<(), String> {
    if after_max <= limit {
        return Ok(());
    }
    // Escape hatch: a pre-existing violation may persist as long as the
    // swap strictly reduces the maximum observed gap. Regressions and new
    // violations are rejected outright.
    if before_max > limit && after_max < before_max {
        return Ok(());
    }
    Err(format!(
        "{name} gap would be {after_max} (limit {limit}, was {before_max})"
    ))
}

/// Acceptance gate used by the optimizer: compare the constraint state
/// before and after a candidate swap.
pub fn evaluate_swap_impact(
    before: &ConstraintReport,
    after: &ConstraintReport,
    config: &ConstraintConfig,
) -> SwapGate {
    if !after.enforced {
        return SwapGate::allowed();
    }
    if let Err(reason) = check_level(
        "category",
        before.max_category_gap,
        after.max_category_gap,
        config.max_position_gap,
    ) {
        return SwapGate::rejected(reason);
    }
    if let Err(reason) = check_level(
        "position",
        before.max_individual_gap,
        after.max_individual_gap,
        config.max_individual_position_gap,
    ) {
        return SwapGate::rejected(reason);
    }
    SwapGate::allowed()
}
