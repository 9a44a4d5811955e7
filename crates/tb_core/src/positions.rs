//! Position consensus classification.
//!
//! Raw peer position votes become tiered classifications (primary /
//! secondary / mentioned) using participation-adaptive thresholds: with
//! only a couple of raters a 25% share is already a primary signal, with
//! eight or more the bar rises to 50%. The secondary cutoff is fixed and
//! strictly below every primary cutoff.

use serde::{Deserialize, Serialize};

use crate::config::ConsensusConfig;
use crate::models::{Player, PositionCategory, PositionCode, PositionConsensus};

/// One classified position entry with its vote share.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RankedPosition {
    pub position: PositionCode,
    pub percentage: f32,
}

/// Tiered position classification for one player.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PositionClassification {
    pub primary: Vec<RankedPosition>,
    pub secondary: Vec<RankedPosition>,
    pub mentioned: Vec<RankedPosition>,
    pub total_raters: u32,
    pub has_sufficient_data: bool,
}

impl PositionClassification {
    /// The single highest primary entry's position, if any.
    pub fn primary_position(&self) -> Option<PositionCode> {
        self.primary.first().map(|entry| entry.position)
    }

    /// True when the player's primary positions span 2+ categories.
    pub fn is_versatile(&self) -> bool {
        let mut categories: Vec<PositionCategory> =
            self.primary.iter().map(|entry| entry.position.category()).collect();
        categories.sort();
        categories.dedup();
        categories.len() >= 2
    }
}

/// Classify a player's consensus entries into threshold buckets.
///
/// Entries with a 0% share are discarded. Within each bucket entries are
/// sorted descending by percentage, ties broken by position code order so
/// the result is deterministic.
pub fn classify(entries: &[PositionConsensus], config: &ConsensusConfig) -> PositionClassification {
    let total_raters = entries.iter().map(|e| e.total_raters).max().unwrap_or(0);
    let has_sufficient_data = total_raters >= config.min_raters;

    let primary_cutoff = config.primary_threshold(total_raters);

    let mut primary = Vec::new();
    let mut secondary = Vec::new();
    let mut mentioned = Vec::new();

    for entry in entries {
        let percentage = entry.percentage();
        if percentage <= 0.0 {
            continue;
        }
        let ranked = RankedPosition { position: entry.position, percentage };
        if percentage >= primary_cutoff {
            primary.push(ranked);
        } else if percentage >= config.secondary_threshold {
            secondary.push(ranked);
        } else {
            mentioned.push(ranked);
        }
    }

    for bucket in [&mut primary, &mut secondary, &mut mentioned] {
        bucket.sort_by(|a, b| {
            b.percentage
                .partial_cmp(&a.percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
    }

    PositionClassification { primary, secondary, mentioned, total_raters, has_sufficient_data }
}

/// Per-team distribution of primary positions across tactical categories.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamDistribution {
    pub goalkeeper: u32,
    pub defense: u32,
    pub midfield: u32,
    pub attack: u32,
    /// Players whose primary positions span multiple categories.
    pub versatile: u32,
    /// Players with no primary position or insufficient vote data.
    pub unrated: u32,
}

impl TeamDistribution {
    pub fn count_for(&self, category: PositionCategory) -> u32 {
        match category {
            PositionCategory::Goalkeeper => self.goalkeeper,
            PositionCategory::Defense => self.defense,
            PositionCategory::Midfield => self.midfield,
            PositionCategory::Attack => self.attack,
        }
    }
}

/// Count each player under their primary category, or versatile/unrated.
pub fn team_distribution(players: &[Player], config: &ConsensusConfig) -> TeamDistribution {
    let mut dist = TeamDistribution::default();
    for player in players {
        let classification = classify(&player.positions, config);
        if !classification.has_sufficient_data {
            dist.unrated += 1;
            continue;
        }
        if classification.is_versatile() {
            dist.versatile += 1;
            continue;
        }
        match classification.primary_position() {
            Some(position) => match position.category() {
                PositionCategory::Goalkeeper => dist.goalkeeper += 1,
                PositionCategory::Defense => dist.defense += 1,
                PositionCategory::Midfield => dist.midfield += 1,
                PositionCategory::Attack => dist.attack += 1,
            },
            None => dist.unrated += 1,
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseSkill, Momentum, PlayerId};

    fn entry(position: PositionCode, rating_count: u32, total_raters: u32) -> PositionConsensus {
        PositionConsensus { position, rating_count, total_raters }
    }

    #[test]
    fn high_participation_uses_strict_cutoff() {
        // 10 raters at 55% clears the strict 50% cutoff for 8+ raters
        let result = classify(&[entry(PositionCode::CB, 55, 100)], &ConsensusConfig::default());
        assert_eq!(result.primary_position(), Some(PositionCode::CB));
        assert!(result.has_sufficient_data);

        // 45% at the same participation level does not
        let below = classify(&[entry(PositionCode::CB, 45, 100)], &ConsensusConfig::default());
        assert!(below.primary.is_empty());
        assert_eq!(below.secondary.len(), 1);
    }

    #[test]
    fn sparse_participation_lowers_the_bar() {
        // 2 raters, 1 vote = 50% >= 25% sparse cutoff -> primary,
        // but still flagged as insufficient data
        let result = classify(&[entry(PositionCode::ST, 1, 2)], &ConsensusConfig::default());
        assert_eq!(result.primary_position(), Some(PositionCode::ST));
        assert!(!result.has_sufficient_data);
    }

    #[test]
    fn empty_consensus_yields_empty_classification() {
        let result = classify(&[], &ConsensusConfig::default());
        assert!(!result.has_sufficient_data);
        assert!(result.primary.is_empty());
        assert!(result.secondary.is_empty());
        assert!(result.mentioned.is_empty());
        assert_eq!(result.primary_position(), None);
    }

    #[test]
    fn zero_percent_entries_are_discarded() {
        let result = classify(
            &[entry(PositionCode::GK, 0, 8), entry(PositionCode::CB, 6, 8)],
            &ConsensusConfig::default(),
        );
        assert_eq!(result.primary.len() + result.secondary.len() + result.mentioned.len(), 1);
        assert_eq!(result.primary_position(), Some(PositionCode::CB)); // 75% >= 50%
    }

    #[test]
    fn buckets_sort_descending_by_percentage() {
        let result = classify(
            &[
                entry(PositionCode::CM, 5, 10),  // 50% primary
                entry(PositionCode::CB, 7, 10),  // 70% primary
                entry(PositionCode::ST, 3, 10),  // 30% secondary
                entry(PositionCode::LW, 1, 10),  // 10% mentioned
            ],
            &ConsensusConfig::default(),
        );
        assert_eq!(result.primary_position(), Some(PositionCode::CB));
        assert_eq!(result.primary.len(), 2);
        assert_eq!(result.secondary.len(), 1);
        assert_eq!(result.mentioned.len(), 1);
    }

    fn player_with(positions: Vec<PositionConsensus>) -> Player {
        Player {
            id: PlayerId(1),
            name: "P".into(),
            base_skill: BaseSkill { attack: 5.0, defense: 5.0, game_iq: 5.0 },
            detailed_skill: None,
            performance: None,
            momentum: Momentum::Steady,
            rating: 5.0,
            positions,
            is_new: true,
        }
    }

    #[test]
    fn distribution_counts_versatile_and_unrated() {
        let defender = player_with(vec![entry(PositionCode::CB, 6, 8)]);
        // primary in two categories: CB 75%, ST 62.5%, both >= 50%
        let versatile =
            player_with(vec![entry(PositionCode::CB, 6, 8), entry(PositionCode::ST, 5, 8)]);
        let unrated = player_with(vec![entry(PositionCode::CM, 1, 2)]); // < min_raters
        let no_votes = player_with(Vec::new());

        let dist = team_distribution(
            &[defender, versatile, unrated, no_votes],
            &ConsensusConfig::default(),
        );
        assert_eq!(dist.defense, 1);
        assert_eq!(dist.versatile, 1);
        assert_eq!(dist.unrated, 2);
        assert_eq!(dist.goalkeeper + dist.midfield + dist.attack, 0);
    }
}
