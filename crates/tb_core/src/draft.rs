//! Snake draft assignment.
//!
//! Tiers are processed from the top; within a tier players are offered in
//! rating-descending order and picks alternate between the teams. The
//! starting color reverses every tier (tier 1 blue-first, tier 2
//! orange-first, ...) so neither team systematically receives the top
//! player of every tier. A team already ahead in size forfeits its pick
//! slot to the smaller team, keeping the rosters within one player of each
//! other for odd pools. Fully deterministic given the tier contents.

use serde::{Deserialize, Serialize};

use crate::models::{PlayerId, Team, TeamColor};
use crate::tiers::Tier;

/// One draft pick, in global pick order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftPick {
    pub tier: usize,
    /// 1-based global pick slot.
    pub slot: usize,
    pub color: TeamColor,
    pub player_id: PlayerId,
    pub name: String,
    pub rating: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftResult {
    pub blue: Team,
    pub orange: Team,
    pub picks: Vec<DraftPick>,
}

/// Run the snake draft over the tiers.
pub fn snake_draft(tiers: &[Tier]) -> DraftResult {
    let mut blue = Team::new(TeamColor::Blue);
    let mut orange = Team::new(TeamColor::Orange);
    let mut picks = Vec::new();
    let mut slot = 0usize;

    for (tier_index, tier) in tiers.iter().enumerate() {
        let start = if tier_index % 2 == 0 { TeamColor::Blue } else { TeamColor::Orange };

        for (offer_index, player) in tier.players.iter().enumerate() {
            let mut color = if offer_index % 2 == 0 { start } else { start.other() };
            // size guard: the larger team forfeits its slot to the smaller
            if roster(&blue, &orange, color).len() > roster(&blue, &orange, color.other()).len() {
                color = color.other();
            }

            slot += 1;
            picks.push(DraftPick {
                tier: tier.number,
                slot,
                color,
                player_id: player.id,
                name: player.name.clone(),
                rating: player.rating,
            });

            match color {
                TeamColor::Blue => blue.players.push(player.clone()),
                TeamColor::Orange => orange.players.push(player.clone()),
            }
        }
    }

    DraftResult { blue, orange, picks }
}

fn roster<'a>(blue: &'a Team, orange: &'a Team, color: TeamColor) -> &'a Team {
    match color {
        TeamColor::Blue => blue,
        TeamColor::Orange => orange,
    }
}

/// A player sitting at a tier edge: either top-of-tier skill picked a tier
/// late (best value) or bottom-of-tier skill picked a tier early (reach).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftValue {
    pub player_id: PlayerId,
    pub name: String,
    pub tier: usize,
    /// Rating distance to the adjacent tier's edge.
    pub margin: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DraftAnalysis {
    pub best_value: Vec<DraftValue>,
    pub reaches: Vec<DraftValue>,
}

/// Tier-edge draft value analysis.
///
/// With a pure snake the global pick sequence equals the rating order, so
/// value lives at the tier boundaries: a player rated within `value_margin`
/// of the tier above's minimum delivered top-tier skill at a later slot; a
/// player within the margin of the tier below's maximum barely made their
/// tier.
pub fn analyze_draft(tiers: &[Tier], value_margin: f32) -> DraftAnalysis {
    let mut analysis = DraftAnalysis::default();

    for (index, tier) in tiers.iter().enumerate() {
        if index > 0 {
            let above_min = tiers[index - 1].min_rating;
            for player in &tier.players {
                let distance = above_min - player.rating;
                if distance >= 0.0 && distance <= value_margin {
                    analysis.best_value.push(DraftValue {
                        player_id: player.id,
                        name: player.name.clone(),
                        tier: tier.number,
                        margin: distance,
                    });
                }
            }
        }
        if index + 1 < tiers.len() {
            let below_max = tiers[index + 1].max_rating;
            for player in &tier.players {
                let distance = player.rating - below_max;
                if distance >= 0.0 && distance <= value_margin {
                    analysis.reaches.push(DraftValue {
                        player_id: player.id,
                        name: player.name.clone(),
                        tier: tier.number,
                        margin: distance,
                    });
                }
            }
        }
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseSkill, Momentum, Player};
    use crate::tiers::build_tiers;

    fn player(id: u32, rating: f32) -> Player {
        Player {
            id: PlayerId(id),
            name: format!("Player {id:02}"),
            base_skill: BaseSkill { attack: rating, defense: rating, game_iq: rating },
            detailed_skill: None,
            performance: None,
            momentum: Momentum::Steady,
            rating,
            positions: Vec::new(),
            is_new: false,
        }
    }

    #[test]
    fn four_players_snake_order() {
        let tiers = build_tiers(
            vec![player(1, 9.0), player(2, 8.0), player(3, 7.0), player(4, 6.0)],
            2,
        );
        let result = snake_draft(&tiers);
        // tier 1 blue-first: blue 9.0, orange 8.0
        // tier 2 orange-first: orange 7.0, blue 6.0
        let blue: Vec<f32> = result.blue.players.iter().map(|p| p.rating).collect();
        let orange: Vec<f32> = result.orange.players.iter().map(|p| p.rating).collect();
        assert_eq!(blue, vec![9.0, 6.0]);
        assert_eq!(orange, vec![8.0, 7.0]);
        assert_eq!(result.picks.len(), 4);
        assert_eq!(result.picks[0].color, TeamColor::Blue);
        assert_eq!(result.picks[2].color, TeamColor::Orange);
    }

    #[test]
    fn odd_pool_keeps_sizes_within_one() {
        for n in [3usize, 5, 7, 9, 11, 13] {
            let pool: Vec<Player> = (0..n).map(|i| player(i as u32, 10.0 - i as f32 * 0.3)).collect();
            let tiers = build_tiers(pool, 4);
            let result = snake_draft(&tiers);
            let diff = result.blue.len().abs_diff(result.orange.len());
            assert!(diff <= 1, "pool {n}: sizes {} vs {}", result.blue.len(), result.orange.len());
            assert_eq!(result.blue.len() + result.orange.len(), n);
        }
    }

    #[test]
    fn draft_is_deterministic() {
        let pool: Vec<Player> = (0..12).map(|i| player(i, (i % 7) as f32 + 1.0)).collect();
        let tiers = build_tiers(pool, 4);
        let first = snake_draft(&tiers);
        let second = snake_draft(&tiers);
        assert_eq!(first, second);
    }

    #[test]
    fn no_player_drafted_twice() {
        let pool: Vec<Player> = (0..10).map(|i| player(i, 9.0 - i as f32 * 0.5)).collect();
        let tiers = build_tiers(pool, 4);
        let result = snake_draft(&tiers);
        let mut ids: Vec<u32> = result
            .blue
            .players
            .iter()
            .chain(result.orange.players.iter())
            .map(|p| p.id.0)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn tier_edge_value_and_reach() {
        // tier 1: 9.0, 8.0 / tier 2: 7.9, 5.0 -> 7.9 is a best-value pick
        // (within 0.25 of 8.0); 8.0 is a reach candidate (within 0.25 of 7.9)
        let tiers = build_tiers(
            vec![player(1, 9.0), player(2, 8.0), player(3, 7.9), player(4, 5.0)],
            2,
        );
        let analysis = analyze_draft(&tiers, 0.25);
        assert_eq!(analysis.best_value.len(), 1);
        assert_eq!(analysis.best_value[0].player_id, PlayerId(3));
        assert_eq!(analysis.reaches.len(), 1);
        assert_eq!(analysis.reaches[0].player_id, PlayerId(2));
    }
}
