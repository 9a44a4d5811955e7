use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::Player;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Blue,
    Orange,
}

impl TeamColor {
    pub fn label(&self) -> &'static str {
        match self {
            TeamColor::Blue => "Blue",
            TeamColor::Orange => "Orange",
        }
    }

    pub fn other(&self) -> TeamColor {
        match self {
            TeamColor::Blue => TeamColor::Orange,
            TeamColor::Orange => TeamColor::Blue,
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One side of the split. Players keep the order they were drafted in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub color: TeamColor,
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(color: TeamColor) -> Self {
        Self { color, players: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Mean of a per-player metric over the players that carry it.
    /// Returns `None` when no player does.
    pub fn mean_of(&self, metric: impl Fn(&Player) -> Option<f32>) -> Option<f32> {
        let values: Vec<f32> = self.players.iter().filter_map(&metric).collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f32>() / values.len() as f32)
        }
    }

    pub fn total_rating(&self) -> f32 {
        self.players.iter().map(|p| p.rating).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{BaseSkill, Momentum, PlayerId};

    fn player(id: u32, rating: f32) -> Player {
        Player {
            id: PlayerId(id),
            name: format!("P{id}"),
            base_skill: BaseSkill { attack: rating, defense: rating, game_iq: rating },
            detailed_skill: None,
            performance: None,
            momentum: Momentum::Steady,
            rating,
            positions: Vec::new(),
            is_new: true,
        }
    }

    #[test]
    fn mean_of_skips_missing_values() {
        let mut team = Team::new(TeamColor::Blue);
        team.players.push(player(1, 6.0));
        team.players.push(player(2, 8.0));

        assert_eq!(team.mean_of(|p| Some(p.rating)), Some(7.0));
        assert_eq!(team.mean_of(|p| p.performance.map(|x| x.overall_win_rate)), None);
    }
}
