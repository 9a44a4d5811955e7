use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Caller-assigned player identifier. The engine never mints ids of its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Peer-assigned base skill attributes on a 0-10 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BaseSkill {
    pub attack: f32,
    pub defense: f32,
    pub game_iq: f32,
}

impl BaseSkill {
    /// Unweighted mean of the three attributes, the rating baseline.
    pub fn mean(&self) -> f32 {
        (self.attack + self.defense + self.game_iq) / 3.0
    }
}

/// Optional finer skill attributes (0-10 scale). A fixed record rather than
/// an open-ended map so every field is a named, typed quantity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailedSkill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shooting: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dribbling: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defending: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical: Option<f32>,
}

impl DetailedSkill {
    pub fn is_empty(&self) -> bool {
        self.pace.is_none()
            && self.shooting.is_none()
            && self.passing.is_none()
            && self.dribbling.is_none()
            && self.defending.is_none()
            && self.physical.is_none()
    }
}

/// Historical performance aggregates supplied by the match-history system.
///
/// Win rates are percentages (0-100); goal differentials are per-game
/// averages and may be negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Performance {
    pub overall_win_rate: f32,
    pub overall_goal_diff: f32,
    pub recent_win_rate: f32,
    pub recent_goal_diff: f32,
}

/// Recent-form trend relative to a player's overall history.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Momentum {
    Hot,
    Cold,
    #[default]
    Steady,
}

impl Momentum {
    pub fn as_str(&self) -> &'static str {
        match self {
            Momentum::Hot => "hot",
            Momentum::Cold => "cold",
            Momentum::Steady => "steady",
        }
    }
}

/// One peer-voted position entry: how many of a player's raters named this
/// position. Entries are independent per position, so percentages across a
/// player's entries need not sum to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PositionConsensus {
    pub position: PositionCode,
    pub rating_count: u32,
    pub total_raters: u32,
}

impl PositionConsensus {
    /// Share of raters who voted this position, as a percentage.
    pub fn percentage(&self) -> f32 {
        if self.total_raters == 0 {
            0.0
        } else {
            self.rating_count as f32 / self.total_raters as f32 * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionCode {
    GK,
    LB,
    CB,
    RB,
    LWB,
    RWB,
    CDM,
    CM,
    CAM,
    LM,
    RM,
    LW,
    RW,
    CF,
    ST,
}

/// Tactical category a specific position belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PositionCategory {
    Goalkeeper,
    Defense,
    Midfield,
    Attack,
}

impl PositionCategory {
    pub const ALL: [PositionCategory; 4] = [
        PositionCategory::Goalkeeper,
        PositionCategory::Defense,
        PositionCategory::Midfield,
        PositionCategory::Attack,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PositionCategory::Goalkeeper => "Goalkeeper",
            PositionCategory::Defense => "Defense",
            PositionCategory::Midfield => "Midfield",
            PositionCategory::Attack => "Attack",
        }
    }
}

impl PositionCode {
    pub const ALL: [PositionCode; 15] = [
        PositionCode::GK,
        PositionCode::LB,
        PositionCode::CB,
        PositionCode::RB,
        PositionCode::LWB,
        PositionCode::RWB,
        PositionCode::CDM,
        PositionCode::CM,
        PositionCode::CAM,
        PositionCode::LM,
        PositionCode::RM,
        PositionCode::LW,
        PositionCode::RW,
        PositionCode::CF,
        PositionCode::ST,
    ];

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, PositionCode::GK)
    }

    pub fn is_defender(&self) -> bool {
        matches!(
            self,
            PositionCode::LB
                | PositionCode::CB
                | PositionCode::RB
                | PositionCode::LWB
                | PositionCode::RWB
        )
    }

    pub fn is_midfielder(&self) -> bool {
        matches!(
            self,
            PositionCode::CDM
                | PositionCode::CM
                | PositionCode::CAM
                | PositionCode::LM
                | PositionCode::RM
        )
    }

    pub fn is_forward(&self) -> bool {
        matches!(
            self,
            PositionCode::LW | PositionCode::RW | PositionCode::CF | PositionCode::ST
        )
    }

    /// Map a specific position to its tactical category.
    pub fn category(&self) -> PositionCategory {
        if self.is_goalkeeper() {
            PositionCategory::Goalkeeper
        } else if self.is_defender() {
            PositionCategory::Defense
        } else if self.is_midfielder() {
            PositionCategory::Midfield
        } else {
            PositionCategory::Attack
        }
    }

    /// Get position display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            PositionCode::GK => "Goalkeeper",
            PositionCode::LB => "Left Back",
            PositionCode::CB => "Centre Back",
            PositionCode::RB => "Right Back",
            PositionCode::LWB => "Left Wing Back",
            PositionCode::RWB => "Right Wing Back",
            PositionCode::CDM => "Defensive Midfielder",
            PositionCode::CM => "Central Midfielder",
            PositionCode::CAM => "Attacking Midfielder",
            PositionCode::LM => "Left Midfielder",
            PositionCode::RM => "Right Midfielder",
            PositionCode::LW => "Left Winger",
            PositionCode::RW => "Right Winger",
            PositionCode::CF => "Centre Forward",
            PositionCode::ST => "Striker",
        }
    }

    /// Get position abbreviation for compact display
    pub fn abbreviation(&self) -> &'static str {
        match self {
            PositionCode::GK => "GK",
            PositionCode::LB => "LB",
            PositionCode::CB => "CB",
            PositionCode::RB => "RB",
            PositionCode::LWB => "LWB",
            PositionCode::RWB => "RWB",
            PositionCode::CDM => "CDM",
            PositionCode::CM => "CM",
            PositionCode::CAM => "CAM",
            PositionCode::LM => "LM",
            PositionCode::RM => "RM",
            PositionCode::LW => "LW",
            PositionCode::RW => "RW",
            PositionCode::CF => "CF",
            PositionCode::ST => "ST",
        }
    }
}

// Parsing accepts a few common aliases raters use interchangeably.
static POSITION_ALIASES: Lazy<HashMap<&'static str, PositionCode>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for code in PositionCode::ALL {
        map.insert(code.abbreviation(), code);
    }
    map.insert("GOALKEEPER", PositionCode::GK);
    map.insert("STRIKER", PositionCode::ST);
    map.insert("DM", PositionCode::CDM);
    map.insert("AM", PositionCode::CAM);
    map
});

impl FromStr for PositionCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        POSITION_ALIASES
            .get(s.to_uppercase().as_str())
            .copied()
            .ok_or_else(|| format!("Invalid position: {}", s))
    }
}

impl fmt::Display for PositionCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Caller-supplied player record, the engine's input contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerInput {
    pub id: PlayerId,
    pub name: String,
    pub base_skill: BaseSkill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_skill: Option<DetailedSkill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
    #[serde(default)]
    pub positions: Vec<PositionConsensus>,
}

/// Rated player as the engine works with it. Built once per invocation from
/// a [`PlayerInput`]; `rating` and `momentum` are derived, never supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub base_skill: BaseSkill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_skill: Option<DetailedSkill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
    pub momentum: Momentum,
    pub rating: f32,
    pub positions: Vec<PositionConsensus>,
    /// No performance history: rating is base-skill-only.
    pub is_new: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_covers_every_position() {
        assert_eq!(PositionCode::GK.category(), PositionCategory::Goalkeeper);
        assert_eq!(PositionCode::LWB.category(), PositionCategory::Defense);
        assert_eq!(PositionCode::CAM.category(), PositionCategory::Midfield);
        assert_eq!(PositionCode::ST.category(), PositionCategory::Attack);
        for code in PositionCode::ALL {
            // every code lands in exactly one category predicate
            let flags = [
                code.is_goalkeeper(),
                code.is_defender(),
                code.is_midfielder(),
                code.is_forward(),
            ];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{code}");
        }
    }

    #[test]
    fn position_parsing_accepts_aliases() {
        assert_eq!("cb".parse::<PositionCode>().unwrap(), PositionCode::CB);
        assert_eq!("Goalkeeper".parse::<PositionCode>().unwrap(), PositionCode::GK);
        assert_eq!("DM".parse::<PositionCode>().unwrap(), PositionCode::CDM);
        assert!("XYZ".parse::<PositionCode>().is_err());
    }

    #[test]
    fn consensus_percentage_handles_zero_raters() {
        let entry = PositionConsensus {
            position: PositionCode::CM,
            rating_count: 0,
            total_raters: 0,
        };
        assert_eq!(entry.percentage(), 0.0);

        let entry = PositionConsensus {
            position: PositionCode::CM,
            rating_count: 3,
            total_raters: 4,
        };
        assert_eq!(entry.percentage(), 75.0);
    }
}
