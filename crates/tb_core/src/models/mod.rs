pub mod player;
pub mod team;

pub use player::{
    BaseSkill, DetailedSkill, Momentum, Performance, Player, PlayerId, PlayerInput,
    PositionCategory, PositionCode, PositionConsensus,
};
pub use team::{Team, TeamColor};
