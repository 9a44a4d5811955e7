//! # tb_core - Deterministic Team Balancing Engine
//!
//! This library splits a rated player pool into two balanced football
//! teams, with a JSON API for easy integration with bots and web backends.
//!
//! ## Features
//! - 100% deterministic (same pool + config = same teams, same log)
//! - Three-layer player ratings (base skill, performance, momentum)
//! - Tiered snake draft refined by a constraint-aware swap optimizer
//! - Typed decision log explaining every rating, pick and swap

pub mod api;
pub mod config;
pub mod constraints;
pub mod decision_log;
pub mod draft;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod optimizer;
pub mod positions;
pub mod rating;
pub mod report;
pub mod tiers;

// Re-export the main entry points
pub use api::{balance_teams_json, BalanceRequest, BalanceResponse};
pub use config::BalanceConfig;
pub use engine::{balance_teams, BalanceOutcome};
pub use error::{BalanceError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON API schema version accepted by [`balance_teams_json`].
pub const SCHEMA_VERSION: u8 = 1;
