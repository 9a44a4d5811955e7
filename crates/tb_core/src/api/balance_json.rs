//! Versioned JSON boundary for embedding hosts.
//!
//! A single string-in / string-out entry point so callers (bots, web
//! backends, FFI shims) never link against the internal types. Requests
//! carry an explicit `schema_version`; unknown versions are rejected up
//! front instead of being half-parsed.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::BalanceConfig;
use crate::constraints::ConstraintReport;
use crate::decision_log::DecisionLog;
use crate::draft::DraftAnalysis;
use crate::engine::{balance_teams, BalanceOutcome, DegradedPlayer, TeamComposition};
use crate::error::{BalanceError, Result};
use crate::evaluator::BalanceScore;
use crate::models::{PlayerInput, Team};
use crate::optimizer::SwapRecord;
use crate::report;
use crate::SCHEMA_VERSION;

#[derive(Debug, Deserialize)]
pub struct BalanceRequest {
    pub schema_version: u8,
    pub players: Vec<PlayerInput>,
    /// Full inline configuration. Takes precedence over `profile`.
    #[serde(default)]
    pub config: Option<BalanceConfig>,
    /// Named preset: "default", "casual" or "competitive".
    #[serde(default)]
    pub profile: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub schema_version: u8,
    pub blue: Team,
    pub orange: Team,
    pub score: BalanceScore,
    pub swaps: Vec<SwapRecord>,
    pub draft_analysis: DraftAnalysis,
    pub constraint_report: ConstraintReport,
    pub composition: Vec<TeamComposition>,
    pub degraded_players: Vec<DegradedPlayer>,
    pub log: DecisionLog,
    /// Plain-text rendering of `log`.
    pub report: String,
}

impl From<BalanceOutcome> for BalanceResponse {
    fn from(outcome: BalanceOutcome) -> Self {
        let report = report::render(&outcome.log);
        Self {
            schema_version: SCHEMA_VERSION,
            blue: outcome.blue,
            orange: outcome.orange,
            score: outcome.score,
            swaps: outcome.swaps,
            draft_analysis: outcome.draft_analysis,
            constraint_report: outcome.constraint_report,
            composition: outcome.composition,
            degraded_players: outcome.degraded_players,
            log: outcome.log,
            report,
        }
    }
}

fn resolve_config(request: &BalanceRequest) -> Result<BalanceConfig> {
    if let Some(config) = &request.config {
        return Ok(config.clone());
    }
    match request.profile.as_deref() {
        None | Some("default") => Ok(BalanceConfig::default()),
        Some("casual") => Ok(BalanceConfig::casual()),
        Some("competitive") => Ok(BalanceConfig::competitive()),
        Some(other) => Err(BalanceError::InvalidConfig(format!(
            "unknown profile '{other}' (expected default, casual or competitive)"
        ))),
    }
}

/// Balance a pool from a JSON request, returning the JSON response.
pub fn balance_teams_json(request_json: &str) -> Result<String> {
    let request: BalanceRequest = serde_json::from_str(request_json)
        .map_err(|err| BalanceError::Deserialization(err.to_string()))?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(BalanceError::SchemaVersionMismatch {
            found: request.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    let config = resolve_config(&request)?;
    info!(
        players = request.players.len(),
        profile = request.profile.as_deref().unwrap_or("default"),
        "balance request"
    );

    let outcome = balance_teams(&request.players, &config)?;
    let response = BalanceResponse::from(outcome);
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn request_json(schema_version: u8, profile: Option<&str>) -> String {
        let players: Vec<Value> = (0..6)
            .map(|i| {
                json!({
                    "id": i,
                    "name": format!("Player {i}"),
                    "base_skill": { "attack": 4.0 + i as f32, "defense": 5.0, "game_iq": 5.0 },
                    "positions": [],
                })
            })
            .collect();
        let mut body = json!({ "schema_version": schema_version, "players": players });
        if let Some(profile) = profile {
            body["profile"] = json!(profile);
        }
        body.to_string()
    }

    #[test]
    fn valid_request_round_trips() {
        let response = balance_teams_json(&request_json(1, None)).unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["schema_version"], 1);
        assert_eq!(
            value["blue"]["players"].as_array().unwrap().len()
                + value["orange"]["players"].as_array().unwrap().len(),
            6
        );
        assert!(value["score"]["aggregate"].is_number());
        assert!(!value["report"].as_str().unwrap().is_empty());
        assert!(!value["log"]["events"].as_array().unwrap().is_empty());
    }

    #[test]
    fn wrong_schema_version_is_rejected() {
        let err = balance_teams_json(&request_json(2, None)).unwrap_err();
        assert!(matches!(
            err,
            BalanceError::SchemaVersionMismatch { found: 2, expected: 1 }
        ));
    }

    #[test]
    fn named_profiles_resolve() {
        assert!(balance_teams_json(&request_json(1, Some("casual"))).is_ok());
        assert!(balance_teams_json(&request_json(1, Some("competitive"))).is_ok());
        let err = balance_teams_json(&request_json(1, Some("ranked"))).unwrap_err();
        assert!(matches!(err, BalanceError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_a_deserialization_error() {
        let err = balance_teams_json("{not json").unwrap_err();
        assert!(matches!(err, BalanceError::Deserialization(_)));
    }

    #[test]
    fn data_shape_errors_are_deserialization_errors() {
        // well-formed JSON, wrong shape
        let err = balance_teams_json(r#"{"schema_version": []}"#).unwrap_err();
        assert!(matches!(err, BalanceError::Deserialization(_)));
    }
}
