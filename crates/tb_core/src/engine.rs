//! Balancing engine orchestration.
//!
//! A single synchronous, pure call: rate the pool, build tiers, snake
//! draft, then refine with the swap optimizer under the position
//! constraints. Holds no state between invocations and performs no I/O,
//! so independent games can be balanced concurrently.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::BalanceConfig;
use crate::constraints::{assess, ConstraintReport};
use crate::decision_log::{DecisionEvent, DecisionLog};
use crate::draft::{analyze_draft, snake_draft, DraftAnalysis};
use crate::error::{BalanceError, Result};
use crate::evaluator::BalanceScore;
use crate::models::{Player, PlayerId, PlayerInput, Team, TeamColor};
use crate::optimizer::{optimize, SwapRecord};
use crate::positions::{classify, team_distribution, TeamDistribution};
use crate::rating::build_player;
use crate::tiers::{build_tiers, Tier};

/// A player the engine carried through on degraded data, surfaced so the
/// caller can tell the difference between "balanced" and "balanced blind".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DegradedPlayer {
    pub player_id: PlayerId,
    pub name: String,
    /// No performance history: rating is base-skill-only.
    pub missing_performance: bool,
    /// Not enough position votes for a classifiable primary position.
    pub insufficient_position_data: bool,
}

/// Team composition summary, by tactical category and by tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamComposition {
    pub color: TeamColor,
    pub distribution: TeamDistribution,
    /// (tier ordinal, players of this team drawn from it)
    pub tier_counts: Vec<(usize, usize)>,
}

/// Everything a single balancing run produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceOutcome {
    pub blue: Team,
    pub orange: Team,
    pub score: BalanceScore,
    pub swaps: Vec<SwapRecord>,
    pub draft_analysis: DraftAnalysis,
    pub constraint_report: ConstraintReport,
    pub composition: Vec<TeamComposition>,
    pub degraded_players: Vec<DegradedPlayer>,
    pub log: DecisionLog,
}

/// Partition the selected pool into two balanced teams.
///
/// Deterministic: identical `(players, config)` input produces an
/// identical split, swap sequence and decision log.
pub fn balance_teams(inputs: &[PlayerInput], config: &BalanceConfig) -> Result<BalanceOutcome> {
    config.validate()?;
    if inputs.len() < 2 {
        return Err(BalanceError::InsufficientPlayers { found: inputs.len() });
    }

    info!(players = inputs.len(), tier_size = config.tier_size, "balancing pool");
    let mut log = DecisionLog::new();

    // layer 1-2: ratings and degradation flags
    let mut pool: Vec<Player> = Vec::with_capacity(inputs.len());
    let mut degraded_players = Vec::new();
    for input in inputs {
        let (player, breakdown) = build_player(input, config);
        log.push(DecisionEvent::RatingComputed {
            player_id: player.id,
            name: player.name.clone(),
            base: breakdown.base,
            performance_adj: breakdown.performance_adj,
            momentum: breakdown.momentum,
            momentum_adj: breakdown.momentum_adj,
            rating: breakdown.rating,
            is_new: breakdown.is_new,
        });

        let classification = classify(&player.positions, &config.consensus);
        let insufficient_position_data =
            !classification.has_sufficient_data || classification.primary_position().is_none();
        if breakdown.is_new || insufficient_position_data {
            degraded_players.push(DegradedPlayer {
                player_id: player.id,
                name: player.name.clone(),
                missing_performance: breakdown.is_new,
                insufficient_position_data,
            });
        }
        pool.push(player);
    }

    // tiers
    let tiers = build_tiers(pool, config.tier_size);
    for tier in &tiers {
        log.push(DecisionEvent::TierAssembled {
            number: tier.number,
            players: tier.players.iter().map(|p| p.name.clone()).collect(),
            min_rating: tier.min_rating,
            max_rating: tier.max_rating,
        });
    }
    debug!(tiers = tiers.len(), "tiers assembled");

    let mut tier_of: FxHashMap<PlayerId, usize> = FxHashMap::default();
    for tier in &tiers {
        for player in &tier.players {
            tier_of.insert(player.id, tier.number);
        }
    }

    // initial split
    let draft = snake_draft(&tiers);
    for pick in &draft.picks {
        log.push(DecisionEvent::DraftPick {
            tier: pick.tier,
            slot: pick.slot,
            color: pick.color,
            player_id: pick.player_id,
            name: pick.name.clone(),
            rating: pick.rating,
        });
    }
    let mut blue = draft.blue;
    let mut orange = draft.orange;

    // refinement
    let outcome = optimize(&mut blue, &mut orange, &tier_of, config, &mut log);
    let score = outcome.final_score.clone();
    debug!(
        accepted = outcome.accepted,
        iterations = outcome.iterations,
        aggregate = score.aggregate,
        "optimizer finished"
    );

    // residual position imbalances are reported, never fatal
    let constraint_report = assess(&blue, &orange, &config.consensus, &config.constraints);
    log.push(DecisionEvent::ConstraintReport {
        enforced: constraint_report.enforced,
        max_category_gap: constraint_report.max_category_gap,
        max_individual_gap: constraint_report.max_individual_gap,
        violations: constraint_report
            .violations
            .iter()
            .map(|v| format!("{} gap {} exceeds limit {}", v.label, v.gap, v.limit))
            .collect(),
    });

    let draft_analysis = analyze_draft(&tiers, config.value_margin);
    for value in &draft_analysis.best_value {
        log.push(DecisionEvent::ValuePick {
            player_id: value.player_id,
            name: value.name.clone(),
            tier: value.tier,
            margin: value.margin,
        });
    }
    for reach in &draft_analysis.reaches {
        log.push(DecisionEvent::Reach {
            player_id: reach.player_id,
            name: reach.name.clone(),
            tier: reach.tier,
            margin: reach.margin,
        });
    }

    let composition: Vec<TeamComposition> = [&blue, &orange]
        .into_iter()
        .map(|team| compose(team, &tiers, &tier_of, config))
        .collect();
    for entry in &composition {
        log.push(DecisionEvent::TeamComposition {
            color: entry.color,
            distribution: entry.distribution,
            tier_counts: entry.tier_counts.clone(),
        });
    }

    log.push(DecisionEvent::FinalBalance {
        aggregate: score.aggregate,
        quality: score.quality.label().to_string(),
        swaps_accepted: outcome.accepted,
        iterations: outcome.iterations,
    });

    info!(
        blue = blue.len(),
        orange = orange.len(),
        aggregate = score.aggregate,
        quality = score.quality.label(),
        "pool balanced"
    );

    Ok(BalanceOutcome {
        blue,
        orange,
        score,
        swaps: outcome.swaps,
        draft_analysis,
        constraint_report,
        composition,
        degraded_players,
        log,
    })
}

fn compose(
    team: &Team,
    tiers: &[Tier],
    tier_of: &FxHashMap<PlayerId, usize>,
    config: &BalanceConfig,
) -> TeamComposition {
    let mut tier_counts: Vec<(usize, usize)> =
        tiers.iter().map(|tier| (tier.number, 0usize)).collect();
    for player in &team.players {
        let tier_number = tier_of[&player.id];
        if let Some(entry) = tier_counts.iter_mut().find(|(number, _)| *number == tier_number) {
            entry.1 += 1;
        }
    }
    TeamComposition {
        color: team.color,
        distribution: team_distribution(&team.players, &config.consensus),
        tier_counts,
    }
}
