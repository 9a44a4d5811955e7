//! Local-search swap optimizer.
//!
//! Starting from the drafted split, the optimizer repeatedly proposes
//! player swaps (one per team, from the same tier or adjacent tiers),
//! scores each candidate with the balance evaluator, filters through the
//! position-constraint gate, and accepts the best legal improvement.
//! The search stops when no candidate clears the improvement epsilon, the
//! swap budget is spent, or the iteration budget runs out; it always
//! returns the best legal state found so far. Accepted swaps are
//! monotonic: the aggregate score never worsens.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BalanceConfig;
use crate::constraints::{assess, evaluate_swap_impact};
use crate::decision_log::{DecisionEvent, DecisionLog};
use crate::evaluator::{evaluate, BalanceScore};
use crate::models::{PlayerId, Team};

/// Before/after values of one metric difference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DeltaPair {
    pub before: f32,
    pub after: f32,
}

/// Per-metric difference movement caused by a swap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SwapMetricDeltas {
    pub attack: DeltaPair,
    pub defense: DeltaPair,
    pub game_iq: DeltaPair,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<DeltaPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_diff: Option<DeltaPair>,
}

impl SwapMetricDeltas {
    fn from_scores(before: &BalanceScore, after: &BalanceScore) -> Self {
        let pair = |b: f32, a: f32| DeltaPair { before: b, after: a };
        Self {
            attack: pair(before.attack.difference, after.attack.difference),
            defense: pair(before.defense.difference, after.defense.difference),
            game_iq: pair(before.game_iq.difference, after.game_iq.difference),
            win_rate: match (&before.win_rate, &after.win_rate) {
                (Some(b), Some(a)) => Some(pair(b.difference, a.difference)),
                _ => None,
            },
            goal_diff: match (&before.goal_diff, &after.goal_diff) {
                (Some(b), Some(a)) => Some(pair(b.difference, a.difference)),
                _ => None,
            },
        }
    }

    /// Name of the metric whose difference shrank the most.
    fn dominant_improvement(&self) -> &'static str {
        let mut best = ("attack", self.attack.before - self.attack.after);
        for (name, delta) in [
            ("defense", self.defense.before - self.defense.after),
            ("game IQ", self.game_iq.before - self.game_iq.after),
            (
                "win rate",
                self.win_rate.map(|d| d.before - d.after).unwrap_or(f32::MIN),
            ),
            (
                "goal differential",
                self.goal_diff.map(|d| d.before - d.after).unwrap_or(f32::MIN),
            ),
        ] {
            if delta > best.1 {
                best = (name, delta);
            }
        }
        best.0
    }
}

/// One attempted swap, accepted or rejected, in search order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapRecord {
    pub blue_player_id: PlayerId,
    pub blue_player: String,
    pub orange_player_id: PlayerId,
    pub orange_player: String,
    pub blue_tier: usize,
    pub orange_tier: usize,
    pub score_before: f32,
    pub score_after: f32,
    pub improvement: f32,
    pub metrics: SwapMetricDeltas,
    pub reason: String,
    pub accepted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizerOutcome {
    pub swaps: Vec<SwapRecord>,
    pub final_score: BalanceScore,
    pub iterations: u32,
    pub accepted: u32,
}

struct Candidate {
    blue_index: usize,
    orange_index: usize,
    score_after: BalanceScore,
    improvement: f32,
    veto_reason: Option<String>,
}

/// Refine the split in place. `tier_of` maps every drafted player to their
/// tier ordinal; tier membership does not change when players swap teams.
pub fn optimize(
    blue: &mut Team,
    orange: &mut Team,
    tier_of: &FxHashMap<PlayerId, usize>,
    config: &BalanceConfig,
    log: &mut DecisionLog,
) -> OptimizerOutcome {
    let mut current = evaluate(blue, orange, &config.evaluator);
    let mut swaps: Vec<SwapRecord> = Vec::new();
    let mut iterations = 0u32;
    let mut accepted = 0u32;

    while iterations < config.optimizer.max_iterations && accepted < config.optimizer.max_swaps {
        iterations += 1;

        let before_constraints =
            assess(blue, orange, &config.consensus, &config.constraints);

        let mut best: Option<Candidate> = None;
        let mut best_vetoed: Option<Candidate> = None;
        let mut evaluated = 0usize;

        'enumeration: for blue_index in 0..blue.players.len() {
            for orange_index in 0..orange.players.len() {
                let blue_tier = tier_of[&blue.players[blue_index].id];
                let orange_tier = tier_of[&orange.players[orange_index].id];
                // legal moves: same tier, or adjacent tiers
                if blue_tier.abs_diff(orange_tier) > 1 {
                    continue;
                }
                if evaluated >= config.optimizer.max_candidates_per_iteration {
                    break 'enumeration;
                }
                evaluated += 1;

                std::mem::swap(
                    &mut blue.players[blue_index],
                    &mut orange.players[orange_index],
                );
                let score_after = evaluate(blue, orange, &config.evaluator);
                let after_constraints =
                    assess(blue, orange, &config.consensus, &config.constraints);
                std::mem::swap(
                    &mut blue.players[blue_index],
                    &mut orange.players[orange_index],
                );

                let improvement = current.aggregate - score_after.aggregate;
                if improvement <= config.optimizer.improvement_epsilon {
                    continue;
                }

                let gate =
                    evaluate_swap_impact(&before_constraints, &after_constraints, &config.constraints);
                let candidate = Candidate {
                    blue_index,
                    orange_index,
                    score_after,
                    improvement,
                    veto_reason: gate.reason,
                };
                let slot = if gate.allowed { &mut best } else { &mut best_vetoed };
                if slot
                    .as_ref()
                    .map(|held| candidate.improvement > held.improvement)
                    .unwrap_or(true)
                {
                    *slot = Some(candidate);
                }
            }
        }

        let accepted_improvement = best.as_ref().map(|c| c.improvement);

        // Surface the strongest candidate the position gate turned away,
        // but only when the gate actually changed the outcome.
        if let Some(vetoed) = best_vetoed {
            if accepted_improvement.map_or(true, |acc| vetoed.improvement > acc) {
                let record = make_record(blue, orange, tier_of, &current, &vetoed, false);
                log.push(DecisionEvent::SwapRejected {
                    blue_out: record.blue_player.clone(),
                    orange_out: record.orange_player.clone(),
                    score_before: record.score_before,
                    score_after: record.score_after,
                    reason: record.reason.clone(),
                });
                swaps.push(record);
            }
        }

        let Some(chosen) = best else {
            debug!(iterations, accepted, "no legal improving swap remains");
            break;
        };

        let record = make_record(blue, orange, tier_of, &current, &chosen, true);
        log.push(DecisionEvent::SwapAccepted {
            blue_out: record.blue_player.clone(),
            orange_out: record.orange_player.clone(),
            blue_tier: record.blue_tier,
            orange_tier: record.orange_tier,
            score_before: record.score_before,
            score_after: record.score_after,
            reason: record.reason.clone(),
        });
        swaps.push(record);

        std::mem::swap(
            &mut blue.players[chosen.blue_index],
            &mut orange.players[chosen.orange_index],
        );
        current = chosen.score_after;
        accepted += 1;
    }

    OptimizerOutcome { swaps, final_score: current, iterations, accepted }
}

fn make_record(
    blue: &Team,
    orange: &Team,
    tier_of: &FxHashMap<PlayerId, usize>,
    before: &BalanceScore,
    candidate: &Candidate,
    accepted: bool,
) -> SwapRecord {
    let blue_player = &blue.players[candidate.blue_index];
    let orange_player = &orange.players[candidate.orange_index];
    let metrics = SwapMetricDeltas::from_scores(before, &candidate.score_after);

    let reason = match (&candidate.veto_reason, accepted) {
        (Some(veto), _) => format!(
            "would improve aggregate {:.1} -> {:.1} but {veto}",
            before.aggregate, candidate.score_after.aggregate
        ),
        (None, _) => format!(
            "levels {} most; aggregate {:.1} -> {:.1}",
            metrics.dominant_improvement(),
            before.aggregate,
            candidate.score_after.aggregate
        ),
    };

    SwapRecord {
        blue_player_id: blue_player.id,
        blue_player: blue_player.name.clone(),
        orange_player_id: orange_player.id,
        orange_player: orange_player.name.clone(),
        blue_tier: tier_of[&blue_player.id],
        orange_tier: tier_of[&orange_player.id],
        score_before: before.aggregate,
        score_after: candidate.score_after.aggregate,
        improvement: candidate.improvement,
        metrics,
        reason,
        accepted,
    }
}
