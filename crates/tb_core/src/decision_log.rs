//! Structured decision trace.
//!
//! Every stage of the engine appends typed events to an explicit,
//! append-only log that is threaded through the run (no shared mutable
//! accumulator). The event structure is a first-class contract: downstream
//! consumers reconstruct these records for display, and the human-readable
//! rendering lives in a separate formatter ([`crate::report`]).

use serde::{Deserialize, Serialize};

use crate::models::{Momentum, PlayerId, TeamColor};
use crate::positions::TeamDistribution;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DecisionEvent {
    RatingComputed {
        player_id: PlayerId,
        name: String,
        base: f32,
        performance_adj: f32,
        momentum: Momentum,
        momentum_adj: f32,
        rating: f32,
        is_new: bool,
    },
    TierAssembled {
        number: usize,
        players: Vec<String>,
        min_rating: f32,
        max_rating: f32,
    },
    DraftPick {
        tier: usize,
        slot: usize,
        color: TeamColor,
        player_id: PlayerId,
        name: String,
        rating: f32,
    },
    SwapAccepted {
        blue_out: String,
        orange_out: String,
        blue_tier: usize,
        orange_tier: usize,
        score_before: f32,
        score_after: f32,
        reason: String,
    },
    SwapRejected {
        blue_out: String,
        orange_out: String,
        score_before: f32,
        score_after: f32,
        reason: String,
    },
    ConstraintReport {
        enforced: bool,
        max_category_gap: u32,
        max_individual_gap: u32,
        violations: Vec<String>,
    },
    ValuePick {
        player_id: PlayerId,
        name: String,
        tier: usize,
        margin: f32,
    },
    Reach {
        player_id: PlayerId,
        name: String,
        tier: usize,
        margin: f32,
    },
    TeamComposition {
        color: TeamColor,
        distribution: TeamDistribution,
        tier_counts: Vec<(usize, usize)>,
    },
    FinalBalance {
        aggregate: f32,
        quality: String,
        swaps_accepted: u32,
        iterations: u32,
    },
}

/// Ordered, append-only sequence of engine decisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DecisionLog {
    events: Vec<DecisionEvent>,
}

impl DecisionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DecisionEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[DecisionEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_keep_insertion_order() {
        let mut log = DecisionLog::new();
        log.push(DecisionEvent::TierAssembled {
            number: 1,
            players: vec!["A".into()],
            min_rating: 5.0,
            max_rating: 7.0,
        });
        log.push(DecisionEvent::FinalBalance {
            aggregate: 3.2,
            quality: "Excellent".into(),
            swaps_accepted: 1,
            iterations: 2,
        });
        assert_eq!(log.len(), 2);
        assert!(matches!(log.events()[0], DecisionEvent::TierAssembled { .. }));
        assert!(matches!(log.events()[1], DecisionEvent::FinalBalance { .. }));
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = DecisionEvent::DraftPick {
            tier: 2,
            slot: 5,
            color: TeamColor::Orange,
            player_id: PlayerId(7),
            name: "Dana".into(),
            rating: 6.5,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"draft_pick\""));
        let back: DecisionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
