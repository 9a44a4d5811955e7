//! Human-readable rendering of a decision log.
//!
//! Pure formatter: takes the typed event stream and produces text, no
//! recomputation and no access to the engine. Anything the report shows
//! must already be in the log.

use std::fmt::Write;

use crate::decision_log::{DecisionEvent, DecisionLog};
use crate::models::PositionCategory;

/// Render the full decision log as a sectioned plain-text report.
pub fn render(log: &DecisionLog) -> String {
    let mut out = String::new();
    let mut section = Section::None;

    for event in log.events() {
        match event {
            DecisionEvent::RatingComputed {
                name,
                base,
                performance_adj,
                momentum,
                momentum_adj,
                rating,
                is_new,
                ..
            } => {
                section.enter(&mut out, Section::Ratings);
                let _ = write!(out, "  {name}: {rating:.2} (base {base:.2}");
                if *is_new {
                    out.push_str(", new player");
                } else {
                    let _ = write!(
                        out,
                        ", perf {performance_adj:+.2}, {} {momentum_adj:+.2}",
                        momentum.as_str()
                    );
                }
                out.push_str(")\n");
            }
            DecisionEvent::TierAssembled { number, players, min_rating, max_rating } => {
                section.enter(&mut out, Section::Tiers);
                let _ = writeln!(
                    out,
                    "  Tier {number} [{min_rating:.2}..{max_rating:.2}]: {}",
                    players.join(", ")
                );
            }
            DecisionEvent::DraftPick { tier, slot, color, name, rating, .. } => {
                section.enter(&mut out, Section::Draft);
                let _ = writeln!(
                    out,
                    "  {slot:>2}. {} takes {name} ({rating:.2}, tier {tier})",
                    color.label()
                );
            }
            DecisionEvent::SwapAccepted {
                blue_out,
                orange_out,
                score_before,
                score_after,
                reason,
                ..
            } => {
                section.enter(&mut out, Section::Swaps);
                let _ = writeln!(
                    out,
                    "  swap {blue_out} <-> {orange_out}: {score_before:.1} -> {score_after:.1} ({reason})"
                );
            }
            DecisionEvent::SwapRejected { blue_out, orange_out, reason, .. } => {
                section.enter(&mut out, Section::Swaps);
                let _ = writeln!(out, "  kept  {blue_out} <-> {orange_out}: {reason}");
            }
            DecisionEvent::ConstraintReport {
                enforced,
                max_category_gap,
                max_individual_gap,
                violations,
            } => {
                section.enter(&mut out, Section::Constraints);
                if *enforced {
                    let _ = writeln!(
                        out,
                        "  max gaps: category {max_category_gap}, position {max_individual_gap}"
                    );
                    if violations.is_empty() {
                        out.push_str("  all position constraints satisfied\n");
                    }
                    for violation in violations {
                        let _ = writeln!(out, "  unresolved: {violation}");
                    }
                } else {
                    out.push_str("  not enforced: too few players with rated positions\n");
                }
            }
            DecisionEvent::ValuePick { name, tier, margin, .. } => {
                section.enter(&mut out, Section::DraftAnalysis);
                let _ = writeln!(
                    out,
                    "  best value: {name} (tier {tier}, {margin:.2} below the tier above)"
                );
            }
            DecisionEvent::Reach { name, tier, margin, .. } => {
                section.enter(&mut out, Section::DraftAnalysis);
                let _ = writeln!(
                    out,
                    "  reach: {name} (tier {tier}, {margin:.2} above the tier below)"
                );
            }
            DecisionEvent::TeamComposition { color, distribution, tier_counts } => {
                section.enter(&mut out, Section::Composition);
                let _ = write!(out, "  {}:", color.label());
                for category in PositionCategory::ALL {
                    let _ = write!(
                        out,
                        " {} {}",
                        category.label(),
                        distribution.count_for(category)
                    );
                }
                let _ = writeln!(
                    out,
                    ", versatile {}, unrated {}",
                    distribution.versatile, distribution.unrated
                );
                let tiers: Vec<String> = tier_counts
                    .iter()
                    .map(|(tier, count)| format!("T{tier}:{count}"))
                    .collect();
                let _ = writeln!(out, "    from tiers {}", tiers.join(" "));
            }
            DecisionEvent::FinalBalance { aggregate, quality, swaps_accepted, iterations } => {
                section.enter(&mut out, Section::Result);
                let _ = writeln!(out, "  balance score {aggregate:.1} ({quality})");
                let _ = writeln!(
                    out,
                    "  {swaps_accepted} swap(s) accepted over {iterations} iteration(s)"
                );
            }
        }
    }

    out
}

#[derive(PartialEq, Clone, Copy)]
enum Section {
    None,
    Ratings,
    Tiers,
    Draft,
    Swaps,
    Constraints,
    DraftAnalysis,
    Composition,
    Result,
}

impl Section {
    fn heading(self) -> &'static str {
        match self {
            Section::None => "",
            Section::Ratings => "Ratings",
            Section::Tiers => "Tiers",
            Section::Draft => "Draft",
            Section::Swaps => "Swap optimization",
            Section::Constraints => "Position constraints",
            Section::DraftAnalysis => "Draft analysis",
            Section::Composition => "Team composition",
            Section::Result => "Result",
        }
    }

    /// Emit a heading when the event stream crosses into a new section.
    fn enter(&mut self, out: &mut String, next: Section) {
        if *self == next {
            return;
        }
        if *self != Section::None {
            out.push('\n');
        }
        out.push_str("== ");
        out.push_str(next.heading());
        out.push_str(" ==\n");
        *self = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Momentum, PlayerId, TeamColor};

    #[test]
    fn empty_log_renders_empty() {
        assert_eq!(render(&DecisionLog::new()), "");
    }

    #[test]
    fn sections_appear_once_in_stream_order() {
        let mut log = DecisionLog::new();
        log.push(DecisionEvent::RatingComputed {
            player_id: PlayerId(1),
            name: "Alice".into(),
            base: 6.0,
            performance_adj: 0.3,
            momentum: Momentum::Hot,
            momentum_adj: 0.25,
            rating: 6.55,
            is_new: false,
        });
        log.push(DecisionEvent::RatingComputed {
            player_id: PlayerId(2),
            name: "Bob".into(),
            base: 4.0,
            performance_adj: 0.0,
            momentum: Momentum::Steady,
            momentum_adj: 0.0,
            rating: 4.0,
            is_new: true,
        });
        log.push(DecisionEvent::DraftPick {
            tier: 1,
            slot: 1,
            color: TeamColor::Blue,
            player_id: PlayerId(1),
            name: "Alice".into(),
            rating: 6.55,
        });
        log.push(DecisionEvent::FinalBalance {
            aggregate: 8.2,
            quality: "Excellent".into(),
            swaps_accepted: 0,
            iterations: 1,
        });

        let text = render(&log);
        assert_eq!(text.matches("== Ratings ==").count(), 1);
        assert!(text.contains("Alice: 6.55"));
        assert!(text.contains("Bob: 4.00 (base 4.00, new player)"));
        assert!(text.contains("== Draft =="));
        assert!(text.contains("Blue takes Alice"));
        assert!(text.contains("balance score 8.2 (Excellent)"));

        let ratings_at = text.find("== Ratings ==").unwrap();
        let draft_at = text.find("== Draft ==").unwrap();
        let result_at = text.find("== Result ==").unwrap();
        assert!(ratings_at < draft_at && draft_at < result_at);
    }

    #[test]
    fn unenforced_constraints_say_so() {
        let mut log = DecisionLog::new();
        log.push(DecisionEvent::ConstraintReport {
            enforced: false,
            max_category_gap: 0,
            max_individual_gap: 0,
            violations: Vec::new(),
        });
        let text = render(&log);
        assert!(text.contains("not enforced"));
    }
}
