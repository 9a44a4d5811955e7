//! Skill tier construction.
//!
//! The rated pool is sorted by rating descending (ties broken by name then
//! id so repeated runs agree) and chunked into fixed-size tiers. A trailing
//! chunk smaller than the tier size is absorbed into the previous tier
//! rather than forming an undersized extra tier.

use serde::{Deserialize, Serialize};

use crate::models::Player;

/// A contiguous band of players of similar skill rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tier {
    /// 1-based ordinal; tier 1 holds the highest-rated players.
    pub number: usize,
    /// Members, ordered by rating descending.
    pub players: Vec<Player>,
    pub min_rating: f32,
    pub max_rating: f32,
}

/// Deterministic pool ordering: rating descending, then name, then id.
/// New players carry their base-only rating and sort through the same rule.
pub fn sort_pool(players: &mut [Player]) {
    players.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Partition the full pool into tiers of `tier_size`.
///
/// Every player lands in exactly one tier; the final tier absorbs any
/// remainder. A pool smaller than `tier_size` forms a single tier.
pub fn build_tiers(mut players: Vec<Player>, tier_size: usize) -> Vec<Tier> {
    debug_assert!(tier_size >= 1);
    sort_pool(&mut players);

    let full_tiers = players.len() / tier_size;
    let remainder = players.len() % tier_size;

    let mut tiers: Vec<Tier> = Vec::with_capacity(full_tiers.max(1));
    let mut iter = players.into_iter();

    for number in 1..=full_tiers {
        let members: Vec<Player> = iter.by_ref().take(tier_size).collect();
        tiers.push(make_tier(number, members));
    }

    if remainder > 0 {
        let leftover: Vec<Player> = iter.collect();
        match tiers.last_mut() {
            Some(last) => {
                last.players.extend(leftover);
                refresh_range(last);
            }
            // pool smaller than one tier: it is the only tier
            None => tiers.push(make_tier(1, leftover)),
        }
    }

    tiers
}

fn make_tier(number: usize, players: Vec<Player>) -> Tier {
    let mut tier = Tier { number, players, min_rating: 0.0, max_rating: 0.0 };
    refresh_range(&mut tier);
    tier
}

fn refresh_range(tier: &mut Tier) {
    tier.max_rating = tier.players.first().map(|p| p.rating).unwrap_or(0.0);
    tier.min_rating = tier.players.last().map(|p| p.rating).unwrap_or(0.0);
}
