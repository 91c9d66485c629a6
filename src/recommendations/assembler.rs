use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::recommendations::{
    catalog::{self, Recommendation, RecommendationPool},
    config::RecommendationConfig,
    intent::IntentFlags,
    tier::StressTier,
};

/// Build the suggestion list for one request.
///
/// Intent pools come before the tier pool (plus the motivational nudge when
/// encouragement is needed), duplicates are dropped by title keeping the
/// first copy, the fallback pool tops the list up to `min_results`, and the
/// result is shuffled with `rng` and cut to `max_results`.
pub fn assemble<R: Rng + ?Sized>(
    tier: StressTier,
    encouragement: bool,
    intents: &IntentFlags,
    config: &RecommendationConfig,
    rng: &mut R,
) -> Vec<Recommendation> {
    let mut tier_items: Vec<Recommendation> = catalog::tier_pool(tier).items.to_vec();
    if encouragement {
        tier_items.push(catalog::MOTIVATIONAL_NUDGE);
    }

    let mut merged: Vec<Recommendation> = catalog::intent_pools(intents)
        .into_iter()
        .flat_map(|pool| pool.items.iter().copied())
        .collect();
    merged.extend(tier_items);

    let mut combined = dedupe_by_title(merged);
    fill_to_minimum(&mut combined, &catalog::FALLBACK, config.min_results);

    combined.shuffle(rng);
    combined.truncate(config.max_results);
    combined
}

/// Keep the first item seen for each title, preserving order.
pub fn dedupe_by_title(items: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.title))
        .collect()
}

/// Append items from `pool`, in pool order and skipping titles already in
/// `list`, until `list` holds `minimum` items or the pool runs out.
///
/// Expects `list` to have unique titles and leaves it that way. A list that
/// already meets `minimum` is untouched.
pub fn fill_to_minimum(list: &mut Vec<Recommendation>, pool: &RecommendationPool, minimum: usize) {
    for item in pool.items {
        if list.len() >= minimum {
            break;
        }
        if !list.iter().any(|existing| existing.title == item.title) {
            list.push(*item);
        }
    }
}
