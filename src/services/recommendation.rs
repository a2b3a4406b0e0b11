use std::collections::{HashMap, HashSet};

use crate::{db::AnalyticsStore, error::AppResult, models::WatchEvent};

/// Maximum number of titles returned per request
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Fraction of the target user's category view count added to a scored title
/// whose canonical category matches
const CATEGORY_BIAS_FACTOR: f64 = 0.5;

/// Computes up to three video recommendations for a user
///
/// Collaborative filtering over co-viewing overlap: every other user who
/// shares at least one watched title with the target contributes their
/// overlap count to each of their titles the target has not seen, and the
/// target's category preferences then bias the accumulated scores. An empty
/// result is a normal outcome (new user, no co-viewers, nothing unseen), not
/// an error; only store failures propagate.
///
/// All scoring state is local to the call, so a fixed store snapshot always
/// yields the same ordered output.
pub async fn recommend(store: &dyn AnalyticsStore, username: &str) -> AppResult<Vec<String>> {
    let target_set = store.watched_titles(username).await?;
    if target_set.is_empty() {
        tracing::debug!(username, "No watch history, nothing to recommend");
        return Ok(Vec::new());
    }

    let mut candidates = store.users_who_watched(&target_set).await?;
    candidates.remove(username);
    if candidates.is_empty() {
        tracing::debug!(username, "No co-viewers, nothing to recommend");
        return Ok(Vec::new());
    }

    let mut neighbor_sets: HashMap<String, HashSet<String>> =
        HashMap::with_capacity(candidates.len());
    for candidate in candidates {
        let watched = store.watched_titles(&candidate).await?;
        neighbor_sets.insert(candidate, watched);
    }

    let mut scores = overlap_scores(&target_set, &neighbor_sets);
    if scores.is_empty() {
        tracing::debug!(username, "Co-viewers have no unseen titles");
        return Ok(Vec::new());
    }

    let weights = store.category_preferences(username).await?;
    if !weights.is_empty() {
        let titles: Vec<String> = scores.keys().cloned().collect();
        for title in titles {
            let events = store.watch_events_for_title(&title).await?;
            let category = match canonical_category(&events) {
                Some(category) => category,
                None => continue,
            };
            if let (Some(weight), Some(score)) = (weights.get(&category), scores.get_mut(&title)) {
                *score += *weight as f64 * CATEGORY_BIAS_FACTOR;
            }
        }
    }

    let ranked = rank(scores);
    tracing::info!(
        username,
        neighbors = neighbor_sets.len(),
        recommended = ranked.len(),
        "Recommendations computed"
    );
    Ok(ranked)
}

/// Accumulates co-viewing scores for titles the target has not seen
///
/// A neighbor with overlap `n` adds the full `n` to each of its unseen
/// titles; the weight is not split across them, and prolific watchers are
/// not normalized down. Contributions from different neighbors sum.
fn overlap_scores(
    target_set: &HashSet<String>,
    neighbor_sets: &HashMap<String, HashSet<String>>,
) -> HashMap<String, f64> {
    let mut scores = HashMap::new();

    for watched in neighbor_sets.values() {
        let overlap = watched.intersection(target_set).count();
        if overlap == 0 {
            continue;
        }
        for title in watched.difference(target_set) {
            *scores.entry(title.clone()).or_insert(0.0) += overlap as f64;
        }
    }

    scores
}

/// Resolves a title's canonical category from its watch events
///
/// The most frequently recorded category wins; ties resolve to the
/// alphabetically first. Events without a category carry no vote, so a title
/// only ever played without one has no canonical category.
fn canonical_category(events: &[WatchEvent]) -> Option<String> {
    let mut votes: HashMap<&str, usize> = HashMap::new();
    for event in events {
        if let Some(category) = event.category.as_deref() {
            *votes.entry(category).or_insert(0) += 1;
        }
    }

    votes
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(category, _)| category.to_string())
}

/// Orders scored titles and keeps the top results
///
/// Score descending; equal scores fall back to title ascending so the output
/// order never depends on map iteration.
fn rank(scores: HashMap<String, f64>) -> Vec<String> {
    let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(MAX_RECOMMENDATIONS);
    ranked.into_iter().map(|(title, _)| title).collect()
}
