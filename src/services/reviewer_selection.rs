//! Reviewer selection.
//!
//! Chooses up to [`MAX_REVIEWERS`] active teammates of a reference user. The
//! reference user is the author when a pull request is created and the
//! outgoing reviewer when a slot is reassigned. Selection never writes
//! anything; callers feed the result into their own atomic update.

use std::sync::Arc;

use crate::domain::models::{SamplingStrategy, Team, MAX_REVIEWERS};
use crate::domain::ports::RandomSource;

fn candidate_pool<'a>(team: &'a Team, reference_user_id: &'a str) -> Vec<&'a str> {
    team.active_members_except(reference_user_id)
        .map(|m| m.user_id.as_str())
        .collect()
}

/// Draw reviewer ids for `reference_user_id` from `team`.
///
/// The candidate pool is every active member other than the reference user.
/// An empty pool yields an empty list. Otherwise `min(pool, 2)` ids are
/// drawn; with [`SamplingStrategy::WithReplacement`] each draw is independent
/// and the same id can appear twice.
pub fn select_reviewers(
    team: &Team,
    reference_user_id: &str,
    random: &dyn RandomSource,
    strategy: SamplingStrategy,
) -> Vec<String> {
    let mut pool = candidate_pool(team, reference_user_id);

    let slots = pool.len().min(MAX_REVIEWERS);
    match strategy {
        SamplingStrategy::WithReplacement => (0..slots)
            .map(|_| pool[random.index(pool.len())].to_string())
            .collect(),
        SamplingStrategy::Distinct => {
            // Partial Fisher-Yates: the first `slots` entries end up a uniform sample.
            for i in 0..slots {
                let j = i + random.index(pool.len() - i);
                pool.swap(i, j);
            }
            pool.into_iter().take(slots).map(str::to_string).collect()
        }
    }
}

/// Reviewer selection bound to a random source and sampling strategy.
#[derive(Clone)]
pub struct ReviewerSelector {
    random: Arc<dyn RandomSource>,
    strategy: SamplingStrategy,
}

impl ReviewerSelector {
    /// Selector drawing from `random` with `strategy`.
    pub fn new(random: Arc<dyn RandomSource>, strategy: SamplingStrategy) -> Self {
        Self { random, strategy }
    }

    /// Reviewers for a new pull request by `reference_user_id`.
    pub fn select(&self, team: &Team, reference_user_id: &str) -> Vec<String> {
        select_reviewers(team, reference_user_id, self.random.as_ref(), self.strategy)
    }

    /// A single replacement candidate, if the pool is not empty.
    ///
    /// Consumes exactly one draw from the random source.
    pub fn pick_one(&self, team: &Team, reference_user_id: &str) -> Option<String> {
        let pool = candidate_pool(team, reference_user_id);
        if pool.is_empty() {
            return None;
        }
        Some(pool[self.random.index(pool.len())].to_string())
    }
}

impl std::fmt::Debug for ReviewerSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewerSelector")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
