//! Pull request lifecycle: creation, merge, and reviewer reassignment.
//!
//! The service keeps no entity state between calls. Every operation reloads
//! what it needs from the repositories, and every mutation of an existing
//! pull request goes through one of the atomic read-modify-write primitives.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::errors::{DomainError, DomainResult, EntityKind};
use crate::domain::models::{PullRequest, Team};
use crate::domain::ports::{PullRequestRepository, TeamRepository, UserRepository};
use crate::services::reviewer_selection::ReviewerSelector;

/// Pull request lifecycle over the repository ports.
pub struct PullRequestService {
    pull_requests: Arc<dyn PullRequestRepository>,
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    selector: ReviewerSelector,
}

impl PullRequestService {
    /// Service over the given repositories and selector.
    pub fn new(
        pull_requests: Arc<dyn PullRequestRepository>,
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        selector: ReviewerSelector,
    ) -> Self {
        Self {
            pull_requests,
            users,
            teams,
            selector,
        }
    }

    /// Open a new pull request and assign reviewers from the author's team.
    ///
    /// An author without active teammates (or without a team) gets an empty
    /// reviewer list; that is not an error. An existing id is reported as a
    /// duplicate before the author or the draft fields are checked.
    pub async fn create(&self, id: &str, title: &str, author_id: &str) -> DomainResult<PullRequest> {
        match self.pull_requests.get_by_id(id).await {
            Ok(_) => return Err(DomainError::duplicate(EntityKind::PullRequest, id)),
            Err(err) if err.is_not_found(EntityKind::PullRequest) => {}
            Err(err) => return Err(err),
        }

        self.users.get_by_id(author_id).await?;

        let reviewers = match self.teams.get_team_for_user(author_id).await {
            Ok(team) => self.selector.select(&team, author_id),
            Err(DomainError::EntityNotFound { .. }) => {
                debug!(author_id, "author has no team, no reviewers assigned");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        let draft = PullRequest::open(id, title, author_id, reviewers);
        draft.validate()?;
        let created = self.pull_requests.create(&draft).await?;

        info!(
            pull_request_id = %created.id,
            author_id = %created.author_id,
            reviewers = ?created.assigned_reviewers,
            "pull request created"
        );
        Ok(created)
    }

    /// Merge a pull request. Merging an already merged one returns it unchanged.
    pub async fn merge(&self, id: &str) -> DomainResult<PullRequest> {
        let now = Utc::now();
        let mut transitioned = false;
        let changed = &mut transitioned;
        let merged = self
            .pull_requests
            .update_with_transform(
                id,
                Box::new(move |mut pr: PullRequest| -> DomainResult<PullRequest> {
                    *changed = pr.merge(now);
                    Ok(pr)
                }),
            )
            .await?;

        if transitioned {
            info!(pull_request_id = %merged.id, merged_at = ?merged.merged_at, "pull request merged");
        } else {
            debug!(pull_request_id = %merged.id, "pull request already merged");
        }
        Ok(merged)
    }

    /// Replace `old_reviewer_id` with an active teammate of that reviewer.
    ///
    /// The replacement is drawn from the outgoing reviewer's team, not the
    /// author's. Checks run in order (merged, assigned, candidate) against the
    /// state read inside the atomic update, so a failure never mutates anything.
    ///
    /// Returns the updated pull request and the replacement's id.
    pub async fn reassign_reviewer(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> DomainResult<(PullRequest, String)> {
        let selector = &self.selector;
        let mut replacement: Option<String> = None;
        let chosen = &mut replacement;

        let updated = self
            .pull_requests
            .update_with_team_snapshot(
                pull_request_id,
                old_reviewer_id,
                Box::new(move |mut pr: PullRequest, team: Option<Team>| -> DomainResult<PullRequest> {
                    if pr.is_merged() {
                        return Err(DomainError::AlreadyMerged(pr.id));
                    }
                    if !pr.has_reviewer(old_reviewer_id) {
                        return Err(DomainError::ReviewerNotAssigned {
                            pull_request_id: pr.id,
                            reviewer_id: old_reviewer_id.to_string(),
                        });
                    }
                    let candidate = team
                        .as_ref()
                        .and_then(|team| selector.pick_one(team, old_reviewer_id))
                        .ok_or_else(|| DomainError::NoCandidate {
                            reviewer_id: old_reviewer_id.to_string(),
                        })?;

                    pr.replace_reviewer(old_reviewer_id, &candidate);
                    pr.validate()?;
                    *chosen = Some(candidate);
                    Ok(pr)
                }),
            )
            .await?;

        let replaced_by = replacement.ok_or_else(|| {
            DomainError::Storage("reassignment committed without a replacement".to_string())
        })?;

        info!(
            pull_request_id = %updated.id,
            old_reviewer_id,
            new_reviewer_id = %replaced_by,
            "reviewer reassigned"
        );
        Ok((updated, replaced_by))
    }

    /// Fetch a pull request by id.
    pub async fn get(&self, id: &str) -> DomainResult<PullRequest> {
        self.pull_requests.get_by_id(id).await
    }

    /// Pull requests where `user_id` is currently an assigned reviewer.
    pub async fn reviews_for(&self, user_id: &str) -> DomainResult<Vec<PullRequest>> {
        self.pull_requests.get_pull_requests_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::random::ScriptedRandom;
    use crate::domain::models::{PullRequestStatus, SamplingStrategy, TeamMember, User};

    async fn setup(script: Vec<usize>) -> (PullRequestService, InMemoryStore) {
        let store = InMemoryStore::new();
        let service = PullRequestService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            ReviewerSelector::new(
                Arc::new(ScriptedRandom::new(script)),
                SamplingStrategy::WithReplacement,
            ),
        );
        (service, store)
    }

    async fn seed_team(store: &InMemoryStore, name: &str, members: &[(&str, bool)]) {
        let team = members.iter().fold(Team::new(name), |team, (id, active)| {
            team.with_member(TeamMember::new(*id, format!("user {id}"), *active))
        });
        store.create_team(&team).await.unwrap();
        let users: Vec<User> = team.members.iter().map(|m| m.to_user(name)).collect();
        store.upsert_users(&users).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_assigns_only_active_teammates() {
        let (service, store) = setup(vec![0, 0]).await;
        seed_team(&store, "core", &[("a", true), ("b", true), ("c", false)]).await;

        let pr = service.create("pr-1", "Add feature", "a").await.unwrap();
        assert_eq!(pr.status, PullRequestStatus::Open);
        assert!(pr.merged_at.is_none());
        assert_eq!(pr.assigned_reviewers, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_unknown_authors() {
        let (service, store) = setup(vec![0]).await;
        seed_team(&store, "core", &[("a", true), ("b", true)]).await;

        service.create("pr-1", "First", "a").await.unwrap();
        let err = service.create("pr-1", "Again", "a").await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEntity { entity: EntityKind::PullRequest, .. }));
        // The id collision is reported before the empty title.
        let err = service.create("pr-1", "", "a").await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEntity { entity: EntityKind::PullRequest, .. }));

        let err = service.create("pr-2", "Ghost", "nobody").await.unwrap_err();
        assert!(err.is_not_found(EntityKind::User));

        let err = service.create("pr-3", "", "a").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_without_teammates_assigns_nobody() {
        let (service, store) = setup(vec![0]).await;
        seed_team(&store, "solo", &[("a", true)]).await;
        store.upsert_users(&[User::new("loner", "Loner")]).await.unwrap();

        assert!(service.create("pr-1", "t", "a").await.unwrap().assigned_reviewers.is_empty());
        assert!(service.create("pr-2", "t", "loner").await.unwrap().assigned_reviewers.is_empty());
    }

    #[tokio::test]
    async fn test_merge_is_idempotent() {
        let (service, store) = setup(vec![0]).await;
        seed_team(&store, "core", &[("a", true), ("b", true)]).await;
        service.create("pr-1", "t", "a").await.unwrap();

        let first = service.merge("pr-1").await.unwrap();
        let second = service.merge("pr-1").await.unwrap();
        assert_eq!(first.status, PullRequestStatus::Merged);
        assert!(first.merged_at.is_some());
        assert_eq!(first.merged_at, second.merged_at);

        let err = service.merge("missing").await.unwrap_err();
        assert!(err.is_not_found(EntityKind::PullRequest));
    }

    #[tokio::test]
    async fn test_reassign_draws_from_outgoing_reviewers_team() {
        let (service, store) = setup(vec![0]).await;
        seed_team(&store, "core", &[("a", true), ("b", true)]).await;
        seed_team(&store, "infra", &[("x", true), ("y", true)]).await;

        let pr = PullRequest::open("pr-1", "t", "a", vec!["x".to_string(), "b".to_string()]);
        store.create(&pr).await.unwrap();

        let (updated, replaced_by) = service.reassign_reviewer("pr-1", "x").await.unwrap();
        assert_eq!(replaced_by, "y");
        assert_eq!(updated.assigned_reviewers, vec!["y".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_reassign_failures_leave_reviewers_unchanged() {
        let (service, store) = setup(vec![0]).await;
        seed_team(&store, "core", &[("a", true), ("b", true), ("c", false)]).await;
        seed_team(&store, "ops", &[("d", true)]).await;

        store
            .create(&PullRequest::open("pr-1", "t", "c", vec!["b".to_string(), "d".to_string()]))
            .await
            .unwrap();

        // d's team has nobody else active.
        let err = service.reassign_reviewer("pr-1", "d").await.unwrap_err();
        assert!(matches!(err, DomainError::NoCandidate { .. }));

        let err = service.reassign_reviewer("pr-1", "a").await.unwrap_err();
        assert!(matches!(err, DomainError::ReviewerNotAssigned { .. }));

        service.merge("pr-1").await.unwrap();
        let err = service.reassign_reviewer("pr-1", "b").await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyMerged(_)));

        let stored = service.get("pr-1").await.unwrap();
        assert_eq!(stored.assigned_reviewers, vec!["b".to_string(), "d".to_string()]);
    }

    #[tokio::test]
    async fn test_reviews_for() {
        let (service, store) = setup(vec![0]).await;
        seed_team(&store, "core", &[("a", true), ("b", true)]).await;
        service.create("pr-1", "t", "a").await.unwrap();
        service.create("pr-2", "t", "b").await.unwrap();

        let for_b = service.reviews_for("b").await.unwrap();
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].id, "pr-1");
        assert!(service.reviews_for("nobody").await.unwrap().is_empty());
    }
}
