//! In-memory implementation of the repository ports.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult, EntityKind};
use crate::domain::models::{PullRequest, Team, TeamMember, User};
use crate::domain::ports::{
    PullRequestRepository, PullRequestTransform, TeamRepository, TeamSnapshotTransform,
    UserRepository,
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, User>,
    teams: BTreeSet<String>,
    pull_requests: HashMap<String, PullRequest>,
}

impl State {
    /// Team with members projected from the current user rows, sorted by id.
    fn team(&self, name: &str) -> DomainResult<Team> {
        if !self.teams.contains(name) {
            return Err(DomainError::not_found(EntityKind::Team, name));
        }
        let mut members: Vec<TeamMember> = self
            .users
            .values()
            .filter(|u| u.team_name.as_deref() == Some(name))
            .map(TeamMember::from)
            .collect();
        members.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(Team {
            name: name.to_string(),
            members,
        })
    }

    fn team_for_user(&self, user_id: &str) -> DomainResult<Team> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::User, user_id))?;
        let team_name = user
            .team_name
            .as_deref()
            .ok_or_else(|| DomainError::not_found(EntityKind::Team, format!("team of {user_id}")))?;
        self.team(team_name)
    }

    fn pull_request(&self, id: &str) -> DomainResult<PullRequest> {
        self.pull_requests
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(EntityKind::PullRequest, id))
    }

    fn store_transformed(&mut self, id: &str, updated: PullRequest) -> DomainResult<PullRequest> {
        updated.validate()?;
        if updated.id != id {
            return Err(DomainError::Storage(format!(
                "transform changed pull request id from {id} to {}",
                updated.id
            )));
        }
        self.pull_requests.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }
}

/// In-memory store implementing every repository port.
///
/// Clones share the same state. Pull request transforms run while holding the
/// write lock, which serializes them across all identifiers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_by_id(&self, id: &str) -> DomainResult<User> {
        let state = self.state.read().await;
        state
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(EntityKind::User, id))
    }

    async fn set_is_active(&self, id: &str, is_active: bool) -> DomainResult<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::User, id))?;
        user.is_active = is_active;
        Ok(user.clone())
    }

    async fn upsert_users(&self, users: &[User]) -> DomainResult<()> {
        for user in users {
            user.validate()?;
        }
        let mut state = self.state.write().await;
        for user in users {
            state.users.insert(user.id.clone(), user.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn team_exists(&self, name: &str) -> DomainResult<bool> {
        Ok(self.state.read().await.teams.contains(name))
    }

    async fn create_team(&self, team: &Team) -> DomainResult<Team> {
        let mut state = self.state.write().await;
        if !state.teams.insert(team.name.clone()) {
            return Err(DomainError::duplicate(EntityKind::Team, &team.name));
        }
        Ok(team.clone())
    }

    async fn get_team_by_name(&self, name: &str) -> DomainResult<Team> {
        self.state.read().await.team(name)
    }

    async fn get_team_for_user(&self, user_id: &str) -> DomainResult<Team> {
        self.state.read().await.team_for_user(user_id)
    }

    async fn delete_team(&self, name: &str) -> DomainResult<()> {
        self.state.write().await.teams.remove(name);
        Ok(())
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryStore {
    async fn create(&self, pull_request: &PullRequest) -> DomainResult<PullRequest> {
        pull_request.validate()?;
        let mut state = self.state.write().await;
        if state.pull_requests.contains_key(&pull_request.id) {
            return Err(DomainError::duplicate(EntityKind::PullRequest, &pull_request.id));
        }
        state
            .pull_requests
            .insert(pull_request.id.clone(), pull_request.clone());
        Ok(pull_request.clone())
    }

    async fn get_by_id(&self, id: &str) -> DomainResult<PullRequest> {
        self.state.read().await.pull_request(id)
    }

    async fn get_pull_requests_for_user(&self, user_id: &str) -> DomainResult<Vec<PullRequest>> {
        let state = self.state.read().await;
        let mut found: Vec<PullRequest> = state
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(user_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn update_with_transform<'a>(
        &self,
        id: &str,
        transform: PullRequestTransform<'a>,
    ) -> DomainResult<PullRequest> {
        let mut state = self.state.write().await;
        let current = state.pull_request(id)?;
        let updated = transform(current)?;
        state.store_transformed(id, updated)
    }

    async fn update_with_team_snapshot<'a>(
        &self,
        id: &str,
        member_id: &str,
        transform: TeamSnapshotTransform<'a>,
    ) -> DomainResult<PullRequest> {
        let mut state = self.state.write().await;
        let current = state.pull_request(id)?;
        let team = match state.team_for_user(member_id) {
            Ok(team) => Some(team),
            Err(DomainError::EntityNotFound { .. }) => None,
            Err(err) => return Err(err),
        };
        let updated = transform(current, team)?;
        state.store_transformed(id, updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::PullRequestStatus;

    #[tokio::test]
    async fn test_team_projection_tracks_user_rows() {
        let store = InMemoryStore::new();
        store.create_team(&Team::new("core")).await.unwrap();
        store
            .upsert_users(&[
                User::new("b", "Bob").with_team("core"),
                User::new("a", "Alice").with_team("core").with_active(false),
                User::new("x", "Xavier").with_team("other"),
            ])
            .await
            .unwrap();

        let team = store.get_team_by_name("core").await.unwrap();
        assert_eq!(
            team.members,
            vec![TeamMember::new("a", "Alice", false), TeamMember::new("b", "Bob", true)]
        );

        store.set_is_active("a", true).await.unwrap();
        let team = store.get_team_for_user("b").await.unwrap();
        assert!(team.member("a").unwrap().is_active);

        // "other" has users but no team row.
        assert!(store.get_team_for_user("x").await.unwrap_err().is_not_found(EntityKind::Team));
    }

    #[tokio::test]
    async fn test_create_team_twice() {
        let store = InMemoryStore::new();
        store.create_team(&Team::new("core")).await.unwrap();
        let err = store.create_team(&Team::new("core")).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEntity { .. }));
        store.delete_team("core").await.unwrap();
        assert!(!store.team_exists("core").await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_transform_does_not_write() {
        let store = InMemoryStore::new();
        let pr = PullRequest::open("pr-1", "t", "a", vec!["b".to_string()]);
        store.create(&pr).await.unwrap();

        let err = store
            .update_with_transform(
                "pr-1",
                Box::new(|mut pr: PullRequest| -> DomainResult<PullRequest> {
                    pr.assigned_reviewers.clear();
                    Err(DomainError::AlreadyMerged(pr.id))
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyMerged(_)));
        assert_eq!(PullRequestRepository::get_by_id(&store, "pr-1").await.unwrap().assigned_reviewers, vec!["b"]);
    }

    #[tokio::test]
    async fn test_transform_output_is_validated() {
        let store = InMemoryStore::new();
        store.create(&PullRequest::open("pr-1", "t", "a", vec![])).await.unwrap();

        let err = store
            .update_with_transform(
                "pr-1",
                Box::new(|mut pr: PullRequest| -> DomainResult<PullRequest> {
                    pr.status = PullRequestStatus::Merged;
                    Ok(pr)
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(PullRequestRepository::get_by_id(&store, "pr-1").await.unwrap().status, PullRequestStatus::Open);
    }

    #[tokio::test]
    async fn test_team_snapshot_for_teamless_member_is_none() {
        let store = InMemoryStore::new();
        store.upsert_users(&[User::new("b", "Bob")]).await.unwrap();
        store.create(&PullRequest::open("pr-1", "t", "a", vec!["b".to_string()])).await.unwrap();

        store
            .update_with_team_snapshot(
                "pr-1",
                "b",
                Box::new(|pr: PullRequest, team: Option<Team>| -> DomainResult<PullRequest> {
                    assert!(team.is_none());
                    Ok(pr)
                }),
            )
            .await
            .unwrap();
    }
}
