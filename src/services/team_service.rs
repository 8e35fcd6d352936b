//! Team service: team creation and lookup.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::errors::{DomainError, DomainResult, EntityKind};
use crate::domain::models::{Team, User};
use crate::domain::ports::{TeamRepository, UserRepository};

/// Team creation and lookup.
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl TeamService {
    /// Service over the team and user repositories.
    pub fn new(teams: Arc<dyn TeamRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { teams, users }
    }

    /// Create a team and upsert its members as users affiliated with it.
    ///
    /// Members that already exist are moved into this team with the supplied
    /// name and active flag. If the member upsert fails the team row is
    /// removed again before the error is returned.
    pub async fn add_team(&self, team: &Team) -> DomainResult<Team> {
        team.validate()?;

        if self.teams.team_exists(&team.name).await? {
            return Err(DomainError::duplicate(EntityKind::Team, &team.name));
        }

        let created = self.teams.create_team(team).await?;

        let users: Vec<User> = team.members.iter().map(|m| m.to_user(&team.name)).collect();
        if let Err(err) = self.users.upsert_users(&users).await {
            warn!(team_name = %team.name, error = %err, "member upsert failed, removing team");
            if let Err(cleanup) = self.teams.delete_team(&team.name).await {
                error!(
                    team_name = %team.name,
                    error = %cleanup,
                    "failed to remove team after member upsert failure"
                );
            }
            return Err(err);
        }

        info!(team_name = %created.name, members = users.len(), "team created");
        Ok(created)
    }

    /// The team with its current member projection.
    pub async fn get_by_name(&self, name: &str) -> DomainResult<Team> {
        self.teams.get_team_by_name(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::errors::ValidationError;
    use crate::domain::models::TeamMember;
    use async_trait::async_trait;

    fn service(store: &InMemoryStore) -> TeamService {
        TeamService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_add_then_get_reflects_members() {
        let store = InMemoryStore::new();
        let service = service(&store);
        let team = Team::new("core")
            .with_member(TeamMember::new("c", "Carol", false))
            .with_member(TeamMember::new("a", "Alice", true));

        service.add_team(&team).await.unwrap();
        let fetched = service.get_by_name("core").await.unwrap();

        let mut members = fetched.members.clone();
        members.sort_by(|x, y| x.user_id.cmp(&y.user_id));
        assert_eq!(
            members,
            vec![TeamMember::new("a", "Alice", true), TeamMember::new("c", "Carol", false)]
        );
    }

    #[tokio::test]
    async fn test_add_team_rejects_duplicates_and_invalid_input() {
        let store = InMemoryStore::new();
        let service = service(&store);
        service.add_team(&Team::new("core")).await.unwrap();

        let err = service.add_team(&Team::new("core")).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEntity { entity: EntityKind::Team, .. }));

        let bad = Team::new("ops").with_member(TeamMember::new("", "Nobody", true));
        let err = service.add_team(&bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationError { entity: EntityKind::TeamMember, .. })));
        assert!(!store.team_exists("ops").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_unknown_team() {
        let store = InMemoryStore::new();
        let err = service(&store).get_by_name("ghost").await.unwrap_err();
        assert!(err.is_not_found(EntityKind::Team));
    }

    struct FailingUsers;

    #[async_trait]
    impl UserRepository for FailingUsers {
        async fn get_by_id(&self, id: &str) -> DomainResult<User> {
            Err(DomainError::not_found(EntityKind::User, id))
        }

        async fn set_is_active(&self, id: &str, _is_active: bool) -> DomainResult<User> {
            Err(DomainError::not_found(EntityKind::User, id))
        }

        async fn upsert_users(&self, _users: &[User]) -> DomainResult<()> {
            Err(DomainError::Storage("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_member_upsert_removes_team() {
        let store = InMemoryStore::new();
        let service = TeamService::new(Arc::new(store.clone()), Arc::new(FailingUsers));
        let team = Team::new("core").with_member(TeamMember::new("a", "Alice", true));

        let err = service.add_team(&team).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        assert!(!store.team_exists("core").await.unwrap());
    }
}
