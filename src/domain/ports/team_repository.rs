//! Team repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Team;

/// Repository interface for Team persistence.
///
/// Teams returned from reads carry the current member projection built from
/// user rows, never the snapshot supplied at creation.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Whether a team with this name is stored.
    async fn team_exists(&self, name: &str) -> DomainResult<bool>;

    /// Store the team name. Fails with `DuplicateEntity` if the name is taken,
    /// including when a concurrent creator wins the race.
    async fn create_team(&self, team: &Team) -> DomainResult<Team>;

    /// Team with its current members.
    async fn get_team_by_name(&self, name: &str) -> DomainResult<Team>;

    /// Resolve the team a user currently belongs to.
    ///
    /// Fails with `EntityNotFound` if the user does not exist or has no team.
    async fn get_team_for_user(&self, user_id: &str) -> DomainResult<Team>;

    /// Remove a team row. Used to compensate a team creation whose member
    /// upsert failed; user rows are left untouched.
    async fn delete_team(&self, name: &str) -> DomainResult<()>;
}
