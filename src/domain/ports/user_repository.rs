//! User repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::User;

/// Repository interface for User persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by ID. Fails with `EntityNotFound` when absent.
    async fn get_by_id(&self, id: &str) -> DomainResult<User>;

    /// Set the active flag and return the updated user.
    async fn set_is_active(&self, id: &str, is_active: bool) -> DomainResult<User>;

    /// Insert new users or overwrite name, team, and active flag of existing ones.
    ///
    /// All-or-nothing per call.
    async fn upsert_users(&self, users: &[User]) -> DomainResult<()>;
}
