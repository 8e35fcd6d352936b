//! User service: activation toggling and lookup.

use std::sync::Arc;

use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::User;
use crate::domain::ports::UserRepository;

/// User activation and lookup.
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Service over the user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Flip a user's active flag.
    ///
    /// Only future reviewer selection is affected; existing assignments stay.
    pub async fn set_is_active(&self, user_id: &str, is_active: bool) -> DomainResult<User> {
        let user = self.users.set_is_active(user_id, is_active).await?;
        info!(user_id = %user.id, is_active = user.is_active, "user activity changed");
        Ok(user)
    }

    /// Fetch a user by id.
    pub async fn get(&self, user_id: &str) -> DomainResult<User> {
        self.users.get_by_id(user_id).await
    }
}
