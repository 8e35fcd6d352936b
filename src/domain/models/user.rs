//! User domain model.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{EntityKind, ValidationError};

/// A person who can author or review pull requests.
///
/// The `is_active` flag is the only input reviewer selection consults when
/// deciding whether a user is eligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user id.
    #[serde(rename = "user_id")]
    pub id: String,
    /// Display name.
    pub username: String,
    /// Team affiliation; `None` for users that belong to no team.
    #[serde(default)]
    pub team_name: Option<String>,
    /// Whether the user can be assigned reviews.
    pub is_active: bool,
}

impl User {
    /// Active user with no team.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            team_name: None,
            is_active: true,
        }
    }

    /// Set the team affiliation.
    pub fn with_team(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    /// Set the activity flag.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Reject an empty id or username.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::empty(EntityKind::User, "user_id"));
        }
        if self.username.is_empty() {
            return Err(ValidationError::empty(EntityKind::User, "username"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_validation() {
        assert!(User::new("u1", "alice").validate().is_ok());

        let err = User::new("", "alice").validate().unwrap_err();
        assert_eq!(err.field, "user_id");

        let err = User::new("u1", "").validate().unwrap_err();
        assert_eq!(err.field, "username");
    }

    #[test]
    fn test_user_serialization() {
        let user = User::new("u1", "alice").with_team("core").with_active(false);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["team_name"], "core");
        assert_eq!(json["is_active"], false);
    }
}
