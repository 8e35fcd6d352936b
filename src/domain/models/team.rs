//! Team domain model.
//!
//! A team is little more than a unique name. Its member list is a projection
//! of the user rows affiliated with it and is rebuilt on every read; the
//! authoritative active flag always lives on [`User`].

use serde::{Deserialize, Serialize};

use super::user::User;
use crate::domain::errors::{EntityKind, ValidationError};

/// A user as seen from a team listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Id of the user.
    pub user_id: String,
    /// Display name.
    pub username: String,
    /// Whether the member can be assigned reviews.
    pub is_active: bool,
}

impl TeamMember {
    /// Member entry for `user_id`.
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, is_active: bool) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            is_active,
        }
    }

    /// Reject empty ids and names.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.is_empty() {
            return Err(ValidationError::empty(EntityKind::TeamMember, "user_id"));
        }
        if self.username.is_empty() {
            return Err(ValidationError::empty(EntityKind::TeamMember, "username"));
        }
        Ok(())
    }

    /// The user row this member becomes when its team is stored.
    pub fn to_user(&self, team_name: &str) -> User {
        User {
            id: self.user_id.clone(),
            username: self.username.clone(),
            team_name: Some(team_name.to_string()),
            is_active: self.is_active,
        }
    }
}

impl From<&User> for TeamMember {
    fn from(user: &User) -> Self {
        Self::new(user.id.clone(), user.username.clone(), user.is_active)
    }
}

/// A named team and its member projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team name.
    #[serde(rename = "team_name")]
    pub name: String,
    /// Sorted by user id when read from a repository.
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl Team {
    /// Team with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Append `member`.
    pub fn with_member(mut self, member: TeamMember) -> Self {
        self.members.push(member);
        self
    }

    /// Validate the name and every member.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::empty(EntityKind::Team, "team_name"));
        }
        self.members.iter().try_for_each(TeamMember::validate)
    }

    /// Members eligible to review for `reference_user_id`: active, and not the user itself.
    pub fn active_members_except<'a>(
        &'a self,
        reference_user_id: &'a str,
    ) -> impl Iterator<Item = &'a TeamMember> + 'a {
        self.members
            .iter()
            .filter(move |m| m.is_active && m.user_id != reference_user_id)
    }

    /// Look up a member by id.
    pub fn member(&self, user_id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationKind;

    fn core_team() -> Team {
        Team::new("core")
            .with_member(TeamMember::new("a", "Alice", true))
            .with_member(TeamMember::new("b", "Bob", true))
            .with_member(TeamMember::new("c", "Carol", false))
    }

    #[test]
    fn test_team_validation() {
        assert!(core_team().validate().is_ok());

        let err = Team::new("").validate().unwrap_err();
        assert_eq!(err.entity, EntityKind::Team);
        assert_eq!(err.kind, ValidationKind::EmptyField);

        let err = core_team()
            .with_member(TeamMember::new("d", "", true))
            .validate()
            .unwrap_err();
        assert_eq!(err.entity, EntityKind::TeamMember);
        assert_eq!(err.field, "username");
    }

    #[test]
    fn test_active_members_except() {
        let team = core_team();
        let ids: Vec<_> = team.active_members_except("a").map(|m| m.user_id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_team_json_shape() {
        let json = r#"{"team_name":"core","members":[{"user_id":"a","username":"Alice","is_active":true}]}"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert_eq!(team.name, "core");
        assert_eq!(team.members[0].to_user("core").team_name.as_deref(), Some("core"));
    }
}
