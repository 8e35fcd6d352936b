//! Pull request domain model and its OPEN/MERGED state machine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{EntityKind, ValidationError, ValidationKind};

/// Maximum number of reviewers a pull request can carry.
pub const MAX_REVIEWERS: usize = 2;

/// Lifecycle status of a pull request.
///
/// `Merged` is terminal: no transition leaves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestStatus {
    /// Accepting reviews.
    #[default]
    Open,
    /// Terminal.
    Merged,
}

impl PullRequestStatus {
    /// Wire and storage form: `OPEN` or `MERGED`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }

    /// Parse the stored representation. Matching is exact.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "OPEN" => Ok(Self::Open),
            "MERGED" => Ok(Self::Merged),
            other => Err(ValidationError::invalid_enum(EntityKind::PullRequest, "status", other)),
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pull request and its assigned reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Unique, caller-supplied id.
    #[serde(rename = "pull_request_id")]
    pub id: String,
    /// Title.
    #[serde(rename = "pull_request_name")]
    pub title: String,
    /// User who opened the pull request.
    pub author_id: String,
    /// Lifecycle state.
    pub status: PullRequestStatus,
    /// Reviewer ids in assignment order.
    pub assigned_reviewers: Vec<String>,
    /// When the pull request was opened.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Set exactly when the status is `MERGED`.
    #[serde(rename = "mergedAt")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// A freshly opened pull request.
    pub fn open(
        id: impl Into<String>,
        title: impl Into<String>,
        author_id: impl Into<String>,
        assigned_reviewers: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author_id: author_id.into(),
            status: PullRequestStatus::Open,
            assigned_reviewers,
            created_at: Utc::now(),
            merged_at: None,
        }
    }

    /// Whether the status is `MERGED`.
    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    /// Whether `user_id` holds at least one reviewer slot.
    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.assigned_reviewers.iter().any(|r| r == user_id)
    }

    /// Move to MERGED. Returns `false` when the pull request was already merged,
    /// in which case nothing changes and the original merge timestamp stands.
    pub fn merge(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_merged() {
            return false;
        }
        self.status = PullRequestStatus::Merged;
        self.merged_at = Some(at);
        true
    }

    /// Replace every occurrence of `old` with `new`, keeping positions.
    /// Returns how many slots changed.
    pub fn replace_reviewer(&mut self, old: &str, new: &str) -> usize {
        let mut replaced = 0;
        for slot in self.assigned_reviewers.iter_mut().filter(|r| r.as_str() == old) {
            *slot = new.to_string();
            replaced += 1;
        }
        replaced
    }

    /// Check required fields, the reviewer cap, and the status/timestamp pairing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::empty(EntityKind::PullRequest, "pull_request_id"));
        }
        if self.title.is_empty() {
            return Err(ValidationError::empty(EntityKind::PullRequest, "pull_request_name"));
        }
        if self.author_id.is_empty() {
            return Err(ValidationError::empty(EntityKind::PullRequest, "author_id"));
        }
        if self.assigned_reviewers.len() > MAX_REVIEWERS {
            return Err(ValidationError::too_many(
                EntityKind::PullRequest,
                "assigned_reviewers",
                MAX_REVIEWERS,
                self.assigned_reviewers.len(),
            ));
        }
        if self.is_merged() != self.merged_at.is_some() {
            return Err(ValidationError {
                entity: EntityKind::PullRequest,
                field: "mergedAt",
                kind: ValidationKind::StatusTimestampMismatch,
            });
        }
        Ok(())
    }
}
