//! Domain errors for the review roster.

use std::fmt;

use thiserror::Error;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A user.
    User,
    /// A team.
    Team,
    /// A member entry inside a team payload.
    TeamMember,
    /// A pull request.
    PullRequest,
}

impl EntityKind {
    /// Lowercase name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Team => "team",
            Self::TeamMember => "team member",
            Self::PullRequest => "pull request",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    /// A required string field is empty.
    EmptyField,
    /// A string does not name a known enum variant.
    InvalidEnumValue(String),
    /// A collection holds more items than allowed.
    CardinalityExceeded {
        /// Largest allowed count.
        max: usize,
        /// Count found.
        actual: usize,
    },
    /// Status and merge timestamp disagree (OPEN with a timestamp, MERGED without one).
    StatusTimestampMismatch,
}

/// Field-level validation failure raised by `validate()` on domain entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {entity}: {}", describe(.field, .kind))]
pub struct ValidationError {
    /// Entity that failed validation.
    pub entity: EntityKind,
    /// Name of the offending field.
    pub field: &'static str,
    /// What was wrong with the field.
    pub kind: ValidationKind,
}

fn describe(field: &str, kind: &ValidationKind) -> String {
    match kind {
        ValidationKind::EmptyField => format!("{field} is empty"),
        ValidationKind::InvalidEnumValue(value) => format!("{field} has invalid value '{value}'"),
        ValidationKind::CardinalityExceeded { max, actual } => {
            format!("{field} has {actual} items, at most {max} allowed")
        }
        ValidationKind::StatusTimestampMismatch => {
            format!("{field} does not match the pull request status")
        }
    }
}

impl ValidationError {
    /// `field` is empty.
    pub fn empty(entity: EntityKind, field: &'static str) -> Self {
        Self { entity, field, kind: ValidationKind::EmptyField }
    }

    /// `value` is not a known variant for `field`.
    pub fn invalid_enum(entity: EntityKind, field: &'static str, value: impl Into<String>) -> Self {
        Self {
            entity,
            field,
            kind: ValidationKind::InvalidEnumValue(value.into()),
        }
    }

    /// `field` holds `actual` items, more than `max`.
    pub fn too_many(entity: EntityKind, field: &'static str, max: usize, actual: usize) -> Self {
        Self {
            entity,
            field,
            kind: ValidationKind::CardinalityExceeded { max, actual },
        }
    }
}

/// Domain-level errors returned by repositories and services.
///
/// Every fallible operation returns exactly one of these; callers match on the
/// variant, never on the message.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An entity failed `validate()`.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An entity with this id already exists.
    #[error("{entity} already exists: {id}")]
    DuplicateEntity {
        /// Kind of the colliding entity.
        entity: EntityKind,
        /// The taken id.
        id: String,
    },

    /// No entity with this id.
    #[error("{entity} not found: {id}")]
    EntityNotFound {
        /// Kind of the missing entity.
        entity: EntityKind,
        /// The id that was looked up.
        id: String,
    },

    /// The pull request is merged and cannot change.
    #[error("pull request {0} is already merged")]
    AlreadyMerged(String),

    /// The reviewer to replace holds no slot on the pull request.
    #[error("reviewer {reviewer_id} is not assigned to pull request {pull_request_id}")]
    ReviewerNotAssigned {
        /// Pull request being updated.
        pull_request_id: String,
        /// Reviewer that was asked to be replaced.
        reviewer_id: String,
    },

    /// The outgoing reviewer has no active teammate to take the slot.
    #[error("no active replacement candidate in the team of {reviewer_id}")]
    NoCandidate {
        /// Outgoing reviewer whose team was searched.
        reviewer_id: String,
    },

    /// Database or serialization failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result alias used throughout the domain.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// `EntityNotFound` for `entity` with `id`.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        Self::EntityNotFound { entity, id: id.into() }
    }

    /// `DuplicateEntity` for `entity` with `id`.
    pub fn duplicate(entity: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateEntity { entity, id: id.into() }
    }

    /// Whether this error is a not-found for the given entity kind.
    pub fn is_not_found(&self, kind: EntityKind) -> bool {
        matches!(self, Self::EntityNotFound { entity, .. } if *entity == kind)
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Storage(format!("serialization: {err}"))
    }
}
