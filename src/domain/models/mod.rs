//! Domain models for the review roster.

/// Application configuration tree.
pub mod config;
pub mod pull_request;
pub mod team;
pub mod user;

pub use config::{
    Config, DatabaseConfig, LoggingConfig, ReviewerConfig, SamplingStrategy, ServerConfig,
};
pub use pull_request::{PullRequest, PullRequestStatus, MAX_REVIEWERS};
pub use team::{Team, TeamMember};
pub use user::User;
