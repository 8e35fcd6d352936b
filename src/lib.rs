//! Review Roster - pull request reviewer assignment
//!
//! Tracks teams, users, and pull requests, and assigns up to two reviewers to
//! each pull request from the author's team. Reviewers can be swapped for an
//! active teammate while the pull request is open; merging is terminal.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors, and the repository ports
//! - **Service Layer** (`services`): reviewer selection and the lifecycle operations
//! - **Adapters** (`adapters`): SQLite and in-memory storage, random sources, HTTP
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use review_roster::adapters::memory::InMemoryStore;
//! use review_roster::adapters::random::ThreadRandom;
//! use review_roster::domain::models::SamplingStrategy;
//! use review_roster::services::{PullRequestService, ReviewerSelector};
//!
//! let store = Arc::new(InMemoryStore::new());
//! let selector = ReviewerSelector::new(Arc::new(ThreadRandom), SamplingStrategy::default());
//! let service = PullRequestService::new(store.clone(), store.clone(), store, selector);
//! let pr = service.create("pr-1", "Add search", "u1").await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult, EntityKind, ValidationError, ValidationKind};
pub use domain::models::{
    Config, PullRequest, PullRequestStatus, SamplingStrategy, Team, TeamMember, User,
};
pub use domain::ports::{PullRequestRepository, RandomSource, TeamRepository, UserRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{PullRequestService, TeamService, UserService};
