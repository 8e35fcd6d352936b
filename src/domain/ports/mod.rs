//! Port trait definitions (Hexagonal Architecture)
//!
//! Async interfaces the storage adapters implement, and the randomness seam
//! used by reviewer selection.

pub mod pull_request_repository;
pub mod random_source;
pub mod team_repository;
pub mod user_repository;

pub use pull_request_repository::{
    PullRequestRepository, PullRequestTransform, TeamSnapshotTransform,
};
pub use random_source::RandomSource;
pub use team_repository::TeamRepository;
pub use user_repository::UserRepository;
