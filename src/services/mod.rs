//! Service layer: orchestration over the domain ports.

pub mod pull_request_service;
pub mod reviewer_selection;
pub mod team_service;
pub mod user_service;

pub use pull_request_service::PullRequestService;
pub use reviewer_selection::{select_reviewers, ReviewerSelector};
pub use team_service::TeamService;
pub use user_service::UserService;
