//! Pull request repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{PullRequest, Team};

/// Transform applied to a pull request inside an atomic read-modify-write.
///
/// Returning an error aborts the write; the error reaches the caller unchanged.
pub type PullRequestTransform<'a> =
    Box<dyn FnOnce(PullRequest) -> DomainResult<PullRequest> + Send + 'a>;

/// Like [`PullRequestTransform`], but also handed the team of a given user as
/// read inside the same isolation boundary (`None` if the user has no team).
pub type TeamSnapshotTransform<'a> =
    Box<dyn FnOnce(PullRequest, Option<Team>) -> DomainResult<PullRequest> + Send + 'a>;

/// Repository interface for PullRequest persistence.
#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    /// Insert a new pull request and return it as stored.
    ///
    /// Fails with `DuplicateEntity` when the identifier is taken.
    async fn create(&self, pull_request: &PullRequest) -> DomainResult<PullRequest>;

    /// Fails with `EntityNotFound` if absent.
    async fn get_by_id(&self, id: &str) -> DomainResult<PullRequest>;

    /// All pull requests where `user_id` is currently an assigned reviewer.
    async fn get_pull_requests_for_user(&self, user_id: &str) -> DomainResult<Vec<PullRequest>>;

    /// Load, transform, and write back one pull request atomically.
    ///
    /// At most one concurrent transform per identifier commits on top of a
    /// given state; the transform always sees the latest committed row.
    async fn update_with_transform<'a>(
        &self,
        id: &str,
        transform: PullRequestTransform<'a>,
    ) -> DomainResult<PullRequest>;

    /// Same guarantees as [`Self::update_with_transform`], with the team of
    /// `member_id` read in the same transaction as the pull request.
    async fn update_with_team_snapshot<'a>(
        &self,
        id: &str,
        member_id: &str,
        transform: TeamSnapshotTransform<'a>,
    ) -> DomainResult<PullRequest>;
}
