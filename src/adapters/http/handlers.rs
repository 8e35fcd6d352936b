//! Request handlers and the domain error mapping.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::errors::{DomainError, EntityKind};
use crate::domain::models::{PullRequest, Team, User};

/// Error payload: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code and human-readable message.
    pub error: ErrorBody,
}

/// Body of an error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `PR_MERGED`.
    pub code: String,
    /// Human-readable detail.
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: message.into(),
            },
        }),
    )
}

/// Map a domain error onto its HTTP status and error code.
pub fn error_response(err: DomainError) -> ApiError {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", message),
        DomainError::DuplicateEntity {
            entity: EntityKind::PullRequest,
            ..
        } => api_error(StatusCode::CONFLICT, "PR_EXISTS", message),
        DomainError::DuplicateEntity { .. } => api_error(StatusCode::BAD_REQUEST, "TEAM_EXISTS", message),
        DomainError::AlreadyMerged(_) => api_error(StatusCode::CONFLICT, "PR_MERGED", message),
        DomainError::ReviewerNotAssigned { .. } => api_error(StatusCode::CONFLICT, "NOT_ASSIGNED", message),
        DomainError::NoCandidate { .. } => api_error(StatusCode::CONFLICT, "NO_CANDIDATE", message),
        DomainError::EntityNotFound { .. } => api_error(StatusCode::NOT_FOUND, "NOT_FOUND", message),
        DomainError::Storage(_) => {
            tracing::error!(error = %message, "request failed on storage");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
        }
    }
}

fn rejected_body(rejection: JsonRejection) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", rejection.body_text())
}

fn rejected_query(rejection: QueryRejection) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", rejection.body_text())
}

/// Query for `GET /team/get`.
#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    /// Team to look up.
    pub team_name: String,
}

/// Query for `GET /users/getReview`.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    /// User whose review queue to list.
    pub user_id: String,
}

/// Body of `POST /users/setIsActive`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetIsActiveRequest {
    /// User to update.
    pub user_id: String,
    /// New activity flag.
    pub is_active: bool,
}

/// Pull requests a user currently reviews.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserReviewsResponse {
    /// The user asked about.
    pub user_id: String,
    /// Pull requests with the user among the reviewers.
    pub pull_requests: Vec<PullRequest>,
}

/// Body of `POST /pullRequest/create`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePullRequestRequest {
    /// Caller-chosen unique id.
    pub pull_request_id: String,
    /// Title of the pull request.
    pub pull_request_name: String,
    /// User opening the pull request.
    pub author_id: String,
}

/// Body of `POST /pullRequest/merge`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MergePullRequestRequest {
    /// Pull request to merge.
    pub pull_request_id: String,
}

/// Body of `POST /pullRequest/reassign`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReassignRequest {
    /// Pull request to update.
    pub pull_request_id: String,
    /// Reviewer to replace.
    pub old_reviewer_id: String,
}

/// Result of a reassignment.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReassignResponse {
    /// The pull request after the swap.
    pub pr: PullRequest,
    /// Id of the reviewer who took the slot.
    pub replaced_by: String,
}

pub(super) async fn health_check() -> &'static str {
    "OK"
}

pub(super) async fn add_team(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Team>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let Json(team) = payload.map_err(rejected_body)?;
    let created = state.teams.add_team(&team).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn get_team(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> ApiResult<Json<Team>> {
    let Query(query) = query.map_err(rejected_query)?;
    let team = state.teams.get_by_name(&query.team_name).await.map_err(error_response)?;
    Ok(Json(team))
}

pub(super) async fn set_is_active(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(req) = payload.map_err(rejected_body)?;
    let user = state
        .users
        .set_is_active(&req.user_id, req.is_active)
        .await
        .map_err(error_response)?;
    Ok(Json(user))
}

pub(super) async fn get_review(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<UserReviewsResponse>> {
    let Query(query) = query.map_err(rejected_query)?;
    let pull_requests = state
        .pull_requests
        .reviews_for(&query.user_id)
        .await
        .map_err(error_response)?;
    Ok(Json(UserReviewsResponse {
        user_id: query.user_id,
        pull_requests,
    }))
}

pub(super) async fn create_pull_request(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePullRequestRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PullRequest>)> {
    let Json(req) = payload.map_err(rejected_body)?;
    let created = state
        .pull_requests
        .create(&req.pull_request_id, &req.pull_request_name, &req.author_id)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn merge_pull_request(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MergePullRequestRequest>, JsonRejection>,
) -> ApiResult<Json<PullRequest>> {
    let Json(req) = payload.map_err(rejected_body)?;
    let merged = state
        .pull_requests
        .merge(&req.pull_request_id)
        .await
        .map_err(error_response)?;
    Ok(Json(merged))
}

pub(super) async fn reassign_reviewer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> ApiResult<Json<ReassignResponse>> {
    let Json(req) = payload.map_err(rejected_body)?;
    let (pr, replaced_by) = state
        .pull_requests
        .reassign_reviewer(&req.pull_request_id, &req.old_reviewer_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ReassignResponse { pr, replaced_by }))
}
