//! HTTP surface for the review roster.
//!
//! Exposes team, user, and pull request operations as JSON endpoints. Domain
//! errors map onto a fixed set of status codes and error codes; see
//! [`error_response`].

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::domain::models::ServerConfig;
use crate::services::{PullRequestService, TeamService, UserService};

pub use handlers::{
    error_response, CreatePullRequestRequest, ErrorBody, ErrorResponse, MergePullRequestRequest,
    ReassignRequest, ReassignResponse, SetIsActiveRequest, UserReviewsResponse,
};

/// Services shared by every handler.
pub struct AppState {
    /// Team creation and lookup.
    pub teams: TeamService,
    /// User activation and lookup.
    pub users: UserService,
    /// Pull request lifecycle.
    pub pull_requests: PullRequestService,
}

/// Build the router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/team/add", post(handlers::add_team))
        .route("/team/get", get(handlers::get_team))
        .route("/users/setIsActive", post(handlers::set_is_active))
        .route("/users/getReview", get(handlers::get_review))
        .route("/pullRequest/create", post(handlers::create_pull_request))
        .route("/pullRequest/merge", post(handlers::merge_pull_request))
        .route("/pullRequest/reassign", post(handlers::reassign_reviewer))
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds the API router to the configured address.
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Server for `state`, listening where `config` says.
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.config.host, self.config.port).parse()
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr()?;
        let app = router(self.state);

        tracing::info!("review roster listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
        tracing::info!("review roster stopped");
        Ok(())
    }
}
