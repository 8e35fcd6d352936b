//! Wiring from configuration to services.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::http::AppState;
use crate::adapters::random::ThreadRandom;
use crate::adapters::sqlite::{initialize_database, PoolConfig, SqliteRepositories};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{PullRequestService, ReviewerSelector, TeamService, UserService};

/// Load configuration from an explicit file or the project hierarchy.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Services over the configured SQLite database.
pub struct AppContext {
    /// Configuration the context was opened with.
    pub config: Config,
    /// Team service.
    pub teams: TeamService,
    /// User service.
    pub users: UserService,
    /// Pull request service.
    pub pull_requests: PullRequestService,
}

impl AppContext {
    /// Open the database named in `config` and wire the services over it.
    pub async fn open(config: Config) -> Result<Self> {
        let url = config.database.url();
        let pool_config = PoolConfig {
            max_connections: config.database.max_connections,
            ..PoolConfig::default()
        };
        let pool = initialize_database(&url, Some(pool_config)).await.with_context(|| {
            format!(
                "Failed to open database at {}. Run 'review-roster init' first.",
                config.database.path
            )
        })?;

        let repos = SqliteRepositories::new(pool);
        let users = Arc::new(repos.users);
        let teams = Arc::new(repos.teams);
        let pull_requests = Arc::new(repos.pull_requests);
        let selector = ReviewerSelector::new(Arc::new(ThreadRandom), config.reviewers.sampling);

        Ok(Self {
            teams: TeamService::new(teams.clone(), users.clone()),
            users: UserService::new(users.clone()),
            pull_requests: PullRequestService::new(pull_requests, users, teams, selector),
            config,
        })
    }

    /// Hand the services to the HTTP layer.
    pub fn into_http_state(self) -> (AppState, Config) {
        let state = AppState {
            teams: self.teams,
            users: self.users,
            pull_requests: self.pull_requests,
        };
        (state, self.config)
    }
}
