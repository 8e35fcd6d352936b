//! Common test utilities for integration tests
//!
//! Builds the service stack over either storage backend so scenarios can run
//! against both with identical assertions.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use review_roster::adapters::memory::InMemoryStore;
use review_roster::adapters::random::ScriptedRandom;
use review_roster::adapters::sqlite::{create_migrated_test_pool, initialize_database, PoolConfig, SqliteRepositories};
use review_roster::domain::models::{SamplingStrategy, Team, TeamMember};
use review_roster::domain::ports::{PullRequestRepository, RandomSource, TeamRepository, UserRepository};
use review_roster::services::{PullRequestService, ReviewerSelector, TeamService, UserService};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Services plus raw repository handles for seeding exact states.
pub struct Harness {
    pub backend: &'static str,
    pub teams: TeamService,
    pub users: UserService,
    pub pull_requests: PullRequestService,
    pub pr_repo: Arc<dyn PullRequestRepository>,
    pub team_repo: Arc<dyn TeamRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

fn build(
    backend: &'static str,
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    pull_requests: Arc<dyn PullRequestRepository>,
    random: Arc<dyn RandomSource>,
    strategy: SamplingStrategy,
) -> Harness {
    let selector = ReviewerSelector::new(random, strategy);
    Harness {
        backend,
        teams: TeamService::new(teams.clone(), users.clone()),
        users: UserService::new(users.clone()),
        pull_requests: PullRequestService::new(pull_requests.clone(), users.clone(), teams.clone(), selector),
        pr_repo: pull_requests,
        team_repo: teams,
        user_repo: users,
    }
}

pub fn memory_harness(random: Arc<dyn RandomSource>, strategy: SamplingStrategy) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    build("memory", store.clone(), store.clone(), store, random, strategy)
}

pub fn sqlite_harness(pool: SqlitePool, random: Arc<dyn RandomSource>, strategy: SamplingStrategy) -> Harness {
    let repos = SqliteRepositories::new(pool);
    build(
        "sqlite",
        Arc::new(repos.users),
        Arc::new(repos.teams),
        Arc::new(repos.pull_requests),
        random,
        strategy,
    )
}

/// One harness per backend, each with its own scripted random source.
pub async fn all_harnesses(script: &[usize], strategy: SamplingStrategy) -> Vec<Harness> {
    let pool = create_migrated_test_pool().await.expect("failed to create test database");
    vec![
        memory_harness(Arc::new(ScriptedRandom::new(script.to_vec())), strategy),
        sqlite_harness(pool, Arc::new(ScriptedRandom::new(script.to_vec())), strategy),
    ]
}

/// Create a temporary test database file
///
/// Returns the directory guard and a pool over a migrated database inside it.
/// File databases let several pooled connections contend for the write lock.
pub async fn file_db(max_connections: u32) -> (TempDir, PathBuf, SqlitePool) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("roster.db");
    let url = format!("sqlite:{}", db_path.display());
    let pool = initialize_database(
        &url,
        Some(PoolConfig {
            max_connections,
            ..PoolConfig::default()
        }),
    )
    .await
    .expect("failed to initialize file database");
    (dir, db_path, pool)
}

/// A team from `(user_id, username, is_active)` triples.
pub fn team(name: &str, members: &[(&str, &str, bool)]) -> Team {
    members.iter().fold(Team::new(name), |team, (id, username, active)| {
        team.with_member(TeamMember::new(*id, *username, *active))
    })
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
