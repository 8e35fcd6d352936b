//! SQLite implementation of the PullRequestRepository.
//!
//! Read-modify-write operations run in a transaction that first touches the
//! target row. The touch takes SQLite's write lock before anything is read, so
//! the transform always sees the latest committed state and competing writers
//! wait on the busy timeout instead of working from a stale snapshot.

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::adapters::sqlite::team_repository::{load_team, team_name_of};
use crate::adapters::sqlite::{is_unique_violation, parse_datetime, parse_optional_datetime};
use crate::domain::errors::{DomainError, DomainResult, EntityKind};
use crate::domain::models::{PullRequest, PullRequestStatus};
use crate::domain::ports::{PullRequestRepository, PullRequestTransform, TeamSnapshotTransform};

const COLUMNS: &str =
    "pull_request_id, pull_request_name, author_id, status, assigned_reviewers, created_at, merged_at";

/// SQLite-backed [`PullRequestRepository`].
#[derive(Clone)]
pub struct SqlitePullRequestRepository {
    pool: SqlitePool,
}

impl SqlitePullRequestRepository {
    /// Repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Take the write lock on `id` and read it back. `EntityNotFound` if absent.
async fn lock_and_load(conn: &mut SqliteConnection, id: &str) -> DomainResult<PullRequest> {
    let touched = sqlx::query("UPDATE pull_requests SET pull_request_id = pull_request_id WHERE pull_request_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if touched.rows_affected() == 0 {
        return Err(DomainError::not_found(EntityKind::PullRequest, id));
    }

    let row: PullRequestRow = sqlx::query_as(&format!("SELECT {COLUMNS} FROM pull_requests WHERE pull_request_id = ?"))
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    row.try_into()
}

/// Write the mutable columns back. Creation time and author never change.
async fn write_back(conn: &mut SqliteConnection, id: &str, pr: &PullRequest) -> DomainResult<()> {
    pr.validate()?;
    if pr.id != id {
        return Err(DomainError::Storage(format!(
            "transform changed pull request id from {id} to {}",
            pr.id
        )));
    }

    sqlx::query(
        r#"UPDATE pull_requests
           SET pull_request_name = ?, status = ?, assigned_reviewers = ?, merged_at = ?
           WHERE pull_request_id = ?"#,
    )
    .bind(&pr.title)
    .bind(pr.status.as_str())
    .bind(serde_json::to_string(&pr.assigned_reviewers)?)
    .bind(pr.merged_at.map(|dt| dt.to_rfc3339()))
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[async_trait]
impl PullRequestRepository for SqlitePullRequestRepository {
    async fn create(&self, pull_request: &PullRequest) -> DomainResult<PullRequest> {
        pull_request.validate()?;
        let reviewers_json = serde_json::to_string(&pull_request.assigned_reviewers)?;

        let inserted = sqlx::query_as::<_, PullRequestRow>(&format!(
            r#"INSERT INTO pull_requests
                   (pull_request_id, pull_request_name, author_id, status, assigned_reviewers, created_at, merged_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               RETURNING {COLUMNS}"#
        ))
        .bind(&pull_request.id)
        .bind(&pull_request.title)
        .bind(&pull_request.author_id)
        .bind(pull_request.status.as_str())
        .bind(&reviewers_json)
        .bind(pull_request.created_at.to_rfc3339())
        .bind(pull_request.merged_at.map(|dt| dt.to_rfc3339()))
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => row.try_into(),
            Err(err) if is_unique_violation(&err) => {
                Err(DomainError::duplicate(EntityKind::PullRequest, &pull_request.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_by_id(&self, id: &str) -> DomainResult<PullRequest> {
        let row: Option<PullRequestRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM pull_requests WHERE pull_request_id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into)
            .transpose()?
            .ok_or_else(|| DomainError::not_found(EntityKind::PullRequest, id))
    }

    async fn get_pull_requests_for_user(&self, user_id: &str) -> DomainResult<Vec<PullRequest>> {
        let rows: Vec<PullRequestRow> = sqlx::query_as(&format!(
            r#"SELECT {COLUMNS} FROM pull_requests
               WHERE EXISTS (
                   SELECT 1 FROM json_each(pull_requests.assigned_reviewers) WHERE json_each.value = ?
               )
               ORDER BY created_at, pull_request_id"#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update_with_transform<'a>(
        &self,
        id: &str,
        transform: PullRequestTransform<'a>,
    ) -> DomainResult<PullRequest> {
        let mut tx = self.pool.begin().await?;
        let current = lock_and_load(&mut tx, id).await?;

        let updated = match transform(current) {
            Ok(pr) => pr,
            Err(err) => {
                debug!(pull_request_id = id, error = %err, "transform rejected, rolling back");
                tx.rollback().await?;
                return Err(err);
            }
        };

        write_back(&mut tx, id, &updated).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn update_with_team_snapshot<'a>(
        &self,
        id: &str,
        member_id: &str,
        transform: TeamSnapshotTransform<'a>,
    ) -> DomainResult<PullRequest> {
        let mut tx = self.pool.begin().await?;
        let current = lock_and_load(&mut tx, id).await?;

        let team = match team_name_of(&mut tx, member_id).await {
            Ok(team_name) => match load_team(&mut tx, &team_name).await {
                Ok(team) => Some(team),
                Err(DomainError::EntityNotFound { .. }) => None,
                Err(err) => return Err(err),
            },
            Err(DomainError::EntityNotFound { .. }) => None,
            Err(err) => return Err(err),
        };

        let updated = match transform(current, team) {
            Ok(pr) => pr,
            Err(err) => {
                debug!(pull_request_id = id, member_id, error = %err, "transform rejected, rolling back");
                tx.rollback().await?;
                return Err(err);
            }
        };

        write_back(&mut tx, id, &updated).await?;
        tx.commit().await?;
        Ok(updated)
    }
}

#[derive(sqlx::FromRow)]
struct PullRequestRow {
    pull_request_id: String,
    pull_request_name: String,
    author_id: String,
    status: String,
    assigned_reviewers: String,
    created_at: String,
    merged_at: Option<String>,
}

impl TryFrom<PullRequestRow> for PullRequest {
    type Error = DomainError;

    fn try_from(row: PullRequestRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: PullRequestStatus::parse(&row.status)?,
            assigned_reviewers: serde_json::from_str(&row.assigned_reviewers)?,
            created_at: parse_datetime(&row.created_at)?,
            merged_at: parse_optional_datetime(row.merged_at)?,
            id: row.pull_request_id,
            title: row.pull_request_name,
            author_id: row.author_id,
        })
    }
}
