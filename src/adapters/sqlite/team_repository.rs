//! SQLite implementation of the TeamRepository.

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

use crate::adapters::sqlite::is_unique_violation;
use crate::domain::errors::{DomainError, DomainResult, EntityKind};
use crate::domain::models::{Team, TeamMember};
use crate::domain::ports::TeamRepository;

/// SQLite-backed [`TeamRepository`].
#[derive(Clone)]
pub struct SqliteTeamRepository {
    pool: SqlitePool,
}

impl SqliteTeamRepository {
    /// Repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Load a team and its member projection on a given connection, so the pull
/// request repository can read it inside its own transaction.
pub(crate) async fn load_team(conn: &mut SqliteConnection, name: &str) -> DomainResult<Team> {
    let exists: Option<(String,)> = sqlx::query_as("SELECT team_name FROM teams WHERE team_name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
    if exists.is_none() {
        return Err(DomainError::not_found(EntityKind::Team, name));
    }

    let members: Vec<MemberRow> = sqlx::query_as(
        "SELECT user_id, username, is_active FROM users WHERE team_name = ? ORDER BY user_id",
    )
    .bind(name)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Team {
        name: name.to_string(),
        members: members.into_iter().map(TeamMember::from).collect(),
    })
}

/// The team name a user is affiliated with.
pub(crate) async fn team_name_of(conn: &mut SqliteConnection, user_id: &str) -> DomainResult<String> {
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT team_name FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        None => Err(DomainError::not_found(EntityKind::User, user_id)),
        Some((None,)) => Err(DomainError::not_found(EntityKind::Team, format!("team of {user_id}"))),
        Some((Some(team_name),)) => Ok(team_name),
    }
}

#[async_trait]
impl TeamRepository for SqliteTeamRepository {
    async fn team_exists(&self, name: &str) -> DomainResult<bool> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM teams WHERE team_name = ?)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create_team(&self, team: &Team) -> DomainResult<Team> {
        team.validate()?;

        match sqlx::query("INSERT INTO teams (team_name) VALUES (?)")
            .bind(&team.name)
            .execute(&self.pool)
            .await
        {
            Ok(_) => Ok(team.clone()),
            Err(err) if is_unique_violation(&err) => Err(DomainError::duplicate(EntityKind::Team, &team.name)),
            Err(err) => Err(err.into()),
        }
    }

    async fn get_team_by_name(&self, name: &str) -> DomainResult<Team> {
        let mut conn = self.pool.acquire().await?;
        load_team(&mut conn, name).await
    }

    async fn get_team_for_user(&self, user_id: &str) -> DomainResult<Team> {
        let mut conn = self.pool.acquire().await?;
        let team_name = team_name_of(&mut conn, user_id).await?;
        load_team(&mut conn, &team_name).await
    }

    async fn delete_team(&self, name: &str) -> DomainResult<()> {
        sqlx::query("DELETE FROM teams WHERE team_name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    user_id: String,
    username: String,
    is_active: bool,
}

impl From<MemberRow> for TeamMember {
    fn from(row: MemberRow) -> Self {
        Self::new(row.user_id, row.username, row.is_active)
    }
}
