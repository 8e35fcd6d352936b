//! SQLite implementation of the UserRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult, EntityKind};
use crate::domain::models::User;
use crate::domain::ports::UserRepository;

/// SQLite-backed [`UserRepository`].
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<User> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT user_id, username, team_name, is_active FROM users WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::from)
            .ok_or_else(|| DomainError::not_found(EntityKind::User, id))
    }

    async fn set_is_active(&self, id: &str, is_active: bool) -> DomainResult<User> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"UPDATE users SET is_active = ?
               WHERE user_id = ?
               RETURNING user_id, username, team_name, is_active"#,
        )
        .bind(is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::from)
            .ok_or_else(|| DomainError::not_found(EntityKind::User, id))
    }

    async fn upsert_users(&self, users: &[User]) -> DomainResult<()> {
        for user in users {
            user.validate()?;
        }

        let mut tx = self.pool.begin().await?;
        for user in users {
            sqlx::query(
                r#"INSERT INTO users (user_id, username, team_name, is_active)
                   VALUES (?, ?, ?, ?)
                   ON CONFLICT (user_id) DO UPDATE SET
                       username = excluded.username,
                       team_name = excluded.team_name,
                       is_active = excluded.is_active"#,
            )
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.team_name)
            .bind(user.is_active)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    user_id: String,
    username: String,
    team_name: Option<String>,
    is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.user_id,
            username: row.username,
            team_name: row.team_name,
            is_active: row.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup() -> SqliteUserRepository {
        SqliteUserRepository::new(create_migrated_test_pool().await.unwrap())
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_overwrites() {
        let repo = setup().await;
        repo.upsert_users(&[User::new("u1", "alice").with_team("core")])
            .await
            .unwrap();
        repo.upsert_users(&[User::new("u1", "Alice A.").with_team("infra").with_active(false)])
            .await
            .unwrap();

        let user = repo.get_by_id("u1").await.unwrap();
        assert_eq!(user.username, "Alice A.");
        assert_eq!(user.team_name.as_deref(), Some("infra"));
        assert!(!user.is_active);
    }

    #[tokio::test]
    async fn test_upsert_is_all_or_nothing() {
        let repo = setup().await;
        let err = repo
            .upsert_users(&[User::new("u1", "alice"), User::new("u2", "")])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(repo.get_by_id("u1").await.unwrap_err().is_not_found(EntityKind::User));
    }

    #[tokio::test]
    async fn test_set_is_active() {
        let repo = setup().await;
        repo.upsert_users(&[User::new("u1", "alice")]).await.unwrap();

        let user = repo.set_is_active("u1", false).await.unwrap();
        assert!(!user.is_active);

        let err = repo.set_is_active("ghost", false).await.unwrap_err();
        assert!(err.is_not_found(EntityKind::User));
    }
}
