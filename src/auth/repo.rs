use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::User;
use crate::storage::UserStore;

/// `UserStore` backed by the Postgres `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, username: &str, email: &str, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (username, email, password)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, email, password
            FROM users
            WHERE username = $1
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, email, password
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_password_by_email(&self, email: &str, password_hash: &str) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password = $1
            WHERE email = $2
            "#,
        )
        .bind(password_hash)
        .bind(email)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }
}
