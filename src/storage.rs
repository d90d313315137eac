use async_trait::async_trait;

use crate::auth::repo_types::User;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, username: &str, email: &str, password_hash: &str) -> anyhow::Result<()>;
    /// At most one row with exactly this username.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    /// At most one row with exactly this email, even when several share it.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// Overwrites the hash on every row with this email. Returns the number of rows touched.
    async fn update_password_by_email(&self, email: &str, password_hash: &str) -> anyhow::Result<u64>;
}
