use sqlx::FromRow;

/// Row of the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String, // argon2 PHC string, never plaintext
}
