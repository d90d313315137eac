use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the discrete fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            host: or("DB_HOST", "localhost"),
            port: parse_or(&lookup, "DB_PORT", 5432)?,
            user: or("DB_USER", "postgres"),
            password: or("DB_PASSWORD", ""),
            name: or("DB_NAME", "postgres"),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
        };

        Ok(Self {
            database,
            host: or("APP_HOST", "0.0.0.0"),
            port: parse_or(&lookup, "PORT", 3000)?,
            static_dir: PathBuf::from(or("STATIC_DIR", "public")),
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        None => Ok(default),
    }
}
