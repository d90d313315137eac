use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::config::DatabaseConfig;

fn connect_options(cfg: &DatabaseConfig) -> anyhow::Result<PgConnectOptions> {
    if let Some(url) = &cfg.url {
        return url
            .parse::<PgConnectOptions>()
            .context("parse DATABASE_URL");
    }

    let mut opts = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .database(&cfg.name);
    if !cfg.password.is_empty() {
        opts = opts.password(&cfg.password);
    }
    Ok(opts)
}

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_with(connect_options(cfg)?)
        .await
        .context("connect to database")?;
    tracing::info!(host = %cfg.host, database = %cfg.name, "database pool ready");
    Ok(db)
}

pub async fn migrate(db: &PgPool) {
    if let Err(e) = sqlx::migrate!("./migrations").run(db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }
}
