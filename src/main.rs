use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod state;
mod storage;
mod views;

use crate::{auth::repo::PgUserStore, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "credential_service=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await;

    let addr = config.listen_addr()?;
    let state = AppState::from_parts(Arc::new(PgUserStore::new(pool)), Arc::new(config));
    app::serve(app::build_app(state), addr).await
}
