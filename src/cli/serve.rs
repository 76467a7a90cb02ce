//! Serve command - run the HTTP API

use smish_sentinel::config::AppConfig;
use smish_sentinel::web::{start_server, AppState};
use std::sync::Arc;
use tracing::info;

pub async fn run(config: &AppConfig, listen: Option<String>) -> anyhow::Result<()> {
    let db = super::open_database(config)?;

    let retention = config.storage.retention_days;
    if retention > 0 {
        let removed = db.purge_older_than(retention)?;
        info!("Retention: {} days ({} expired assessments removed)", retention, removed);
    }

    let state = Arc::new(AppState::from_config(config, db)?);
    info!(
        "Default engine: {} (AI {})",
        state.default_engine,
        if state.remote.is_some() { "enabled" } else { "disabled" }
    );

    let listen = listen.unwrap_or_else(|| config.server.listen.clone());
    start_server(&listen, state).await
}
