//! CLI command handlers

pub mod chat;
pub mod history;
pub mod normalize;
pub mod scan;
pub mod serve;

use anyhow::Context;
use smish_sentinel::config::AppConfig;
use smish_sentinel::db::Database;

/// Open the configured history database
pub fn open_database(config: &AppConfig) -> anyhow::Result<Database> {
    let path = config.storage.resolved_db_path();
    Database::open(&path).with_context(|| format!("failed to open {}", path.display()))
}
