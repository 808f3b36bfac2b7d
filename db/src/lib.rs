pub mod models;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use std::time::Duration;
use util::config::AppConfig;

/// Opens the connection pool described by the global [`AppConfig`].
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let config = AppConfig::global().clone();
    connect_with(&config).await
}

/// Opens a bounded connection pool for `config`.
///
/// SQLite DSNs get a single connection: an in-memory database is private to its
/// connection, and file databases serialize writers anyway.
pub async fn connect_with(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let url = config.database_url();
    let mut opts = ConnectOptions::new(url.clone());

    if let Some(path) = url.strip_prefix("sqlite://") {
        // SQLite won't create intermediate dirs.
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = Path::new(path).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    if url.starts_with("sqlite:") {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(config.db_max_connections);
    }

    opts.idle_timeout(Duration::from_millis(config.db_idle_timeout_ms))
        .connect_timeout(Duration::from_millis(config.db_connect_timeout_ms))
        .sqlx_logging(false);

    tracing::debug!(
        max_connections = config.db_max_connections,
        "Opening database pool"
    );
    Database::connect(opts).await
}
