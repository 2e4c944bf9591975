use sea_orm::DatabaseConnection;

use crate::config::Config;

/// Shared application state available to all request handlers via Axum's `State` extractor.
///
/// Constructed once at startup; the config is immutable and the database
/// connection is a clonable handle over the shared pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
}
