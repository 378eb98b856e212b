//! Shared application state handed to every handler

use crate::config::KubeforgeConfig;
use crate::db::Database;

pub struct AppState {
    pub database: Database,
    pub config: KubeforgeConfig,
}

impl AppState {
    pub fn new(database: Database, config: KubeforgeConfig) -> Self {
        Self { database, config }
    }
}
