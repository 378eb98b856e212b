//! Health check
//!
//! The API is healthy when the project store answers a trivial query.

use crate::db::Database;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Serving, but the project store is unreachable
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
}

impl HealthResponse {
    pub fn new(status: HealthStatus) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub async fn check(db: &Database) -> HealthResponse {
    match sqlx::query("SELECT 1").execute(db.pool()).await {
        Ok(_) => HealthResponse::new(HealthStatus::Healthy),
        Err(e) => {
            tracing::warn!("Health check: database unreachable: {}", e);
            HealthResponse::new(HealthStatus::Degraded)
        }
    }
}
