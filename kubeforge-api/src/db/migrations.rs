//! Database migrations

use kubeforge_common::Result;
use sqlx::SqlitePool;

const MIGRATIONS: [(&str, &str); 2] = [
    ("001_create_projects_table", MIGRATION_001_CREATE_PROJECTS),
    ("002_index_projects_updated_at", MIGRATION_002_INDEX_UPDATED_AT),
];

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            executed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| kubeforge_common::Error::System(format!("Failed to create migrations table: {}", e)))?;

    for (name, sql) in MIGRATIONS {
        run_migration(pool, name, sql).await?;
    }

    Ok(())
}

async fn run_migration(pool: &SqlitePool, name: &str, sql: &str) -> Result<()> {
    use sqlx::Row;

    let row = sqlx::query("SELECT COUNT(*) as count FROM migrations WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|e| kubeforge_common::Error::System(format!("Migration check failed: {}", e)))?;

    let count: i64 = row.get("count");
    if count > 0 {
        tracing::debug!("Migration {} already applied", name);
        return Ok(());
    }

    tracing::info!("Running migration: {}", name);

    sqlx::query(sql)
        .execute(pool)
        .await
        .map_err(|e| kubeforge_common::Error::System(format!("Migration {} failed: {}", name, e)))?;

    sqlx::query("INSERT INTO migrations (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .map_err(|e| kubeforge_common::Error::System(format!("Failed to record migration: {}", e)))?;

    Ok(())
}

const MIGRATION_001_CREATE_PROJECTS: &str = "
CREATE TABLE projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const MIGRATION_002_INDEX_UPDATED_AT: &str =
    "CREATE INDEX idx_projects_updated_at ON projects(updated_at)";
