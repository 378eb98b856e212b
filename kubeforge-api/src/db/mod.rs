//! Project store on SQLite
//!
//! Each project is one row holding an opaque JSON blob. The store never looks
//! inside the blob; parsing happens where the YAML and graph are produced.

pub mod migrations;

use crate::log_db_operation;
use kubeforge_common::{blob_from_text, blob_to_text, is_blank, Project, ProjectSummary, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating when missing) the database at `database_url`
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| kubeforge_common::Error::System(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    kubeforge_common::Error::System(format!("Failed to create DB directory: {}", e))
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| kubeforge_common::Error::System(format!("Database connection failed: {}", e)))?;

        tracing::info!("Database connection established");

        Ok(Self { pool })
    }

    /// Private in-memory database on a single connection, already migrated
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| kubeforge_common::Error::System(format!("Database connection failed: {}", e)))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub async fn migrate(&self) -> Result<()> {
        migrations::run_migrations(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        projects::list_projects(&self.pool).await
    }

    pub async fn get_project(&self, id: i64) -> Result<Project> {
        projects::get_project(&self.pool, id).await
    }

    pub async fn create_project(&self, name: &str, data: &serde_json::Value) -> Result<Project> {
        projects::create_project(&self.pool, name, data).await
    }

    pub async fn update_project(&self, id: i64, data: &serde_json::Value) -> Result<Project> {
        projects::update_project(&self.pool, id, data).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<()> {
        projects::delete_project(&self.pool, id).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}

/// Project table operations
pub mod projects {
    use super::*;

    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    fn db_error(action: &str, e: sqlx::Error) -> kubeforge_common::Error {
        kubeforge_common::Error::System(format!("Failed to {}: {}", action, e))
    }

    pub async fn list_projects(pool: &SqlitePool) -> Result<Vec<ProjectSummary>> {
        log_db_operation!("list", "projects");

        let rows = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM projects ORDER BY updated_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("list projects", e))?;

        Ok(rows
            .iter()
            .map(|row| ProjectSummary {
                id: row.get("id"),
                name: row.get("name"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            })
            .collect())
    }

    pub async fn get_project(pool: &SqlitePool, id: i64) -> Result<Project> {
        log_db_operation!("get", "projects", id);

        let row = sqlx::query("SELECT id, name, data, created_at, updated_at FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("load project", e))?;

        row.map(|r| row_to_project(&r))
            .ok_or(kubeforge_common::Error::ProjectNotFound(id))
    }

    pub async fn create_project(pool: &SqlitePool, name: &str, data: &serde_json::Value) -> Result<Project> {
        if is_blank(name) {
            return Err(kubeforge_common::Error::Validation(
                "Project name cannot be empty".to_string(),
            ));
        }
        log_db_operation!("create", "projects");

        let timestamp = now();
        let result = sqlx::query(
            "INSERT INTO projects (name, data, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name.trim())
        .bind(blob_to_text(data))
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(pool)
        .await
        .map_err(|e| db_error("create project", e))?;

        get_project(pool, result.last_insert_rowid()).await
    }

    /// Replace the blob; last write wins
    pub async fn update_project(pool: &SqlitePool, id: i64, data: &serde_json::Value) -> Result<Project> {
        log_db_operation!("update", "projects", id);

        let result = sqlx::query("UPDATE projects SET data = ?, updated_at = ? WHERE id = ?")
            .bind(blob_to_text(data))
            .bind(now())
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| db_error("update project", e))?;

        if result.rows_affected() == 0 {
            return Err(kubeforge_common::Error::ProjectNotFound(id));
        }

        get_project(pool, id).await
    }

    pub async fn delete_project(pool: &SqlitePool, id: i64) -> Result<()> {
        log_db_operation!("delete", "projects", id);

        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| db_error("delete project", e))?;

        if result.rows_affected() == 0 {
            return Err(kubeforge_common::Error::ProjectNotFound(id));
        }

        Ok(())
    }

    fn row_to_project(row: &SqliteRow) -> Project {
        let data: String = row.get("data");
        Project {
            id: row.get("id"),
            name: row.get("name"),
            data: blob_from_text(&data),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeforge_common::Error;
    use serde_json::json;

    #[tokio::test]
    async fn test_project_crud() {
        let db = Database::in_memory().await.unwrap();

        let created = db
            .create_project("shop", &json!({"deployments": []}))
            .await
            .unwrap();
        assert_eq!(created.name, "shop");
        assert_eq!(created.data, json!({"deployments": []}));

        let updated = db
            .update_project(created.id, &json!({"deployments": [{"appName": "web"}]}))
            .await
            .unwrap();
        assert_eq!(updated.data["deployments"][0]["appName"], "web");
        assert_eq!(updated.created_at, created.created_at);

        let listed = db.list_projects().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);

        db.delete_project(created.id).await.unwrap();
        assert!(matches!(
            db.get_project(created.id).await,
            Err(Error::ProjectNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_string_blob_reads_back_as_submitted() {
        let db = Database::in_memory().await.unwrap();
        let raw = r#"{"namespaces":[{"name":"team-a"}]}"#;

        let created = db.create_project("raw", &json!(raw)).await.unwrap();
        let project = db.get_project(created.id).await.unwrap();
        assert_eq!(project.data, json!(raw));
        assert_eq!(project.state().unwrap().namespaces[0].name, "team-a");

        let number_like = db.update_project(created.id, &json!("42")).await.unwrap();
        assert_eq!(number_like.data, json!("42"));
    }

    #[tokio::test]
    async fn test_missing_project_errors() {
        let db = Database::in_memory().await.unwrap();
        assert!(matches!(
            db.update_project(42, &json!({})).await,
            Err(Error::ProjectNotFound(42))
        ));
        assert!(matches!(db.delete_project(42).await, Err(Error::ProjectNotFound(42))));
        assert!(matches!(
            db.create_project("  ", &json!({})).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let row = sqlx::query("SELECT COUNT(*) as count FROM migrations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let count: i64 = row.get("count");
        assert_eq!(count, 2);
    }
}
