//! HTTP routes
//!
//! Project CRUD over the SQLite store plus stateless render endpoints that
//! take a project body directly. YAML comes back as `text/yaml`, everything
//! else as JSON.

use crate::error::ApiError;
use crate::graph::build_graph;
use crate::health::{self, HealthResponse};
use crate::kubernetes::render_project_yaml;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use kubeforge_common::{
    is_blank, CreateProjectRequest, GraphFilter, GraphResponse, Project, ProjectSettings,
    ProjectState, ProjectSummary, UpdateProjectRequest,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const YAML_CONTENT_TYPE: &str = "text/yaml; charset=utf-8";

/// Build the application router with tracing and CORS layers attached
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    Router::new()
        .route("/api/health", get(health_check))
        .merge(project_routes())
        .merge(render_routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/projects/:id/yaml", get(project_yaml))
        .route("/api/projects/:id/graph", get(project_graph))
}

fn render_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/render/yaml", post(render_yaml))
        .route("/api/render/graph", post(render_graph))
}

/// Any origin when none are configured; unparseable origins are skipped
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    pub filter: Option<String>,
    pub namespace: Option<String>,
}

impl GraphQuery {
    fn filter(&self) -> Result<GraphFilter, ApiError> {
        Ok(self.filter.as_deref().unwrap_or_default().parse()?)
    }
}

fn yaml_response(yaml: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], yaml)
}

/// The record's name stands in when the stored settings carry none
fn settings_for(project: &Project, state: &ProjectState) -> ProjectSettings {
    let mut settings = state.settings.clone().unwrap_or_default();
    if is_blank(&settings.name) {
        settings.name = project.name.clone();
    }
    settings
}

// ============================================================================
// Health
// ============================================================================

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(health::check(&state.database).await)
}

// ============================================================================
// Projects
// ============================================================================

async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let projects = state.database.list_projects().await?;
    Ok(Json(projects))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, ApiError> {
    let project = state.database.get_project(id).await?;
    Ok(Json(project))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.database.create_project(&payload.name, &payload.data).await?;
    info!(project_id = project.id, name = %project.name, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let project = state.database.update_project(id, &payload.data).await?;
    info!(project_id = id, "Project updated");

    Ok(Json(project))
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.database.delete_project(id).await?;
    info!(project_id = id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn project_yaml(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state.database.get_project(id).await?;
    let project_state = project.state()?;
    let settings = settings_for(&project, &project_state);

    Ok(yaml_response(render_project_yaml(&project_state, Some(&settings))))
}

async fn project_graph(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<GraphQuery>,
) -> Result<Json<GraphResponse>, ApiError> {
    let filter = query.filter()?;
    let project = state.database.get_project(id).await?;
    let project_state = project.state()?;

    Ok(Json(build_graph(&project_state, filter, query.namespace.as_deref())))
}

// ============================================================================
// Stateless rendering
// ============================================================================

/// Body is a project state or an exported snapshot envelope
async fn render_yaml(body: String) -> Result<impl IntoResponse, ApiError> {
    let project_state = ProjectState::from_document(&body)?;
    Ok(yaml_response(render_project_yaml(&project_state, None)))
}

async fn render_graph(
    Query(query): Query<GraphQuery>,
    body: String,
) -> Result<Json<GraphResponse>, ApiError> {
    let filter = query.filter()?;
    let project_state = ProjectState::from_document(&body)?;

    Ok(Json(build_graph(&project_state, filter, query.namespace.as_deref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_query_filter() {
        let query = GraphQuery::default();
        assert_eq!(query.filter().unwrap(), GraphFilter::All);

        let query = GraphQuery {
            filter: Some("Deployments".to_string()),
            namespace: None,
        };
        assert_eq!(query.filter().unwrap(), GraphFilter::Deployments);

        let query = GraphQuery {
            filter: Some("pods".to_string()),
            namespace: None,
        };
        assert!(matches!(query.filter(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_settings_fall_back_to_record_name() {
        let project = Project {
            id: 1,
            name: "shop".to_string(),
            data: serde_json::Value::Null,
            created_at: String::new(),
            updated_at: String::new(),
        };

        let settings = settings_for(&project, &ProjectState::default());
        assert_eq!(settings.name, "shop");

        let named = ProjectState {
            settings: Some(ProjectSettings {
                name: "storefront".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(settings_for(&project, &named).name, "storefront");
    }
}
