//! Project management commands against the API server

use crate::api::ApiClient;
use crate::commands::render::{emit_yaml, load_project, print_graph};
use crate::output::{self, OutputFormat};
use crate::ProjectCommands;
use anyhow::Result;
use kubeforge_common::{
    CreateProjectRequest, GraphFilter, GraphResponse, Project, ProjectState, ProjectSummary,
    UpdateProjectRequest,
};
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct ProjectRow {
    id: i64,
    name: String,
    created: String,
    updated: String,
}

impl From<ProjectSummary> for ProjectRow {
    fn from(project: ProjectSummary) -> Self {
        Self {
            id: project.id,
            name: output::truncate(&project.name, 40),
            created: output::format_relative_time(&project.created_at),
            updated: output::format_relative_time(&project.updated_at),
        }
    }
}

/// Project data to upload: the file's contents, or an empty project
fn project_data(file: Option<&Path>) -> Result<serde_json::Value> {
    let state = match file {
        Some(path) => load_project(path)?,
        None => ProjectState::default(),
    };
    Ok(serde_json::to_value(state)?)
}

pub async fn handle_project_command(
    command: ProjectCommands,
    api: &ApiClient,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ProjectCommands::List => {
            let projects: Vec<ProjectSummary> = api.get("/api/projects").await?;

            match format {
                OutputFormat::Table => {
                    let rows: Vec<ProjectRow> = projects.into_iter().map(ProjectRow::from).collect();
                    output::print_table(rows);
                }
                _ => output::print_single(&projects, format)?,
            }
        }

        ProjectCommands::Show { id } => {
            let project: Project = api.get(&format!("/api/projects/{}", id)).await?;

            if format != OutputFormat::Table {
                return output::print_single(&project, format);
            }

            println!("Project Details:");
            println!("  ID: {}", project.id);
            println!("  Name: {}", project.name);
            println!("  Created: {}", project.created_at);
            println!("  Updated: {} ({})", project.updated_at, output::format_relative_time(&project.updated_at));
            match project.state() {
                Ok(state) => println!("  Resources: {}", state.resource_count()),
                Err(e) => output::print_warning(&format!("Stored data cannot be parsed: {}", e)),
            }
        }

        ProjectCommands::Create { name, file } => {
            let request = CreateProjectRequest {
                name,
                data: project_data(file.as_deref())?,
            };
            let project: Project = api.post("/api/projects", &request).await?;
            output::print_created("Project", &project.name, &project.id.to_string());
        }

        ProjectCommands::Update { id, file } => {
            let request = UpdateProjectRequest {
                data: project_data(Some(&file))?,
            };
            let project: Project = api.put(&format!("/api/projects/{}", id), &request).await?;
            output::print_success(&format!("Project '{}' updated", project.name));
        }

        ProjectCommands::Delete { id } => {
            api.delete(&format!("/api/projects/{}", id)).await?;
            output::print_deleted("Project", &id.to_string());
        }

        ProjectCommands::Yaml { id, out } => {
            let yaml = api.get_text(&format!("/api/projects/{}/yaml", id)).await?;
            emit_yaml(&yaml, out.as_deref())?;
        }

        ProjectCommands::Graph { id, filter, namespace } => {
            // Reject unknown filters before the round trip
            let filter: GraphFilter = filter.parse()?;
            let mut query = vec![("filter", filter.as_str())];
            if let Some(namespace) = namespace.as_deref() {
                query.push(("namespace", namespace));
            }

            let graph: GraphResponse = api
                .get_query(&format!("/api/projects/{}/graph", id), &query)
                .await?;
            print_graph(&graph, format)?;
        }
    }

    Ok(())
}
