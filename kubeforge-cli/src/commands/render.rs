//! Local rendering of exported project files
//!
//! Works offline: the file is parsed and rendered in-process with the same
//! code the server uses.

use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use kubeforge_api::{build_graph, render_project_yaml};
use kubeforge_common::{GraphFilter, GraphResponse, ProjectState};
use std::path::{Path, PathBuf};
use tabled::Tabled;

#[derive(Tabled)]
struct NodeRow {
    id: String,
    #[tabled(rename = "type")]
    kind: String,
    namespace: String,
    status: String,
    sync: String,
}

/// Read a project file: a snapshot envelope or a bare project state
pub fn load_project(path: &Path) -> Result<ProjectState> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ProjectState::from_document(&raw)
        .with_context(|| format!("{} is not a kubeforge project", path.display()))
}

/// Print YAML to stdout, or into `out` when given
pub fn emit_yaml(yaml: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
            output::print_success(&format!("Manifests written to {}", path.display()));
        }
        None => print!("{}", yaml),
    }
    Ok(())
}

/// Nodes as a table; JSON and YAML print the full response with edges
pub fn print_graph(graph: &GraphResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<NodeRow> = graph
                .nodes
                .iter()
                .map(|node| NodeRow {
                    id: output::truncate(&node.id, 48),
                    kind: node.kind.to_string(),
                    namespace: node.namespace.clone(),
                    status: node.status.to_string(),
                    sync: node.sync_status.to_string(),
                })
                .collect();
            output::print_table(rows);
            if !graph.edges.is_empty() {
                output::print_info(&format!("{} edges", graph.edges.len()));
            }
            Ok(())
        }
        _ => output::print_single(graph, format),
    }
}

pub fn handle_render_command(file: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let project = load_project(&file)?;
    emit_yaml(&render_project_yaml(&project, None), out.as_deref())
}

pub fn handle_graph_command(
    file: PathBuf,
    filter: &str,
    namespace: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let filter: GraphFilter = filter.parse()?;
    let project = load_project(&file)?;
    print_graph(&build_graph(&project, filter, namespace), format)
}
