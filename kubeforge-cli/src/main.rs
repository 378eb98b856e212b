//! kubeforge CLI
//!
//! Manage projects on a kubeforge server and render exported project files
//! locally.

mod api;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// API server address [default: from ~/.config/kubeforge/cli.toml]
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects stored on the server
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Render a local project file to Kubernetes YAML
    Render {
        /// Project file (exported snapshot or raw project state)
        file: PathBuf,
        /// Write the manifests here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the resource graph of a local project file
    Graph {
        /// Project file (exported snapshot or raw project state)
        file: PathBuf,
        /// Resource kind to show (all, deployments, daemonsets, namespaces, ...)
        #[arg(short, long, default_value = "all")]
        filter: String,
        /// Restrict to one namespace
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Show or change CLI settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List all projects
    List,
    /// Show project details
    Show { id: i64 },
    /// Create a project, optionally from a project file
    Create {
        /// Project name
        #[arg(short, long)]
        name: String,
        /// Project file to upload
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Replace a project's data with a project file
    Update {
        id: i64,
        /// Project file to upload
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a project
    Delete { id: i64 },
    /// Print the project's Kubernetes YAML
    Yaml {
        id: i64,
        /// Write the manifests here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the project's resource graph
    Graph {
        id: i64,
        /// Resource kind to show (all, deployments, daemonsets, namespaces, ...)
        #[arg(short, long, default_value = "all")]
        filter: String,
        /// Restrict to one namespace
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current settings
    Show,
    /// Change a setting (server, output)
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let mut config = match config::Config::load() {
        Ok(config) => config,
        Err(e) => {
            output::print_warning(&format!("Ignoring CLI config: {}", e));
            config::Config::default()
        }
    };

    let server = cli.server.clone().unwrap_or_else(|| config.default_server.clone());
    let format = OutputFormat::parse(cli.output.as_deref().unwrap_or(&config.default_output));

    // Execute command
    match cli.command {
        Commands::Project { command } => {
            let api_client = api::ApiClient::new(&server);
            commands::project::handle_project_command(command, &api_client, format).await?
        }
        Commands::Render { file, out } => commands::render::handle_render_command(file, out)?,
        Commands::Graph {
            file,
            filter,
            namespace,
        } => commands::render::handle_graph_command(file, &filter, namespace.as_deref(), format)?,
        Commands::Config { command } => {
            commands::config::handle_config_command(command, &mut config)?
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kubeforge", "project", "graph", "7", "--filter", "roles", "-o", "json",
        ])
        .unwrap();

        assert_eq!(cli.output.as_deref(), Some("json"));
        match cli.command {
            Commands::Project {
                command: ProjectCommands::Graph { id, filter, namespace },
            } => {
                assert_eq!(id, 7);
                assert_eq!(filter, "roles");
                assert!(namespace.is_none());
            }
            _ => panic!("expected project graph"),
        }
    }
}
