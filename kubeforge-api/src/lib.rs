//! kubeforge API library
//!
//! Turns editor project state into Kubernetes manifests and a positioned
//! resource graph, and serves both over HTTP next to a SQLite project store.

// Core modules
pub mod config;
pub mod error;

// Manifest generation
pub mod yaml;
pub mod kubernetes;

// Resource graph
pub mod graph;

// Persistence
pub mod db;

// HTTP server
pub mod health;
pub mod routes;
pub mod shutdown;
pub mod state;

// Logging configuration
pub mod logging;

pub use config::KubeforgeConfig;
pub use db::Database;
pub use error::ApiError;
pub use graph::{build_graph, build_resource_graph, graph_edges, render_node_yaml};
pub use kubernetes::render_project_yaml;
pub use routes::router;
pub use state::AppState;
