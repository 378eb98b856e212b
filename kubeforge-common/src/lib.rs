//! Common types and utilities shared between kubeforge-api and kubeforge-cli
//!
//! Every record here is a plain value as the browser editor stores it: camelCase
//! JSON, every field optional on the wire, references to other resources held
//! by name only.

pub mod config_storage;
pub mod graph;
pub mod jobs;
pub mod namespace;
pub mod project;
pub mod rbac;
pub mod workload;

pub use config_storage::{ConfigMap, DockerHubSecret, Secret, SecretType};
pub use graph::{
    FlowNode, GraphEdge, GraphFilter, GraphResponse, NodeKind, NodeMetadata, NodeStatus,
    Position, ResourceCollection, ResourceSource, SyncStatus,
};
pub use jobs::{ConcurrencyPolicy, Job, JobType, RestartPolicy};
pub use namespace::{is_system_namespace, Namespace, SYSTEM_NAMESPACES};
pub use project::{
    blob_from_text, blob_to_text, CreateProjectRequest, Project, ProjectSettings, ProjectSnapshot,
    ProjectState, ProjectSummary, UpdateProjectRequest, PROJECT_SNAPSHOT_VERSION,
};
pub use rbac::{
    ClusterRole, PolicyRule, Role, RoleBinding, RoleRef, RoleRefKind, ServiceAccount, Subject,
    SubjectKind, RBAC_API_GROUP,
};
pub use workload::{
    ContainerSpec, EnvSource, EnvValueFrom, EnvVar, IngressConfig, IngressPath, IngressRule,
    IngressTls, ResourceQuantities, ResourceRequirements, ServiceType, Volume, VolumeMount,
    VolumeType, WorkloadConfig, WorkloadKind,
};

/// String/label map whose iteration order is the order keys were inserted.
pub type OrderedMap = indexmap::IndexMap<String, String>;

/// True when a form field was left empty or only holds whitespace
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// API error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Invalid project data: {0}")]
    InvalidProject(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("System error: {0}")]
    System(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
