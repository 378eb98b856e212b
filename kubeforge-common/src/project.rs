//! Project state, persisted project records and the versioned snapshot envelope

use crate::config_storage::{ConfigMap, DockerHubSecret, Secret};
use crate::jobs::Job;
use crate::namespace::Namespace;
use crate::rbac::{ClusterRole, Role, RoleBinding, ServiceAccount};
use crate::workload::WorkloadConfig;
use crate::OrderedMap;
use serde::{Deserialize, Serialize};

/// Current version tag written into every [`ProjectSnapshot`]
pub const PROJECT_SNAPSHOT_VERSION: u32 = 1;

/// Project-level settings applied to every rendered resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    pub name: String,
    pub description: String,
    /// Labels merged underneath each resource's own labels
    pub global_labels: OrderedMap,
}

/// Every resource collection of a project, as stored in the `data` blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectState {
    #[serde(alias = "projectSettings", skip_serializing_if = "Option::is_none")]
    pub settings: Option<ProjectSettings>,
    pub deployments: Vec<WorkloadConfig>,
    pub daemonsets: Vec<WorkloadConfig>,
    pub namespaces: Vec<Namespace>,
    #[serde(alias = "configmaps")]
    pub config_maps: Vec<ConfigMap>,
    pub secrets: Vec<Secret>,
    pub docker_hub_secrets: Vec<DockerHubSecret>,
    pub service_accounts: Vec<ServiceAccount>,
    pub roles: Vec<Role>,
    pub cluster_roles: Vec<ClusterRole>,
    pub role_bindings: Vec<RoleBinding>,
    pub jobs: Vec<Job>,
}

impl ProjectState {
    /// False for a fresh project: at most the implicit `default` namespace and
    /// nothing else configured.
    pub fn has_meaningful_resources(&self) -> bool {
        self.namespaces.len() > 1
            || !self.deployments.is_empty()
            || !self.daemonsets.is_empty()
            || !self.config_maps.is_empty()
            || !self.secrets.is_empty()
            || !self.docker_hub_secrets.is_empty()
            || !self.service_accounts.is_empty()
            || !self.roles.is_empty()
            || !self.cluster_roles.is_empty()
            || !self.role_bindings.is_empty()
            || !self.jobs.is_empty()
    }

    /// Total number of configured resources across all collections
    pub fn resource_count(&self) -> usize {
        self.deployments.len()
            + self.daemonsets.len()
            + self.namespaces.len()
            + self.config_maps.len()
            + self.secrets.len()
            + self.docker_hub_secrets.len()
            + self.service_accounts.len()
            + self.roles.len()
            + self.cluster_roles.len()
            + self.role_bindings.len()
            + self.jobs.len()
    }

    /// Parse a persisted blob. Accepts either a JSON object or a JSON string
    /// holding the object (the browser client stringifies before upload).
    pub fn from_blob(blob: &serde_json::Value) -> crate::Result<Self> {
        match blob {
            serde_json::Value::String(raw) => serde_json::from_str(raw)
                .map_err(|e| crate::Error::InvalidProject(e.to_string())),
            serde_json::Value::Object(_) => serde_json::from_value(blob.clone())
                .map_err(|e| crate::Error::InvalidProject(e.to_string())),
            serde_json::Value::Null => Ok(Self::default()),
            other => Err(crate::Error::InvalidProject(format!(
                "expected an object, got {}",
                json_type_name(other)
            ))),
        }
    }
}

impl ProjectState {
    /// Parse an exported project file: a snapshot envelope or a bare state object
    pub fn from_document(raw: &str) -> crate::Result<Self> {
        if let Some(snapshot) = ProjectSnapshot::from_json(raw) {
            return Ok(snapshot.project);
        }
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_blob(&value)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Versioned envelope used for local autosave and file export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub version: u32,
    pub saved_at: String,
    pub project: ProjectState,
}

impl ProjectSnapshot {
    pub fn new(project: ProjectState) -> Self {
        Self {
            version: PROJECT_SNAPSHOT_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            project,
        }
    }

    /// Load a snapshot; a version mismatch is treated as no snapshot at all
    pub fn from_json(raw: &str) -> Option<Self> {
        let snapshot: Self = serde_json::from_str(raw).ok()?;
        (snapshot.version == PROJECT_SNAPSHOT_VERSION).then_some(snapshot)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Persisted project record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    /// Opaque project blob, stored verbatim
    pub data: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    pub fn state(&self) -> crate::Result<ProjectState> {
        ProjectState::from_blob(&self.data)
    }
}

/// Project listing entry (no blob)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    pub data: serde_json::Value,
}

/// Encode a blob for storage as JSON text, so it reads back exactly as submitted
pub fn blob_to_text(data: &serde_json::Value) -> String {
    data.to_string()
}

/// Decode a stored blob; text that is not JSON comes back as a string value
pub fn blob_from_text(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}
