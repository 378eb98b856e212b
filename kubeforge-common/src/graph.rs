//! Visual preview graph types
//!
//! A [`FlowNode`] is a rendering projection of one resource (or of a synthetic
//! part of one, such as a workload's Service or Pod). Nodes are recomputed from
//! the project on every request and never persisted.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Free-form display values attached to a node (replica counts, rule samples, ...)
pub type NodeMetadata = indexmap::IndexMap<String, serde_json::Value>;

/// Node kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Deployment,
    DaemonSet,
    Service,
    Pod,
    ConfigMap,
    Secret,
    Ingress,
    Namespace,
    External,
    ServiceAccount,
    Role,
    Job,
    CronJob,
    RoleBinding,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::DaemonSet => "daemonset",
            Self::Service => "service",
            Self::Pod => "pod",
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
            Self::Ingress => "ingress",
            Self::Namespace => "namespace",
            Self::External => "external",
            Self::ServiceAccount => "serviceaccount",
            Self::Role => "role",
            Self::Job => "job",
            Self::CronJob => "cronjob",
            Self::RoleBinding => "rolebinding",
        }
    }

    /// Display color class for the node box
    pub fn color(&self) -> &'static str {
        match self {
            Self::Deployment => "bg-blue-500",
            Self::DaemonSet => "bg-indigo-500",
            Self::Service => "bg-green-500",
            Self::Pod => "bg-sky-400",
            Self::ConfigMap => "bg-yellow-500",
            Self::Secret => "bg-red-500",
            Self::Ingress => "bg-purple-500",
            Self::Namespace => "bg-gray-500",
            Self::External => "bg-orange-500",
            Self::ServiceAccount => "bg-teal-500",
            Self::Role => "bg-pink-500",
            Self::Job => "bg-amber-600",
            Self::CronJob => "bg-lime-600",
            Self::RoleBinding => "bg-fuchsia-500",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heuristic health of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Healthy,
    Warning,
    Error,
    Pending,
    Syncing,
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Pending => write!(f, "pending"),
            Self::Syncing => write!(f, "syncing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    OutOfSync,
    Unknown,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Synced => write!(f, "synced"),
            Self::OutOfSync => write!(f, "outofsync"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Project collection a node was projected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceCollection {
    Deployments,
    Daemonsets,
    Namespaces,
    ConfigMaps,
    Secrets,
    DockerHubSecrets,
    ServiceAccounts,
    Roles,
    ClusterRoles,
    RoleBindings,
    Jobs,
}

/// Back-reference from a node to the resource it renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSource {
    pub collection: ResourceCollection,
    pub name: String,
    /// `None` for cluster-scoped resources
    pub namespace: Option<String>,
}

/// One box in the preview graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub namespace: String,
    pub status: NodeStatus,
    pub sync_status: SyncStatus,
    pub position: Position,
    /// Ids of the nodes this one is drawn connected from
    pub dependencies: Vec<String>,
    pub children: Vec<String>,
    pub metadata: NodeMetadata,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ResourceSource>,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind, namespace: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            namespace: namespace.into(),
            status: NodeStatus::Healthy,
            sync_status: SyncStatus::Synced,
            position: Position::default(),
            dependencies: Vec::new(),
            children: Vec::new(),
            metadata: NodeMetadata::new(),
            color: kind.color().to_string(),
            source: None,
        }
    }
}

/// Connector drawn between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    /// Set for edges ending at an external traffic node
    pub dashed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<GraphEdge>,
}

/// View restriction for the preview graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFilter {
    #[default]
    All,
    Deployments,
    Daemonsets,
    Namespaces,
    Configmaps,
    Secrets,
    Serviceaccounts,
    Roles,
    Rolebindings,
    Jobs,
}

impl GraphFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Deployments => "deployments",
            Self::Daemonsets => "daemonsets",
            Self::Namespaces => "namespaces",
            Self::Configmaps => "configmaps",
            Self::Secrets => "secrets",
            Self::Serviceaccounts => "serviceaccounts",
            Self::Roles => "roles",
            Self::Rolebindings => "rolebindings",
            Self::Jobs => "jobs",
        }
    }
}

impl std::fmt::Display for GraphFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphFilter {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "deployments" => Ok(Self::Deployments),
            "daemonsets" => Ok(Self::Daemonsets),
            "namespaces" => Ok(Self::Namespaces),
            "configmaps" => Ok(Self::Configmaps),
            "secrets" => Ok(Self::Secrets),
            "serviceaccounts" => Ok(Self::Serviceaccounts),
            "roles" => Ok(Self::Roles),
            "rolebindings" => Ok(Self::Rolebindings),
            "jobs" => Ok(Self::Jobs),
            other => Err(crate::Error::Validation(format!("unknown graph filter: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<GraphFilter>().unwrap(), GraphFilter::All);
        assert_eq!("".parse::<GraphFilter>().unwrap(), GraphFilter::All);
        assert_eq!("ConfigMaps".parse::<GraphFilter>().unwrap(), GraphFilter::Configmaps);
        assert!("pods".parse::<GraphFilter>().is_err());
    }

    #[test]
    fn test_node_wire_shape() {
        let node = FlowNode::new("deployment-default-web", "web", NodeKind::Deployment, "default");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "deployment");
        assert_eq!(value["syncStatus"], "synced");
        assert_eq!(value["color"], "bg-blue-500");
        assert!(value.get("source").is_none());
    }

    #[test]
    fn test_status_display_matches_wire() {
        for status in [NodeStatus::Healthy, NodeStatus::Warning, NodeStatus::Error] {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, status.to_string());
        }
        assert_eq!(
            serde_json::to_value(SyncStatus::OutOfSync).unwrap(),
            SyncStatus::OutOfSync.to_string()
        );
    }
}
