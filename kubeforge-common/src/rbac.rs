//! RBAC types: ServiceAccounts, Roles, ClusterRoles and their bindings

use crate::{is_blank, OrderedMap};
use serde::{Deserialize, Serialize};

/// API group shared by every RBAC object and role reference
pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

/// ServiceAccount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceAccount {
    pub name: String,
    pub namespace: String,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,
    /// Names of mountable Secrets
    pub secrets: Vec<String>,
    /// Names of registry credential Secrets
    pub image_pull_secrets: Vec<String>,
    pub automount_service_account_token: Option<bool>,
}

impl Default for ServiceAccount {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: "default".to_string(),
            labels: OrderedMap::new(),
            annotations: OrderedMap::new(),
            secrets: Vec::new(),
            image_pull_secrets: Vec::new(),
            automount_service_account_token: None,
        }
    }
}

/// Policy rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyRule {
    pub api_groups: Vec<String>,
    pub resources: Vec<String>,
    pub verbs: Vec<String>,
    pub resource_names: Vec<String>,
}

impl PolicyRule {
    /// A rule grants something only once it names a resource and a verb
    pub fn is_complete(&self) -> bool {
        self.resources.iter().any(|r| !is_blank(r)) && self.verbs.iter().any(|v| !is_blank(v))
    }
}

/// Namespaced Role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub name: String,
    pub namespace: String,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,
    pub rules: Vec<PolicyRule>,
}

impl Default for Role {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: "default".to_string(),
            labels: OrderedMap::new(),
            annotations: OrderedMap::new(),
            rules: Vec::new(),
        }
    }
}

/// Cluster-scoped ClusterRole
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterRole {
    pub name: String,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,
    pub rules: Vec<PolicyRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SubjectKind {
    User,
    Group,
    #[default]
    ServiceAccount,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Group => "Group",
            Self::ServiceAccount => "ServiceAccount",
        }
    }
}

/// Subject (user, group, or service account)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subject {
    pub kind: SubjectKind,
    pub name: String,
    pub namespace: Option<String>,
    pub api_group: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoleRefKind {
    #[default]
    Role,
    ClusterRole,
}

impl RoleRefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "Role",
            Self::ClusterRole => "ClusterRole",
        }
    }
}

/// Role reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleRef {
    pub kind: RoleRefKind,
    pub name: String,
    pub api_group: String,
}

impl Default for RoleRef {
    fn default() -> Self {
        Self {
            kind: RoleRefKind::Role,
            name: String::new(),
            api_group: RBAC_API_GROUP.to_string(),
        }
    }
}

/// RoleBinding, or ClusterRoleBinding when `is_cluster_role_binding` is set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleBinding {
    pub name: String,
    pub namespace: Option<String>,
    pub is_cluster_role_binding: bool,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,
    pub subjects: Vec<Subject>,
    pub role_ref: RoleRef,
}

impl RoleBinding {
    pub fn kind(&self) -> &'static str {
        if self.is_cluster_role_binding {
            "ClusterRoleBinding"
        } else {
            "RoleBinding"
        }
    }

    /// Namespace the binding lives in; `None` for ClusterRoleBindings
    pub fn effective_namespace(&self) -> Option<&str> {
        if self.is_cluster_role_binding {
            return None;
        }
        self.namespace.as_deref().filter(|ns| !is_blank(ns))
    }
}
