//! Per-kind node projections
//!
//! Each constructor fills in identity, status, metadata and the back-reference
//! to the project collection. Positions are assigned by the builder.

use super::status::{pod_status, service_status, Validate};
use crate::kubernetes::labels::namespace_or_default;
use crate::kubernetes::networking::ingress_name;
use kubeforge_common::{
    is_blank, ClusterRole, ConfigMap, DockerHubSecret, FlowNode, Job, Namespace, NodeKind,
    NodeStatus, PolicyRule, ResourceCollection, ResourceSource, Role, RoleBinding, RoleRefKind,
    Secret, SecretType, ServiceAccount, ServiceType, SubjectKind, SyncStatus, WorkloadConfig,
    WorkloadKind,
};
use serde_json::Value;

/// Namespace label of cluster-scoped nodes
pub const CLUSTER_WIDE: &str = "cluster-wide";

/// Example values shown per rule field on a role node
const RULE_SAMPLE_LIMIT: usize = 3;

pub fn node_id(kind: NodeKind, namespace: &str, name: &str) -> String {
    format!("{}-{}-{}", kind.as_str(), namespace, name)
}

pub fn cluster_role_id(name: &str) -> String {
    format!("clusterrole-{}", name)
}

pub fn cluster_role_binding_id(name: &str) -> String {
    format!("clusterrolebinding-{}", name)
}

pub fn namespace_id(name: &str) -> String {
    format!("namespace-{}", name)
}

fn source(collection: ResourceCollection, name: &str, namespace: Option<&str>) -> Option<ResourceSource> {
    Some(ResourceSource {
        collection,
        name: name.to_string(),
        namespace: namespace.map(str::to_string),
    })
}

fn set_status(node: &mut FlowNode, (status, sync_status): (NodeStatus, SyncStatus)) {
    node.status = status;
    node.sync_status = sync_status;
}

fn meta(node: &mut FlowNode, key: &str, value: impl Into<Value>) {
    node.metadata.insert(key.to_string(), value.into());
}

// ============================================================================
// Workloads and their derived nodes
// ============================================================================

pub fn workload_node(config: &WorkloadConfig, kind: WorkloadKind) -> FlowNode {
    let namespace = namespace_or_default(&config.namespace);
    let (node_kind, collection) = match kind {
        WorkloadKind::Deployment => (NodeKind::Deployment, ResourceCollection::Deployments),
        WorkloadKind::DaemonSet => (NodeKind::DaemonSet, ResourceCollection::Daemonsets),
    };

    let mut node = FlowNode::new(
        node_id(node_kind, namespace, &config.app_name),
        &config.app_name,
        node_kind,
        namespace,
    );
    set_status(&mut node, config.validity().status());

    let containers = config.effective_containers();
    if kind == WorkloadKind::Deployment {
        meta(&mut node, "replicas", config.replicas);
    }
    meta(&mut node, "containers", containers.len());
    meta(
        &mut node,
        "images",
        containers
            .iter()
            .filter(|c| !is_blank(&c.image))
            .map(|c| c.image.clone())
            .collect::<Vec<_>>(),
    );
    meta(&mut node, "port", config.port);
    meta(&mut node, "targetPort", config.target_port);

    if let Some(account) = config.service_account.as_deref().filter(|a| !is_blank(a)) {
        meta(&mut node, "serviceAccount", account);
        node.dependencies
            .push(node_id(NodeKind::ServiceAccount, namespace, account));
    }

    node.source = source(collection, &config.app_name, Some(namespace));
    node
}

pub fn service_node(config: &WorkloadConfig, owner: &FlowNode) -> FlowNode {
    let mut node = FlowNode::new(
        format!("{}-service", owner.id),
        config.service_name(),
        NodeKind::Service,
        &owner.namespace,
    );
    set_status(&mut node, service_status(config));

    meta(&mut node, "serviceType", config.service_type.as_str());
    meta(&mut node, "port", config.port);
    meta(&mut node, "targetPort", config.target_port);
    if config.service_type == ServiceType::NodePort {
        if let Some(node_port) = config.node_port {
            meta(&mut node, "nodePort", node_port);
        }
    }

    node.dependencies.push(owner.id.clone());
    node.source = owner.source.clone();
    node
}

pub fn pod_node(config: &WorkloadConfig, kind: WorkloadKind, owner: &FlowNode) -> FlowNode {
    let mut node = FlowNode::new(
        format!("{}-pod", owner.id),
        format!("{}-pod", config.app_name),
        NodeKind::Pod,
        &owner.namespace,
    );
    set_status(&mut node, pod_status(config));

    if kind == WorkloadKind::Deployment {
        meta(&mut node, "replicas", config.replicas);
        if config.replicas > 1 {
            meta(&mut node, "badge", format!("×{}", config.replicas));
        }
    }
    meta(&mut node, "containers", config.effective_containers().len());

    node.dependencies.push(owner.id.clone());
    node.source = owner.source.clone();
    node
}

pub fn ingress_node(config: &WorkloadConfig, owner: &FlowNode, service: &FlowNode) -> FlowNode {
    let mut node = FlowNode::new(
        format!("{}-ingress", owner.id),
        ingress_name(config),
        NodeKind::Ingress,
        &owner.namespace,
    );
    set_status(&mut node, service_status(config));

    let hosts: Vec<&str> = config
        .ingress
        .rules
        .iter()
        .map(|r| r.host.as_str())
        .filter(|h| !is_blank(h))
        .collect();
    meta(&mut node, "hosts", hosts);
    meta(&mut node, "rules", config.ingress.rules.len());
    meta(&mut node, "tls", !config.ingress.tls.is_empty());
    if let Some(class_name) = config.ingress.class_name.as_deref().filter(|c| !is_blank(c)) {
        meta(&mut node, "className", class_name);
    }

    node.dependencies.push(service.id.clone());
    node.source = owner.source.clone();
    node
}

/// Terminal node standing for traffic entering through an Ingress
pub fn external_node(owner: &FlowNode, ingress: &FlowNode) -> FlowNode {
    let mut node = FlowNode::new(
        format!("{}-external", owner.id),
        "External Traffic",
        NodeKind::External,
        &owner.namespace,
    );
    node.dependencies.push(ingress.id.clone());
    node.source = owner.source.clone();
    node
}

// ============================================================================
// Configuration and storage
// ============================================================================

pub fn config_map_node(config_map: &ConfigMap) -> FlowNode {
    let namespace = namespace_or_default(&config_map.namespace);
    let mut node = FlowNode::new(
        node_id(NodeKind::ConfigMap, namespace, &config_map.name),
        &config_map.name,
        NodeKind::ConfigMap,
        namespace,
    );
    set_status(&mut node, config_map.validity().status());
    meta(&mut node, "keys", config_map.data.len());
    node.source = source(ResourceCollection::ConfigMaps, &config_map.name, Some(namespace));
    node
}

pub fn secret_node(secret: &Secret) -> FlowNode {
    let namespace = namespace_or_default(&secret.namespace);
    let mut node = FlowNode::new(
        node_id(NodeKind::Secret, namespace, &secret.name),
        &secret.name,
        NodeKind::Secret,
        namespace,
    );
    set_status(&mut node, secret.validity().status());
    meta(&mut node, "keys", secret.data.len());
    meta(&mut node, "secretType", secret.secret_type.as_str());
    node.source = source(ResourceCollection::Secrets, &secret.name, Some(namespace));
    node
}

/// DockerHub credentials share the Secret id space so workloads resolve them by name
pub fn docker_hub_secret_node(secret: &DockerHubSecret) -> FlowNode {
    let namespace = namespace_or_default(&secret.namespace);
    let mut node = FlowNode::new(
        node_id(NodeKind::Secret, namespace, &secret.name),
        &secret.name,
        NodeKind::Secret,
        namespace,
    );
    set_status(&mut node, secret.validity().status());
    meta(&mut node, "secretType", SecretType::DockerConfigJson.as_str());
    meta(&mut node, "server", secret.server.as_str());
    if !is_blank(&secret.username) {
        meta(&mut node, "username", secret.username.as_str());
    }
    node.source = source(ResourceCollection::DockerHubSecrets, &secret.name, Some(namespace));
    node
}

// ============================================================================
// RBAC
// ============================================================================

pub fn service_account_node(account: &ServiceAccount) -> FlowNode {
    let namespace = namespace_or_default(&account.namespace);
    let mut node = FlowNode::new(
        node_id(NodeKind::ServiceAccount, namespace, &account.name),
        &account.name,
        NodeKind::ServiceAccount,
        namespace,
    );
    set_status(&mut node, account.validity().status());
    meta(&mut node, "secrets", account.secrets.len());
    meta(&mut node, "imagePullSecrets", account.image_pull_secrets.len());
    if let Some(automount) = account.automount_service_account_token {
        meta(&mut node, "automountToken", automount);
    }
    node.source = source(ResourceCollection::ServiceAccounts, &account.name, Some(namespace));
    node
}

/// Secret drawn under a ServiceAccount that lists it.
///
/// `resolved` points at the matching project secret when there is one;
/// unresolved attachments stay pending.
pub fn attached_secret_node(
    account: &FlowNode,
    secret_name: &str,
    image_pull: bool,
    resolved: Option<ResourceSource>,
) -> FlowNode {
    let usage = if image_pull { "imagePullSecret" } else { "secret" };
    let mut node = FlowNode::new(
        format!("{}-{}-{}", account.id, usage.to_lowercase(), secret_name),
        secret_name,
        NodeKind::Secret,
        &account.namespace,
    );
    if resolved.is_none() {
        set_status(&mut node, (NodeStatus::Pending, SyncStatus::Unknown));
    }
    meta(&mut node, "attachedTo", account.name.as_str());
    meta(&mut node, "usage", usage);
    node.source = resolved;
    node
}

/// Up to [`RULE_SAMPLE_LIMIT`] distinct values, in first-seen order
fn samples<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut picked: Vec<String> = Vec::new();
    for value in values {
        if picked.len() == RULE_SAMPLE_LIMIT {
            break;
        }
        let shown = if value.is_empty() { "core" } else { value.as_str() };
        if !picked.iter().any(|p| p == shown) {
            picked.push(shown.to_string());
        }
    }
    picked
}

fn rule_metadata(node: &mut FlowNode, rules: &[PolicyRule]) {
    meta(node, "rules", rules.len());
    meta(node, "apiGroups", samples(rules.iter().flat_map(|r| r.api_groups.iter())));
    meta(node, "resources", samples(rules.iter().flat_map(|r| r.resources.iter())));
    meta(node, "verbs", samples(rules.iter().flat_map(|r| r.verbs.iter())));
}

pub fn role_node(role: &Role) -> FlowNode {
    let namespace = namespace_or_default(&role.namespace);
    let mut node = FlowNode::new(
        node_id(NodeKind::Role, namespace, &role.name),
        &role.name,
        NodeKind::Role,
        namespace,
    );
    set_status(&mut node, role.validity().status());
    rule_metadata(&mut node, &role.rules);
    node.source = source(ResourceCollection::Roles, &role.name, Some(namespace));
    node
}

pub fn cluster_role_node(role: &ClusterRole) -> FlowNode {
    let mut node = FlowNode::new(cluster_role_id(&role.name), &role.name, NodeKind::Role, CLUSTER_WIDE);
    set_status(&mut node, role.validity().status());
    rule_metadata(&mut node, &role.rules);
    meta(&mut node, "clusterScoped", true);
    node.source = source(ResourceCollection::ClusterRoles, &role.name, None);
    node
}

/// RoleBinding or ClusterRoleBinding node, drawn from its role and bound ServiceAccounts
pub fn role_binding_node(binding: &RoleBinding) -> FlowNode {
    let namespace = binding.effective_namespace().unwrap_or("default");
    let (id, shown_namespace) = if binding.is_cluster_role_binding {
        (cluster_role_binding_id(&binding.name), CLUSTER_WIDE)
    } else {
        (node_id(NodeKind::RoleBinding, namespace, &binding.name), namespace)
    };

    let mut node = FlowNode::new(id, &binding.name, NodeKind::RoleBinding, shown_namespace);
    set_status(&mut node, binding.validity().status());
    meta(
        &mut node,
        "roleRef",
        format!("{}/{}", binding.role_ref.kind.as_str(), binding.role_ref.name),
    );
    meta(&mut node, "subjects", binding.subjects.len());
    meta(&mut node, "clusterScoped", binding.is_cluster_role_binding);

    if !is_blank(&binding.role_ref.name) {
        node.dependencies.push(match binding.role_ref.kind {
            RoleRefKind::Role => node_id(NodeKind::Role, namespace, &binding.role_ref.name),
            RoleRefKind::ClusterRole => cluster_role_id(&binding.role_ref.name),
        });
    }
    for subject in &binding.subjects {
        if subject.kind != SubjectKind::ServiceAccount || is_blank(&subject.name) {
            continue;
        }
        let subject_namespace = subject
            .namespace
            .as_deref()
            .filter(|ns| !is_blank(ns))
            .unwrap_or(namespace);
        node.dependencies.push(node_id(
            NodeKind::ServiceAccount,
            subject_namespace,
            &subject.name,
        ));
    }

    node.source = source(
        ResourceCollection::RoleBindings,
        &binding.name,
        binding.effective_namespace(),
    );
    node
}

// ============================================================================
// Jobs and namespaces
// ============================================================================

pub fn job_node(job: &Job) -> FlowNode {
    let namespace = namespace_or_default(&job.namespace);
    let kind = if job.is_cron() { NodeKind::CronJob } else { NodeKind::Job };
    let mut node = FlowNode::new(node_id(kind, namespace, &job.name), &job.name, kind, namespace);
    set_status(&mut node, job.validity().status());

    meta(&mut node, "containers", job.containers.len());
    if job.is_cron() {
        meta(&mut node, "schedule", job.schedule.as_str());
        meta(&mut node, "suspended", job.suspend);
    }
    if let Some(completions) = job.completions.filter(|c| *c > 0) {
        meta(&mut node, "completions", completions);
    }
    if let Some(parallelism) = job.parallelism.filter(|p| *p > 0) {
        meta(&mut node, "parallelism", parallelism);
    }
    meta(&mut node, "restartPolicy", job.restart_policy.as_str());

    node.source = source(ResourceCollection::Jobs, &job.name, Some(namespace));
    node
}

/// Namespace node; `declared` is false for namespaces only implied by their resources
pub fn namespace_node(namespace: &Namespace, resources: usize, declared: bool) -> FlowNode {
    let mut node = FlowNode::new(
        namespace_id(&namespace.name),
        &namespace.name,
        NodeKind::Namespace,
        &namespace.name,
    );
    set_status(&mut node, namespace.validity().status());
    meta(&mut node, "resources", resources);
    meta(&mut node, "system", namespace.is_system());
    meta(&mut node, "declared", declared);
    if let Some(created_at) = namespace.created_at.as_deref() {
        meta(&mut node, "createdAt", created_at);
    }
    if declared {
        node.source = source(ResourceCollection::Namespaces, &namespace.name, None);
    }
    node
}
