//! RBAC manifests
//!
//! ServiceAccounts, Roles, ClusterRoles, RoleBindings and ClusterRoleBindings.

use crate::kubernetes::labels::{merge_labels, namespace_or_default, object_meta, placeholder};
use crate::kubernetes::render_manifests;
use crate::yaml::{render, Mapping, YamlValue};
use kubeforge_common::{
    is_blank, ClusterRole, OrderedMap, PolicyRule, ProjectSettings, Role, RoleBinding,
    ServiceAccount, Subject, RBAC_API_GROUP,
};

const RBAC_API_VERSION: &str = "rbac.authorization.k8s.io/v1";

fn name_refs(names: &[String]) -> YamlValue {
    names
        .iter()
        .filter(|n| !is_blank(n))
        .map(|n| Mapping::new().insert("name", n))
        .collect()
}

// ============================================================================
// ServiceAccounts
// ============================================================================

pub fn service_account_manifest(
    account: &ServiceAccount,
    settings: Option<&ProjectSettings>,
) -> Option<Mapping> {
    if is_blank(&account.name) {
        return None;
    }
    let labels = merge_labels(settings, &account.labels, None);

    Some(
        Mapping::new()
            .insert("apiVersion", "v1")
            .insert("kind", "ServiceAccount")
            .insert(
                "metadata",
                object_meta(
                    &account.name,
                    Some(namespace_or_default(&account.namespace)),
                    &labels,
                    &account.annotations,
                ),
            )
            .insert_nonempty("secrets", name_refs(&account.secrets))
            .insert_nonempty("imagePullSecrets", name_refs(&account.image_pull_secrets))
            .insert_opt(
                "automountServiceAccountToken",
                account.automount_service_account_token,
            ),
    )
}

pub fn render_service_account_yaml(account: &ServiceAccount, settings: Option<&ProjectSettings>) -> String {
    match service_account_manifest(account, settings) {
        Some(manifest) => render(&manifest.into(), 0),
        None => placeholder("ServiceAccount"),
    }
}

pub fn render_service_accounts_yaml(
    accounts: &[ServiceAccount],
    settings: Option<&ProjectSettings>,
) -> String {
    render_manifests(accounts.iter().filter_map(|a| service_account_manifest(a, settings)))
}

// ============================================================================
// Roles and ClusterRoles
// ============================================================================

fn rule_entries(rules: &[PolicyRule]) -> YamlValue {
    rules
        .iter()
        .map(|rule| {
            Mapping::new()
                .insert("apiGroups", rule.api_groups.as_slice())
                .insert("resources", rule.resources.as_slice())
                .insert("verbs", rule.verbs.as_slice())
                .insert_nonempty("resourceNames", rule.resource_names.as_slice())
        })
        .collect()
}

fn rbac_object(kind: &str, metadata: Mapping, rules: &[PolicyRule]) -> Mapping {
    Mapping::new()
        .insert("apiVersion", RBAC_API_VERSION)
        .insert("kind", kind)
        .insert("metadata", metadata)
        .insert("rules", rule_entries(rules))
}

pub fn role_manifest(role: &Role, settings: Option<&ProjectSettings>) -> Option<Mapping> {
    if is_blank(&role.name) {
        return None;
    }
    let labels = merge_labels(settings, &role.labels, None);
    let metadata = object_meta(
        &role.name,
        Some(namespace_or_default(&role.namespace)),
        &labels,
        &role.annotations,
    );
    Some(rbac_object("Role", metadata, &role.rules))
}

/// ClusterRole metadata carries no `namespace` key at all
pub fn cluster_role_manifest(role: &ClusterRole, settings: Option<&ProjectSettings>) -> Option<Mapping> {
    if is_blank(&role.name) {
        return None;
    }
    let labels = merge_labels(settings, &role.labels, None);
    let metadata = object_meta(&role.name, None, &labels, &role.annotations);
    Some(rbac_object("ClusterRole", metadata, &role.rules))
}

pub fn render_role_yaml(role: &Role, settings: Option<&ProjectSettings>) -> String {
    match role_manifest(role, settings) {
        Some(manifest) => render(&manifest.into(), 0),
        None => placeholder("Role"),
    }
}

pub fn render_roles_yaml(roles: &[Role], settings: Option<&ProjectSettings>) -> String {
    render_manifests(roles.iter().filter_map(|r| role_manifest(r, settings)))
}

pub fn render_cluster_role_yaml(role: &ClusterRole, settings: Option<&ProjectSettings>) -> String {
    match cluster_role_manifest(role, settings) {
        Some(manifest) => render(&manifest.into(), 0),
        None => placeholder("ClusterRole"),
    }
}

pub fn render_cluster_roles_yaml(roles: &[ClusterRole], settings: Option<&ProjectSettings>) -> String {
    render_manifests(roles.iter().filter_map(|r| cluster_role_manifest(r, settings)))
}

// ============================================================================
// RoleBindings and ClusterRoleBindings
// ============================================================================

fn subject_entry(subject: &Subject) -> Mapping {
    Mapping::new()
        .insert("kind", subject.kind.as_str())
        .insert("name", &subject.name)
        .insert_opt(
            "namespace",
            subject.namespace.as_deref().filter(|ns| !is_blank(ns)),
        )
        .insert_opt(
            "apiGroup",
            subject.api_group.as_deref().filter(|g| !is_blank(g)),
        )
}

/// RoleBinding, or ClusterRoleBinding when the binding is cluster-scoped
pub fn role_binding_manifest(binding: &RoleBinding) -> Option<Mapping> {
    if is_blank(&binding.name) {
        return None;
    }

    let api_group = if is_blank(&binding.role_ref.api_group) {
        RBAC_API_GROUP
    } else {
        binding.role_ref.api_group.as_str()
    };

    Some(
        Mapping::new()
            .insert("apiVersion", RBAC_API_VERSION)
            .insert("kind", binding.kind())
            .insert(
                "metadata",
                object_meta(
                    &binding.name,
                    binding.effective_namespace(),
                    &binding.labels,
                    &binding.annotations,
                ),
            )
            .insert(
                "subjects",
                binding.subjects.iter().map(subject_entry).collect::<YamlValue>(),
            )
            .insert(
                "roleRef",
                Mapping::new()
                    .insert("apiGroup", api_group)
                    .insert("kind", binding.role_ref.kind.as_str())
                    .insert("name", &binding.role_ref.name),
            ),
    )
}

pub fn render_role_binding_yaml(binding: &RoleBinding) -> String {
    match role_binding_manifest(binding) {
        Some(manifest) => render(&manifest.into(), 0),
        None if binding.is_cluster_role_binding => placeholder("ClusterRoleBinding"),
        None => placeholder("RoleBinding"),
    }
}

pub fn render_role_bindings_yaml(bindings: &[RoleBinding]) -> String {
    render_manifests(bindings.iter().filter_map(role_binding_manifest))
}

/// Copy of a binding carrying the project-wide labels
pub(crate) fn binding_with_project_labels(
    binding: &RoleBinding,
    settings: Option<&ProjectSettings>,
) -> RoleBinding {
    let labels: OrderedMap = merge_labels(settings, &binding.labels, None);
    RoleBinding {
        labels,
        ..binding.clone()
    }
}
