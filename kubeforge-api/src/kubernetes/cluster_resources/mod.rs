//! Namespace and RBAC manifests

pub mod namespaces;
pub mod rbac;

pub use namespaces::{namespace_manifest, render_namespace_yaml, render_namespaces_yaml};
pub use rbac::{
    cluster_role_manifest, render_cluster_role_yaml, render_cluster_roles_yaml,
    render_role_binding_yaml, render_role_bindings_yaml, render_role_yaml, render_roles_yaml,
    render_service_account_yaml, render_service_accounts_yaml, role_binding_manifest,
    role_manifest, service_account_manifest,
};
