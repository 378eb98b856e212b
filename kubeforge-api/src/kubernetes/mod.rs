//! Kubernetes manifest assembly
//!
//! Each resource kind is shaped into an ordered [`Mapping`] following the
//! conventional field order (`apiVersion`, `kind`, `metadata`, then the body)
//! and rendered through the YAML emitter. Resources without a name are left
//! out of multi-resource output and render as a placeholder comment on their
//! own.

pub mod cluster_resources;
pub mod config_storage;
pub mod labels;
pub mod networking;
pub mod project;
pub mod workloads;

pub use cluster_resources::{
    render_cluster_role_yaml, render_cluster_roles_yaml, render_namespace_yaml,
    render_namespaces_yaml, render_role_binding_yaml, render_role_bindings_yaml, render_role_yaml,
    render_roles_yaml, render_service_account_yaml, render_service_accounts_yaml,
};
pub use config_storage::{
    render_configmap_yaml, render_configmaps_yaml, render_dockerhub_secret_yaml,
    render_dockerhub_secrets_yaml, render_secret_yaml, render_secrets_yaml,
};
pub use project::{render_project_yaml, WELCOME_MESSAGE};
pub use workloads::{
    render_cron_jobs_yaml, render_daemonset_yaml, render_daemonsets_yaml, render_deployment_yaml,
    render_deployments_yaml, render_job_yaml, render_jobs_yaml, render_workload_yaml,
};

use crate::yaml::{render_documents, Mapping, YamlValue};

/// Render manifests as one multi-document stream
pub(crate) fn render_manifests<I>(manifests: I) -> String
where
    I: IntoIterator<Item = Mapping>,
{
    let documents: Vec<YamlValue> = manifests.into_iter().map(YamlValue::Map).collect();
    render_documents(&documents)
}
