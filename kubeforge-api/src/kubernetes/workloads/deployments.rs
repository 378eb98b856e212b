//! Deployment manifests and the documents shared by every workload kind
//!
//! A workload renders as its controller (Deployment or DaemonSet) followed by
//! the Service, the Ingress and the legacy inline ConfigMap/Secret that belong
//! to it.

use crate::kubernetes::config_storage::{configmap_manifest, secret_manifest};
use crate::kubernetes::labels::{
    merge_labels, namespace_or_default, object_meta, placeholder, selector_labels,
};
use crate::kubernetes::networking::{ingress_manifest, service_manifest};
use crate::kubernetes::render_manifests;
use crate::kubernetes::workloads::containers::{container_manifest, pod_volumes, EnvFromRefs};
use crate::yaml::{Mapping, YamlValue};
use kubeforge_common::{
    is_blank, ConfigMap, ProjectSettings, Secret, SecretType, WorkloadConfig, WorkloadKind,
};

/// Controller manifest (Deployment or DaemonSet) for a workload
pub fn workload_manifest(
    config: &WorkloadConfig,
    kind: WorkloadKind,
    settings: Option<&ProjectSettings>,
) -> Mapping {
    let namespace = namespace_or_default(&config.namespace);
    let labels = merge_labels(settings, &config.labels, Some(&config.app_name));
    let selector = selector_labels(settings, &config.app_name);

    let env_from = EnvFromRefs {
        config_maps: &config.selected_config_maps,
        secrets: &config.selected_secrets,
    };
    let containers: YamlValue = config
        .effective_containers()
        .iter()
        .map(|c| container_manifest(c, env_from))
        .collect();

    let node_selector = match kind {
        WorkloadKind::DaemonSet => Some(&config.node_selector),
        WorkloadKind::Deployment => None,
    };

    let pod_spec = Mapping::new()
        .insert_opt(
            "serviceAccountName",
            config.service_account.as_deref().filter(|sa| !is_blank(sa)),
        )
        .insert_opt("nodeSelector", node_selector.filter(|m| !m.is_empty()))
        .insert("containers", containers)
        .insert_nonempty("volumes", pod_volumes(&config.volumes));

    let spec = Mapping::new()
        .insert_if("replicas", kind == WorkloadKind::Deployment, config.replicas)
        .insert("selector", Mapping::new().insert("matchLabels", &selector))
        .insert(
            "template",
            Mapping::new()
                .insert("metadata", Mapping::new().insert("labels", &labels))
                .insert("spec", pod_spec),
        );

    Mapping::new()
        .insert("apiVersion", "apps/v1")
        .insert("kind", kind.as_str())
        .insert(
            "metadata",
            object_meta(&config.app_name, Some(namespace), &labels, &config.annotations),
        )
        .insert("spec", spec)
}

/// Every document a workload renders to, in output order
pub fn workload_documents(
    config: &WorkloadConfig,
    kind: WorkloadKind,
    settings: Option<&ProjectSettings>,
) -> Vec<Mapping> {
    let mut documents = vec![workload_manifest(config, kind, settings)];

    let with_service = match kind {
        WorkloadKind::Deployment => true,
        WorkloadKind::DaemonSet => config.service_enabled,
    };
    if with_service {
        documents.push(service_manifest(config, &config.effective_containers(), settings));
        documents.extend(ingress_manifest(config, settings));
    }

    let labels = merge_labels(settings, &config.labels, Some(&config.app_name));

    if !config.config_data.is_empty() {
        let inline = ConfigMap {
            name: format!("{}-config", config.app_name),
            namespace: config.namespace.clone(),
            labels: labels.clone(),
            data: config.config_data.clone(),
            ..Default::default()
        };
        documents.extend(configmap_manifest(&inline, None));
    }

    if !config.secret_data.is_empty() {
        let inline = Secret {
            name: format!("{}-secret", config.app_name),
            namespace: config.namespace.clone(),
            labels,
            secret_type: SecretType::Opaque,
            data: config.secret_data.clone(),
            ..Default::default()
        };
        documents.extend(secret_manifest(&inline, None));
    }

    documents
}

/// YAML for one workload; a placeholder comment while it has no name
pub fn render_workload_yaml(
    config: &WorkloadConfig,
    kind: WorkloadKind,
    settings: Option<&ProjectSettings>,
) -> String {
    if is_blank(&config.app_name) {
        return placeholder(kind.as_str());
    }
    render_manifests(workload_documents(config, kind, settings))
}

pub fn render_deployment_yaml(config: &WorkloadConfig, settings: Option<&ProjectSettings>) -> String {
    render_workload_yaml(config, WorkloadKind::Deployment, settings)
}

/// All named Deployments with their companion documents
pub fn render_deployments_yaml(configs: &[WorkloadConfig], settings: Option<&ProjectSettings>) -> String {
    render_manifests(
        configs
            .iter()
            .filter(|c| !is_blank(&c.app_name))
            .flat_map(|c| workload_documents(c, WorkloadKind::Deployment, settings)),
    )
}
