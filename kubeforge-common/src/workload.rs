//! Workload types (Deployment and DaemonSet) and their containers

use crate::{is_blank, OrderedMap};
use serde::{Deserialize, Serialize};

/// Which controller a [`WorkloadConfig`] is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    Deployment,
    DaemonSet,
}

impl WorkloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::DaemonSet => "DaemonSet",
        }
    }
}

impl std::fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deployment => write!(f, "deployment"),
            Self::DaemonSet => write!(f, "daemonset"),
        }
    }
}

/// Service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ServiceType {
    #[default]
    ClusterIP,
    NodePort,
    LoadBalancer,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClusterIP => "ClusterIP",
            Self::NodePort => "NodePort",
            Self::LoadBalancer => "LoadBalancer",
        }
    }
}

/// Where an environment variable reads its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvSource {
    ConfigMap,
    Secret,
}

/// Reference to a single key of a ConfigMap or Secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvValueFrom {
    #[serde(rename = "type")]
    pub source: EnvSource,
    pub name: String,
    pub key: String,
}

/// Environment entry: a literal value, or a key reference when `value_from` is set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
    pub value_from: Option<EnvValueFrom>,
}

impl EnvVar {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            value_from: None,
        }
    }
}

/// CPU and memory quantities as typed in the form ("100m", "128Mi")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceQuantities {
    pub cpu: String,
    pub memory: String,
}

impl ResourceQuantities {
    pub fn is_empty(&self) -> bool {
        is_blank(&self.cpu) && is_blank(&self.memory)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequirements {
    pub requests: ResourceQuantities,
    pub limits: ResourceQuantities,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
}

/// Single container of a workload or job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub port: Option<i32>,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub env: Vec<EnvVar>,
    pub resources: ResourceRequirements,
    pub volume_mounts: Vec<VolumeMount>,
}

impl ContainerSpec {
    /// A container is complete once both its name and image are filled in
    pub fn is_complete(&self) -> bool {
        !is_blank(&self.name) && !is_blank(&self.image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum VolumeType {
    #[default]
    EmptyDir,
    ConfigMap,
    Secret,
}

/// Pod volume; configMap/secret volumes name their backing resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    pub name: String,
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
    pub config_map_name: Option<String>,
    pub secret_name: Option<String>,
}

impl Volume {
    /// Name of the ConfigMap or Secret backing this volume, if any
    pub fn source_name(&self) -> Option<&str> {
        let name = match self.volume_type {
            VolumeType::EmptyDir => None,
            VolumeType::ConfigMap => self.config_map_name.as_deref(),
            VolumeType::Secret => self.secret_name.as_deref(),
        };
        name.filter(|n| !is_blank(n))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngressPath {
    pub path: String,
    pub path_type: String,
    /// Backend service, defaults to the workload's own Service
    pub service_name: Option<String>,
    pub service_port: Option<i32>,
}

impl Default for IngressPath {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            path_type: "Prefix".to_string(),
            service_name: None,
            service_port: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngressRule {
    pub host: String,
    pub paths: Vec<IngressPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngressTls {
    pub hosts: Vec<String>,
    pub secret_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngressConfig {
    pub enabled: bool,
    pub class_name: Option<String>,
    pub annotations: OrderedMap,
    pub rules: Vec<IngressRule>,
    pub tls: Vec<IngressTls>,
}

impl IngressConfig {
    /// An Ingress is only emitted once it is switched on and has a rule
    pub fn is_active(&self) -> bool {
        self.enabled && !self.rules.is_empty()
    }
}

/// Deployment or DaemonSet as configured in the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkloadConfig {
    pub app_name: String,
    pub namespace: String,
    pub replicas: i32,
    pub containers: Vec<ContainerSpec>,

    // Networking
    pub port: i32,
    pub target_port: i32,
    pub service_type: ServiceType,
    pub node_port: Option<i32>,
    pub service_enabled: bool,
    pub ingress: IngressConfig,

    pub volumes: Vec<Volume>,
    #[serde(alias = "selectedConfigmaps")]
    pub selected_config_maps: Vec<String>,
    pub selected_secrets: Vec<String>,
    pub service_account: Option<String>,
    /// Only honoured for DaemonSets
    pub node_selector: OrderedMap,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,

    // Legacy single-container fields, used when `containers` is empty
    pub image: String,
    pub env: Vec<EnvVar>,
    pub resources: ResourceRequirements,
    pub config_data: OrderedMap,
    pub secret_data: OrderedMap,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            namespace: "default".to_string(),
            replicas: 1,
            containers: Vec::new(),
            port: 80,
            target_port: 80,
            service_type: ServiceType::ClusterIP,
            node_port: None,
            service_enabled: false,
            ingress: IngressConfig::default(),
            volumes: Vec::new(),
            selected_config_maps: Vec::new(),
            selected_secrets: Vec::new(),
            service_account: None,
            node_selector: OrderedMap::new(),
            labels: OrderedMap::new(),
            annotations: OrderedMap::new(),
            image: String::new(),
            env: Vec::new(),
            resources: ResourceRequirements::default(),
            config_data: OrderedMap::new(),
            secret_data: OrderedMap::new(),
        }
    }
}

impl WorkloadConfig {
    /// Containers to render: the configured list, or one container assembled
    /// from the legacy top-level image/env/resources fields when it is empty.
    pub fn effective_containers(&self) -> Vec<ContainerSpec> {
        if !self.containers.is_empty() {
            return self.containers.clone();
        }

        vec![ContainerSpec {
            name: self.app_name.clone(),
            image: self.image.clone(),
            port: (self.target_port > 0).then_some(self.target_port),
            env: self.env.clone(),
            resources: self.resources.clone(),
            ..Default::default()
        }]
    }

    /// Both service ports must be positive for the workload to be reachable
    pub fn has_valid_ports(&self) -> bool {
        self.port > 0 && self.target_port > 0
    }

    /// Name of the Service generated for this workload
    pub fn service_name(&self) -> String {
        format!("{}-service", self.app_name)
    }

    /// ConfigMap names referenced by selection, volumes or env entries, without duplicates
    pub fn referenced_config_maps(&self) -> Vec<String> {
        self.referenced(EnvSource::ConfigMap)
    }

    /// Secret names referenced by selection, volumes or env entries, without duplicates
    pub fn referenced_secrets(&self) -> Vec<String> {
        self.referenced(EnvSource::Secret)
    }

    fn referenced(&self, source: EnvSource) -> Vec<String> {
        let (selected, volume_type) = match source {
            EnvSource::ConfigMap => (&self.selected_config_maps, VolumeType::ConfigMap),
            EnvSource::Secret => (&self.selected_secrets, VolumeType::Secret),
        };

        let from_volumes = self
            .volumes
            .iter()
            .filter(|v| v.volume_type == volume_type)
            .filter_map(|v| v.source_name());

        let containers = self.effective_containers();
        let from_env: Vec<&str> = containers
            .iter()
            .flat_map(|c| c.env.iter())
            .filter_map(|e| e.value_from.as_ref())
            .filter(|r| r.source == source && !is_blank(&r.name))
            .map(|r| r.name.as_str())
            .collect();

        let mut names: Vec<String> = Vec::new();
        for name in selected
            .iter()
            .map(String::as_str)
            .chain(from_volumes)
            .chain(from_env)
        {
            if !is_blank(name) && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}
