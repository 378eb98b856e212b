//! ConfigMap and Secret types

use crate::OrderedMap;
use serde::{Deserialize, Serialize};

/// ConfigMap with plaintext string data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigMap {
    pub name: String,
    pub namespace: String,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,
    pub data: OrderedMap,
}

impl Default for ConfigMap {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: "default".to_string(),
            labels: OrderedMap::new(),
            annotations: OrderedMap::new(),
            data: OrderedMap::new(),
        }
    }
}

/// Secret type tag; changes how `data` is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SecretType {
    #[default]
    Opaque,
    #[serde(rename = "kubernetes.io/tls", alias = "tls")]
    Tls,
    #[serde(rename = "kubernetes.io/dockerconfigjson", alias = "dockerconfigjson")]
    DockerConfigJson,
}

impl SecretType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opaque => "Opaque",
            Self::Tls => "kubernetes.io/tls",
            Self::DockerConfigJson => "kubernetes.io/dockerconfigjson",
        }
    }
}

impl std::fmt::Display for SecretType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secret as held by the editor: `data` stores plaintext, encoding happens on render.
///
/// For `kubernetes.io/tls` the keys are `tls.crt` and `tls.key` (PEM text); for
/// `kubernetes.io/dockerconfigjson` the single key `.dockerconfigjson` holds the
/// auth document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Secret {
    pub name: String,
    pub namespace: String,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,
    #[serde(rename = "type")]
    pub secret_type: SecretType,
    pub data: OrderedMap,
}

impl Default for Secret {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: "default".to_string(),
            labels: OrderedMap::new(),
            annotations: OrderedMap::new(),
            secret_type: SecretType::Opaque,
            data: OrderedMap::new(),
        }
    }
}

/// Default registry for Docker Hub credentials
pub const DOCKER_HUB_SERVER: &str = "https://index.docker.io/v1/";

/// Registry credentials rendered as a `kubernetes.io/dockerconfigjson` Secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DockerHubSecret {
    pub name: String,
    pub namespace: String,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,
    pub server: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Default for DockerHubSecret {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: "default".to_string(),
            labels: OrderedMap::new(),
            annotations: OrderedMap::new(),
            server: DOCKER_HUB_SERVER.to_string(),
            username: String::new(),
            password: String::new(),
            email: String::new(),
        }
    }
}
