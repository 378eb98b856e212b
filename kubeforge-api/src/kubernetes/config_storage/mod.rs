//! ConfigMap and Secret manifests

pub mod configmaps;
pub mod secrets;

pub use configmaps::{configmap_manifest, render_configmap_yaml, render_configmaps_yaml};
pub use secrets::{
    dockerconfigjson, dockerhub_secret_manifest, render_dockerhub_secret_yaml,
    render_dockerhub_secrets_yaml, render_secret_yaml, render_secrets_yaml, secret_manifest,
};
