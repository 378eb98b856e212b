//! Secret manifests
//!
//! Secrets are held as plaintext in the project and base64-encoded here, so
//! emitted manifests never carry plaintext values.

use crate::kubernetes::labels::{merge_labels, namespace_or_default, object_meta, placeholder};
use crate::kubernetes::render_manifests;
use crate::yaml::{render, Mapping};
use base64::Engine;
use kubeforge_common::{
    is_blank, DockerHubSecret, OrderedMap, ProjectSettings, Secret, SecretType,
};

fn encode(value: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(value.as_bytes())
}

fn encoded_data(data: &OrderedMap) -> Mapping {
    data.iter()
        .filter(|(key, _)| !is_blank(key))
        .map(|(key, value)| (key.clone(), encode(value)))
        .collect()
}

/// Secret manifest; `None` while the Secret has no name
pub fn secret_manifest(secret: &Secret, settings: Option<&ProjectSettings>) -> Option<Mapping> {
    if is_blank(&secret.name) {
        return None;
    }

    let labels = merge_labels(settings, &secret.labels, None);

    Some(
        Mapping::new()
            .insert("apiVersion", "v1")
            .insert("kind", "Secret")
            .insert(
                "metadata",
                object_meta(
                    &secret.name,
                    Some(namespace_or_default(&secret.namespace)),
                    &labels,
                    &secret.annotations,
                ),
            )
            .insert("type", secret.secret_type.as_str())
            .insert_nonempty("data", encoded_data(&secret.data)),
    )
}

pub fn render_secret_yaml(secret: &Secret, settings: Option<&ProjectSettings>) -> String {
    match secret_manifest(secret, settings) {
        Some(manifest) => render(&manifest.into(), 0),
        None => placeholder("Secret"),
    }
}

pub fn render_secrets_yaml(secrets: &[Secret], settings: Option<&ProjectSettings>) -> String {
    render_manifests(secrets.iter().filter_map(|s| secret_manifest(s, settings)))
}

/// `.dockerconfigjson` payload before the outer base64 step:
/// `{"auths": {<server>: {username, password, email, auth}}}` where `auth`
/// is `base64(username:password)`.
pub fn dockerconfigjson(secret: &DockerHubSecret) -> String {
    let auth = encode(&format!("{}:{}", secret.username, secret.password));
    let server = if is_blank(&secret.server) {
        kubeforge_common::config_storage::DOCKER_HUB_SERVER
    } else {
        secret.server.as_str()
    };

    serde_json::json!({
        "auths": {
            server: {
                "username": secret.username,
                "password": secret.password,
                "email": secret.email,
                "auth": auth
            }
        }
    })
    .to_string()
}

/// Registry credentials as a `kubernetes.io/dockerconfigjson` Secret
pub fn dockerhub_secret_manifest(
    secret: &DockerHubSecret,
    settings: Option<&ProjectSettings>,
) -> Option<Mapping> {
    if is_blank(&secret.name) {
        return None;
    }

    let labels = merge_labels(settings, &secret.labels, None);

    Some(
        Mapping::new()
            .insert("apiVersion", "v1")
            .insert("kind", "Secret")
            .insert(
                "metadata",
                object_meta(
                    &secret.name,
                    Some(namespace_or_default(&secret.namespace)),
                    &labels,
                    &secret.annotations,
                ),
            )
            .insert("type", SecretType::DockerConfigJson.as_str())
            .insert(
                "data",
                Mapping::new().insert(".dockerconfigjson", encode(&dockerconfigjson(secret))),
            ),
    )
}

pub fn render_dockerhub_secret_yaml(secret: &DockerHubSecret, settings: Option<&ProjectSettings>) -> String {
    match dockerhub_secret_manifest(secret, settings) {
        Some(manifest) => render(&manifest.into(), 0),
        None => placeholder("Docker Hub secret"),
    }
}

pub fn render_dockerhub_secrets_yaml(
    secrets: &[DockerHubSecret],
    settings: Option<&ProjectSettings>,
) -> String {
    render_manifests(secrets.iter().filter_map(|s| dockerhub_secret_manifest(s, settings)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(value: &str) -> String {
        let bytes = base64::engine::general_purpose::STANDARD.decode(value).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_values_are_encoded() {
        let mut data = OrderedMap::new();
        data.insert("password".to_string(), "s3cr3t!".to_string());
        let secret = Secret {
            name: "db".to_string(),
            data,
            ..Default::default()
        };

        let text = render_secret_yaml(&secret, None);
        assert!(text.contains("type: Opaque\n"));
        assert!(!text.contains("s3cr3t!"));
        assert!(text.contains(&format!("  password: {}\n", encode("s3cr3t!"))));
    }

    #[test]
    fn test_dockerconfigjson_payload() {
        let secret = DockerHubSecret {
            name: "regcred".to_string(),
            username: "deploy".to_string(),
            password: "hunter2".to_string(),
            email: "ops@example.com".to_string(),
            ..Default::default()
        };

        let payload: serde_json::Value = serde_json::from_str(&dockerconfigjson(&secret)).unwrap();
        let entry = &payload["auths"]["https://index.docker.io/v1/"];
        assert_eq!(entry["username"], "deploy");
        assert_eq!(entry["email"], "ops@example.com");
        assert_eq!(decode(entry["auth"].as_str().unwrap()), "deploy:hunter2");
    }

    #[test]
    fn test_dockerhub_manifest_shape() {
        let secret = DockerHubSecret {
            name: "regcred".to_string(),
            namespace: "team-a".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            ..Default::default()
        };
        let text = render_dockerhub_secret_yaml(&secret, None);

        assert!(text.contains("  namespace: team-a\n"));
        assert!(text.contains("type: kubernetes.io/dockerconfigjson\n"));
        assert!(text.contains("data:\n  .dockerconfigjson: "));
    }
}
