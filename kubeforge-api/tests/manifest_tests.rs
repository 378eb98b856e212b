//! End-to-end manifest generation tests
//!
//! Every rendered stream is parsed back with serde_yaml so the emitter's
//! output is checked as YAML, not only as text.
//!
//! Run with: cargo test --test manifest_tests

mod common;

use base64::Engine;
use common::{kinds, parse_documents, shop_project, single_deployment};
use kubeforge_api::kubernetes::{
    render_cluster_role_yaml, render_configmap_yaml, render_dockerhub_secret_yaml,
    render_secret_yaml, WELCOME_MESSAGE,
};
use kubeforge_api::render_project_yaml;
use kubeforge_common::{
    ClusterRole, ConfigMap, DockerHubSecret, PolicyRule, ProjectSettings, ProjectState, Secret,
    SecretType,
};

fn decode(value: &serde_yaml::Value) -> String {
    let encoded = value.as_str().unwrap();
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_single_deployment_renders_deployment_and_service() {
    let yaml = render_project_yaml(&single_deployment("nginx:latest"), None);
    let documents = parse_documents(&yaml);

    assert_eq!(kinds(&documents), vec!["Deployment", "Service"]);

    let deployment = &documents[0];
    assert_eq!(deployment["metadata"]["name"].as_str(), Some("web"));
    assert_eq!(deployment["metadata"]["namespace"].as_str(), Some("default"));
    assert_eq!(deployment["spec"]["replicas"].as_i64(), Some(2));

    let service = &documents[1];
    assert_eq!(service["metadata"]["name"].as_str(), Some("web-service"));
    let ports = service["spec"]["ports"].as_sequence().unwrap();
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0]["name"].as_str(), Some("http"));
    assert_eq!(
        service["spec"]["selector"]["app.kubernetes.io/name"].as_str(),
        Some("web")
    );
}

#[test]
fn test_blank_image_still_renders() {
    let yaml = render_project_yaml(&single_deployment(""), None);
    assert!(yaml.contains("image: \"\""));

    let documents = parse_documents(&yaml);
    let container = &documents[0]["spec"]["template"]["spec"]["containers"][0];
    assert_eq!(container["image"].as_str(), Some(""));
}

#[test]
fn test_tls_secret_values_are_base64() {
    let mut secret = Secret {
        name: "web-tls".to_string(),
        secret_type: SecretType::Tls,
        ..Default::default()
    };
    secret.data.insert("tls.crt".to_string(), "CERT".to_string());
    secret.data.insert("tls.key".to_string(), "KEY".to_string());

    let yaml = render_secret_yaml(&secret, None);
    assert!(!yaml.contains("CERT"));

    let documents = parse_documents(&yaml);
    assert_eq!(documents[0]["type"].as_str(), Some("kubernetes.io/tls"));
    assert_eq!(decode(&documents[0]["data"]["tls.crt"]), "CERT");
    assert_eq!(decode(&documents[0]["data"]["tls.key"]), "KEY");
}

#[test]
fn test_cluster_role_has_no_namespace() {
    let role = ClusterRole {
        name: "node-viewer".to_string(),
        rules: vec![PolicyRule {
            api_groups: vec![String::new()],
            resources: vec!["nodes".to_string()],
            verbs: vec!["get".to_string()],
            ..Default::default()
        }],
        ..Default::default()
    };

    let documents = parse_documents(&render_cluster_role_yaml(&role, None));
    let metadata = documents[0]["metadata"].as_mapping().unwrap();

    assert_eq!(documents[0]["kind"].as_str(), Some("ClusterRole"));
    assert!(!metadata.contains_key(&serde_yaml::Value::from("namespace")));
    assert_eq!(documents[0]["rules"][0]["apiGroups"][0].as_str(), Some(""));
}

#[test]
fn test_dockerhub_secret_payload() {
    let secret = DockerHubSecret {
        name: "registry".to_string(),
        username: "shopbot".to_string(),
        password: "hunter2".to_string(),
        email: "ops@example.com".to_string(),
        ..Default::default()
    };

    let documents = parse_documents(&render_dockerhub_secret_yaml(&secret, None));
    assert_eq!(
        documents[0]["type"].as_str(),
        Some("kubernetes.io/dockerconfigjson")
    );

    let payload: serde_json::Value =
        serde_json::from_str(&decode(&documents[0]["data"][".dockerconfigjson"])).unwrap();
    let auths = payload["auths"].as_object().unwrap();
    assert_eq!(auths.len(), 1);

    let entry = auths.values().next().unwrap();
    assert_eq!(entry["username"], "shopbot");
    let auth = base64::engine::general_purpose::STANDARD
        .decode(entry["auth"].as_str().unwrap())
        .unwrap();
    assert_eq!(auth, b"shopbot:hunter2");
}

#[test]
fn test_shop_project_document_order() {
    let yaml = render_project_yaml(&shop_project(), None);
    assert!(yaml.starts_with("# Project: shop\n"));

    let documents = parse_documents(&yaml);
    assert_eq!(
        kinds(&documents),
        vec![
            "Namespace",
            "ConfigMap",
            "Secret",
            "Secret",
            "ServiceAccount",
            "Role",
            "ClusterRole",
            "RoleBinding",
            "DaemonSet",
            "Deployment",
            "Service",
            "Ingress",
            "CronJob",
        ]
    );
}

#[test]
fn test_shop_project_labels_and_references() {
    let documents = parse_documents(&render_project_yaml(&shop_project(), None));
    let find = |kind: &str| {
        documents
            .iter()
            .find(|doc| doc["kind"].as_str() == Some(kind))
            .unwrap()
    };

    let deployment = find("Deployment");
    let labels = &deployment["metadata"]["labels"];
    assert_eq!(labels["team"].as_str(), Some("storefront"));
    assert_eq!(labels["project"].as_str(), Some("shop"));

    let pod_spec = &deployment["spec"]["template"]["spec"];
    assert_eq!(pod_spec["serviceAccountName"].as_str(), Some("web-sa"));
    let env_from = pod_spec["containers"][0]["envFrom"].as_sequence().unwrap();
    assert_eq!(env_from.len(), 2);

    let daemonset = find("DaemonSet");
    assert!(daemonset["spec"].get("replicas").is_none());
    assert_eq!(
        daemonset["spec"]["template"]["spec"]["nodeSelector"]["kubernetes.io/os"].as_str(),
        Some("linux")
    );

    let ingress = find("Ingress");
    assert_eq!(
        ingress["spec"]["rules"][0]["host"].as_str(),
        Some("shop.example.com")
    );

    let cron_job = find("CronJob");
    assert_eq!(cron_job["spec"]["schedule"].as_str(), Some("0 2 * * *"));
}

#[test]
fn test_system_namespace_not_exported() {
    let documents = parse_documents(&render_project_yaml(&shop_project(), None));
    let namespaces: Vec<&str> = documents
        .iter()
        .filter(|doc| doc["kind"].as_str() == Some("Namespace"))
        .filter_map(|doc| doc["metadata"]["name"].as_str())
        .collect();

    assert_eq!(namespaces, vec!["shop"]);
}

#[test]
fn test_empty_project_returns_welcome() {
    let yaml = render_project_yaml(&ProjectState::default(), None);
    assert_eq!(yaml, WELCOME_MESSAGE);
    assert!(parse_documents(&yaml).is_empty());
}

#[test]
fn test_rendering_is_deterministic() {
    let project = shop_project();
    assert_eq!(
        render_project_yaml(&project, None),
        render_project_yaml(&project, None)
    );
}

#[test]
fn test_ambiguous_config_data_stays_string() {
    let mut config_map = ConfigMap {
        name: "tuning".to_string(),
        ..Default::default()
    };
    let entries = [
        ("8080", "port"),
        ("true", "flag"),
        ("ratio", ".inf"),
        ("floor", "-.Inf"),
        ("missing", ".nan"),
        ("mask", "0b101"),
        ("offset", "-0x1F"),
        ("enabled", "yes"),
        ("null", "~"),
    ];
    for (key, value) in entries {
        config_map.data.insert(key.to_string(), value.to_string());
    }
    config_map.labels.insert("1.0".to_string(), "off".to_string());

    let documents = parse_documents(&render_configmap_yaml(&config_map, None));
    let data = documents[0]["data"].as_mapping().unwrap();
    assert_eq!(data.len(), entries.len());
    for (key, value) in data {
        assert!(key.is_string(), "key {:?} did not stay a string", key);
        assert!(value.is_string(), "value {:?} did not stay a string", value);
    }
    for (key, value) in entries {
        assert_eq!(documents[0]["data"][key].as_str(), Some(value));
    }

    let labels = documents[0]["metadata"]["labels"].as_mapping().unwrap();
    assert_eq!(
        labels.get(&serde_yaml::Value::from("1.0")).and_then(|v| v.as_str()),
        Some("off")
    );
}

#[test]
fn test_multiline_description_does_not_leak_into_documents() {
    let mut project = shop_project();
    project.settings = Some(ProjectSettings {
        name: "shop".to_string(),
        description: "storefront\nowned by: team-a".to_string(),
        ..Default::default()
    });

    let yaml = render_project_yaml(&project, None);
    assert!(yaml.starts_with("# Project: shop\n# storefront\n# owned by: team-a\n"));

    let documents = parse_documents(&yaml);
    assert_eq!(documents[0]["kind"].as_str(), Some("Namespace"));
    assert!(documents[0].get("owned by").is_none());
}
