//! DaemonSet manifests

use crate::kubernetes::render_manifests;
use crate::kubernetes::workloads::deployments::{render_workload_yaml, workload_documents};
use kubeforge_common::{is_blank, ProjectSettings, WorkloadConfig, WorkloadKind};

/// A DaemonSet has no `replicas` and only gets a Service when `serviceEnabled` is set
pub fn render_daemonset_yaml(config: &WorkloadConfig, settings: Option<&ProjectSettings>) -> String {
    render_workload_yaml(config, WorkloadKind::DaemonSet, settings)
}

pub fn render_daemonsets_yaml(configs: &[WorkloadConfig], settings: Option<&ProjectSettings>) -> String {
    render_manifests(
        configs
            .iter()
            .filter(|c| !is_blank(&c.app_name))
            .flat_map(|c| workload_documents(c, WorkloadKind::DaemonSet, settings)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeforge_common::ContainerSpec;

    fn agent() -> WorkloadConfig {
        let mut config = WorkloadConfig {
            app_name: "log-agent".to_string(),
            namespace: "logging".to_string(),
            replicas: 3,
            containers: vec![ContainerSpec {
                name: "fluentbit".to_string(),
                image: "fluent/fluent-bit".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        config.node_selector.insert("role".to_string(), "worker".to_string());
        config
    }

    #[test]
    fn test_no_replicas_and_no_service_by_default() {
        let text = render_daemonset_yaml(&agent(), None);
        assert!(text.starts_with("apiVersion: apps/v1\nkind: DaemonSet\n"));
        assert!(!text.contains("replicas"));
        assert!(!text.contains("kind: Service"));
        assert!(text.contains("      nodeSelector:\n        role: worker\n"));
    }

    #[test]
    fn test_service_when_enabled() {
        let mut config = agent();
        config.service_enabled = true;
        let text = render_daemonset_yaml(&config, None);
        assert_eq!(text.split("\n---\n").count(), 2);
        assert!(text.contains("  name: log-agent-service\n  namespace: logging\n"));
    }
}
