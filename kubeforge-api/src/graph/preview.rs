//! YAML preview of a single graph node

use crate::kubernetes::cluster_resources::rbac::binding_with_project_labels;
use crate::kubernetes::labels::namespace_or_default;
use crate::kubernetes::{
    render_cluster_role_yaml, render_configmap_yaml, render_daemonset_yaml, render_deployment_yaml,
    render_dockerhub_secret_yaml, render_job_yaml, render_namespace_yaml, render_role_binding_yaml,
    render_role_yaml, render_secret_yaml, render_service_account_yaml,
};
use kubeforge_common::{FlowNode, ProjectSettings, ProjectState, ResourceCollection, ResourceSource};

fn same_namespace(source: &ResourceSource, namespace: &str) -> bool {
    source
        .namespace
        .as_deref()
        .map_or(true, |wanted| namespace_or_default(namespace) == wanted)
}

/// Look the node's source resource up in `project` and render just that resource.
///
/// Service, Pod, Ingress and External nodes render their owning workload.
/// Returns `None` for nodes without a source (implied namespaces, unresolved
/// attachments) or whose resource is no longer in the project.
pub fn render_node_yaml(
    project: &ProjectState,
    node: &FlowNode,
    settings: Option<&ProjectSettings>,
) -> Option<String> {
    let source = node.source.as_ref()?;
    let settings = settings.or(project.settings.as_ref());
    let name = source.name.as_str();

    match source.collection {
        ResourceCollection::Deployments => project
            .deployments
            .iter()
            .find(|d| d.app_name == name && same_namespace(source, &d.namespace))
            .map(|d| render_deployment_yaml(d, settings)),
        ResourceCollection::Daemonsets => project
            .daemonsets
            .iter()
            .find(|d| d.app_name == name && same_namespace(source, &d.namespace))
            .map(|d| render_daemonset_yaml(d, settings)),
        ResourceCollection::Namespaces => project
            .namespaces
            .iter()
            .find(|n| n.name == name)
            .map(|n| render_namespace_yaml(n, settings)),
        ResourceCollection::ConfigMaps => project
            .config_maps
            .iter()
            .find(|c| c.name == name && same_namespace(source, &c.namespace))
            .map(|c| render_configmap_yaml(c, settings)),
        ResourceCollection::Secrets => project
            .secrets
            .iter()
            .find(|s| s.name == name && same_namespace(source, &s.namespace))
            .map(|s| render_secret_yaml(s, settings)),
        ResourceCollection::DockerHubSecrets => project
            .docker_hub_secrets
            .iter()
            .find(|s| s.name == name && same_namespace(source, &s.namespace))
            .map(|s| render_dockerhub_secret_yaml(s, settings)),
        ResourceCollection::ServiceAccounts => project
            .service_accounts
            .iter()
            .find(|a| a.name == name && same_namespace(source, &a.namespace))
            .map(|a| render_service_account_yaml(a, settings)),
        ResourceCollection::Roles => project
            .roles
            .iter()
            .find(|r| r.name == name && same_namespace(source, &r.namespace))
            .map(|r| render_role_yaml(r, settings)),
        ResourceCollection::ClusterRoles => project
            .cluster_roles
            .iter()
            .find(|r| r.name == name)
            .map(|r| render_cluster_role_yaml(r, settings)),
        ResourceCollection::RoleBindings => project
            .role_bindings
            .iter()
            .find(|b| b.name == name && b.effective_namespace() == source.namespace.as_deref())
            .map(|b| render_role_binding_yaml(&binding_with_project_labels(b, settings))),
        ResourceCollection::Jobs => project
            .jobs
            .iter()
            .find(|j| j.name == name && same_namespace(source, &j.namespace))
            .map(|j| render_job_yaml(j, settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_resource_graph;
    use kubeforge_common::{ConfigMap, GraphFilter, WorkloadConfig};

    fn project() -> ProjectState {
        ProjectState {
            deployments: vec![WorkloadConfig {
                app_name: "web".to_string(),
                image: "nginx".to_string(),
                selected_config_maps: vec!["web-config".to_string()],
                ..Default::default()
            }],
            config_maps: vec![ConfigMap {
                name: "web-config".to_string(),
                data: [("MODE".to_string(), "prod".to_string())].into_iter().collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_service_node_renders_owning_workload() {
        let project = project();
        let nodes = build_resource_graph(&project, GraphFilter::All, None);
        let service = nodes
            .iter()
            .find(|n| n.id == "deployment-default-web-service")
            .unwrap();

        let text = render_node_yaml(&project, service, None).unwrap();
        assert!(text.contains("kind: Deployment\n"));
        assert!(text.contains("kind: Service\n"));
    }

    #[test]
    fn test_config_map_node_renders_config_map() {
        let project = project();
        let nodes = build_resource_graph(&project, GraphFilter::Configmaps, None);
        let text = render_node_yaml(&project, &nodes[0], None).unwrap();
        assert!(text.starts_with("apiVersion: v1\nkind: ConfigMap\n"));
        assert!(text.ends_with("data:\n  MODE: prod\n"));
    }

    #[test]
    fn test_implied_namespace_has_no_preview() {
        let project = project();
        let nodes = build_resource_graph(&project, GraphFilter::All, None);
        let namespace = nodes.iter().find(|n| n.id == "namespace-default").unwrap();
        assert!(render_node_yaml(&project, namespace, None).is_none());
    }
}
