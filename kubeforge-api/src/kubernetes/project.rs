//! Whole-project export: every resource as one commented multi-document stream

use crate::kubernetes::cluster_resources::rbac::binding_with_project_labels;
use crate::kubernetes::cluster_resources::{
    render_cluster_roles_yaml, render_namespaces_yaml, render_roles_yaml,
    render_service_accounts_yaml, role_binding_manifest,
};
use crate::kubernetes::config_storage::{
    render_configmaps_yaml, render_dockerhub_secrets_yaml, render_secrets_yaml,
};
use crate::kubernetes::render_manifests;
use crate::kubernetes::workloads::{
    job_resource_manifest, render_daemonsets_yaml, render_deployments_yaml,
};
use crate::yaml::DOCUMENT_SEPARATOR;
use kubeforge_common::{is_blank, ProjectSettings, ProjectState};

/// Returned instead of YAML while a project holds nothing worth exporting
pub const WELCOME_MESSAGE: &str = "\
# Welcome to kubeforge!
#
# This project does not contain any resources yet.
# Add a Deployment, DaemonSet, ConfigMap, Secret, ServiceAccount, Role or Job
# and the generated manifests will show up here.
";

/// Render the full project.
///
/// Sections follow a fixed kind order, each introduced by a `# === KIND ===`
/// header; empty sections are left out. `settings` falls back to the
/// project's own settings.
pub fn render_project_yaml(project: &ProjectState, settings: Option<&ProjectSettings>) -> String {
    if !project.has_meaningful_resources() {
        return WELCOME_MESSAGE.to_string();
    }

    let settings = settings.or(project.settings.as_ref());

    let bindings = render_manifests(
        project
            .role_bindings
            .iter()
            .map(|b| binding_with_project_labels(b, settings))
            .filter_map(|b| role_binding_manifest(&b)),
    );
    let jobs = render_manifests(
        project
            .jobs
            .iter()
            .filter_map(|j| job_resource_manifest(j, settings)),
    );

    let sections = [
        ("NAMESPACES", render_namespaces_yaml(&project.namespaces, settings)),
        ("CONFIGMAPS", render_configmaps_yaml(&project.config_maps, settings)),
        ("SECRETS", render_secrets_yaml(&project.secrets, settings)),
        (
            "DOCKERHUB SECRETS",
            render_dockerhub_secrets_yaml(&project.docker_hub_secrets, settings),
        ),
        (
            "SERVICEACCOUNTS",
            render_service_accounts_yaml(&project.service_accounts, settings),
        ),
        ("ROLES", render_roles_yaml(&project.roles, settings)),
        ("CLUSTERROLES", render_cluster_roles_yaml(&project.cluster_roles, settings)),
        ("ROLEBINDINGS", bindings),
        ("DAEMONSETS", render_daemonsets_yaml(&project.daemonsets, settings)),
        ("DEPLOYMENTS", render_deployments_yaml(&project.deployments, settings)),
        ("JOBS & CRONJOBS", jobs),
    ];

    let body = sections
        .iter()
        .filter(|(_, yaml)| !yaml.is_empty())
        .map(|(title, yaml)| format!("# === {} ===\n{}", title, yaml))
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR);

    match settings.filter(|s| !is_blank(&s.name)) {
        Some(s) => format!("{}{}", project_header(s), body),
        None => body,
    }
}

const LINE_BREAKS: [char; 2] = ['\n', '\r'];

/// Comment block naming the project; every line of name and description
/// stays behind its own `#`
fn project_header(settings: &ProjectSettings) -> String {
    let mut lines = settings.name.split(LINE_BREAKS);
    let mut header = format!("# Project: {}\n", lines.next().unwrap_or_default());
    for line in lines.chain(settings.description.split(LINE_BREAKS)) {
        if !is_blank(line) {
            header.push_str(&format!("# {}\n", line.trim_end()));
        }
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeforge_common::{ClusterRole, ConfigMap, Namespace, RoleBinding, WorkloadConfig};

    #[test]
    fn test_empty_project_is_welcome_block() {
        let mut project = ProjectState::default();
        project.namespaces.push(Namespace::new("default"));
        assert_eq!(render_project_yaml(&project, None), WELCOME_MESSAGE);
    }

    #[test]
    fn test_sections_follow_kind_order() {
        let project = ProjectState {
            deployments: vec![WorkloadConfig {
                app_name: "web".to_string(),
                image: "nginx".to_string(),
                ..Default::default()
            }],
            config_maps: vec![ConfigMap {
                name: "app-config".to_string(),
                ..Default::default()
            }],
            cluster_roles: vec![ClusterRole {
                name: "viewer".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let text = render_project_yaml(&project, None);
        let configmaps = text.find("# === CONFIGMAPS ===").unwrap();
        let cluster_roles = text.find("# === CLUSTERROLES ===").unwrap();
        let deployments = text.find("# === DEPLOYMENTS ===").unwrap();

        assert!(configmaps < cluster_roles && cluster_roles < deployments);
        assert!(!text.contains("# === NAMESPACES ==="));
        assert!(text.starts_with("# === CONFIGMAPS ===\napiVersion: v1\n"));
    }

    #[test]
    fn test_project_settings_label_everything() {
        let project = ProjectState {
            settings: Some(ProjectSettings {
                name: "shop".to_string(),
                description: "storefront".to_string(),
                ..Default::default()
            }),
            role_bindings: vec![RoleBinding {
                name: "admins".to_string(),
                is_cluster_role_binding: true,
                ..Default::default()
            }],
            ..Default::default()
        };

        let text = render_project_yaml(&project, None);
        assert!(text.starts_with("# Project: shop\n# storefront\n# === ROLEBINDINGS ===\n"));
        assert!(text.contains("  labels:\n    project: shop\n"));
    }

    #[test]
    fn test_multiline_description_stays_commented() {
        let settings = ProjectSettings {
            name: "shop".to_string(),
            description: "storefront\nowned by: team-a\r\n\nkind: Pod\r".to_string(),
            ..Default::default()
        };
        let project = ProjectState {
            config_maps: vec![ConfigMap {
                name: "app-config".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let text = render_project_yaml(&project, Some(&settings));
        assert!(text.starts_with(
            "# Project: shop\n# storefront\n# owned by: team-a\n# kind: Pod\n# === CONFIGMAPS ===\n"
        ));
    }
}
