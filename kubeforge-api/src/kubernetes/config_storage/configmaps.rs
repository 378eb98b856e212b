//! ConfigMap manifests

use crate::kubernetes::labels::{merge_labels, namespace_or_default, object_meta, placeholder};
use crate::kubernetes::render_manifests;
use crate::yaml::{render, Mapping};
use kubeforge_common::{is_blank, ConfigMap, ProjectSettings};

/// ConfigMap manifest; `None` while the ConfigMap has no name
pub fn configmap_manifest(config_map: &ConfigMap, settings: Option<&ProjectSettings>) -> Option<Mapping> {
    if is_blank(&config_map.name) {
        return None;
    }

    let labels = merge_labels(settings, &config_map.labels, None);

    Some(
        Mapping::new()
            .insert("apiVersion", "v1")
            .insert("kind", "ConfigMap")
            .insert(
                "metadata",
                object_meta(
                    &config_map.name,
                    Some(namespace_or_default(&config_map.namespace)),
                    &labels,
                    &config_map.annotations,
                ),
            )
            .insert_nonempty("data", &config_map.data),
    )
}

pub fn render_configmap_yaml(config_map: &ConfigMap, settings: Option<&ProjectSettings>) -> String {
    match configmap_manifest(config_map, settings) {
        Some(manifest) => render(&manifest.into(), 0),
        None => placeholder("ConfigMap"),
    }
}

/// All named ConfigMaps as one multi-document stream
pub fn render_configmaps_yaml(config_maps: &[ConfigMap], settings: Option<&ProjectSettings>) -> String {
    render_manifests(config_maps.iter().filter_map(|cm| configmap_manifest(cm, settings)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeforge_common::OrderedMap;

    fn config_map(name: &str) -> ConfigMap {
        let mut data = OrderedMap::new();
        data.insert("LOG_LEVEL".to_string(), "debug".to_string());
        data.insert("PORT".to_string(), "8080".to_string());
        ConfigMap {
            name: name.to_string(),
            data,
            ..Default::default()
        }
    }

    #[test]
    fn test_data_values_stay_strings() {
        let text = render_configmap_yaml(&config_map("app-config"), None);
        assert!(text.starts_with("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: app-config\n  namespace: default\n"));
        assert!(text.contains("data:\n  LOG_LEVEL: debug\n  PORT: \"8080\"\n"));
    }

    #[test]
    fn test_unnamed_config_map_renders_placeholder() {
        let text = render_configmap_yaml(&config_map(""), None);
        assert!(text.starts_with('#'));
        assert!(text.contains("ConfigMap"));
    }

    #[test]
    fn test_list_skips_unnamed() {
        let text = render_configmaps_yaml(&[config_map("a"), config_map(" "), config_map("b")], None);
        assert_eq!(text.matches("kind: ConfigMap").count(), 2);
        assert_eq!(text.matches("\n---\n").count(), 1);
    }
}
