//! Label merging and object metadata shared by every manifest

use crate::yaml::Mapping;
use kubeforge_common::{is_blank, OrderedMap, ProjectSettings};

/// Label naming the owning application of a workload
pub const APP_NAME_LABEL: &str = "app.kubernetes.io/name";

/// Label naming the project a resource was generated from
pub const PROJECT_LABEL: &str = "project";

/// Effective labels of a resource.
///
/// Sources are merged in order (project global labels, the resource's own
/// labels, then the forced `app.kubernetes.io/name` and `project` labels);
/// a later source overwrites the value but the key keeps its first position.
pub fn merge_labels(
    settings: Option<&ProjectSettings>,
    own: &OrderedMap,
    app_name: Option<&str>,
) -> OrderedMap {
    let mut labels = OrderedMap::new();

    if let Some(settings) = settings {
        extend_non_blank(&mut labels, &settings.global_labels);
    }
    extend_non_blank(&mut labels, own);

    if let Some(app) = app_name {
        labels.insert(APP_NAME_LABEL.to_string(), app.to_string());
    }
    if let Some(project) = project_name(settings) {
        labels.insert(PROJECT_LABEL.to_string(), project.to_string());
    }

    labels
}

/// Reduced, stable label set used by workload and Service selectors
pub fn selector_labels(settings: Option<&ProjectSettings>, app_name: &str) -> OrderedMap {
    let mut labels = OrderedMap::new();
    labels.insert(APP_NAME_LABEL.to_string(), app_name.to_string());
    if let Some(project) = project_name(settings) {
        labels.insert(PROJECT_LABEL.to_string(), project.to_string());
    }
    labels
}

fn project_name(settings: Option<&ProjectSettings>) -> Option<&str> {
    settings
        .map(|s| s.name.as_str())
        .filter(|name| !is_blank(name))
}

fn extend_non_blank(target: &mut OrderedMap, source: &OrderedMap) {
    for (key, value) in source {
        if !is_blank(key) {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// `metadata` block. `namespace` is left out entirely when `None`.
pub fn object_meta(
    name: &str,
    namespace: Option<&str>,
    labels: &OrderedMap,
    annotations: &OrderedMap,
) -> Mapping {
    Mapping::new()
        .insert("name", name)
        .insert_opt("namespace", namespace)
        .insert_nonempty("labels", labels)
        .insert_nonempty("annotations", annotations)
}

/// Namespace to emit: blank falls back to `default`
pub fn namespace_or_default(namespace: &str) -> &str {
    if is_blank(namespace) {
        "default"
    } else {
        namespace
    }
}

/// Comment returned in place of YAML for a resource that has no name yet
pub fn placeholder(kind: &str) -> String {
    format!(
        "# {} has no name yet.\n# Give it a name to generate its YAML.\n",
        kind
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> OrderedMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_later_sources_win() {
        let settings = ProjectSettings {
            name: "shop".to_string(),
            global_labels: map(&[("team", "core"), ("tier", "backend")]),
            ..Default::default()
        };
        let own = map(&[("tier", "frontend"), (APP_NAME_LABEL, "wrong")]);

        let labels = merge_labels(Some(&settings), &own, Some("web"));
        let pairs: Vec<(&str, &str)> = labels.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

        assert_eq!(
            pairs,
            vec![
                ("team", "core"),
                ("tier", "frontend"),
                (APP_NAME_LABEL, "web"),
                (PROJECT_LABEL, "shop"),
            ]
        );
    }

    #[test]
    fn test_no_settings_no_project_label() {
        let labels = merge_labels(None, &map(&[("a", "b"), ("  ", "x")]), None);
        assert_eq!(labels, map(&[("a", "b")]));

        let selector = selector_labels(None, "web");
        assert_eq!(selector, map(&[(APP_NAME_LABEL, "web")]));
    }

    #[test]
    fn test_object_meta_omits_namespace_key() {
        let meta = object_meta("viewer", None, &OrderedMap::new(), &OrderedMap::new());
        assert!(!meta.contains_key("namespace"));
        assert!(!meta.contains_key("labels"));
        assert_eq!(meta.len(), 1);
    }
}
