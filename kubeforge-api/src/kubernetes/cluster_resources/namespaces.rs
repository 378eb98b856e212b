//! Namespace manifests

use crate::kubernetes::labels::{merge_labels, object_meta, placeholder};
use crate::kubernetes::render_manifests;
use crate::yaml::{render, Mapping};
use kubeforge_common::{is_blank, Namespace, ProjectSettings};

/// Namespace manifest; `None` for unnamed and system namespaces, which every
/// cluster already has
pub fn namespace_manifest(namespace: &Namespace, settings: Option<&ProjectSettings>) -> Option<Mapping> {
    if is_blank(&namespace.name) || namespace.is_system() {
        return None;
    }

    let labels = merge_labels(settings, &namespace.labels, None);

    Some(
        Mapping::new()
            .insert("apiVersion", "v1")
            .insert("kind", "Namespace")
            .insert(
                "metadata",
                object_meta(&namespace.name, None, &labels, &namespace.annotations),
            ),
    )
}

pub fn render_namespace_yaml(namespace: &Namespace, settings: Option<&ProjectSettings>) -> String {
    if namespace.is_system() {
        return format!(
            "# Namespace \"{}\" is a system namespace and already exists in every cluster.\n",
            namespace.name
        );
    }
    match namespace_manifest(namespace, settings) {
        Some(manifest) => render(&manifest.into(), 0),
        None => placeholder("Namespace"),
    }
}

pub fn render_namespaces_yaml(namespaces: &[Namespace], settings: Option<&ProjectSettings>) -> String {
    render_manifests(namespaces.iter().filter_map(|ns| namespace_manifest(ns, settings)))
}
