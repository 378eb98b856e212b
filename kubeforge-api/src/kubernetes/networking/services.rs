//! Service assembly for workloads

use crate::kubernetes::labels::{merge_labels, namespace_or_default, object_meta, selector_labels};
use crate::kubernetes::workloads::containers::container_label;
use crate::yaml::Mapping;
use kubeforge_common::{ContainerSpec, OrderedMap, ProjectSettings, ServiceType, WorkloadConfig};

/// Service fronting a workload's pods.
///
/// The first port is always the workload's `http` port; every container whose
/// own port differs from `targetPort` adds a pass-through port of its own.
pub fn service_manifest(
    workload: &WorkloadConfig,
    containers: &[ContainerSpec],
    settings: Option<&ProjectSettings>,
) -> Mapping {
    let labels = merge_labels(settings, &workload.labels, Some(&workload.app_name));

    let node_port = match workload.service_type {
        ServiceType::NodePort => workload.node_port.filter(|p| *p > 0),
        _ => None,
    };

    let mut ports = vec![Mapping::new()
        .insert("port", workload.port)
        .insert("targetPort", workload.target_port)
        .insert("protocol", "TCP")
        .insert("name", "http")
        .insert_opt("nodePort", node_port)];

    for (index, container) in containers.iter().enumerate() {
        match container.port {
            Some(port) if port > 0 && port != workload.target_port => {
                ports.push(
                    Mapping::new()
                        .insert("port", port)
                        .insert("targetPort", port)
                        .insert("protocol", "TCP")
                        .insert("name", format!("{}-port", container_label(container, index))),
                );
            }
            _ => {}
        }
    }

    Mapping::new()
        .insert("apiVersion", "v1")
        .insert("kind", "Service")
        .insert(
            "metadata",
            object_meta(
                &workload.service_name(),
                Some(namespace_or_default(&workload.namespace)),
                &labels,
                &OrderedMap::new(),
            ),
        )
        .insert(
            "spec",
            Mapping::new()
                .insert("selector", &selector_labels(settings, &workload.app_name))
                .insert("ports", ports)
                .insert("type", workload.service_type.as_str()),
        )
}
