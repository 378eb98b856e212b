//! Container and pod volume assembly

use crate::yaml::{Mapping, YamlValue};
use kubeforge_common::{
    is_blank, ContainerSpec, EnvSource, EnvVar, ResourceRequirements, Volume, VolumeType,
};

pub const DEFAULT_CPU_REQUEST: &str = "100m";
pub const DEFAULT_MEMORY_REQUEST: &str = "128Mi";

/// Names of whole ConfigMaps/Secrets injected into every container via `envFrom`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvFromRefs<'a> {
    pub config_maps: &'a [String],
    pub secrets: &'a [String],
}

/// Name used for a container's extra Service port and as fallback identity
pub fn container_label(container: &ContainerSpec, index: usize) -> String {
    if is_blank(&container.name) {
        format!("container-{}", index)
    } else {
        container.name.clone()
    }
}

/// Assemble one container entry
pub fn container_manifest(container: &ContainerSpec, env_from: EnvFromRefs<'_>) -> Mapping {
    let ports: Vec<Mapping> = container
        .port
        .filter(|p| *p > 0)
        .map(|p| Mapping::new().insert("containerPort", p))
        .into_iter()
        .collect();

    Mapping::new()
        .insert("name", &container.name)
        .insert("image", &container.image)
        .insert_nonempty("command", container.command.as_slice())
        .insert_nonempty("args", container.args.as_slice())
        .insert_nonempty("ports", ports)
        .insert_nonempty("env", env_entries(&container.env))
        .insert_nonempty("envFrom", env_from_entries(env_from))
        .insert("resources", resources(&container.resources))
        .insert_nonempty(
            "volumeMounts",
            container
                .volume_mounts
                .iter()
                .filter(|m| !is_blank(&m.name))
                .map(|m| {
                    Mapping::new()
                        .insert("name", &m.name)
                        .insert("mountPath", &m.mount_path)
                })
                .collect::<YamlValue>(),
        )
}

/// Env entries render as a literal value or as a key reference, never both
fn env_entries(env: &[EnvVar]) -> YamlValue {
    env.iter()
        .filter(|e| !is_blank(&e.name))
        .map(|e| match &e.value_from {
            Some(reference) => {
                let key_ref = match reference.source {
                    EnvSource::ConfigMap => "configMapKeyRef",
                    EnvSource::Secret => "secretKeyRef",
                };
                Mapping::new().insert("name", &e.name).insert(
                    "valueFrom",
                    Mapping::new().insert(
                        key_ref,
                        Mapping::new()
                            .insert("name", &reference.name)
                            .insert("key", &reference.key),
                    ),
                )
            }
            None => Mapping::new()
                .insert("name", &e.name)
                .insert("value", &e.value),
        })
        .collect()
}

fn env_from_entries(refs: EnvFromRefs<'_>) -> YamlValue {
    let config_maps = refs
        .config_maps
        .iter()
        .filter(|name| !is_blank(name))
        .map(|name| Mapping::new().insert("configMapRef", Mapping::new().insert("name", name)));
    let secrets = refs
        .secrets
        .iter()
        .filter(|name| !is_blank(name))
        .map(|name| Mapping::new().insert("secretRef", Mapping::new().insert("name", name)));

    config_maps.chain(secrets).collect()
}

/// Requests always carry cpu and memory; limits only when one of them is set
fn resources(requirements: &ResourceRequirements) -> Mapping {
    let requests = Mapping::new()
        .insert("cpu", or_default(&requirements.requests.cpu, DEFAULT_CPU_REQUEST))
        .insert(
            "memory",
            or_default(&requirements.requests.memory, DEFAULT_MEMORY_REQUEST),
        );

    let limits = &requirements.limits;
    let limits = (!limits.is_empty()).then(|| {
        Mapping::new()
            .insert_if("cpu", !is_blank(&limits.cpu), &limits.cpu)
            .insert_if("memory", !is_blank(&limits.memory), &limits.memory)
    });

    Mapping::new()
        .insert("requests", requests)
        .insert_opt("limits", limits)
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if is_blank(value) {
        default
    } else {
        value
    }
}

/// Pod-level `volumes` entries
pub fn pod_volumes(volumes: &[Volume]) -> YamlValue {
    volumes
        .iter()
        .filter(|v| !is_blank(&v.name))
        .map(|v| {
            let source = v.source_name().unwrap_or(&v.name);
            let base = Mapping::new().insert("name", &v.name);
            match v.volume_type {
                VolumeType::EmptyDir => base.insert("emptyDir", Mapping::new()),
                VolumeType::ConfigMap => {
                    base.insert("configMap", Mapping::new().insert("name", source))
                }
                VolumeType::Secret => {
                    base.insert("secret", Mapping::new().insert("secretName", source))
                }
            }
        })
        .collect()
}
