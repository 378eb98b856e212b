//! Ingress assembly for workloads

use crate::kubernetes::labels::{merge_labels, namespace_or_default, object_meta};
use crate::yaml::{Mapping, YamlValue};
use kubeforge_common::{is_blank, IngressPath, ProjectSettings, WorkloadConfig};

/// Name of the Ingress generated for a workload
pub fn ingress_name(workload: &WorkloadConfig) -> String {
    format!("{}-ingress", workload.app_name)
}

/// Ingress for a workload; `None` unless ingress is enabled with at least one rule
pub fn ingress_manifest(workload: &WorkloadConfig, settings: Option<&ProjectSettings>) -> Option<Mapping> {
    let ingress = &workload.ingress;
    if !ingress.is_active() {
        return None;
    }

    let labels = merge_labels(settings, &workload.labels, Some(&workload.app_name));

    let tls: YamlValue = ingress
        .tls
        .iter()
        .map(|t| {
            Mapping::new()
                .insert_nonempty("hosts", t.hosts.as_slice())
                .insert_if("secretName", !is_blank(&t.secret_name), &t.secret_name)
        })
        .collect();

    let rules: YamlValue = ingress
        .rules
        .iter()
        .map(|rule| {
            let paths: Vec<Mapping> = if rule.paths.is_empty() {
                vec![path_entry(&IngressPath::default(), workload)]
            } else {
                rule.paths.iter().map(|p| path_entry(p, workload)).collect()
            };

            Mapping::new()
                .insert_if("host", !is_blank(&rule.host), &rule.host)
                .insert("http", Mapping::new().insert("paths", paths))
        })
        .collect();

    Some(
        Mapping::new()
            .insert("apiVersion", "networking.k8s.io/v1")
            .insert("kind", "Ingress")
            .insert(
                "metadata",
                object_meta(
                    &ingress_name(workload),
                    Some(namespace_or_default(&workload.namespace)),
                    &labels,
                    &ingress.annotations,
                ),
            )
            .insert(
                "spec",
                Mapping::new()
                    .insert_opt(
                        "ingressClassName",
                        ingress.class_name.as_deref().filter(|c| !is_blank(c)),
                    )
                    .insert_nonempty("tls", tls)
                    .insert("rules", rules),
            ),
    )
}

/// Backends default to the workload's own Service and port
fn path_entry(path: &IngressPath, workload: &WorkloadConfig) -> Mapping {
    let service_name = path
        .service_name
        .clone()
        .filter(|name| !is_blank(name))
        .unwrap_or_else(|| workload.service_name());
    let service_port = path.service_port.filter(|p| *p > 0).unwrap_or(workload.port);

    Mapping::new()
        .insert("path", if is_blank(&path.path) { "/" } else { path.path.as_str() })
        .insert("pathType", if is_blank(&path.path_type) { "Prefix" } else { path.path_type.as_str() })
        .insert(
            "backend",
            Mapping::new().insert(
                "service",
                Mapping::new()
                    .insert("name", service_name)
                    .insert("port", Mapping::new().insert("number", service_port)),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::render;
    use kubeforge_common::{IngressConfig, IngressRule, IngressTls};

    fn workload_with_ingress(enabled: bool, rules: Vec<IngressRule>) -> WorkloadConfig {
        WorkloadConfig {
            app_name: "web".to_string(),
            ingress: IngressConfig {
                enabled,
                rules,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_inactive_ingress_is_skipped() {
        let rule = IngressRule {
            host: "shop.example.com".to_string(),
            paths: vec![],
        };
        assert!(ingress_manifest(&workload_with_ingress(false, vec![rule]), None).is_none());
        assert!(ingress_manifest(&workload_with_ingress(true, vec![]), None).is_none());
    }

    #[test]
    fn test_rule_defaults_to_workload_service() {
        let rule = IngressRule {
            host: "shop.example.com".to_string(),
            paths: vec![],
        };
        let mut config = workload_with_ingress(true, vec![rule]);
        config.ingress.class_name = Some("nginx".to_string());
        config.ingress.tls = vec![IngressTls {
            hosts: vec!["shop.example.com".to_string()],
            secret_name: "shop-tls".to_string(),
        }];

        let text = render(&ingress_manifest(&config, None).unwrap().into(), 0);
        assert!(text.contains("  name: web-ingress\n"));
        assert!(text.contains("  ingressClassName: nginx\n"));
        assert!(text.contains("        - shop.example.com\n      secretName: shop-tls\n"));
        assert!(text.contains("            path: /\n            pathType: Prefix\n"));
        assert!(text.contains("                name: web-service\n"));
        assert!(text.contains("                  number: 80\n"));
    }
}
