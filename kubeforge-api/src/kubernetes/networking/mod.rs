//! Networking resources generated for workloads: Services and Ingresses

pub mod ingress;
pub mod services;

pub use ingress::{ingress_manifest, ingress_name};
pub use services::service_manifest;
