//! Structural validity checks behind node status
//!
//! Each resource kind answers one question, how complete is it, and the
//! answer maps onto a `(status, syncStatus)` pair. These are heuristics over
//! the configured shape only; nothing here looks at a live cluster.

use kubeforge_common::{
    is_blank, ClusterRole, ConfigMap, DockerHubSecret, Job, Namespace, NodeStatus, PolicyRule,
    Role, RoleBinding, Secret, ServiceAccount, SyncStatus, WorkloadConfig,
};

/// How complete a configured resource is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Partial,
    Invalid,
}

impl Validity {
    pub fn status(self) -> (NodeStatus, SyncStatus) {
        match self {
            Self::Valid => (NodeStatus::Healthy, SyncStatus::Synced),
            Self::Partial => (NodeStatus::Warning, SyncStatus::OutOfSync),
            Self::Invalid => (NodeStatus::Error, SyncStatus::OutOfSync),
        }
    }

    /// Valid when both hold, partial when one does
    fn of_pair(first: bool, second: bool) -> Self {
        match (first, second) {
            (true, true) => Self::Valid,
            (true, false) | (false, true) => Self::Partial,
            (false, false) => Self::Invalid,
        }
    }
}

/// Validity predicate implemented once per resource kind
pub trait Validate {
    fn validity(&self) -> Validity;
}

impl Validate for WorkloadConfig {
    /// Valid when every container has a name and an image and both ports are
    /// positive; partial when the ports are fine and only some containers are
    /// complete.
    fn validity(&self) -> Validity {
        let containers = self.effective_containers();
        let complete = containers.iter().filter(|c| c.is_complete()).count();
        let ports = self.has_valid_ports();

        if ports && !containers.is_empty() && complete == containers.len() {
            Validity::Valid
        } else if ports && complete > 0 {
            Validity::Partial
        } else {
            Validity::Invalid
        }
    }
}

/// True when every container of the workload is complete
pub fn containers_valid(workload: &WorkloadConfig) -> bool {
    let containers = workload.effective_containers();
    !containers.is_empty() && containers.iter().all(|c| c.is_complete())
}

/// Status of the Service and Ingress nodes derived from a workload
pub fn service_status(workload: &WorkloadConfig) -> (NodeStatus, SyncStatus) {
    if containers_valid(workload) {
        (NodeStatus::Healthy, SyncStatus::Synced)
    } else {
        (NodeStatus::Warning, SyncStatus::OutOfSync)
    }
}

/// Status of the Pod node derived from a workload
pub fn pod_status(workload: &WorkloadConfig) -> (NodeStatus, SyncStatus) {
    if containers_valid(workload) {
        (NodeStatus::Healthy, SyncStatus::Synced)
    } else {
        (NodeStatus::Pending, SyncStatus::Unknown)
    }
}

impl Validate for ServiceAccount {
    fn validity(&self) -> Validity {
        Validity::of_pair(!is_blank(&self.name), !is_blank(&self.namespace))
    }
}

fn rules_validity(rules: &[PolicyRule]) -> Validity {
    if rules.is_empty() {
        Validity::Invalid
    } else if rules.iter().all(PolicyRule::is_complete) {
        Validity::Valid
    } else {
        Validity::Partial
    }
}

impl Validate for Role {
    fn validity(&self) -> Validity {
        rules_validity(&self.rules)
    }
}

impl Validate for ClusterRole {
    fn validity(&self) -> Validity {
        rules_validity(&self.rules)
    }
}

impl Validate for RoleBinding {
    /// Bindings are not checked structurally
    fn validity(&self) -> Validity {
        Validity::Valid
    }
}

impl Validate for Job {
    fn validity(&self) -> Validity {
        let identified = !is_blank(&self.name) && !is_blank(&self.namespace);
        match (identified, self.containers.is_empty()) {
            (true, false) => Validity::Valid,
            (true, true) => Validity::Partial,
            (false, _) => Validity::Invalid,
        }
    }
}

impl Validate for ConfigMap {
    fn validity(&self) -> Validity {
        match (is_blank(&self.name), self.data.is_empty()) {
            (false, false) => Validity::Valid,
            (false, true) => Validity::Partial,
            (true, _) => Validity::Invalid,
        }
    }
}

impl Validate for Secret {
    fn validity(&self) -> Validity {
        match (is_blank(&self.name), self.data.is_empty()) {
            (false, false) => Validity::Valid,
            (false, true) => Validity::Partial,
            (true, _) => Validity::Invalid,
        }
    }
}

impl Validate for DockerHubSecret {
    fn validity(&self) -> Validity {
        match (is_blank(&self.name), is_blank(&self.username)) {
            (false, false) => Validity::Valid,
            (false, true) => Validity::Partial,
            (true, _) => Validity::Invalid,
        }
    }
}

impl Validate for Namespace {
    fn validity(&self) -> Validity {
        if is_blank(&self.name) {
            Validity::Invalid
        } else {
            Validity::Valid
        }
    }
}
