//! Namespace type

use crate::OrderedMap;
use serde::{Deserialize, Serialize};

/// Namespaces every cluster ships with; the editor never deletes or duplicates them
pub const SYSTEM_NAMESPACES: [&str; 4] = ["default", "kube-system", "kube-public", "kube-node-lease"];

pub fn is_system_namespace(name: &str) -> bool {
    SYSTEM_NAMESPACES.contains(&name)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Namespace {
    pub name: String,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,
    pub created_at: Option<String>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_system(&self) -> bool {
        is_system_namespace(&self.name)
    }
}
