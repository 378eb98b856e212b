//! Kubernetes-flavored YAML emitter
//!
//! Resources are assembled as [`YamlValue`] trees whose mappings keep
//! insertion order, then rendered by [`render`]. Field order in the output is
//! exactly the order fields were inserted, so callers build `apiVersion`,
//! `kind`, `metadata` first.
//!
//! [`Mapping`] is the single place where optional fields are dropped: a key
//! whose value is [`YamlValue::Null`] is never emitted.

mod emitter;

pub use emitter::{needs_quoting, quote_scalar, render, render_documents, DOCUMENT_SEPARATOR};

use indexmap::IndexMap;
use kubeforge_common::OrderedMap;

/// A node in a resource tree
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<YamlValue>),
    Map(Mapping),
}

impl YamlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for an empty sequence or mapping
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Self::Seq(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for YamlValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for YamlValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for YamlValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for YamlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for YamlValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for YamlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for YamlValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for YamlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Mapping> for YamlValue {
    fn from(value: Mapping) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<YamlValue>> From<Vec<T>> for YamlValue {
    fn from(value: Vec<T>) -> Self {
        Self::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<YamlValue>> From<Option<T>> for YamlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<&OrderedMap> for YamlValue {
    fn from(value: &OrderedMap) -> Self {
        Self::Map(Mapping::from(value))
    }
}

impl From<&[String]> for YamlValue {
    fn from(value: &[String]) -> Self {
        Self::Seq(value.iter().map(YamlValue::from).collect())
    }
}

impl<T: Into<YamlValue>> FromIterator<T> for YamlValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Seq(iter.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered mapping and the conditional-key builder used by every
/// manifest assembler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: IndexMap<String, YamlValue>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Re-inserting a key replaces its value and keeps its position.
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<YamlValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Add a field only when `value` is `Some`
    pub fn insert_opt<V: Into<YamlValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.insert(key, value),
            None => self,
        }
    }

    /// Add a field only when `condition` holds
    pub fn insert_if(self, key: impl Into<String>, condition: bool, value: impl Into<YamlValue>) -> Self {
        if condition {
            self.insert(key, value)
        } else {
            self
        }
    }

    /// Add a field only when it is not an empty sequence or mapping
    pub fn insert_nonempty(self, key: impl Into<String>, value: impl Into<YamlValue>) -> Self {
        let value = value.into();
        if value.is_empty_collection() {
            self
        } else {
            self.insert(key, value)
        }
    }

    /// In-place variant of [`Mapping::insert`]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<YamlValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &YamlValue)> {
        self.entries.iter()
    }
}

impl From<&OrderedMap> for Mapping {
    fn from(value: &OrderedMap) -> Self {
        value
            .iter()
            .map(|(k, v)| (k.clone(), YamlValue::Str(v.clone())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<YamlValue>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}
