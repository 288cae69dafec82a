//! Entity records: attribute name → value mappings with an optional graph identity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The value of one attribute: a single string or a collection of strings.
///
/// Whether the strings are literals or URIs is decided by the key table,
/// not by the value itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Single(String),
    Many(Vec<String>),
}

impl AttrValue {
    /// Non-empty values in insertion order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(v) => vec![v.as_str()],
            Self::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect()
    }

    /// The first non-empty value.
    pub fn first(&self) -> Option<&str> {
        self.values().into_iter().next()
    }
}

/// A structured view of one entity, either as stored in the graph
/// (`current`) or as derived from a source record (`target`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub uri: Option<String>,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, AttrValue>,
}

impl EntityRecord {
    /// An empty record for a known graph identity.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            attrs: BTreeMap::new(),
        }
    }

    /// An empty record whose graph identity is not yet known.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Set a single-valued attribute, replacing any previous value.
    pub fn set(&mut self, attr: &str, value: impl Into<String>) {
        self.attrs
            .insert(attr.to_string(), AttrValue::Single(value.into()));
    }

    /// Set a single-valued attribute only when `value` is present.
    pub fn set_opt(&mut self, attr: &str, value: Option<impl Into<String>>) {
        if let Some(v) = value {
            self.set(attr, v);
        }
    }

    /// Append to a multi-valued attribute, creating it if absent.
    ///
    /// A single value already stored under `attr` is promoted to a list.
    pub fn push(&mut self, attr: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.remove(attr) {
            None => {
                self.attrs.insert(attr.to_string(), AttrValue::Many(vec![value]));
            }
            Some(AttrValue::Single(prev)) => {
                self.attrs
                    .insert(attr.to_string(), AttrValue::Many(vec![prev, value]));
            }
            Some(AttrValue::Many(mut vs)) => {
                vs.push(value);
                self.attrs.insert(attr.to_string(), AttrValue::Many(vs));
            }
        }
    }

    /// Replace a multi-valued attribute wholesale.
    pub fn set_many(&mut self, attr: &str, values: Vec<String>) {
        self.attrs.insert(attr.to_string(), AttrValue::Many(values));
    }

    pub fn get(&self, attr: &str) -> Option<&AttrValue> {
        self.attrs.get(attr)
    }

    /// The single value of `attr`; absent and empty both yield `None`.
    pub fn single(&self, attr: &str) -> Option<&str> {
        self.attrs.get(attr).and_then(AttrValue::first)
    }

    /// All non-empty values of `attr`, empty when absent.
    pub fn values(&self, attr: &str) -> Vec<&str> {
        self.attrs
            .get(attr)
            .map(AttrValue::values)
            .unwrap_or_default()
    }
}
