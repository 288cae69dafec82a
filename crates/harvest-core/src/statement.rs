//! Graph statements: `(subject, predicate, object)` triples.
//!
//! The core only ever builds these values; turning them into document text
//! is the output layer's job.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The object position of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Object {
    /// A plain literal value.
    Literal(String),
    /// A reference to another graph entity.
    Resource(String),
}

impl Object {
    /// The lexical value, regardless of kind.
    pub fn value(&self) -> &str {
        match self {
            Self::Literal(v) | Self::Resource(v) => v,
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }
}

/// A single graph statement. Predicates are always expanded URIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

impl Statement {
    /// Statement whose object is a reference to `object`.
    pub fn resource(subject: &str, predicate: &str, object: &str) -> Self {
        Self {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: Object::Resource(object.to_string()),
        }
    }

    /// Statement whose object is the literal `object`.
    pub fn literal(subject: &str, predicate: &str, object: &str) -> Self {
        Self {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: Object::Literal(object.to_string()),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object {
            Object::Resource(o) => write!(f, "<{}> <{}> <{}>", self.subject, self.predicate, o),
            Object::Literal(o) => write!(f, "<{}> <{}> {:?}", self.subject, self.predicate, o),
        }
    }
}

/// One outgoing edge of an entity, as returned by a snapshot read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateObject {
    pub predicate: String,
    pub object: Object,
}

impl PredicateObject {
    pub fn new(predicate: impl Into<String>, object: Object) -> Self {
        Self {
            predicate: predicate.into(),
            object,
        }
    }
}
