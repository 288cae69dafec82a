//! Key tables: the static attribute → (predicate, update strategy) mapping
//! that drives both snapshot reading and reconciliation for one entity type.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::vocab;

/// How an attribute is brought in line with its source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStrategy {
    /// Single-valued literal, e.g. an entity label.
    SingleLiteral,
    /// Single-valued reference to another entity, e.g. a publisher.
    SingleReference,
    /// Set of literal values, e.g. phone numbers.
    LiteralSet,
    /// Set of references, e.g. subject-area concepts.
    ReferenceSet,
}

impl UpdateStrategy {
    pub fn is_reference(self) -> bool {
        matches!(self, Self::SingleReference | Self::ReferenceSet)
    }

    pub fn is_set(self) -> bool {
        matches!(self, Self::LiteralSet | Self::ReferenceSet)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleLiteral => "literal",
            Self::SingleReference => "resource",
            Self::LiteralSet => "literal_list",
            Self::ReferenceSet => "resource_list",
        }
    }
}

impl FromStr for UpdateStrategy {
    type Err = String;

    /// Accepts the legacy action tags (`literal`, `resource`, `literal_list`,
    /// `resource_list`) as well as the descriptive names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "literal" | "single_literal" => Ok(Self::SingleLiteral),
            "resource" | "single_reference" => Ok(Self::SingleReference),
            "literal_list" | "literal_set" => Ok(Self::LiteralSet),
            "resource_list" | "reference_set" => Ok(Self::ReferenceSet),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One key-table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSpec {
    /// Expanded predicate URI.
    pub predicate: String,
    pub strategy: UpdateStrategy,
}

impl AttributeSpec {
    /// Build an entry; prefixed predicate names are expanded.
    pub fn new(predicate: &str, strategy: UpdateStrategy) -> Self {
        Self {
            predicate: vocab::expand(predicate),
            strategy,
        }
    }
}

/// Key-table entry as written in configuration: `{"predicate": .., "action": ..}`.
#[derive(Debug, Deserialize)]
struct RawAttributeSpec {
    predicate: String,
    action: String,
}

/// An ordered attribute → [`AttributeSpec`] table.
///
/// Declaration order is preserved and determines the order of emitted
/// statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyTable {
    entries: Vec<(String, AttributeSpec)>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any earlier entry for the same attribute.
    pub fn with(mut self, attr: &str, predicate: &str, strategy: UpdateStrategy) -> Self {
        self.insert(attr, AttributeSpec::new(predicate, strategy));
        self
    }

    pub fn insert(&mut self, attr: &str, spec: AttributeSpec) {
        match self.entries.iter_mut().find(|(a, _)| a == attr) {
            Some((_, existing)) => *existing = spec,
            None => self.entries.push((attr.to_string(), spec)),
        }
    }

    pub fn get(&self, attr: &str) -> Option<&AttributeSpec> {
        self.entries
            .iter()
            .find(|(a, _)| a == attr)
            .map(|(_, spec)| spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeSpec)> {
        self.entries.iter().map(|(a, spec)| (a.as_str(), spec))
    }

    /// Attributes mapped to the given expanded predicate.
    pub fn attrs_for_predicate<'a>(
        &'a self,
        predicate: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a AttributeSpec)> + 'a {
        self.iter().filter(move |(_, spec)| spec.predicate == predicate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a key table from its JSON form.
    ///
    /// Unknown action tags are a configuration error; no entry is ever
    /// silently dropped. Entries come out in attribute-name order.
    pub fn from_json_str(json: &str) -> Result<Self, HarvestError> {
        let raw: BTreeMap<String, RawAttributeSpec> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: BTreeMap<String, RawAttributeSpec>) -> Result<Self, HarvestError> {
        let mut table = Self::new();
        for (attr, entry) in raw {
            if entry.predicate.trim().is_empty() {
                return Err(HarvestError::Configuration(format!(
                    "attribute '{attr}' has an empty predicate"
                )));
            }
            let strategy = entry.action.parse::<UpdateStrategy>().map_err(|strategy| {
                HarvestError::UnknownStrategy {
                    attribute: attr.clone(),
                    strategy,
                }
            })?;
            table.insert(&attr, AttributeSpec::new(&entry.predicate, strategy));
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parses_legacy_and_descriptive_tags() {
        assert_eq!("literal".parse::<UpdateStrategy>(), Ok(UpdateStrategy::SingleLiteral));
        assert_eq!("resource".parse::<UpdateStrategy>(), Ok(UpdateStrategy::SingleReference));
        assert_eq!("literal_list".parse::<UpdateStrategy>(), Ok(UpdateStrategy::LiteralSet));
        assert_eq!("resource_list".parse::<UpdateStrategy>(), Ok(UpdateStrategy::ReferenceSet));
        assert_eq!("single-literal".parse::<UpdateStrategy>(), Ok(UpdateStrategy::SingleLiteral));
        assert_eq!("reference-set".parse::<UpdateStrategy>(), Ok(UpdateStrategy::ReferenceSet));
        assert!("bogus".parse::<UpdateStrategy>().is_err());
    }

    #[test]
    fn test_unknown_strategy_is_configuration_error() {
        let err = KeyTable::from_json_str(r#"{"x": {"predicate": "p", "action": "bogus"}}"#)
            .unwrap_err();
        match err {
            HarvestError::UnknownStrategy {
                attribute,
                strategy,
            } => {
                assert_eq!(attribute, "x");
                assert_eq!(strategy, "bogus");
            }
            other => panic!("expected UnknownStrategy, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_expands_predicates() {
        let table = KeyTable::from_json_str(
            r#"{
                "concept_uris": {"predicate": "vivo:hasSubjectArea", "action": "resource_list"},
                "title": {"predicate": "rdfs:label", "action": "literal"}
            }"#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let title = table.get("title").unwrap();
        assert_eq!(title.predicate, "http://www.w3.org/2000/01/rdf-schema#label");
        assert_eq!(title.strategy, UpdateStrategy::SingleLiteral);
        assert!(table.get("concept_uris").unwrap().strategy.is_reference());
    }

    #[test]
    fn test_empty_predicate_rejected() {
        let err = KeyTable::from_json_str(r#"{"x": {"predicate": " ", "action": "literal"}}"#)
            .unwrap_err();
        assert!(matches!(err, HarvestError::Configuration(_)));
    }

    #[test]
    fn test_builder_preserves_order_and_replaces() {
        let table = KeyTable::new()
            .with("b", "rdfs:label", UpdateStrategy::SingleLiteral)
            .with("a", "vivo:description", UpdateStrategy::SingleLiteral)
            .with("b", "rdfs:label", UpdateStrategy::LiteralSet);

        let attrs: Vec<_> = table.iter().map(|(a, _)| a).collect();
        assert_eq!(attrs, vec!["b", "a"]);
        assert_eq!(table.get("b").unwrap().strategy, UpdateStrategy::LiteralSet);
    }
}
