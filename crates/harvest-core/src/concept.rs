//! Run-scoped concept cache: normalized concept name → concept URI.
//!
//! The cache is bulk-loaded from the graph once, before any record is
//! processed, and grows as new concepts are minted. Entries are never
//! overwritten or evicted within a run. Lookup-or-create takes `&mut self`,
//! so two records can never race to mint the same concept.

use std::collections::{HashMap, HashSet};

use crate::error::HarvestError;
use crate::factory::{EntityFactory, Provenance, UriMinter};
use crate::statement::Statement;
use crate::vocab;

/// Result of [`ConceptCache::lookup_or_create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptLookup {
    pub uri: String,
    pub created: bool,
    /// Statements asserting the concept; empty on a cache hit.
    pub additions: Vec<Statement>,
}

pub struct ConceptCache {
    entries: HashMap<String, String>,
    placeholders: HashSet<String>,
    provenance: Provenance,
}

impl ConceptCache {
    /// An empty cache rejecting the given placeholder tokens (compared
    /// after normalization).
    pub fn new<I, S>(placeholders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: HashMap::new(),
            placeholders: placeholders
                .into_iter()
                .map(|p| title_case(p.as_ref().trim()))
                .collect(),
            provenance: Provenance::Stamp,
        }
    }

    /// Whether newly minted concepts carry a provenance stamp (default: yes).
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Bulk-load existing `(label, uri)` pairs. The first URI seen for a
    /// normalized name wins. Returns the number of entries added.
    pub fn load<I>(&mut self, concepts: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut added = 0;
        for (label, uri) in concepts {
            let Some(name) = self.normalize(&label) else {
                continue;
            };
            match self.entries.get(&name) {
                Some(existing) if existing != &uri => {
                    tracing::debug!(
                        name = %name,
                        kept = %existing,
                        ignored = %uri,
                        "Duplicate concept label in graph"
                    );
                }
                Some(_) => {}
                None => {
                    self.entries.insert(name, uri);
                    added += 1;
                }
            }
        }
        added
    }

    /// Normalize a concept name; `None` for empty names and placeholders.
    pub fn normalize(&self, name: &str) -> Option<String> {
        let name = title_case(name.trim());
        (!name.is_empty() && !self.placeholders.contains(&name)).then_some(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.normalize(name)
            .and_then(|n| self.entries.get(&n))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the URI for `name`, minting a new concept on a miss.
    ///
    /// Callers filter empty names and placeholders first; passing one is
    /// an error.
    pub fn lookup_or_create<M: UriMinter>(
        &mut self,
        name: &str,
        factory: &mut EntityFactory<M>,
    ) -> Result<ConceptLookup, HarvestError> {
        let name = self
            .normalize(name)
            .ok_or_else(|| HarvestError::InvalidConceptName(name.to_string()))?;

        if let Some(uri) = self.entries.get(&name) {
            return Ok(ConceptLookup {
                uri: uri.clone(),
                created: false,
                additions: Vec::new(),
            });
        }

        let created = factory.create(vocab::CONCEPT, None, self.provenance);
        let mut additions = created.additions;
        additions.push(Statement::literal(
            &created.uri,
            &vocab::expand(vocab::RDFS_LABEL),
            &name,
        ));

        tracing::info!(concept = %name, uri = %created.uri, "Created concept");
        self.entries.insert(name, created.uri.clone());

        Ok(ConceptLookup {
            uri: created.uri,
            created: true,
            additions,
        })
    }
}

/// Title-case a name: the first letter of every run of letters is
/// upper-cased and the rest lower-cased ("heart FAILURE" → "Heart Failure",
/// "o'neil" → "O'Neil").
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_is_letter = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
