//! Entity creation: identity allocation, type assertions, provenance stamps.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::statement::Statement;
use crate::vocab;

/// Allocates fresh entity URIs.
pub trait UriMinter {
    /// Return a URI never returned before by this minter.
    fn allocate_uri(&mut self) -> String;
}

/// Mints `{namespace}n{uuid}` URIs and remembers every URI it handed out.
#[derive(Debug, Clone)]
pub struct NamespaceMinter {
    namespace: String,
    issued: HashSet<String>,
}

impl NamespaceMinter {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            issued: HashSet::new(),
        }
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

impl UriMinter for NamespaceMinter {
    fn allocate_uri(&mut self) -> String {
        loop {
            let uri = format!("{}n{}", self.namespace, Uuid::new_v4().simple());
            if self.issued.insert(uri.clone()) {
                return uri;
            }
        }
    }
}

/// When and by whom an entity was harvested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceStamp {
    pub harvested_at: DateTime<Utc>,
    pub harvested_by: String,
}

impl ProvenanceStamp {
    pub fn now(agent: &str) -> Self {
        Self {
            harvested_at: Utc::now(),
            harvested_by: agent.to_string(),
        }
    }

    /// Timestamp in the literal form written to the graph.
    pub fn timestamp(&self) -> String {
        self.harvested_at.to_rfc3339()
    }

    /// The `dateHarvested` / `harvestedBy` statement pair for `subject`.
    pub fn statements(&self, subject: &str) -> [Statement; 2] {
        [
            Statement::literal(subject, &vocab::expand(vocab::DATE_HARVESTED), &self.timestamp()),
            Statement::literal(subject, &vocab::expand(vocab::HARVESTED_BY), &self.harvested_by),
        ]
    }
}

/// Whether a newly created entity gets a provenance stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Stamp,
    Skip,
}

/// A newly created (or explicitly identified) entity and its assertions.
#[derive(Debug, Clone)]
pub struct CreatedEntity {
    pub uri: String,
    pub additions: Vec<Statement>,
    pub stamp: Option<ProvenanceStamp>,
}

/// Creates graph entities with type assertions and optional provenance.
pub struct EntityFactory<M = NamespaceMinter> {
    minter: M,
    agent: String,
}

impl<M: UriMinter> EntityFactory<M> {
    /// `agent` is the harvesting-agent label written into provenance stamps.
    pub fn new(minter: M, agent: impl Into<String>) -> Self {
        Self {
            minter,
            agent: agent.into(),
        }
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Create an entity of type `type_tag`.
    ///
    /// With `explicit_uri` the statements are asserted onto that identity;
    /// otherwise a fresh URI is allocated. Always asserts `owl:Thing` plus
    /// the specific type.
    pub fn create(
        &mut self,
        type_tag: &str,
        explicit_uri: Option<&str>,
        provenance: Provenance,
    ) -> CreatedEntity {
        let uri = match explicit_uri {
            Some(uri) => uri.to_string(),
            None => self.minter.allocate_uri(),
        };

        let rdf_type = vocab::expand(vocab::RDF_TYPE);
        let mut additions = vec![
            Statement::resource(&uri, &rdf_type, &vocab::expand(vocab::THING)),
            Statement::resource(&uri, &rdf_type, &vocab::expand(type_tag)),
        ];

        let stamp = match provenance {
            Provenance::Stamp => {
                let stamp = ProvenanceStamp::now(&self.agent);
                additions.extend(stamp.statements(&uri));
                Some(stamp)
            }
            Provenance::Skip => None,
        };

        tracing::debug!(uri = %uri, type_tag, minted = explicit_uri.is_none(), "Entity created");

        CreatedEntity {
            uri,
            additions,
            stamp,
        }
    }
}
