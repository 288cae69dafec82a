//! The graph access seam used by the harvester.

use harvest_core::{PredicateObject, TripleDelta};

use crate::client::{GraphClient, GraphError};

/// Read/write access to a triple store.
///
/// Predicates and type URIs are always passed in expanded form.
#[allow(async_fn_in_trait)]
pub trait GraphStore {
    /// All outgoing (predicate, object) pairs of a subject.
    async fn fetch_triples(&self, uri: &str) -> Result<Vec<PredicateObject>, GraphError>;

    /// A subject carrying `predicate` with value `value`, if any.
    async fn find_uri_by_property(
        &self,
        predicate: &str,
        value: &str,
    ) -> Result<Option<String>, GraphError>;

    /// `(label, uri)` pairs for every labelled instance of a type.
    async fn labelled_instances(&self, type_uri: &str)
        -> Result<Vec<(String, String)>, GraphError>;

    /// Apply retractions then additions atomically.
    async fn apply_delta(&self, delta: &TripleDelta) -> Result<(), GraphError>;
}

impl GraphStore for GraphClient {
    async fn fetch_triples(&self, uri: &str) -> Result<Vec<PredicateObject>, GraphError> {
        GraphClient::fetch_triples(self, uri).await
    }

    async fn find_uri_by_property(
        &self,
        predicate: &str,
        value: &str,
    ) -> Result<Option<String>, GraphError> {
        GraphClient::find_uri_by_property(self, predicate, value).await
    }

    async fn labelled_instances(
        &self,
        type_uri: &str,
    ) -> Result<Vec<(String, String)>, GraphError> {
        GraphClient::labelled_instances(self, type_uri).await
    }

    async fn apply_delta(&self, delta: &TripleDelta) -> Result<(), GraphError> {
        GraphClient::apply_delta(self, delta).await
    }
}
