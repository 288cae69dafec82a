//! Read operations against the triple graph.

use neo4rs::query;

use harvest_core::{vocab, Object, PredicateObject};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    /// Fetch every outgoing triple of `uri` as (predicate, object) pairs.
    pub async fn fetch_triples(&self, uri: &str) -> Result<Vec<PredicateObject>, GraphError> {
        let q = query(
            "MATCH (s:Resource {uri: $uri})-[t:TRIPLE]->(o)
             RETURN t.predicate AS predicate, o.uri AS object_uri, o.value AS object_value",
        )
        .param("uri", uri.to_string());

        let rows = self.query_rows(q).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let predicate: String = row.get("predicate").map_err(|e| {
                GraphError::Serialization(format!("Failed to read predicate: {e}"))
            })?;
            let object = match (
                row.get::<String>("object_uri").ok(),
                row.get::<String>("object_value").ok(),
            ) {
                (Some(o), _) => Object::Resource(o),
                (None, Some(v)) => Object::Literal(v),
                (None, None) => {
                    tracing::warn!(%uri, %predicate, "Triple object has neither uri nor value");
                    continue;
                }
            };
            out.push(PredicateObject::new(predicate, object));
        }
        Ok(out)
    }

    /// Find a subject carrying `predicate` with the given value.
    ///
    /// The value is matched against both literal values and resource URIs.
    pub async fn find_uri_by_property(
        &self,
        predicate: &str,
        value: &str,
    ) -> Result<Option<String>, GraphError> {
        let q = query(
            "MATCH (s:Resource)-[:TRIPLE {predicate: $predicate}]->(o)
             WHERE o.value = $value OR o.uri = $value
             RETURN s.uri AS uri
             ORDER BY s.uri
             LIMIT 1",
        )
        .param("predicate", predicate.to_string())
        .param("value", value.to_string());

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<String>("uri").ok()),
            None => Ok(None),
        }
    }

    /// List `(label, uri)` for every instance of `type_uri` with an rdfs:label.
    pub async fn labelled_instances(
        &self,
        type_uri: &str,
    ) -> Result<Vec<(String, String)>, GraphError> {
        let q = query(
            "MATCH (s:Resource)-[:TRIPLE {predicate: $rdf_type}]->(:Resource {uri: $type_uri})
             MATCH (s)-[:TRIPLE {predicate: $rdfs_label}]->(l:Literal)
             RETURN l.value AS label, s.uri AS uri
             ORDER BY s.uri",
        )
        .param("rdf_type", vocab::expand(vocab::RDF_TYPE))
        .param("type_uri", type_uri.to_string())
        .param("rdfs_label", vocab::expand(vocab::RDFS_LABEL));

        let rows = self.query_rows(q).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let label = row.get::<String>("label").ok()?;
                let uri = row.get::<String>("uri").ok()?;
                Some((label, uri))
            })
            .collect())
    }
}
