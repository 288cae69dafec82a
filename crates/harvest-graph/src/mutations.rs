//! Write operations for the triple graph.
//!
//! Additions MERGE so re-applying a delta is a no-op. Retractions delete
//! the matching relationship and leave the endpoint nodes in place.

use neo4rs::{query, Query};

use harvest_core::{Object, Statement, TripleDelta};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    /// Apply a delta in a single transaction: retractions first, then
    /// additions.
    pub async fn apply_delta(&self, delta: &TripleDelta) -> Result<(), GraphError> {
        let mut txn = self.start_txn().await?;
        for st in &delta.retractions {
            txn.run(retract_query(st)).await?;
        }
        for st in &delta.additions {
            txn.run(assert_query(st)).await?;
        }
        txn.commit().await?;

        tracing::info!(
            additions = delta.additions.len(),
            retractions = delta.retractions.len(),
            "Applied delta to graph"
        );
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn assert_query(st: &Statement) -> Query {
    let cypher = match &st.object {
        Object::Resource(_) => {
            "MERGE (s:Resource {uri: $subject})
             MERGE (o:Resource {uri: $object})
             MERGE (s)-[:TRIPLE {predicate: $predicate}]->(o)"
        }
        Object::Literal(_) => {
            "MERGE (s:Resource {uri: $subject})
             MERGE (s)-[:TRIPLE {predicate: $predicate}]->(o:Literal {value: $object})"
        }
    };
    bind(query(cypher), st)
}

fn retract_query(st: &Statement) -> Query {
    let cypher = match &st.object {
        Object::Resource(_) => {
            "MATCH (s:Resource {uri: $subject})-[t:TRIPLE {predicate: $predicate}]->(o:Resource {uri: $object})
             DELETE t"
        }
        Object::Literal(_) => {
            "MATCH (s:Resource {uri: $subject})-[t:TRIPLE {predicate: $predicate}]->(o:Literal {value: $object})
             DELETE t, o"
        }
    };
    bind(query(cypher), st)
}

fn bind(q: Query, st: &Statement) -> Query {
    q.param("subject", st.subject.clone())
        .param("predicate", st.predicate.clone())
        .param("object", st.object.value().to_string())
}
