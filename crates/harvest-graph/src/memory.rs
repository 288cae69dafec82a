//! In-process triple store.
//!
//! Keeps statements in insertion order so set-valued reads come back in
//! the order they were asserted.

use tokio::sync::RwLock;

use harvest_core::{vocab, Object, PredicateObject, Statement, TripleDelta};

use crate::client::GraphError;
use crate::store::GraphStore;

#[derive(Debug, Default)]
pub struct MemoryGraph {
    statements: RwLock<Vec<Statement>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with statements (duplicates are dropped).
    pub fn with_statements(statements: impl IntoIterator<Item = Statement>) -> Self {
        let mut seeded: Vec<Statement> = Vec::new();
        for st in statements {
            if !seeded.contains(&st) {
                seeded.push(st);
            }
        }
        Self {
            statements: RwLock::new(seeded),
        }
    }

    pub async fn len(&self) -> usize {
        self.statements.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.statements.read().await.is_empty()
    }

    pub async fn contains(&self, st: &Statement) -> bool {
        self.statements.read().await.contains(st)
    }

    /// Snapshot of every stored statement.
    pub async fn statements(&self) -> Vec<Statement> {
        self.statements.read().await.clone()
    }
}

impl GraphStore for MemoryGraph {
    async fn fetch_triples(&self, uri: &str) -> Result<Vec<PredicateObject>, GraphError> {
        let guard = self.statements.read().await;
        Ok(guard
            .iter()
            .filter(|st| st.subject == uri)
            .map(|st| PredicateObject::new(st.predicate.clone(), st.object.clone()))
            .collect())
    }

    async fn find_uri_by_property(
        &self,
        predicate: &str,
        value: &str,
    ) -> Result<Option<String>, GraphError> {
        let guard = self.statements.read().await;
        Ok(guard
            .iter()
            .filter(|st| st.predicate == predicate && st.object.value() == value)
            .map(|st| st.subject.clone())
            .min())
    }

    async fn labelled_instances(
        &self,
        type_uri: &str,
    ) -> Result<Vec<(String, String)>, GraphError> {
        let rdf_type = vocab::expand(vocab::RDF_TYPE);
        let rdfs_label = vocab::expand(vocab::RDFS_LABEL);
        let guard = self.statements.read().await;

        let typed: Vec<&str> = guard
            .iter()
            .filter(|st| {
                st.predicate == rdf_type && st.object == Object::Resource(type_uri.to_string())
            })
            .map(|st| st.subject.as_str())
            .collect();

        let mut out: Vec<(String, String)> = guard
            .iter()
            .filter(|st| st.predicate == rdfs_label && typed.contains(&st.subject.as_str()))
            .filter_map(|st| match &st.object {
                Object::Literal(label) => Some((label.clone(), st.subject.clone())),
                Object::Resource(_) => None,
            })
            .collect();
        out.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(out)
    }

    async fn apply_delta(&self, delta: &TripleDelta) -> Result<(), GraphError> {
        let mut guard = self.statements.write().await;
        guard.retain(|st| !delta.retractions.contains(st));
        for st in &delta.additions {
            if !guard.contains(st) {
                guard.push(st.clone());
            }
        }
        tracing::debug!(
            additions = delta.additions.len(),
            retractions = delta.retractions.len(),
            total = guard.len(),
            "Applied delta to memory graph"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str, p: &str, o: &str) -> Statement {
        Statement::literal(s, &vocab::expand(p), o)
    }

    fn res(s: &str, p: &str, o: &str) -> Statement {
        Statement::resource(s, &vocab::expand(p), &vocab::expand(o))
    }

    #[tokio::test]
    async fn test_fetch_triples_preserves_insertion_order() {
        let g = MemoryGraph::with_statements([
            lit("ex:s1", "rdfs:label", "Study"),
            res("ex:s1", "vivo:hasSubjectArea", "ex:c2"),
            res("ex:s1", "vivo:hasSubjectArea", "ex:c1"),
            lit("ex:s2", "rdfs:label", "Other"),
        ]);

        let triples = g.fetch_triples("ex:s1").await.unwrap();
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[1].object, Object::Resource("ex:c2".into()));
        assert_eq!(triples[2].object, Object::Resource("ex:c1".into()));
    }

    #[tokio::test]
    async fn test_find_uri_by_property() {
        let g = MemoryGraph::with_statements([
            lit("ex:s1", vocab::IRB_NUMBER, "201500123"),
            lit("ex:s2", vocab::IRB_NUMBER, "201500999"),
        ]);
        let irb = vocab::expand(vocab::IRB_NUMBER);

        assert_eq!(
            g.find_uri_by_property(&irb, "201500999").await.unwrap(),
            Some("ex:s2".to_string())
        );
        assert_eq!(g.find_uri_by_property(&irb, "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_labelled_instances() {
        let g = MemoryGraph::with_statements([
            res("ex:c1", "rdf:type", "skos:Concept"),
            lit("ex:c1", "rdfs:label", "Diabetes"),
            res("ex:c2", "rdf:type", "skos:Concept"),
            lit("ex:c2", "rdfs:label", "Asthma"),
            res("ex:p1", "rdf:type", "foaf:Person"),
            lit("ex:p1", "rdfs:label", "Smith, Ann"),
        ]);

        let concepts = g
            .labelled_instances(&vocab::expand(vocab::CONCEPT))
            .await
            .unwrap();
        assert_eq!(
            concepts,
            vec![
                ("Diabetes".to_string(), "ex:c1".to_string()),
                ("Asthma".to_string(), "ex:c2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_delta_is_idempotent() {
        let old = lit("ex:s1", "rdfs:label", "Old");
        let new = lit("ex:s1", "rdfs:label", "New");
        let g = MemoryGraph::with_statements([old.clone()]);

        let delta = TripleDelta {
            additions: vec![new.clone()],
            retractions: vec![old.clone()],
        };
        g.apply_delta(&delta).await.unwrap();
        g.apply_delta(&delta).await.unwrap();

        assert_eq!(g.len().await, 1);
        assert!(g.contains(&new).await);
        assert!(!g.contains(&old).await);
    }
}
