//! The reconciliation engine.
//!
//! Compares the current state of an entity with its target state and
//! computes the statements to add and retract. Nothing is ever replaced
//! wholesale: values present on both sides produce no statements, so
//! reconciling an entity against itself is a no-op.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::keytable::{AttributeSpec, KeyTable};
use crate::record::EntityRecord;
use crate::statement::{Object, Statement};

/// Statements to assert and to remove. The two sides never overlap for a
/// single reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleDelta {
    pub additions: Vec<Statement>,
    pub retractions: Vec<Statement>,
}

impl TripleDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.retractions.is_empty()
    }

    /// Append another delta's statements after this one's.
    pub fn extend(&mut self, other: TripleDelta) {
        self.additions.extend(other.additions);
        self.retractions.extend(other.retractions);
    }

    /// Append bare additions, e.g. the assertions of a newly created entity.
    pub fn add_all(&mut self, statements: impl IntoIterator<Item = Statement>) {
        self.additions.extend(statements);
    }
}

/// Compute the delta that brings `current` in line with `target`.
///
/// Every attribute of `table` is visited in declaration order; attributes
/// the table does not name are ignored on both sides. The subject of all
/// statements is `current`'s URI.
pub fn reconcile(
    current: &EntityRecord,
    target: &EntityRecord,
    table: &KeyTable,
) -> Result<TripleDelta, HarvestError> {
    let subject = current.uri().ok_or(HarvestError::MissingIdentity)?;
    let mut delta = TripleDelta::new();

    for (attr, spec) in table.iter() {
        if spec.strategy.is_set() {
            reconcile_set(
                subject,
                spec,
                &current.values(attr),
                &target.values(attr),
                &mut delta,
            );
        } else {
            reconcile_single(
                subject,
                spec,
                &current.values(attr),
                target.single(attr),
                &mut delta,
            );
        }
    }

    tracing::trace!(
        subject,
        additions = delta.additions.len(),
        retractions = delta.retractions.len(),
        "Reconciled entity"
    );

    Ok(delta)
}

/// Upsert one single-valued attribute.
///
/// `current` may hold several values when the graph violates the mapping;
/// every value other than the target is retracted.
fn reconcile_single(
    subject: &str,
    spec: &AttributeSpec,
    current: &[&str],
    target: Option<&str>,
    delta: &mut TripleDelta,
) {
    for value in dedup(current) {
        if Some(value) != target {
            delta.retractions.push(statement(subject, spec, value));
        }
    }
    if let Some(t) = target {
        if !current.contains(&t) {
            delta.additions.push(statement(subject, spec, t));
        }
    }
}

/// Set-reconcile one multi-valued attribute: retract `C \ T`, add `T \ C`.
fn reconcile_set(
    subject: &str,
    spec: &AttributeSpec,
    current: &[&str],
    target: &[&str],
    delta: &mut TripleDelta,
) {
    let current_set: HashSet<&str> = current.iter().copied().collect();
    let target_set: HashSet<&str> = target.iter().copied().collect();

    for value in dedup(current) {
        if !target_set.contains(value) {
            delta.retractions.push(statement(subject, spec, value));
        }
    }
    for value in dedup(target) {
        if !current_set.contains(value) {
            delta.additions.push(statement(subject, spec, value));
        }
    }
}

/// Values in first-seen order with repeats dropped.
fn dedup<'a>(values: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().copied().filter(|v| seen.insert(*v)).collect()
}

fn statement(subject: &str, spec: &AttributeSpec, value: &str) -> Statement {
    let object = if spec.strategy.is_reference() {
        Object::Resource(value.to_string())
    } else {
        Object::Literal(value.to_string())
    };
    Statement {
        subject: subject.to_string(),
        predicate: spec.predicate.clone(),
        object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keytable::UpdateStrategy;
    use crate::vocab;

    const URI: &str = "http://vivo.ufl.edu/individual/n100";

    fn study_table() -> KeyTable {
        KeyTable::new()
            .with("concept_uris", vocab::HAS_SUBJECT_AREA, UpdateStrategy::ReferenceSet)
            .with("title", vocab::RDFS_LABEL, UpdateStrategy::SingleLiteral)
            .with("publisher", "vivo:publisher", UpdateStrategy::SingleReference)
            .with("phones", "vivo:phoneNumber", UpdateStrategy::LiteralSet)
    }

    fn record(title: Option<&str>, concepts: &[&str]) -> EntityRecord {
        let mut rec = EntityRecord::new(URI);
        rec.set_opt("title", title);
        rec.set_many(
            "concept_uris",
            concepts.iter().map(|c| c.to_string()).collect(),
        );
        rec
    }

    #[test]
    fn test_concept_and_title_scenario() {
        let current = record(Some("Old Title"), &["C1", "C2"]);
        let mut target = record(Some("New Title"), &["C2", "C3"]);
        target.uri = None;

        let delta = reconcile(&current, &target, &study_table()).unwrap();

        let area = vocab::expand(vocab::HAS_SUBJECT_AREA);
        let label = vocab::expand(vocab::RDFS_LABEL);
        assert_eq!(
            delta.additions,
            vec![
                Statement::resource(URI, &area, "C3"),
                Statement::literal(URI, &label, "New Title"),
            ]
        );
        assert_eq!(
            delta.retractions,
            vec![
                Statement::resource(URI, &area, "C1"),
                Statement::literal(URI, &label, "Old Title"),
            ]
        );
    }

    #[test]
    fn test_reconcile_with_self_is_empty() {
        let mut rec = record(Some("Title"), &["C1", "C2", "C2"]);
        rec.set("publisher", "http://example.org/pub");
        rec.set_many("phones", vec!["555-0100".into(), "555-0101".into()]);

        let delta = reconcile(&rec, &rec, &study_table()).unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn test_single_value_upsert() {
        let table = study_table();
        let label = vocab::expand(vocab::RDFS_LABEL);

        // Both absent: nothing.
        let delta = reconcile(&record(None, &[]), &record(None, &[]), &table).unwrap();
        assert!(delta.is_empty());

        // Absent → present: one addition only.
        let delta = reconcile(&record(None, &[]), &record(Some("T"), &[]), &table).unwrap();
        assert_eq!(delta.additions, vec![Statement::literal(URI, &label, "T")]);
        assert!(delta.retractions.is_empty());

        // Present → absent: one retraction only.
        let delta = reconcile(&record(Some("T"), &[]), &record(None, &[]), &table).unwrap();
        assert!(delta.additions.is_empty());
        assert_eq!(delta.retractions, vec![Statement::literal(URI, &label, "T")]);

        // Empty string counts as absent.
        let delta = reconcile(&record(Some(""), &[]), &record(None, &[]), &table).unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn test_surplus_single_values_retracted() {
        let table = study_table();
        let label = vocab::expand(vocab::RDFS_LABEL);
        let mut current = EntityRecord::new(URI);
        current.set_many("title", vec!["A".into(), "B".into()]);

        let delta = reconcile(&current, &record(Some("C"), &[]), &table).unwrap();
        assert_eq!(
            delta.retractions,
            vec![
                Statement::literal(URI, &label, "A"),
                Statement::literal(URI, &label, "B"),
            ]
        );
        assert_eq!(delta.additions, vec![Statement::literal(URI, &label, "C")]);

        // Target already among the stored values: only the surplus goes.
        let delta = reconcile(&current, &record(Some("B"), &[]), &table).unwrap();
        assert_eq!(delta.retractions, vec![Statement::literal(URI, &label, "A")]);
        assert!(delta.additions.is_empty());
    }

    #[test]
    fn test_single_reference_uses_resource_objects() {
        let mut current = EntityRecord::new(URI);
        current.set("publisher", "http://example.org/p1");
        let mut target = EntityRecord::detached();
        target.set("publisher", "http://example.org/p2");

        let delta = reconcile(&current, &target, &study_table()).unwrap();
        assert!(delta.additions[0].object.is_resource());
        assert_eq!(delta.additions[0].object.value(), "http://example.org/p2");
        assert_eq!(delta.retractions[0].object.value(), "http://example.org/p1");
    }

    #[test]
    fn test_set_difference_over_many_cases() {
        let table = KeyTable::new().with("phones", "vivo:phoneNumber", UpdateStrategy::LiteralSet);
        let cases: [(&[&str], &[&str]); 6] = [
            (&[], &[]),
            (&["a"], &[]),
            (&[], &["a", "b"]),
            (&["a", "b", "c"], &["b", "c", "d"]),
            (&["a", "a", "b"], &["b", "b"]),
            (&["x", "y"], &["y", "x"]),
        ];

        for (c, t) in cases {
            let mut current = EntityRecord::new(URI);
            current.set_many("phones", c.iter().map(|v| v.to_string()).collect());
            let mut target = EntityRecord::new(URI);
            target.set_many("phones", t.iter().map(|v| v.to_string()).collect());

            let delta = reconcile(&current, &target, &table).unwrap();
            let added: HashSet<&str> = delta.additions.iter().map(|s| s.object.value()).collect();
            let removed: HashSet<&str> =
                delta.retractions.iter().map(|s| s.object.value()).collect();

            let cs: HashSet<&str> = c.iter().copied().collect();
            let ts: HashSet<&str> = t.iter().copied().collect();
            assert_eq!(added, ts.difference(&cs).copied().collect::<HashSet<_>>(), "{c:?} -> {t:?}");
            assert_eq!(removed, cs.difference(&ts).copied().collect::<HashSet<_>>(), "{c:?} -> {t:?}");
            assert_eq!(added.len(), delta.additions.len(), "duplicate additions");
            assert_eq!(removed.len(), delta.retractions.len(), "duplicate retractions");

            // Applying the delta to C yields exactly T.
            let applied: HashSet<&str> = cs
                .difference(&removed)
                .copied()
                .chain(added.iter().copied())
                .collect();
            assert_eq!(applied, ts);
        }
    }

    #[test]
    fn test_unmapped_attributes_ignored() {
        let mut current = record(Some("T"), &[]);
        current.set("irrelevant", "a");
        let mut target = record(Some("T"), &[]);
        target.set("irrelevant", "b");

        let delta = reconcile(&current, &target, &study_table()).unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn test_requires_current_uri() {
        let err = reconcile(
            &EntityRecord::detached(),
            &EntityRecord::detached(),
            &study_table(),
        )
        .unwrap_err();
        assert!(matches!(err, HarvestError::MissingIdentity));
    }

    #[test]
    fn test_delta_extend_keeps_order() {
        let mut a = TripleDelta::new();
        a.add_all([Statement::literal("s", "p", "1")]);
        let mut b = TripleDelta::new();
        b.additions.push(Statement::literal("s", "p", "2"));
        b.retractions.push(Statement::literal("s", "p", "0"));

        a.extend(b);
        assert_eq!(a.additions.len(), 2);
        assert_eq!(a.additions[1].object.value(), "2");
        assert_eq!(a.retractions.len(), 1);
    }
}
