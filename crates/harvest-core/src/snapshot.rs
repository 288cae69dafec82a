//! Snapshot folding: turn an entity's raw `(predicate, object)` pairs into
//! an [`EntityRecord`] using the same key table that drives reconciliation.

use crate::keytable::KeyTable;
use crate::record::EntityRecord;
use crate::statement::PredicateObject;

/// Fold the outgoing statements of `uri` into a record.
///
/// Set attributes collect every matching value. Single-valued attributes
/// also keep every distinct value the graph holds, so reconciliation can
/// retract the surplus. Predicates the table does not name are ignored.
pub fn fold_triples(uri: &str, triples: &[PredicateObject], table: &KeyTable) -> EntityRecord {
    let mut record = EntityRecord::new(uri);

    for triple in triples {
        for (attr, spec) in table.attrs_for_predicate(&triple.predicate) {
            let value = triple.object.value();
            if spec.strategy.is_set() {
                record.push(attr, value);
                continue;
            }
            let held = record.values(attr);
            if held.is_empty() {
                record.set(attr, value);
            } else if !held.contains(&value) {
                tracing::warn!(
                    uri,
                    attribute = attr,
                    kept = held[0],
                    extra = value,
                    "Multiple values for single-valued attribute"
                );
                record.push(attr, value);
            }
        }
    }

    record
}
