//! The study entity: key table and target-record preparation.

use harvest_core::factory::ProvenanceStamp;
use harvest_core::{vocab, EntityRecord, HarvestError, KeyTable, UpdateStrategy};

use crate::source::{RawStudy, DESCRIPTION_FIELD, IRB_FIELD, TITLE_FIELD, UFID_FIELD, URI_FIELD};

/// Type tag of a human-subject study.
pub const STUDY_TYPE: &str = vocab::HUMAN_STUDY;

// ── Attribute Names ──────────────────────────────────────────────

pub const CONCEPT_URIS: &str = "concept_uris";
pub const AUTHORSHIP_URIS: &str = "authorship_uris";
pub const TITLE: &str = "title";
pub const IRB_NUMBER: &str = "irb_number";
pub const DESCRIPTION: &str = "description";
pub const DATE_HARVESTED: &str = "date_harvested";
pub const HARVESTED_BY: &str = "harvested_by";

/// Key table for studies. With `refresh_provenance` the provenance
/// literals are mapped too, so they are re-asserted on every run.
pub fn study_key_table(refresh_provenance: bool) -> KeyTable {
    let table = KeyTable::new()
        .with(CONCEPT_URIS, vocab::HAS_SUBJECT_AREA, UpdateStrategy::ReferenceSet)
        .with(AUTHORSHIP_URIS, vocab::IN_AUTHORSHIP, UpdateStrategy::ReferenceSet)
        .with(TITLE, vocab::RDFS_LABEL, UpdateStrategy::SingleLiteral)
        .with(IRB_NUMBER, vocab::IRB_NUMBER, UpdateStrategy::SingleLiteral)
        .with(DESCRIPTION, vocab::DESCRIPTION, UpdateStrategy::SingleLiteral);

    if refresh_provenance {
        table
            .with(DATE_HARVESTED, vocab::DATE_HARVESTED, UpdateStrategy::SingleLiteral)
            .with(HARVESTED_BY, vocab::HARVESTED_BY, UpdateStrategy::SingleLiteral)
    } else {
        table
    }
}

/// A validated input study, before concepts and identity are resolved.
#[derive(Debug, Clone)]
pub struct PreparedStudy {
    pub irb_number: String,
    /// Target attributes taken directly from the input. Concept and
    /// authorship URIs are filled in later.
    pub target: EntityRecord,
    /// Identity requested by the input for a new study.
    pub explicit_uri: Option<String>,
    /// Investigator institutional ID.
    pub ufid: Option<String>,
    /// Raw keyword texts in field order.
    pub keywords: Vec<String>,
}

/// Validate and rename the fields of one input study.
///
/// `position` is the 1-based index of the record in the input, used to name
/// records that lack an IRB number.
pub fn prepare_study(
    raw: &RawStudy,
    position: usize,
    keyword_fields: &[String],
    refresh: Option<&ProvenanceStamp>,
) -> Result<PreparedStudy, HarvestError> {
    let irb_number = raw
        .text(IRB_FIELD)
        .ok_or_else(|| HarvestError::MalformedRecord {
            record: format!("#{position}"),
            attribute: IRB_FIELD.to_string(),
        })?;

    let mut target = EntityRecord::detached();
    target.set(IRB_NUMBER, irb_number.as_str());
    target.set_opt(TITLE, raw.text(TITLE_FIELD));
    target.set_opt(DESCRIPTION, raw.text(DESCRIPTION_FIELD));
    if let Some(stamp) = refresh {
        target.set(DATE_HARVESTED, stamp.timestamp());
        target.set(HARVESTED_BY, stamp.harvested_by.as_str());
    }

    Ok(PreparedStudy {
        irb_number,
        target,
        explicit_uri: raw.text(URI_FIELD),
        ufid: raw.text(UFID_FIELD),
        keywords: keyword_fields.iter().filter_map(|f| raw.text(f)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword_fields() -> Vec<String> {
        vec!["keyword1".to_string(), "keyword2".to_string()]
    }

    #[test]
    fn test_study_key_table() {
        let table = study_key_table(false);
        assert_eq!(table.len(), 5);
        assert_eq!(
            table.get(CONCEPT_URIS).map(|s| s.strategy),
            Some(UpdateStrategy::ReferenceSet)
        );
        assert_eq!(
            table.get(IRB_NUMBER).map(|s| s.predicate.as_str()),
            Some("http://vivo.ufl.edu/ontology/vivo-ufl/irbnumber")
        );
        assert!(table.get(DATE_HARVESTED).is_none());

        let refreshing = study_key_table(true);
        assert_eq!(refreshing.len(), 7);
        assert!(refreshing.get(HARVESTED_BY).is_some());
    }

    #[test]
    fn test_prepare_renames_fields() {
        let raw: RawStudy = [
            (IRB_FIELD, serde_json::json!(201500123)),
            (TITLE_FIELD, serde_json::json!("Insulin Trial")),
            (UFID_FIELD, serde_json::json!("12345678")),
            ("keyword2", serde_json::json!("asthma")),
            ("keyword3", serde_json::json!("ignored")),
        ]
        .into_iter()
        .collect();

        let study = prepare_study(&raw, 1, &keyword_fields(), None).unwrap();
        assert_eq!(study.irb_number, "201500123");
        assert_eq!(study.target.single(IRB_NUMBER), Some("201500123"));
        assert_eq!(study.target.single(TITLE), Some("Insulin Trial"));
        assert_eq!(study.target.single(DESCRIPTION), None);
        assert_eq!(study.target.uri(), None);
        assert_eq!(study.ufid.as_deref(), Some("12345678"));
        assert_eq!(study.keywords, vec!["asthma"]);
    }

    #[test]
    fn test_prepare_requires_irb_number() {
        let raw: RawStudy = [(TITLE_FIELD, "No IRB")].into_iter().collect();
        let err = prepare_study(&raw, 3, &keyword_fields(), None).unwrap_err();
        assert!(matches!(
            err,
            HarvestError::MalformedRecord { ref record, ref attribute }
                if record == "#3" && attribute == IRB_FIELD
        ));
    }

    #[test]
    fn test_prepare_with_refreshed_provenance() {
        let raw: RawStudy = [(IRB_FIELD, "1")].into_iter().collect();
        let stamp = ProvenanceStamp::now("harvest-studies test");
        let study = prepare_study(&raw, 1, &keyword_fields(), Some(&stamp)).unwrap();
        assert_eq!(study.target.single(HARVESTED_BY), Some("harvest-studies test"));
        assert_eq!(
            study.target.single(DATE_HARVESTED),
            Some(stamp.timestamp().as_str())
        );
    }
}
