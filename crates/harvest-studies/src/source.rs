//! Study input: a JSON array of flat study objects.
//!
//! Field names follow the institutional export (`Irb_number`,
//! `project_title`, `study_description`, `UFID`, `keyword1`..`keyword5`).
//! Values may be strings or numbers; everything else is ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StudiesError};

pub const IRB_FIELD: &str = "Irb_number";
pub const TITLE_FIELD: &str = "project_title";
pub const DESCRIPTION_FIELD: &str = "study_description";
pub const UFID_FIELD: &str = "UFID";
pub const URI_FIELD: &str = "uri";

/// One study as it appears in the input file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawStudy {
    pub fields: BTreeMap<String, Value>,
}

impl RawStudy {
    /// The trimmed text of a field; `None` when absent, blank, or not a
    /// string or number.
    pub fn text(&self, field: &str) -> Option<String> {
        let text = match self.fields.get(field)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawStudy {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse study records from JSON text.
pub fn parse_studies(json: &str) -> Result<Vec<RawStudy>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(StudiesError::Input(
            "expected a JSON array of study objects".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(RawStudy {
                fields: map.into_iter().collect(),
            }),
            other => Err(StudiesError::Input(format!(
                "record #{} is not an object: {other}",
                i + 1
            ))),
        })
        .collect()
}

/// Read and parse a study file.
pub fn read_studies(path: &Path) -> Result<Vec<RawStudy>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        StudiesError::Input(format!("cannot read {}: {e}", path.display()))
    })?;
    let studies = parse_studies(&json)?;
    tracing::info!(path = %path.display(), count = studies.len(), "Read study data");
    Ok(studies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_studies() {
        let json = r#"[
            {"Irb_number": "201500123", "project_title": "Insulin Trial", "keyword1": "diabetes"},
            {"Irb_number": 201500124, "UFID": "  12345678 ", "keyword1": ""}
        ]"#;
        let studies = parse_studies(json).unwrap();
        assert_eq!(studies.len(), 2);
        assert_eq!(studies[0].text(IRB_FIELD).as_deref(), Some("201500123"));
        assert_eq!(studies[1].text(IRB_FIELD).as_deref(), Some("201500124"));
        assert_eq!(studies[1].text(UFID_FIELD).as_deref(), Some("12345678"));
        assert_eq!(studies[1].text("keyword1"), None);
        assert_eq!(studies[1].text(TITLE_FIELD), None);
    }

    #[test]
    fn test_text_ignores_structured_values() {
        let study: RawStudy = [("keyword1", serde_json::json!(["a", "b"]))]
            .into_iter()
            .collect();
        assert_eq!(study.text("keyword1"), None);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_studies(r#"{"Irb_number": "1"}"#).unwrap_err();
        assert!(matches!(err, StudiesError::Input(_)));
    }

    #[test]
    fn test_parse_rejects_non_object_record() {
        let err = parse_studies(r#"[{"Irb_number": "1"}, 42]"#).unwrap_err();
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_read_studies_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studies.json");
        std::fs::write(&path, r#"[{"Irb_number": "7"}]"#).unwrap();
        let studies = read_studies(&path).unwrap();
        assert_eq!(studies.len(), 1);

        let missing = read_studies(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, StudiesError::Input(_)));
    }
}
