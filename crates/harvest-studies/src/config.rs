//! Configuration for the study harvester.

use serde::{Deserialize, Serialize};

/// Study harvester configuration.
///
/// Loaded from the `[studies]` section of `harvest.toml` or
/// `HARVEST__STUDIES__*` environment variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StudiesConfig {
    /// URI prefix for minted identities.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Agent label written into provenance stamps.
    #[serde(default = "default_harvested_by")]
    pub harvested_by: String,

    /// Input fields holding free-text keywords.
    #[serde(default = "default_keyword_fields")]
    pub keyword_fields: Vec<String>,

    /// Keyword values that mean "no keyword".
    #[serde(default = "default_placeholders")]
    pub concept_placeholders: Vec<String>,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Directory for output documents (default: next to the input file).
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Directory for run ledgers.
    #[serde(default = "default_ledger_dir")]
    pub ledger_dir: String,

    /// Stamp newly created studies, concepts and authorships.
    #[serde(default = "default_true")]
    pub stamp_new_entities: bool,

    /// Re-assert `dateHarvested`/`harvestedBy` on every run.
    #[serde(default)]
    pub refresh_provenance: bool,

    /// Link each study's investigator as an author.
    #[serde(default = "default_true")]
    pub link_investigators: bool,
}

/// Serialization of the additions/retractions documents.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    RdfXml,
    NTriples,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::RdfXml => "rdf",
            Self::NTriples => "nt",
        }
    }
}

fn default_namespace() -> String {
    "http://vivo.ufl.edu/individual/".to_string()
}

fn default_harvested_by() -> String {
    format!("harvest-studies {}", env!("CARGO_PKG_VERSION"))
}

fn default_keyword_fields() -> Vec<String> {
    (1..=5).map(|i| format!("keyword{i}")).collect()
}

fn default_placeholders() -> Vec<String> {
    ["sa", "n/a", "na", "none"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_ledger_dir() -> String {
    "./ledgers".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for StudiesConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            harvested_by: default_harvested_by(),
            keyword_fields: default_keyword_fields(),
            concept_placeholders: default_placeholders(),
            output_format: OutputFormat::default(),
            output_dir: None,
            ledger_dir: default_ledger_dir(),
            stamp_new_entities: true,
            refresh_provenance: false,
            link_investigators: true,
        }
    }
}
