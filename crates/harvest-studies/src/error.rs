//! Error types for the harvest-studies crate.

use thiserror::Error;

use harvest_core::HarvestError;

#[derive(Error, Debug)]
pub enum StudiesError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Failed to write output: {0}")]
    Output(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Harvest(#[from] HarvestError),

    #[error("Graph error: {0}")]
    Graph(#[from] harvest_graph::GraphError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] harvest_ledger::LedgerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudiesError {
    /// Whether the error is confined to one input record.
    pub fn is_record_level(&self) -> bool {
        matches!(self, Self::Harvest(e) if e.is_record_level())
    }
}

pub type Result<T> = std::result::Result<T, StudiesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_level_passthrough() {
        let unresolved: StudiesError = HarvestError::UnresolvedReference {
            kind: "investigator".into(),
            key: "12345678".into(),
        }
        .into();
        assert!(unresolved.is_record_level());
        assert!(!StudiesError::Input("not an array".into()).is_record_level());
        assert!(!StudiesError::from(HarvestError::MissingIdentity).is_record_level());
    }
}
