use thiserror::Error;

/// Error taxonomy for harvesting and reconciliation.
///
/// Variants split into two classes: caller/configuration bugs that must
/// abort the run, and per-record data-quality conditions that are reported
/// against a single record while the batch continues.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown update strategy '{strategy}' for attribute '{attribute}'")]
    UnknownStrategy { attribute: String, strategy: String },

    #[error("Ambiguous author rank {rank} on {entity}: authorships {authorships:?}")]
    AmbiguousRank {
        entity: String,
        rank: u32,
        authorships: Vec<String>,
    },

    #[error("No author rank left after {rank} on {entity}")]
    RankExhausted { entity: String, rank: u32 },

    #[error("Unresolved {kind} reference: {key}")]
    UnresolvedReference { kind: String, key: String },

    #[error("Malformed record {record}: missing required attribute '{attribute}'")]
    MalformedRecord { record: String, attribute: String },

    #[error("Concept name {0:?} is empty or a placeholder")]
    InvalidConceptName(String),

    #[error("Entity record has no URI; it cannot be reconciled")]
    MissingIdentity,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HarvestError {
    /// Whether this error concerns a single record and must not abort the run.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousRank { .. }
                | Self::RankExhausted { .. }
                | Self::UnresolvedReference { .. }
                | Self::MalformedRecord { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_level_classification() {
        let malformed = HarvestError::MalformedRecord {
            record: "#3".to_string(),
            attribute: "Irb_number".to_string(),
        };
        assert!(malformed.is_record_level());

        let exhausted = HarvestError::RankExhausted {
            entity: "ex:study".to_string(),
            rank: u32::MAX,
        };
        assert!(exhausted.is_record_level());

        let unknown = HarvestError::UnknownStrategy {
            attribute: "x".to_string(),
            strategy: "bogus".to_string(),
        };
        assert!(!unknown.is_record_level());
        assert!(!HarvestError::MissingIdentity.is_record_level());
    }
}
