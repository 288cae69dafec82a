//! Harvest Ledger: tamper-evident record of harvest runs.
//!
//! A ledger captures what a run was given (input path, settings), what it
//! did to each record, and the resulting summary counts. Finalized ledgers
//! carry a BLAKE3 content hash and are stored as dated JSON files.

pub mod hash;
pub mod session;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use session::LedgerSession;
pub use store::{read_ledger, FileLedgerStore, LedgerError, LedgerStore};

// ── Core Types ───────────────────────────────────────────────────

/// Unique identifier for a run ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LedgerId(pub Uuid);

impl LedgerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LedgerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LedgerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened to one input record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    Skipped,
    Failed,
}

/// Per-record result of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordOutcome {
    /// Natural key of the record (the IRB number for studies), or its
    /// position in the input when the key is missing.
    pub key: String,
    pub status: OutcomeStatus,
    /// Graph identity the record reconciled against.
    pub uri: Option<String>,
    /// Whether the entity was created by this run.
    pub created: bool,
    pub additions: usize,
    pub retractions: usize,
    /// Soft data-quality conditions (rank collisions, unresolved references).
    pub flags: Vec<String>,
    /// Error or skip reason.
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl RecordOutcome {
    pub fn succeeded(
        key: &str,
        uri: &str,
        created: bool,
        additions: usize,
        retractions: usize,
    ) -> Self {
        Self {
            key: key.to_string(),
            status: OutcomeStatus::Succeeded,
            uri: Some(uri.to_string()),
            created,
            additions,
            retractions,
            flags: Vec::new(),
            message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn skipped(key: &str, reason: &str) -> Self {
        Self::without_delta(key, OutcomeStatus::Skipped, reason)
    }

    pub fn failed(key: &str, error: &str) -> Self {
        Self::without_delta(key, OutcomeStatus::Failed, error)
    }

    fn without_delta(key: &str, status: OutcomeStatus, message: &str) -> Self {
        Self {
            key: key.to_string(),
            status,
            uri: None,
            created: false,
            additions: 0,
            retractions: 0,
            flags: Vec::new(),
            message: Some(message.to_string()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }
}

/// Aggregate counts over a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSummary {
    pub records: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub created: usize,
    pub concepts_created: usize,
    pub additions: usize,
    pub retractions: usize,
    /// Whether the delta was applied to the graph store.
    pub applied: bool,
}

impl LedgerSummary {
    /// Tally outcomes. `concepts_created` and `applied` are left for the
    /// caller.
    pub fn from_outcomes(outcomes: &[RecordOutcome]) -> Self {
        let mut summary = Self {
            records: outcomes.len(),
            ..Default::default()
        };
        for o in outcomes {
            match o.status {
                OutcomeStatus::Succeeded => summary.succeeded += 1,
                OutcomeStatus::Skipped => summary.skipped += 1,
                OutcomeStatus::Failed => summary.failed += 1,
            }
            if o.created {
                summary.created += 1;
            }
            summary.additions += o.additions;
            summary.retractions += o.retractions;
        }
        summary
    }
}

/// The complete record of one harvest run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    pub id: LedgerId,
    /// Agent label that performed the run.
    pub agent: String,
    /// Input the run consumed (usually a file path).
    pub input: String,
    /// Effective settings for the run.
    pub settings: serde_json::Value,
    pub outcomes: Vec<RecordOutcome>,
    pub summary: LedgerSummary,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// BLAKE3 content hash (hex), set on finalization.
    pub content_hash: Option<String>,
}

impl Ledger {
    /// Compute the BLAKE3 hash of the ledger's content.
    pub fn compute_hash(&self) -> Result<String, serde_json::Error> {
        hash::compute_ledger_hash(self)
    }

    /// Verify that the stored content_hash matches a freshly computed hash.
    pub fn verify_integrity(&self) -> bool {
        match (&self.content_hash, self.compute_hash()) {
            (Some(stored), Ok(fresh)) => stored == &fresh,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_tallies_outcomes() {
        let outcomes = vec![
            RecordOutcome::succeeded("101", "ex:s1", true, 7, 0),
            RecordOutcome::succeeded("102", "ex:s2", false, 1, 1),
            RecordOutcome::skipped("101", "duplicate IRB number"),
            RecordOutcome::failed("#4", "malformed record"),
        ];
        let summary = LedgerSummary::from_outcomes(&outcomes);
        assert_eq!(summary.records, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.additions, 8);
        assert_eq!(summary.retractions, 1);
    }

    #[test]
    fn test_unfinalized_ledger_fails_integrity() {
        let ledger = LedgerSession::new("agent", "in.json").into_ledger();
        assert!(!ledger.verify_integrity());
    }
}
