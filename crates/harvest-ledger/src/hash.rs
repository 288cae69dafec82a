//! BLAKE3 content hashing for tamper evidence.
//!
//! Hashes canonical JSON of every ledger field except `content_hash`.

use serde::Serialize;

use crate::{Ledger, LedgerId, LedgerSummary, RecordOutcome};

#[derive(Serialize)]
struct HashableLedger<'a> {
    id: &'a LedgerId,
    agent: &'a str,
    input: &'a str,
    settings: &'a serde_json::Value,
    outcomes: &'a [RecordOutcome],
    summary: &'a LedgerSummary,
    started_at: &'a chrono::DateTime<chrono::Utc>,
    completed_at: &'a Option<chrono::DateTime<chrono::Utc>>,
}

/// Compute the hex-encoded BLAKE3 hash of a ledger's content.
pub fn compute_ledger_hash(ledger: &Ledger) -> Result<String, serde_json::Error> {
    let hashable = HashableLedger {
        id: &ledger.id,
        agent: &ledger.agent,
        input: &ledger.input,
        settings: &ledger.settings,
        outcomes: &ledger.outcomes,
        summary: &ledger.summary,
        started_at: &ledger.started_at,
        completed_at: &ledger.completed_at,
    };

    let json = serde_json::to_vec(&hashable)?;
    Ok(blake3::hash(&json).to_hex().to_string())
}
