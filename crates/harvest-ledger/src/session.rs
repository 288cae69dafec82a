//! Builder-pattern recorder for run ledgers.
//!
//! ```no_run
//! # use harvest_ledger::{LedgerSession, RecordOutcome};
//! let mut session = LedgerSession::new("harvest-studies 0.1.0", "studies.json");
//! session.set_settings(serde_json::json!({"output_format": "rdfxml"}));
//! session.record(RecordOutcome::succeeded("201500123", "http://vivo.ufl.edu/individual/n1", true, 9, 0));
//! session.set_concepts_created(2);
//! let ledger = session.finalize().unwrap();
//! assert!(ledger.content_hash.is_some());
//! ```

use chrono::Utc;

use crate::{Ledger, LedgerId, LedgerSummary, RecordOutcome};

/// Records a run incrementally, then seals it.
pub struct LedgerSession {
    ledger: Ledger,
    concepts_created: usize,
    applied: bool,
}

impl LedgerSession {
    pub fn new(agent: &str, input: &str) -> Self {
        Self {
            ledger: Ledger {
                id: LedgerId::new(),
                agent: agent.to_string(),
                input: input.to_string(),
                settings: serde_json::Value::Null,
                outcomes: Vec::new(),
                summary: LedgerSummary::default(),
                started_at: Utc::now(),
                completed_at: None,
                content_hash: None,
            },
            concepts_created: 0,
            applied: false,
        }
    }

    pub fn set_settings(&mut self, settings: serde_json::Value) {
        self.ledger.settings = settings;
    }

    /// Append one record outcome.
    pub fn record(&mut self, outcome: RecordOutcome) {
        self.ledger.outcomes.push(outcome);
    }

    pub fn set_concepts_created(&mut self, count: usize) {
        self.concepts_created = count;
    }

    pub fn mark_applied(&mut self) {
        self.applied = true;
    }

    pub fn id(&self) -> LedgerId {
        self.ledger.id
    }

    /// Seal the ledger: tally the summary, stamp completion, hash.
    pub fn finalize(self) -> Result<Ledger, serde_json::Error> {
        let mut ledger = self.into_ledger();
        ledger.completed_at = Some(Utc::now());
        ledger.content_hash = Some(ledger.compute_hash()?);
        Ok(ledger)
    }

    /// The ledger with its summary tallied but not sealed.
    pub fn into_ledger(self) -> Ledger {
        let mut ledger = self.ledger;
        ledger.summary = LedgerSummary::from_outcomes(&ledger.outcomes);
        ledger.summary.concepts_created = self.concepts_created;
        ledger.summary.applied = self.applied;
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutcomeStatus;

    #[test]
    fn test_finalize_seals_and_summarizes() {
        let mut session = LedgerSession::new("harvest-studies", "studies.json");
        let id = session.id();
        session.record(RecordOutcome::succeeded("1", "ex:s1", true, 5, 0));
        session.record(RecordOutcome::failed("#2", "missing irb_number"));
        session.set_concepts_created(3);
        session.mark_applied();

        let ledger = session.finalize().unwrap();
        assert_eq!(ledger.id, id);
        assert!(ledger.completed_at.is_some());
        assert!(ledger.verify_integrity());
        assert_eq!(ledger.summary.records, 2);
        assert_eq!(ledger.summary.failed, 1);
        assert_eq!(ledger.summary.concepts_created, 3);
        assert!(ledger.summary.applied);
        assert_eq!(ledger.outcomes[1].status, OutcomeStatus::Failed);
    }
}
