//! Run-ledger helpers for harvest runs.

use std::path::{Path, PathBuf};

use harvest_ledger::{read_ledger, FileLedgerStore, Ledger, LedgerSession, LedgerStore};

use crate::config::StudiesConfig;
use crate::error::Result;
use crate::pipeline::HarvestReport;

/// Start a ledger session for a run over `input`.
pub fn start_run_session(config: &StudiesConfig, input: &Path) -> LedgerSession {
    let mut session = LedgerSession::new(&config.harvested_by, &input.display().to_string());
    session.set_settings(serde_json::to_value(config).unwrap_or_default());
    session
}

/// Record every outcome of a finished run.
pub fn record_report(session: &mut LedgerSession, report: &HarvestReport, applied: bool) {
    for outcome in &report.outcomes {
        session.record(outcome.clone());
    }
    session.set_concepts_created(report.concepts_created);
    if applied {
        session.mark_applied();
    }
}

/// Finalize the session and store the ledger, returning where it was written.
///
/// Storage failures are logged, not returned: a run whose outputs were
/// written must not fail on its audit record.
pub fn finalize_and_store(session: LedgerSession, ledger_dir: &str) -> Option<PathBuf> {
    let ledger = match session.finalize() {
        Ok(ledger) => ledger,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to seal run ledger");
            return None;
        }
    };

    match FileLedgerStore::new(ledger_dir).and_then(|store| store.save(&ledger)) {
        Ok(path) => {
            tracing::info!(
                ledger_id = %ledger.id,
                path = %path.display(),
                "Run ledger recorded"
            );
            Some(path)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to store run ledger");
            None
        }
    }
}

/// Read a stored run ledger and check it has not been altered.
pub fn verify_ledger_file(path: &Path) -> Result<Ledger> {
    let ledger = read_ledger(path)?;
    tracing::info!(
        ledger_id = %ledger.id,
        input = %ledger.input,
        records = ledger.outcomes.len(),
        applied = ledger.summary.applied,
        "Run ledger verified"
    );
    Ok(ledger)
}
