//! Ledger storage: trait plus a dated-directory file store.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Ledger, LedgerId};

/// Errors from ledger storage operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Integrity check failed for ledger {0}: stored hash does not match content")]
    IntegrityViolation(LedgerId),

    #[error("Ledger has no content hash (not finalized)")]
    NotFinalized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence backend for run ledgers.
pub trait LedgerStore {
    /// Store a finalized ledger. Returns the path or key it was written to.
    fn save(&self, ledger: &Ledger) -> Result<PathBuf, LedgerError>;
}

/// File-system ledger store.
///
/// ```text
/// {root}/
///   2026/
///     10/
///       18/
///         {ledger_id}.json
/// ```
pub struct FileLedgerStore {
    root: PathBuf,
}

impl FileLedgerStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn ledger_path(&self, ledger: &Ledger) -> PathBuf {
        let date = ledger.started_at.format("%Y/%m/%d");
        self.root.join(format!("{}/{}.json", date, ledger.id.0))
    }
}

impl LedgerStore for FileLedgerStore {
    fn save(&self, ledger: &Ledger) -> Result<PathBuf, LedgerError> {
        if ledger.content_hash.is_none() {
            return Err(LedgerError::NotFinalized);
        }

        let path = self.ledger_path(ledger);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(ledger)?;
        fs::write(&path, json)?;

        tracing::debug!(
            ledger_id = %ledger.id,
            path = %path.display(),
            "Ledger saved"
        );

        Ok(path)
    }
}

/// Read a ledger file and check its content hash.
pub fn read_ledger(path: &Path) -> Result<Ledger, LedgerError> {
    let json = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&json)?;
    if ledger.content_hash.is_none() {
        return Err(LedgerError::NotFinalized);
    }
    if !ledger.verify_integrity() {
        return Err(LedgerError::IntegrityViolation(ledger.id));
    }
    Ok(ledger)
}
