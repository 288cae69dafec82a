//! Output documents: additions, retractions, and the exception report.

use std::fs;
use std::path::{Path, PathBuf};

use harvest_core::TripleDelta;
use harvest_ledger::{OutcomeStatus, RecordOutcome};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::rdf;

/// Where a run writes its documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub additions: PathBuf,
    pub retractions: PathBuf,
    pub exceptions: PathBuf,
}

impl OutputPaths {
    /// `<stem>_add.<ext>`, `<stem>_sub.<ext>` and `<stem>_exc.txt`, placed in
    /// `output_dir` or next to the input file.
    pub fn for_input(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> Self {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("studies");
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let ext = format.extension();

        Self {
            additions: dir.join(format!("{stem}_add.{ext}")),
            retractions: dir.join(format!("{stem}_sub.{ext}")),
            exceptions: dir.join(format!("{stem}_exc.txt")),
        }
    }
}

/// Render a statement list in the requested format.
pub fn render(statements: &[harvest_core::Statement], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::RdfXml => rdf::to_rdfxml(statements),
        OutputFormat::NTriples => Ok(rdf::to_ntriples(statements)),
    }
}

/// Write both halves of the delta. Both files are always written, even
/// when empty.
pub fn write_delta(delta: &TripleDelta, paths: &OutputPaths, format: OutputFormat) -> Result<()> {
    if let Some(parent) = paths.additions.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&paths.additions, render(&delta.additions, format)?)?;
    fs::write(&paths.retractions, render(&delta.retractions, format)?)?;

    tracing::info!(
        additions = delta.additions.len(),
        retractions = delta.retractions.len(),
        add_path = %paths.additions.display(),
        sub_path = %paths.retractions.display(),
        "Wrote delta documents"
    );
    Ok(())
}

/// One report line per record that failed, was skipped, or carries flags.
pub fn exception_lines(outcomes: &[RecordOutcome]) -> Vec<String> {
    let mut lines = Vec::new();
    for o in outcomes {
        let status = match o.status {
            OutcomeStatus::Succeeded => "FLAGGED",
            OutcomeStatus::Skipped => "SKIPPED",
            OutcomeStatus::Failed => "FAILED",
        };
        if let Some(msg) = &o.message {
            lines.push(format!("{status}\t{}\t{msg}", o.key));
        }
        for flag in &o.flags {
            lines.push(format!("{status}\t{}\t{flag}", o.key));
        }
    }
    lines
}

/// Write the exception report, if there is anything to report.
pub fn write_exceptions(outcomes: &[RecordOutcome], path: &Path) -> Result<Option<PathBuf>> {
    let lines = exception_lines(outcomes);
    if lines.is_empty() {
        return Ok(None);
    }
    fs::write(path, lines.join("\n") + "\n")?;
    tracing::info!(entries = lines.len(), path = %path.display(), "Wrote exception report");
    Ok(Some(path.to_path_buf()))
}
