//! Diagnostics: one line on stderr per failed or skipped unit, tied to its display name.

use log::{debug, error, warn};

use crate::{JobOutcome, RunSummary};

/// Report how a job ended. Successful jobs are only traced at debug level.
pub fn report_outcome(name: &str, outcome: &JobOutcome) {
    match outcome {
        JobOutcome::Completed => debug!("{name}: done"),
        JobOutcome::ParseFailed {
            line: Some(line),
            column: Some(column),
            message,
        } => error!(
            "Parse error at line {line}, column {column} in \"{name}\"; cannot parse this file any further: {message}"
        ),
        JobOutcome::ParseFailed { message, .. } => error!(
            "Parse error in \"{name}\"; cannot parse this file any further: {message}"
        ),
        JobOutcome::Unavailable(msg) => error!("Format error for \"{name}\": {msg}"),
        JobOutcome::Io(msg) => error!("Cannot read \"{name}\": {msg}"),
        JobOutcome::Stalled { polls } => error!(
            "Parser for \"{name}\" produced nothing after {polls} polls; abandoning this file"
        ),
        JobOutcome::SinkFailed(msg) => error!("Cannot write output for \"{name}\": {msg}"),
        JobOutcome::Panicked => error!("Parser for \"{name}\" panicked; abandoning this file"),
    }
}

/// Top-level unit whose name maps to no known notation.
pub fn report_unknown_notation(name: &str) {
    warn!("Unknown RDF notation for \"{name}\"; skipped");
}

/// Unit that could not be opened or walked at all (missing file, corrupt archive).
pub fn report_unreadable(name: &str, msg: &str) {
    error!("Cannot read \"{name}\": {msg}");
}

/// Log the end-of-run summary. Called by the CLI in verbose mode.
pub fn log_summary(summary: &RunSummary) {
    debug!(
        "Converted {} | Failed {} | Skipped {} | {} triples in {} batches",
        summary.converted.len(),
        summary.failed.len(),
        summary.skipped.len(),
        summary.triples,
        summary.batches
    );
    for (name, msg) in &summary.failed {
        debug!("  failed: {name}: {msg}");
    }
    for name in &summary.skipped {
        debug!("  skipped: {name}");
    }
}
