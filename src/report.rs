//! Final verdict for a job.
//!
//! Exactly one verdict line goes to stdout; the page summary goes through
//! tracing so it lands on stderr with the rest of the logs.

use std::io::{self, Write};

use tracing::{info, warn};

use crate::orchestrator::JobOutcome;

/// Verdict printed when every selected page was written.
pub const FINISHED_MESSAGE: &str = "finished downloading book";

/// Verdict printed when the attempt budget ran out.
pub const UNFINISHED_MESSAGE: &str = "book did not finish downloading";

/// Returns the verdict line for a job.
#[must_use]
pub fn outcome_message(completed: bool) -> &'static str {
    if completed {
        FINISHED_MESSAGE
    } else {
        UNFINISHED_MESSAGE
    }
}

/// Human-readable count of pages written against the selected range.
#[must_use]
pub fn progress_summary(outcome: &JobOutcome) -> String {
    format!(
        "downloaded {} of {} pages",
        outcome.pages_written,
        outcome.range.len()
    )
}

/// Writes the verdict to `out` and logs the page summary.
///
/// # Errors
///
/// Returns the I/O error if `out` cannot be written.
pub fn report_outcome(outcome: &JobOutcome, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", outcome_message(outcome.completed))?;
    out.flush()?;

    let summary = progress_summary(outcome);
    if outcome.completed {
        info!(attempts = outcome.attempts, range = %outcome.range, "{summary}");
    } else {
        warn!(
            attempts = outcome.attempts,
            range = %outcome.range,
            resume_page = outcome.state.next_start + 1,
            "{summary}"
        );
    }
    Ok(())
}
