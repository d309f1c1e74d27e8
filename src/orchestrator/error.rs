//! Fatal job errors.

use thiserror::Error;

use crate::selection::RangeError;
use crate::session::SessionError;
use crate::writer::WriteError;

/// Errors that abort a whole job.
///
/// Page fetch failures never show up here: they are absorbed by the attempt
/// loop. Running out of attempts is not an error either; it is reported
/// through [`JobOutcome::completed`](super::JobOutcome::completed).
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Login, loan, metadata or session construction failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The page range could not be determined.
    #[error(transparent)]
    Selection(#[from] RangeError),

    /// A fetched page could not be saved.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// A setup call to the lending service did not answer in time.
    #[error("{operation} timed out during attempt {attempt}")]
    Timeout {
        /// Name of the session call.
        operation: &'static str,
        /// Attempt ordinal (1-based).
        attempt: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_names_operation_and_attempt() {
        let error = OrchestratorError::Timeout {
            operation: "begin_loan",
            attempt: 2,
        };
        assert_eq!(error.to_string(), "begin_loan timed out during attempt 2");
    }

    #[test]
    fn test_session_error_is_transparent() {
        let error = OrchestratorError::from(SessionError::login("bad_login"));
        assert_eq!(error.to_string(), "login failed: bad_login");
    }
}
