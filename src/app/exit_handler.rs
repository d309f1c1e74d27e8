//! Maps a job result to the process exit status.

use std::process::ExitCode;

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every selected page was saved, or the user chose not to proceed.
    Success,
    /// The attempt budget ran out before every page was saved.
    Incomplete,
}

impl From<ProcessExit> for ExitCode {
    fn from(value: ProcessExit) -> Self {
        match value {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Incomplete => ExitCode::FAILURE,
        }
    }
}

pub(crate) fn determine_exit_outcome(completed: bool) -> ProcessExit {
    if completed {
        ProcessExit::Success
    } else {
        ProcessExit::Incomplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_outcome_success_when_completed() {
        assert_eq!(determine_exit_outcome(true), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_incomplete_when_budget_exhausted() {
        assert_eq!(determine_exit_outcome(false), ProcessExit::Incomplete);
    }
}
