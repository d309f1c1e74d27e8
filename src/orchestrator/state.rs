//! Job bookkeeping carried between attempts.

use crate::selection::PageRange;

/// Running state of a job, owned by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobState {
    /// Every page in range was written.
    pub completed: bool,
    /// Page index the next attempt resumes from.
    pub next_start: u32,
    /// Set after the first restart: later attempts never prompt.
    pub forced_quiet: bool,
    /// Set after the first restart: later attempts only cover the narrowed
    /// remainder instead of re-deriving "every page".
    pub forced_explicit_range: bool,
}

impl JobState {
    /// State before the range is known.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that an attempt stopped at `failed_at`.
    ///
    /// The resume point only moves forward.
    pub fn record_restart(&mut self, failed_at: u32) {
        self.next_start = self.next_start.max(failed_at);
        self.forced_quiet = true;
        self.forced_explicit_range = true;
    }
}

/// Terminal result of a job that did not hit a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    /// Every page in range was written. The loan return is best-effort and
    /// does not affect this flag.
    pub completed: bool,
    /// Attempts performed (1..=3).
    pub attempts: u32,
    /// Range selected on the first attempt.
    pub range: PageRange,
    /// Pages written across all attempts.
    pub pages_written: u32,
    /// Final job state.
    pub state: JobState,
}

impl JobOutcome {
    /// Pages from the selected range that were never written.
    #[must_use]
    pub fn pages_remaining(&self) -> u32 {
        self.range.len().saturating_sub(self.pages_written)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_restart_sets_flags_and_resume_point() {
        let mut state = JobState::new();
        state.next_start = 3;

        state.record_restart(7);

        assert_eq!(state.next_start, 7);
        assert!(state.forced_quiet);
        assert!(state.forced_explicit_range);
        assert!(!state.completed);
    }

    #[test]
    fn test_record_restart_never_moves_backwards() {
        let mut state = JobState::new();
        state.record_restart(9);
        state.record_restart(4);
        assert_eq!(state.next_start, 9);
    }

    #[test]
    fn test_pages_remaining() {
        let outcome = JobOutcome {
            completed: false,
            attempts: 3,
            range: PageRange::new(0, 10).unwrap(),
            pages_written: 4,
            state: JobState::new(),
        };
        assert_eq!(outcome.pages_remaining(), 6);
    }
}
