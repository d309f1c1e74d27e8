//! Resilient, resumable page fetching.
//!
//! The [`FetchOrchestrator`] drives the borrow → fetch pages → return
//! lifecycle with a fixed budget of [`MAX_ATTEMPTS`] attempts. Each attempt
//! gets a fresh [`LoanSession`] and fetches pages one at a time in increasing
//! order. The first page that fails aborts the attempt; the next attempt
//! starts exactly at that page, so pages already written are never fetched
//! again.
//!
//! # Attempt lifecycle
//!
//! ```text
//! STARTING_ATTEMPT ─► FETCHING_PAGE(i) ─► PAGE_OK ─► ... ─► ATTEMPT_DONE ─► JOB_SUCCEEDED
//!                                    └──► PAGE_FAILED ─► ATTEMPT_ABORTED ─► RETRY_NEXT_ATTEMPT
//!                                                                       └─► JOB_EXHAUSTED
//! ```
//!
//! Setup failures (session construction, login, loan, page count) and write
//! failures abort the job with an [`OrchestratorError`]. They are never
//! retried. Exhausting the budget is a normal outcome with
//! [`JobOutcome::completed`] set to false.
//!
//! # Example
//!
//! ```no_run
//! use book_ripper::archive::ArchiveSessionFactory;
//! use book_ripper::orchestrator::{FetchOrchestrator, JobRequest, SilentObserver};
//! use book_ripper::selection::{PageSelection, TakeAllPages};
//! use book_ripper::session::Credentials;
//! use book_ripper::writer::DirectoryPageWriter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = FetchOrchestrator::new(
//!     Box::new(ArchiveSessionFactory::new()),
//!     Box::new(DirectoryPageWriter::new("./output/someBook00")),
//! );
//! let request = JobRequest {
//!     book_id: "someBook00".to_string(),
//!     credentials: Credentials::new("reader@example.com", "secret"),
//!     selection: PageSelection::All,
//!     scale: 0,
//! };
//! let outcome = orchestrator
//!     .run(&request, &mut TakeAllPages, &mut SilentObserver)
//!     .await?;
//! println!("completed: {}", outcome.completed);
//! # Ok(())
//! # }
//! ```

mod error;
mod observer;
mod state;


pub use error::OrchestratorError;
pub use observer::{FetchObserver, SilentObserver};
pub use state::{JobOutcome, JobState};

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::selection::{PageRange, PageSelection, RangePrompt, select_range};
use crate::session::{Credentials, FetchOutcome, LoanSession, SessionError, SessionFactory};
use crate::writer::PageWriter;

/// Fixed attempt budget for a job.
pub const MAX_ATTEMPTS: u32 = 3;

/// Default pause before a restart attempt.
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(1);

/// Maximum jitter added to a non-zero restart delay.
const MAX_RESTART_JITTER: Duration = Duration::from_millis(250);

/// What to fetch and as whom.
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Identifier of the book on the lending service.
    pub book_id: String,
    /// Login identity.
    pub credentials: Credentials,
    /// User intent for the page range.
    pub selection: PageSelection,
    /// Resolution downgrade factor passed to every page fetch (0 = full).
    pub scale: u32,
}

/// How a single attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptResult {
    /// Every page in range was written.
    Done,
    /// The page at `failed_at` could not be fetched.
    Aborted { failed_at: u32 },
}

/// Drives a job through at most [`MAX_ATTEMPTS`] attempts.
pub struct FetchOrchestrator {
    sessions: Box<dyn SessionFactory>,
    writer: Box<dyn PageWriter>,
    call_timeout: Option<Duration>,
    restart_delay: Duration,
}

impl FetchOrchestrator {
    /// Creates an orchestrator with no per-call timeout and the default
    /// restart delay.
    #[must_use]
    pub fn new(sessions: Box<dyn SessionFactory>, writer: Box<dyn PageWriter>) -> Self {
        Self {
            sessions,
            writer,
            call_timeout: None,
            restart_delay: DEFAULT_RESTART_DELAY,
        }
    }

    /// Bounds every session call by `timeout`.
    ///
    /// A page fetch that times out counts as a failed page; any other call
    /// that times out aborts the job.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Sets the pause before each restart attempt. Zero disables it.
    #[must_use]
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Runs the job to completion or exhaustion.
    ///
    /// `prompt` is consulted at most once, during the first attempt, and only
    /// when `request.selection` is [`PageSelection::Interactive`].
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError`] for fatal failures: session setup,
    /// range selection, or writing a page. The loan is left un-returned in
    /// that case.
    pub async fn run(
        &self,
        request: &JobRequest,
        prompt: &mut dyn RangePrompt,
        observer: &mut dyn FetchObserver,
    ) -> Result<JobOutcome, OrchestratorError> {
        let mut state = JobState::new();
        let mut selected: Option<PageRange> = None;
        let mut pages_written = 0_u32;
        let mut attempts = 0_u32;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                self.pause_before_restart(attempt).await;
            }
            attempts = attempt;
            info!(attempt, max_attempts = MAX_ATTEMPTS, "starting attempt");

            let mut session = self.sessions.create()?;
            let total_pages = self
                .open_loan(
                    session.as_mut(),
                    &request.book_id,
                    &request.credentials,
                    attempt,
                )
                .await?;

            let range = match selected {
                None => {
                    let first = select_range(total_pages, request.selection, prompt)?;
                    state.next_start = first.start();
                    selected = Some(first);
                    first
                }
                Some(first) => {
                    debug_assert!(state.forced_explicit_range && state.forced_quiet);
                    if total_pages != first.end() {
                        debug!(
                            total_pages,
                            end = first.end(),
                            "page count differs from first attempt; keeping original end"
                        );
                    }
                    first.narrowed_to(state.next_start)
                }
            };

            observer.attempt_started(attempt, range);
            let result = self
                .fetch_range(
                    session.as_mut(),
                    attempt,
                    range,
                    request.scale,
                    observer,
                    &mut pages_written,
                )
                .await?;

            match result {
                AttemptResult::Done => {
                    self.return_loan(session.as_mut(), &request.book_id, attempt).await;
                    state.completed = true;
                    state.next_start = range.end();
                    observer.attempt_finished(attempt, true);
                    info!(attempt, pages_written, "all pages downloaded");
                    break;
                }
                AttemptResult::Aborted { failed_at } => {
                    state.record_restart(failed_at);
                    observer.attempt_finished(attempt, false);
                    warn!(
                        attempt,
                        page = failed_at + 1,
                        "page fetch failed; abandoning session"
                    );
                    // Dropped without end_loan: the next attempt borrows again.
                    drop(session);
                }
            }
        }

        let range = selected.unwrap_or_else(|| PageRange::all(0));
        if !state.completed {
            warn!(
                attempts,
                next_page = state.next_start + 1,
                "attempt budget exhausted"
            );
        }

        Ok(JobOutcome {
            completed: state.completed,
            attempts,
            range,
            pages_written,
            state,
        })
    }

    /// Logs in, borrows the book and reads its page count.
    async fn open_loan(
        &self,
        session: &mut dyn LoanSession,
        book_id: &str,
        credentials: &Credentials,
        attempt: u32,
    ) -> Result<u32, OrchestratorError> {
        debug!(attempt, "authenticating");
        self.guarded("authenticate", attempt, session.authenticate(credentials))
            .await?;

        debug!(attempt, book_id, "borrowing book");
        self.guarded("begin_loan", attempt, session.begin_loan(book_id))
            .await?;

        let total_pages = self
            .guarded("fetch_page_count", attempt, session.fetch_page_count())
            .await?;
        debug!(attempt, total_pages, "fetched page count");
        Ok(total_pages)
    }

    /// Fetches `range` page by page, stopping at the first failure.
    #[instrument(
        level = "debug",
        skip(self, session, observer, pages_written),
        fields(start = range.start(), end = range.end())
    )]
    async fn fetch_range(
        &self,
        session: &mut dyn LoanSession,
        attempt: u32,
        range: PageRange,
        scale: u32,
        observer: &mut dyn FetchObserver,
        pages_written: &mut u32,
    ) -> Result<AttemptResult, OrchestratorError> {
        for index in range.indices() {
            match self.fetch_page(session, index, scale).await {
                FetchOutcome::Success(bytes) => {
                    let path = self.writer.write_page(index, &bytes).await?;
                    *pages_written += 1;
                    observer.page_written(index, &path);
                }
                FetchOutcome::Failure => {
                    observer.page_failed(index);
                    return Ok(AttemptResult::Aborted { failed_at: index });
                }
            }
        }
        Ok(AttemptResult::Done)
    }

    async fn fetch_page(
        &self,
        session: &mut dyn LoanSession,
        index: u32,
        scale: u32,
    ) -> FetchOutcome {
        let Some(limit) = self.call_timeout else {
            return session.fetch_page(index, scale).await;
        };
        match tokio::time::timeout(limit, session.fetch_page(index, scale)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    page = index + 1,
                    timeout_ms = limit.as_millis(),
                    "page fetch timed out"
                );
                FetchOutcome::Failure
            }
        }
    }

    /// Returns the loan; failures are logged and otherwise ignored.
    async fn return_loan(&self, session: &mut dyn LoanSession, book_id: &str, attempt: u32) {
        match self.guarded("end_loan", attempt, session.end_loan(book_id)).await {
            Ok(()) => info!(book_id, "book returned"),
            Err(error) => warn!(book_id, error = %error, "failed to return book"),
        }
    }

    /// Awaits a session call, applying the per-call timeout when configured.
    async fn guarded<T>(
        &self,
        operation: &'static str,
        attempt: u32,
        call: impl Future<Output = Result<T, SessionError>>,
    ) -> Result<T, OrchestratorError> {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| OrchestratorError::Timeout { operation, attempt })?
                .map_err(OrchestratorError::from),
            None => call.await.map_err(OrchestratorError::from),
        }
    }

    async fn pause_before_restart(&self, attempt: u32) {
        if self.restart_delay.is_zero() {
            return;
        }
        let delay = self.restart_delay + restart_jitter();
        debug!(attempt, delay_ms = delay.as_millis(), "pausing before restart");
        tokio::time::sleep(delay).await;
    }
}

/// Random jitter between 0 and [`MAX_RESTART_JITTER`].
fn restart_jitter() -> Duration {
    let mut rng = rand::thread_rng();
    let max_ms = u64::try_from(MAX_RESTART_JITTER.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(rng.gen_range(0..=max_ms))
}
