//! Loan session contract.
//!
//! A [`LoanSession`] is one authenticated conversation with the lending
//! service: log in, borrow a book, read its page count, fetch page images and
//! finally give the book back. The orchestrator asks a [`SessionFactory`] for
//! a brand new session on every attempt and never reuses one.
//!
//! # Failure signals
//!
//! | Call | Failure |
//! |------|---------|
//! | `authenticate`, `begin_loan`, `fetch_page_count` | `Err(SessionError)`, fatal |
//! | `fetch_page` | [`FetchOutcome::Failure`], recoverable |
//! | `end_loan` | `Err(SessionError)`, best-effort |

mod error;

pub use error::SessionError;

use std::fmt;

use async_trait::async_trait;

/// Login identity for the lending service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email or user name.
    pub identity: String,
    /// Account password.
    pub secret: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Result of fetching a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Usable image bytes.
    Success(Vec<u8>),
    /// The page could not be fetched; the caller decides whether to retry.
    Failure,
}

impl FetchOutcome {
    /// Returns true for [`FetchOutcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Option<Vec<u8>>> for FetchOutcome {
    fn from(value: Option<Vec<u8>>) -> Self {
        value.map_or(Self::Failure, Self::Success)
    }
}

/// One authenticated session with the lending service.
///
/// All calls are sequential; the orchestrator never issues two at once.
#[async_trait]
pub trait LoanSession: Send {
    /// Logs in with the given credentials.
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), SessionError>;

    /// Borrows the book so its pages can be fetched.
    async fn begin_loan(&mut self, book_id: &str) -> Result<(), SessionError>;

    /// Returns the number of pages in the borrowed book.
    async fn fetch_page_count(&mut self) -> Result<u32, SessionError>;

    /// Fetches one page image at `index` (zero-based).
    ///
    /// `scale` is a resolution downgrade factor; 0 means full resolution.
    async fn fetch_page(&mut self, index: u32, scale: u32) -> FetchOutcome;

    /// Gives the book back.
    async fn end_loan(&mut self, book_id: &str) -> Result<(), SessionError>;
}

/// Creates fresh [`LoanSession`]s, one per attempt.
pub trait SessionFactory: Send + Sync {
    /// Builds a new, unauthenticated session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the underlying client cannot be built.
    fn create(&self) -> Result<Box<dyn LoanSession>, SessionError>;
}

impl<F> SessionFactory for F
where
    F: Fn() -> Result<Box<dyn LoanSession>, SessionError> + Send + Sync,
{
    fn create(&self) -> Result<Box<dyn LoanSession>, SessionError> {
        self()
    }
}
