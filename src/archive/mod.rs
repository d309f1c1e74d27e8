//! archive.org lending library backend.
//!
//! [`ArchiveClient`] speaks the lending protocol over HTTP:
//!
//! | Step | Request |
//! |------|---------|
//! | login | `GET` then `POST /account/login` |
//! | borrow | `grant_access`, `browse_book`, `create_token` loan actions |
//! | page count | `/details/<id>` page, then the `BookReaderJSIA.php` manifest |
//! | page | manifest image URI with `rotate=0&scale=<n>` |
//! | return | `return_loan` loan action |
//!
//! [`ArchiveSessionFactory`] hands a fresh client (and so a fresh cookie jar)
//! to every attempt.

mod client;
mod manifest;

pub use client::{
    ArchiveClient, CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL, HttpTimeouts, READ_TIMEOUT_SECS,
};

use crate::session::{LoanSession, SessionError, SessionFactory};

/// Builds one [`ArchiveClient`] per attempt.
#[derive(Debug, Clone)]
pub struct ArchiveSessionFactory {
    base_url: String,
    timeouts: HttpTimeouts,
}

impl ArchiveSessionFactory {
    /// Factory for the production service with default timeouts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeouts: HttpTimeouts::default(),
        }
    }

    /// Points sessions at another host (mirrors, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the HTTP timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: HttpTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Base URL sessions will talk to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ArchiveSessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactory for ArchiveSessionFactory {
    fn create(&self) -> Result<Box<dyn LoanSession>, SessionError> {
        let client = ArchiveClient::new(&self.base_url, self.timeouts)?;
        Ok(Box::new(client))
    }
}
