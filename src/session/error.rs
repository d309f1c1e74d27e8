//! Error types for loan session operations.
//!
//! Every variant here is fatal for a job. Recoverable page failures are not
//! errors at all; they travel as [`FetchOutcome::Failure`](super::FetchOutcome).

use thiserror::Error;

/// Errors raised by a [`LoanSession`](super::LoanSession).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The service rejected the credentials.
    #[error("login failed: {reason}")]
    Login {
        /// Why the login was rejected.
        reason: String,
    },

    /// The book could not be borrowed.
    #[error("could not borrow '{book_id}': {reason}")]
    LoanDenied {
        /// Identifier of the book.
        book_id: String,
        /// Message returned by the service.
        reason: String,
    },

    /// Book metadata (page list) could not be fetched or understood.
    #[error("could not read metadata for '{book_id}': {reason}")]
    Metadata {
        /// Identifier of the book.
        book_id: String,
        /// What was missing or malformed.
        reason: String,
    },

    /// Network-level failure (DNS, connection refused, TLS, timeout).
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with an unexpected HTTP status.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that failed.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The loan could not be returned.
    #[error("could not return '{book_id}': {reason}")]
    ReturnFailed {
        /// Identifier of the book.
        book_id: String,
        /// Message returned by the service.
        reason: String,
    },

    /// A service URL could not be built or parsed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
}

impl SessionError {
    /// Creates a login error.
    pub fn login(reason: impl Into<String>) -> Self {
        Self::Login {
            reason: reason.into(),
        }
    }

    /// Creates a loan-denied error.
    pub fn loan_denied(book_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoanDenied {
            book_id: book_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a metadata error.
    pub fn metadata(book_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Metadata {
            book_id: book_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a loan-return error.
    pub fn return_failed(book_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReturnFailed {
            book_id: book_id.into(),
            reason: reason.into(),
        }
    }
}

// Like the download errors, no `From<reqwest::Error>`: every variant needs the
// URL or book id that the bare reqwest error does not carry.
