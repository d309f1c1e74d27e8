//! Book Ripper Core Library
//!
//! Borrows a book from an online lending library and saves its pages as
//! image files, surviving flaky page fetches by restarting the session and
//! resuming at the page that failed.
//!
//! # Architecture
//!
//! - [`selection`] - Page range selection from flags or an interactive prompt
//! - [`session`] - Loan session contract and its error type
//! - [`archive`] - archive.org implementation of the loan session
//! - [`writer`] - Page image persistence
//! - [`orchestrator`] - Bounded restart-and-resume fetch loop
//! - [`report`] - Final verdict and page summary

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod orchestrator;
pub mod report;
pub mod selection;
pub mod session;
mod user_agent;
pub mod writer;

// Re-export commonly used types
pub use archive::{ArchiveClient, ArchiveSessionFactory, HttpTimeouts};
pub use orchestrator::{
    FetchObserver, FetchOrchestrator, JobOutcome, JobRequest, JobState, MAX_ATTEMPTS,
    OrchestratorError,
};
pub use report::{outcome_message, progress_summary, report_outcome};
pub use selection::{PageRange, PageSelection, RangeError, RangePrompt, select_range};
pub use session::{Credentials, FetchOutcome, LoanSession, SessionError, SessionFactory};
pub use writer::{DirectoryPageWriter, PageWriter, WriteError};
