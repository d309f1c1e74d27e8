//! Front-end composition: everything between the command line and the
//! library's fetch orchestrator.

pub(crate) mod config;
pub(crate) mod credentials;
pub(crate) mod exit_handler;
pub(crate) mod output_dir;
pub(crate) mod progress;
pub(crate) mod prompt;
pub(crate) mod runtime;
pub(crate) mod terminal;
