//! Progress hooks for a running job.

use std::path::Path;

use crate::selection::PageRange;

/// Receives progress notifications from the orchestrator.
///
/// Every method has a no-op default so implementors only override what they
/// display.
pub trait FetchObserver: Send {
    /// An attempt is about to fetch `range`.
    fn attempt_started(&mut self, _attempt: u32, _range: PageRange) {}

    /// A page was fetched and saved.
    fn page_written(&mut self, _index: u32, _path: &Path) {}

    /// A page could not be fetched; the attempt stops here.
    fn page_failed(&mut self, _index: u32) {}

    /// An attempt ended, either with every page saved or aborted.
    fn attempt_finished(&mut self, _attempt: u32, _completed: bool) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl FetchObserver for SilentObserver {}
