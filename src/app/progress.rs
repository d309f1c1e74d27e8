//! Progress bar driven by orchestrator events.

use std::path::Path;
use std::time::Duration;

use book_ripper::orchestrator::{FetchObserver, MAX_ATTEMPTS};
use book_ripper::selection::PageRange;
use indicatif::{ProgressBar, ProgressStyle};

/// Shows pages written against the first attempt's range.
///
/// Later attempts only cover the remainder, so the bar length is fixed on
/// attempt 1 and the position keeps counting across attempts.
pub(crate) struct ProgressObserver {
    bar: ProgressBar,
    sized: bool,
}

impl ProgressObserver {
    /// Creates a visible bar, or a hidden one when `visible` is false.
    ///
    /// Nothing is drawn until the first attempt starts, so the range prompt
    /// is not overwritten.
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner} [{bar:40}] {pos}/{len} pages {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar, sized: false }
    }

    /// Removes the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.position()
    }

    #[cfg(test)]
    fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}

impl FetchObserver for ProgressObserver {
    fn attempt_started(&mut self, attempt: u32, range: PageRange) {
        if !self.sized {
            self.bar.set_length(u64::from(range.len()));
            self.bar.enable_steady_tick(Duration::from_millis(100));
            self.sized = true;
        }
        self.bar
            .set_message(format!("(attempt {attempt}/{MAX_ATTEMPTS})"));
    }

    fn page_written(&mut self, index: u32, _path: &Path) {
        self.bar.inc(1);
        self.bar.set_message(format!("(page {})", u64::from(index) + 1));
    }

    fn page_failed(&mut self, index: u32) {
        self.bar
            .set_message(format!("(page {} failed)", u64::from(index) + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_length_is_fixed_by_first_attempt() {
        let mut observer = ProgressObserver::new(false);

        observer.attempt_started(1, PageRange::new(2, 7).unwrap());
        observer.page_written(2, Path::new("0003.jpg"));
        observer.page_failed(3);
        observer.attempt_started(2, PageRange::new(3, 7).unwrap());
        observer.page_written(3, Path::new("0004.jpg"));

        assert_eq!(observer.length(), Some(5));
        assert_eq!(observer.position(), 2);
        observer.finish();
    }
}
