//! Page range selection.
//!
//! Turns the user's intent (every page, explicit 1-based bounds, or nothing at
//! all) plus the book's page count into a concrete zero-based [`PageRange`].
//! When no bounds are given the caller-supplied [`RangePrompt`] is asked for a
//! textual `m-n` range, which keeps selection testable without a terminal.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

/// Errors produced while turning user input into a [`PageRange`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    /// Interactive input was not of the form `m-n` with positive integers.
    #[error("invalid page range '{input}': expected a range like 1-15")]
    InvalidInput {
        /// The raw text the user entered.
        input: String,
    },

    /// The requested range ends before it starts.
    #[error("invalid page range: end index {end} is before start index {start}")]
    Inverted {
        /// Zero-based start index.
        start: u32,
        /// Exclusive end index.
        end: u32,
    },
}

impl RangeError {
    /// Creates an invalid-input error.
    pub fn invalid_input(input: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.into(),
        }
    }
}

/// Half-open range of zero-based page indices: `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    /// Creates a range covering `start..end`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] when `end < start`.
    pub fn new(start: u32, end: u32) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from user-supplied bounds.
    ///
    /// An end before the start yields an empty range at `start`, so the job
    /// fetches nothing instead of failing.
    #[must_use]
    pub fn from_bounds(start: u32, end: u32) -> Self {
        if end < start {
            warn!(start, end, "page range ends before it starts; nothing to fetch");
        }
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Range covering every page of a book with `total_pages` pages.
    #[must_use]
    pub fn all(total_pages: u32) -> Self {
        Self {
            start: 0,
            end: total_pages,
        }
    }

    /// First page index to fetch.
    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    /// One past the last page index to fetch.
    #[must_use]
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of pages covered.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true when the range covers no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterates page indices in increasing order.
    pub fn indices(&self) -> impl Iterator<Item = u32> {
        self.start..self.end
    }

    /// Returns this range with `start` raised to `new_start`.
    ///
    /// The end bound never moves and the start never decreases, so a
    /// narrowed range is always a suffix of the original one.
    #[must_use]
    pub fn narrowed_to(&self, new_start: u32) -> Self {
        let start = new_start.clamp(self.start, self.end);
        Self {
            start,
            end: self.end,
        }
    }
}

impl fmt::Display for PageRange {
    /// Displays the range as inclusive 1-based page numbers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "no pages")
        } else {
            write!(f, "pages {}-{}", self.start + 1, self.end)
        }
    }
}

/// What the user asked for on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSelection {
    /// Fetch every page without asking.
    All,
    /// 1-based bounds; a missing bound defaults to the book's edge.
    Explicit {
        /// First page number (1-based, inclusive).
        start: Option<u32>,
        /// Last page number (1-based, inclusive).
        end: Option<u32>,
    },
    /// No bounds given: ask through the [`RangePrompt`].
    #[default]
    Interactive,
}

impl PageSelection {
    /// Builds a selection from the raw command-line flags.
    #[must_use]
    pub fn from_flags(all_pages: bool, page_start: Option<u32>, page_end: Option<u32>) -> Self {
        if all_pages {
            Self::All
        } else if page_start.is_none() && page_end.is_none() {
            Self::Interactive
        } else {
            Self::Explicit {
                start: page_start,
                end: page_end,
            }
        }
    }
}

/// Capability used to ask the user which pages they want.
///
/// Implementations return the raw text the user typed, or an empty string
/// to take every page. Non-interactive contexts can always return `""`.
pub trait RangePrompt: Send {
    /// Asks for a range for a book with `total_pages` pages.
    ///
    /// # Errors
    ///
    /// Returns an error when the input source cannot be read.
    fn ask_range(&mut self, total_pages: u32) -> std::io::Result<String>;
}

/// Prompt that never asks and always takes every page.
#[derive(Debug, Clone, Copy, Default)]
pub struct TakeAllPages;

impl RangePrompt for TakeAllPages {
    fn ask_range(&mut self, _total_pages: u32) -> std::io::Result<String> {
        Ok(String::new())
    }
}

/// Resolves the page range for a job.
///
/// Bounds are not checked against `total_pages`; a range running past the
/// end of the book surfaces later as page fetch failures.
///
/// # Errors
///
/// Returns [`RangeError`] when interactive input is malformed. Prompt I/O
/// failures are reported as [`RangeError::InvalidInput`] with the I/O
/// message. Inverted bounds are not an error; they select no pages.
pub fn select_range(
    total_pages: u32,
    selection: PageSelection,
    prompt: &mut dyn RangePrompt,
) -> Result<PageRange, RangeError> {
    let range = match selection {
        PageSelection::All => PageRange::all(total_pages),
        PageSelection::Explicit { start, end } => {
            let start = start.map_or(0, |page| page.saturating_sub(1));
            let end = end.unwrap_or(total_pages);
            PageRange::from_bounds(start, end)
        }
        PageSelection::Interactive => {
            let answer = prompt
                .ask_range(total_pages)
                .map_err(|error| RangeError::invalid_input(error.to_string()))?;
            parse_range_input(&answer)?.unwrap_or_else(|| PageRange::all(total_pages))
        }
    };

    if range.end() > total_pages {
        warn!(
            end = range.end(),
            total_pages, "requested range runs past the last page of the book"
        );
    }
    debug!(start = range.start(), end = range.end(), "selected page range");
    Ok(range)
}

/// Parses interactive `m-n` input into a zero-based range.
///
/// Returns `Ok(None)` for blank input, meaning "every page". When `n < m`
/// the range is empty.
///
/// # Errors
///
/// Returns [`RangeError::InvalidInput`] for anything that is not two
/// positive integers separated by `-`.
pub fn parse_range_input(input: &str) -> Result<Option<PageRange>, RangeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let Some((first, last)) = trimmed.split_once('-') else {
        return Err(RangeError::invalid_input(trimmed));
    };
    let parse_page = |raw: &str| -> Result<u32, RangeError> {
        raw.trim()
            .parse::<u32>()
            .ok()
            .filter(|page| *page > 0)
            .ok_or_else(|| RangeError::invalid_input(trimmed))
    };
    let first = parse_page(first)?;
    let last = parse_page(last)?;

    Ok(Some(PageRange::from_bounds(first - 1, last)))
}
