//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Borrow a book from archive.org and save its pages as images.
///
/// Pages are fetched one at a time. When a page fails the session is
/// restarted (up to three attempts in total) and fetching resumes at the page
/// that failed.
#[derive(Parser, Debug)]
#[command(name = "book-ripper")]
#[command(author, version, about)]
pub struct Args {
    /// Book identifier (the part after /details/ in the book URL)
    pub id: Option<String>,

    /// Account email (falls back to the config file, then a prompt)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Account password (falls back to the config file, then a prompt)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Download every page without asking for a range (overrides -s/-e)
    #[arg(short, long)]
    pub all_pages: bool,

    /// First page to download (1-based)
    #[arg(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_start: Option<u32>,

    /// Last page to download (1-based, inclusive)
    #[arg(short = 'e', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_end: Option<u32>,

    /// Output directory (default: ./output/<ID>)
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Image resolution downgrade factor (0 = full resolution)
    #[arg(short = 'S', long)]
    pub scale: Option<u32>,

    /// Skip the existing output folder check and hide non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Pause before restarting a failed attempt, in milliseconds (0 to disable, max 60000)
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub restart_delay_ms: Option<u64>,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout_secs: Option<u64>,

    /// HTTP read timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout_secs: Option<u64>,
}
