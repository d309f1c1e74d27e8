//! Output directory resolution and preparation.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::prompt::LinePrompter;

/// Default parent directory when neither the CLI nor the config names one.
const DEFAULT_OUTPUT_ROOT: &str = "output";

/// What to do with the resolved directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OutputDecision {
    /// Write pages here.
    Proceed(PathBuf),
    /// The user declined to reuse an existing directory.
    Declined,
}

/// Picks the directory pages are written to.
///
/// `--output-dir` is used as is (after `~` expansion); a configured
/// `output_dir` and the `./output` default get a per-book subdirectory.
pub(crate) fn resolve_output_dir(
    cli_dir: Option<&Path>,
    config_root: Option<&Path>,
    book_id: &str,
    home: Option<&Path>,
) -> PathBuf {
    if let Some(dir) = cli_dir {
        return expand_tilde(dir, home);
    }
    let root = config_root.map_or_else(
        || PathBuf::from(DEFAULT_OUTPUT_ROOT),
        |root| expand_tilde(root, home),
    );
    root.join(book_id)
}

/// Expands a leading `~` to `home`; other paths are returned unchanged.
pub(crate) fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Confirms reuse of an existing directory (unless quiet) and creates it
/// when missing.
pub(crate) fn prepare_output_dir<R: BufRead, W: Write>(
    dir: PathBuf,
    quiet: bool,
    prompter: &mut LinePrompter<R, W>,
) -> Result<OutputDecision> {
    if dir.exists() {
        if !quiet {
            let question = format!(
                "Output folder {} already exists. Continue?",
                dir.display()
            );
            if !prompter
                .confirm(&question)
                .context("Failed to read confirmation")?
            {
                return Ok(OutputDecision::Declined);
            }
        }
        debug!(path = %dir.display(), "reusing output directory");
    } else {
        std::fs::create_dir_all(&dir).with_context(|| {
            format!("Failed to create output directory '{}'", dir.display())
        })?;
        debug!(path = %dir.display(), "created output directory");
    }
    Ok(OutputDecision::Proceed(dir))
}
