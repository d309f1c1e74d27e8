use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use book_ripper::archive::{
    ArchiveSessionFactory, CONNECT_TIMEOUT_SECS, HttpTimeouts, READ_TIMEOUT_SECS,
};
use book_ripper::orchestrator::{DEFAULT_RESTART_DELAY, FetchOrchestrator, JobRequest};
use book_ripper::report::report_outcome;
use book_ripper::selection::{PageSelection, RangePrompt};
use book_ripper::session::Credentials;
use book_ripper::writer::DirectoryPageWriter;
use clap::Parser;
use tracing::{debug, info};

use crate::app::config::{self, FileConfig};
use crate::app::credentials::{resolve_book_id, resolve_credentials};
use crate::app::exit_handler::{ProcessExit, determine_exit_outcome};
use crate::app::output_dir::{OutputDecision, prepare_output_dir, resolve_output_dir};
use crate::app::progress::ProgressObserver;
use crate::app::prompt::LinePrompter;
use crate::app::terminal;
use crate::cli::Args;

pub(crate) async fn run_ripper() -> Result<ProcessExit> {
    // Parse before tracing so --help works without logs.
    let args = Args::parse();

    let no_color = terminal::no_color_env_requested() || terminal::is_dumb_terminal();
    terminal::init_tracing(terminal::default_log_level(args.quiet, args.verbose), no_color);
    debug!(?args, "CLI arguments parsed");

    let file_config = config::load_default_file_config()?;
    debug!(config = ?file_config, "config resolved");

    let mut prompter = LinePrompter::stdio();
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let Some(inputs) = gather_inputs(&args, &file_config, home.as_deref(), &mut prompter)? else {
        info!("Nothing downloaded");
        return Ok(ProcessExit::Success);
    };

    let request = JobRequest {
        book_id: inputs.book_id.clone(),
        credentials: inputs.credentials,
        selection: PageSelection::from_flags(args.all_pages, args.page_start, args.page_end),
        scale: args.scale.or(file_config.scale).unwrap_or(0),
    };
    let orchestrator = build_orchestrator(&args, &file_config, inputs.output_dir.clone());

    info!(
        book_id = %inputs.book_id,
        output_dir = %inputs.output_dir.display(),
        "Book ripper starting"
    );

    let mut observer = ProgressObserver::new(terminal::should_use_progress_bar(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    ));
    run_job(
        &orchestrator,
        &request,
        &mut prompter,
        &mut observer,
        &mut io::stdout(),
    )
    .await
}

/// What the user told us before the job starts.
struct JobInputs {
    book_id: String,
    credentials: Credentials,
    output_dir: PathBuf,
}

/// Asks for the book id, then the account, then the output folder.
///
/// Returns `None` when the user declines to reuse an existing folder.
fn gather_inputs<R: BufRead, W: Write>(
    args: &Args,
    file_config: &FileConfig,
    home: Option<&Path>,
    prompter: &mut LinePrompter<R, W>,
) -> Result<Option<JobInputs>> {
    let book_id = resolve_book_id(args.id.as_deref(), prompter)?;
    let credentials = resolve_credentials(
        args.username.as_deref(),
        args.password.as_deref(),
        file_config,
        prompter,
    )?;

    let output_dir = resolve_output_dir(
        args.output_dir.as_deref(),
        file_config.output_dir.as_deref(),
        &book_id,
        home,
    );
    match prepare_output_dir(output_dir, args.quiet, prompter)? {
        OutputDecision::Proceed(output_dir) => Ok(Some(JobInputs {
            book_id,
            credentials,
            output_dir,
        })),
        OutputDecision::Declined => Ok(None),
    }
}

/// Runs the job and writes the verdict line to `out`.
///
/// The range question goes through `range_prompt` even in quiet mode; quiet
/// only skips the output folder confirmation.
async fn run_job(
    orchestrator: &FetchOrchestrator,
    request: &JobRequest,
    range_prompt: &mut dyn RangePrompt,
    observer: &mut ProgressObserver,
    out: &mut dyn Write,
) -> Result<ProcessExit> {
    let result = orchestrator.run(request, range_prompt, observer).await;
    observer.finish();
    let outcome = result.with_context(|| format!("Failed to download '{}'", request.book_id))?;

    report_outcome(&outcome, out).context("Failed to write result")?;
    Ok(determine_exit_outcome(outcome.completed))
}

fn build_orchestrator(
    args: &Args,
    file_config: &FileConfig,
    output_dir: PathBuf,
) -> FetchOrchestrator {
    let timeouts = HttpTimeouts {
        connect_secs: args
            .connect_timeout_secs
            .or(file_config.connect_timeout_secs)
            .unwrap_or(CONNECT_TIMEOUT_SECS),
        read_secs: args
            .read_timeout_secs
            .or(file_config.read_timeout_secs)
            .unwrap_or(READ_TIMEOUT_SECS),
    };
    let restart_delay = args
        .restart_delay_ms
        .or(file_config.restart_delay_ms)
        .map_or(DEFAULT_RESTART_DELAY, Duration::from_millis);
    debug!(?timeouts, restart_delay_ms = restart_delay.as_millis(), "fetch settings");

    FetchOrchestrator::new(
        Box::new(ArchiveSessionFactory::new().with_timeouts(timeouts)),
        Box::new(DirectoryPageWriter::new(output_dir)),
    )
    .with_restart_delay(restart_delay)
}
