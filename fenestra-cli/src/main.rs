//! CLI entry point for the fenestra benchmark driver.
//!
//! Parses arguments with clap, builds the index, runs the beam-width sweeps,
//! renders the line protocol to stdout, and maps errors to exit code 1.
//! Logging is initialised eagerly and writes to stderr so stdout stays
//! machine-parseable.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use fenestra_cli::{
    cli::{render_report, run_cli, Cli, CliError},
    logging::{self, LoggingError},
};
use fenestra_core::FenestraError;
use tracing::error;

/// Parse CLI arguments, execute the workload, render the report, and flush
/// the output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let report = run_cli(cli).context("failed to execute benchmark")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_report(&report, &mut writer).context("failed to render report")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(cli_error) = err.downcast_ref::<CliError>() {
                log_cli_error(cli_error);
            } else {
                error!(error = %err, "benchmark failed");
            }
            ExitCode::FAILURE
        }
    }
}

fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}

fn log_cli_error(err: &CliError) {
    match err {
        CliError::Core(core) => log_core_error(core),
        _ => error!(error = %err, "benchmark failed"),
    }
}

fn log_core_error(err: &FenestraError) {
    match err.corpus_code() {
        Some(corpus_code) => error!(
            error = %err,
            code = %err.code(),
            corpus_code = %corpus_code,
            "benchmark failed"
        ),
        None => error!(
            error = %err,
            code = %err.code(),
            "benchmark failed"
        ),
    }
}
