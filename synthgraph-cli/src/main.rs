//! CLI entry point for synthgraph.
//!
//! Parses arguments with clap, runs the selected command against the chosen
//! graph store, renders the summary to stdout, and maps failures to a logged
//! stable code plus a failing exit status.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use synthgraph_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let cli_error = err.downcast_ref::<CliError>();
        let phase = cli_error.map(|cli_error| field::display(cli_error.phase()));
        let code = cli_error.map(|cli_error| field::display(cli_error.code()));
        let store_code = cli_error
            .and_then(CliError::store_code)
            .map(field::display);

        error!(
            error = %err,
            phase,
            code,
            store_code,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
