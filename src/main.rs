//! `installer` binary entry point.
use std::process::ExitCode;

use clap::CommandFactory as _;

use local_installer::cli::Cli;
use local_installer::{commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();

    // Bare invocation is a usage error.
    if std::env::args_os().len() < 2 {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    }

    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version are reported as "errors" on stdout.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init_subscriber(cli.verbose, "install");
    let log = logging::Logger::new("install");

    if cli.files.is_empty() {
        log.error("No files specified for installation");
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    }

    match commands::install::run(&cli, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
