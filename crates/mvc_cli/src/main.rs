//! create-mvc CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success, help, or cancelled by the user
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Node.js runtime too old
//! - 4: Template error
//! - 5: Filesystem error

use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod error;
mod output;
mod prompt;
mod runtime;

use commands::Cli;
use error::CliError;
use mvc_templates::TemplateError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const RUNTIME_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const FILESYSTEM_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let listing = commands::create::listing_args(std::env::args_os());
    let matches = Cli::command()
        .after_help(output::help_footer(&commands::create::listing_registry(
            &listing,
        )))
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_logging(cli.verbose, cli.quiet);

    match commands::create::execute(cli.create).await {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => ExitCode::from(report_error(&e)),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Print an error for the user and pick the exit code.
fn report_error(e: &anyhow::Error) -> u8 {
    if let Some(cli_error) = e.downcast_ref::<CliError>() {
        return match cli_error {
            CliError::Cancelled => {
                println!("{}", output::failure("Operation cancelled"));
                ExitCodes::SUCCESS
            }
            CliError::InvalidArgument { available, .. } => {
                eprintln!("{}", output::failure(cli_error));
                println!("Available templates:");
                for id in available {
                    println!("  {}", id);
                }
                ExitCodes::INVALID_ARGS
            }
            CliError::RuntimeTooOld { .. } => {
                eprintln!("{}", output::failure(cli_error));
                ExitCodes::RUNTIME_ERROR
            }
        };
    }

    if let Some(template_error) = e.downcast_ref::<TemplateError>() {
        return match template_error {
            TemplateError::Cancelled => {
                println!("{}", output::failure("Operation cancelled"));
                ExitCodes::SUCCESS
            }
            TemplateError::NoMatchingTemplate { combinations, .. } => {
                eprintln!("{}", output::failure(template_error));
                println!("Valid combinations:");
                for row in combinations {
                    println!("  {}", row);
                }
                ExitCodes::TEMPLATE_ERROR
            }
            TemplateError::Filesystem { .. } => {
                eprintln!("{}", output::failure(format!("{:#}", e)));
                ExitCodes::FILESYSTEM_ERROR
            }
            _ => {
                eprintln!("{}", output::failure(format!("{:#}", e)));
                ExitCodes::TEMPLATE_ERROR
            }
        };
    }

    eprintln!("{}", output::failure(format!("Error: {:#}", e)));
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};
    use std::io;
    use std::path::PathBuf;

    fn code(err: impl Into<anyhow::Error>) -> u8 {
        report_error(&err.into())
    }

    #[test]
    fn test_cancellation_exits_zero() {
        assert_eq!(code(CliError::Cancelled), ExitCodes::SUCCESS);
        assert_eq!(code(TemplateError::Cancelled), ExitCodes::SUCCESS);
    }

    #[test]
    fn test_cli_error_codes() {
        let invalid = CliError::InvalidArgument {
            template: "nope".into(),
            available: vec!["pg".into()],
        };
        assert_eq!(code(invalid), ExitCodes::INVALID_ARGS);

        let too_old = CliError::RuntimeTooOld {
            found: "12.22.0".into(),
            required: "14.0.0".into(),
        };
        assert_eq!(code(too_old), ExitCodes::RUNTIME_ERROR);
    }

    #[test]
    fn test_template_error_codes() {
        let no_match = TemplateError::NoMatchingTemplate {
            selections: "database=MongoDB, language=TypeScript, server=Hono".into(),
            combinations: vec!["pg-ts  Express + Postgres + TypeScript".into()],
        };
        assert_eq!(code(no_match), ExitCodes::TEMPLATE_ERROR);

        let not_found = TemplateError::TemplateDirectoryNotFound {
            template: "pg".into(),
            checked: vec![PathBuf::from("/nowhere/template-pg")],
        };
        assert_eq!(code(not_found), ExitCodes::TEMPLATE_ERROR);

        let fs_error = TemplateError::fs(
            "/tmp/app/package.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(code(fs_error), ExitCodes::FILESYSTEM_ERROR);
    }

    #[test]
    fn test_codes_survive_context() {
        let wrapped = Err::<(), _>(TemplateError::fs(
            "/tmp/app/app.js",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        ))
        .context("Scaffold task failed")
        .unwrap_err();
        assert_eq!(report_error(&wrapped), ExitCodes::FILESYSTEM_ERROR);

        let wrapped = Err::<(), _>(CliError::Cancelled)
            .context("Prompt failed")
            .unwrap_err();
        assert_eq!(report_error(&wrapped), ExitCodes::SUCCESS);
    }

    #[test]
    fn test_other_errors_are_general() {
        assert_eq!(code(anyhow!("something else")), ExitCodes::GENERAL_ERROR);
    }
}
