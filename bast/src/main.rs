//! bast CLI - validate and transpile BASIC dialect projects.
//!
//! This is the main entry point. It uses clap for argument parsing and
//! dispatches to `validate`/`transpile`, mapping results to the section 6
//! exit codes: 0 (clean), 1 (diagnostics include an error), 2 (configuration
//! error).

mod commands;
mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::common::ReportFormat;
use commands::{
    transpile::{run_transpile, TranspileArgs},
    validate::{run_validate, ValidateArgs},
};
use error::{BastError, Result};

/// bast - validate and transpile BASIC dialect projects
#[derive(Parser, Debug)]
#[command(name = "bast")]
#[command(author = "BrightScript Tools Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate and transpile BASIC dialect projects", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "BAST_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "BAST_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "BAST_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the bast CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a project
    ///
    /// Loads every script and component under the project root, runs the
    /// Structural and Scoped validation passes, and reports diagnostics.
    Validate(ValidateCommand),

    /// Transpile a project
    ///
    /// Loads and validates a project, then lowers every script to its
    /// target-dialect text and writes it under the output directory.
    Transpile(TranspileCommand),
}

/// Arguments for the validate subcommand.
#[derive(Parser, Debug)]
struct ValidateCommand {
    /// Project root directory
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Diagnostic report format
    #[arg(long, value_enum, default_value = "human")]
    format: ReportFormat,
}

/// Arguments for the transpile subcommand.
#[derive(Parser, Debug)]
struct TranspileCommand {
    /// Project root directory
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Output directory for transpiled files
    #[arg(long)]
    out: Option<PathBuf>,

    /// Diagnostic report format
    #[arg(long, value_enum, default_value = "human")]
    format: ReportFormat,

    /// Also write a `.map.json` source map alongside each transpiled file
    #[arg(long)]
    emit_maps: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.no_color) {
        eprintln!("{e}");
        return ExitCode::from(2);
    }

    match execute_command(cli.command, cli.verbose, cli.config) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Initialize the logging system. Only the `bast` binary installs a
/// subscriber; every other crate in the workspace just emits `tracing`
/// events.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };

    let subscriber = fmt::layer().with_ansi(!no_color).with_target(false).with_thread_ids(false).with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| BastError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Execute the selected command, returning the section 6 exit code.
fn execute_command(command: Commands, verbose: bool, config: Option<PathBuf>) -> Result<i32> {
    match command {
        Commands::Validate(args) => {
            run_validate(ValidateArgs { root: args.root, config, format: args.format, verbose })
        }
        Commands::Transpile(args) => run_transpile(TranspileArgs {
            root: args.root,
            config,
            out: args.out,
            format: args.format,
            verbose,
            emit_maps: args.emit_maps,
        }),
    }
}
