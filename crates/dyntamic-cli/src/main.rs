//! # dyntamic CLI entry point
//!
//! Parses command-line arguments, loads the optional config file, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dyntamic_cli::compile::{run_compile, CompileArgs};
use dyntamic_cli::infer::{run_infer, InferArgs};
use dyntamic_cli::validate::{run_validate, ValidateArgs};
use dyntamic_cli::CliConfig;

/// dyntamic: compile JSON-Schema documents into runtime models.
///
/// Compiles schemas into model descriptors, validates payloads against
/// them, and infers schemas from type-name samples.
#[derive(Parser, Debug)]
#[command(name = "dyntamic", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (JSON or YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a schema into a model descriptor.
    Compile(CompileArgs),

    /// Validate a payload against a schema.
    Validate(ValidateArgs),

    /// Infer a schema from a type-name sample.
    Infer(InferArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("dyntamic CLI starting");

    let result = CliConfig::load_optional(cli.config.as_deref()).and_then(|config| {
        match &cli.command {
            Commands::Compile(args) => run_compile(args, &config),
            Commands::Validate(args) => run_validate(args, &config),
            Commands::Infer(args) => run_infer(args, &config),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
