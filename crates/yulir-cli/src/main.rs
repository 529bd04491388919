//! Yulir command-line driver
//!
//! ```bash
//! # Lower an analyzed Yul program (JSON syntax tree) and print the IR
//! yulir lower program.json
//!
//! # Write the IR to a file, using a custom configuration
//! yulir lower program.json -c yulir.toml -o program.ll
//!
//! # List the builtins of the configured dialect
//! yulir builtins
//! ```

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yulir")]
#[command(about = "Lower structured Yul into basic-block IR", long_about = None)]
#[command(version)]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Explicit log level, overrides -v and -q
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a JSON syntax tree to IR
    Lower {
        /// Syntax tree produced by the analyzer
        input: PathBuf,
        /// Configuration file (defaults to ./yulir.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the IR here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip structural validation of the lowered module
        #[arg(long)]
        no_validate: bool,
    },

    /// List the builtins of the configured dialect
    Builtins {
        /// Configuration file (defaults to ./yulir.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet, cli.log_level);

    match cli.command {
        Commands::Lower {
            input,
            config,
            output,
            no_validate,
        } => commands::lower::execute(&input, config.as_deref(), output.as_deref(), no_validate),
        Commands::Builtins { config } => commands::builtins::execute(config.as_deref()),
    }
}

fn setup_logging(verbose: u8, quiet: bool, log_level: Option<LogLevel>) {
    use tracing_subscriber::EnvFilter;

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
