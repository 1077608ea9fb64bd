//! `confstore` – inspect and initialise configuration files from a shell.
//!
//! # Usage
//!
//! ```text
//! confstore [OPTIONS] <COMMAND>
//!
//! Commands:
//!   formats            List the registered file extensions
//!   check <PATH>       Parse a file and report `ok` or the error
//!   init  <PATH>       Create the file with an empty table if it is missing
//!   get   <PATH> <KEY> Print the value at a dotted key, e.g. `server.port`
//!
//! Options:
//!   --log-level <FILTER>  Log filter when RUST_LOG is unset [default: warn]
//! ```
//!
//! | Variable        | Description                                   |
//! |-----------------|-----------------------------------------------|
//! | `RUST_LOG`      | Full `tracing` filter, wins over --log-level  |
//! | `CONFSTORE_LOG` | Same as `--log-level`                         |

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use confstore::FormatRegistry;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::InitOutcome;

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "confstore",
    about = "Inspect JSON, YAML and TOML configuration files",
    version
)]
struct Cli {
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn", env = "CONFSTORE_LOG", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the registered file extensions.
    Formats,
    /// Parse a file and report `ok` or the error.  Missing files are errors.
    Check { path: PathBuf },
    /// Create the file holding an empty table if it does not exist.
    Init { path: PathBuf },
    /// Print the value at a dotted key.
    Get { path: PathBuf, key: String },
}

fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let registry = FormatRegistry::new();
    match cli.command {
        Command::Formats => Ok(commands::formats(&registry)),
        Command::Check { path } => commands::check(&registry, &path),
        Command::Init { path } => Ok(match commands::init(&registry, &path)? {
            InitOutcome::Created => format!("created {}", path.display()),
            InitOutcome::AlreadyExists => format!("{} already exists", path.display()),
        }),
        Command::Get { path, key } => commands::get(&registry, &path, &key),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
