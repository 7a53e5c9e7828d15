//! Corvid compiler CLI
//!
//! Lowers serialized syntax trees to IR, checks them, runs them in the
//! reference interpreter, or serves a single JSON compile request.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod check;
mod compiler;
mod lower;
mod run;
mod serve;

#[derive(Parser)]
#[command(name = "corvid")]
#[command(about = "Corvid IR lowering toolchain", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./corvid.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a syntax tree and print or write its IR
    Lower {
        /// Syntax tree as JSON
        input: PathBuf,

        /// Write the IR here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the program's graph facts as JSON
        #[arg(long)]
        facts: Option<PathBuf>,
    },

    /// Check a syntax tree for errors
    Check {
        /// Syntax tree as JSON
        input: PathBuf,
    },

    /// Lower a syntax tree and run one of its functions
    Run {
        /// Syntax tree as JSON
        input: PathBuf,

        /// Function to call
        #[arg(short, long, default_value = "main")]
        function: String,

        /// Integer arguments
        #[arg(allow_negative_numbers = true)]
        args: Vec<i32>,
    },

    /// Read one JSON compile request from stdin and answer on stdout
    ServeOnce,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = compiler::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Lower { input, output, facts } => {
            lower::lower(&input, output.as_deref(), facts.as_deref(), &config)?;
        }
        Commands::Check { input } => {
            check::check(&input, &config)?;
        }
        Commands::Run { input, function, args } => {
            run::run(&input, &function, &args, &config)?;
        }
        Commands::ServeOnce => {
            serve::serve_once(&config)?;
        }
    }

    Ok(())
}
