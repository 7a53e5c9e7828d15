//! Shared compilation helpers for the CLI commands

use anyhow::{Context, Result};
use colored::Colorize;
use cv_driver::{Compilation, CompileError, Config, JsonTreeParser};
use miette::Diagnostic;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG: &str = "corvid.toml";

/// Configuration from `path`, or `./corvid.toml`, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            debug!("using {DEFAULT_CONFIG} from the working directory");
            Config::from_file(Path::new(DEFAULT_CONFIG))
        }
        None => Ok(Config::default()),
    }
}

/// Compile a serialized syntax tree file, reporting any error on stderr
pub fn compile_file(path: &Path, config: &Config) -> Result<Compilation> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read syntax tree: {}", path.display()))?;

    cv_driver::compile_source(&JsonTreeParser, &source, config).map_err(|err| {
        report(path, &err);
        anyhow::anyhow!("Compilation of {} failed", path.display())
    })
}

/// Print a compile error with its kind, location and help
pub fn report(path: &Path, err: &CompileError) {
    eprintln!("{}{}{} {}", "error[".red().bold(), err.kind().red().bold(), "]:".red().bold(), err);
    match err {
        CompileError::Parse(parse) => {
            eprintln!("  {} {}:{}:{}", "-->".blue(), path.display(), parse.line, parse.column);
        }
        _ => {
            if let Some(span) = err.span() {
                eprintln!("  {} {} ({})", "-->".blue(), path.display(), span);
            }
        }
    }
    if let Some(help) = err.help() {
        eprintln!("  {} {}", "help:".cyan().bold(), help);
    }
}
