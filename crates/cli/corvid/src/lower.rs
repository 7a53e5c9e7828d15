//! Lower command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use cv_driver::Config;
use std::path::Path;

pub fn lower(input: &Path, output: Option<&Path>, facts: Option<&Path>, config: &Config) -> Result<()> {
    let mut config = config.clone();
    if facts.is_some() {
        config.facts.enabled = true;
    }

    let compilation = crate::compiler::compile_file(input, &config)?;

    match output {
        Some(path) => {
            std::fs::write(path, &compilation.ir)
                .with_context(|| format!("Failed to write IR: {}", path.display()))?;
            eprintln!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => print!("{}", compilation.ir),
    }

    if let (Some(path), Some(set)) = (facts, &compilation.facts) {
        let json = serde_json::to_string_pretty(set)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write facts: {}", path.display()))?;
        eprintln!("{} {}", "Wrote".green().bold(), path.display());
    }

    Ok(())
}
