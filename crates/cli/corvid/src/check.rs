//! Check command implementation

use anyhow::Result;
use colored::Colorize;
use cv_driver::Config;
use std::path::Path;

pub fn check(path: &Path, config: &Config) -> Result<()> {
    println!("{} {}", "Checking".green().bold(), path.display());

    let compilation = crate::compiler::compile_file(path, config)?;
    for function in &compilation.module.functions {
        println!(
            "  {} {} ({} blocks, {} slots)",
            "✓".green(),
            function.name,
            function.blocks.len(),
            function.slots.len()
        );
    }

    println!("{} No errors found", "Success:".green().bold());
    Ok(())
}
