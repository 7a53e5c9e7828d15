//! Run command implementation

use anyhow::Result;
use colored::Colorize;
use cv_driver::Config;
use std::path::Path;

pub fn run(path: &Path, function: &str, args: &[i32], config: &Config) -> Result<()> {
    let compilation = crate::compiler::compile_file(path, config)?;

    let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
    eprintln!("{} {}({})", "Running".green().bold(), function, rendered.join(", "));

    let value = cv_driver::run(&compilation, function, args, config)?;
    println!("{value}");
    Ok(())
}
