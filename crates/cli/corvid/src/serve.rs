//! One-shot request server over stdin/stdout

use anyhow::{Context, Result};
use cv_driver::{CompileRequest, Config, JsonTreeParser};
use std::io::Read;

pub fn serve_once(config: &Config) -> Result<()> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read request from stdin")?;

    let request: CompileRequest = serde_json::from_str(&input).context("Malformed compile request")?;
    let response = cv_driver::handle(&JsonTreeParser, &request, config);
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
