//! Integration test utilities for the Corvid compiler
//!
//! Test programs live in `test-programs/` as serialized syntax trees, named
//! `NN-description.json`.

use anyhow::{Context, Result};
use cv_driver::{JsonTreeParser, SourceParser};
use cv_syntax::Program;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the test programs
pub fn programs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-programs")
}

/// Raw JSON of the test program `name` (without extension)
///
/// # Errors
///
/// Returns an error if the file cannot be read
pub fn source(name: &str) -> Result<String> {
    let path = programs_dir().join(format!("{name}.json"));
    fs::read_to_string(&path).with_context(|| format!("Failed to read test program: {}", path.display()))
}

/// Parsed test program `name`
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn load(name: &str) -> Result<Program> {
    let source = source(name)?;
    Ok(JsonTreeParser.parse(&source)?)
}

/// Names of all test programs, sorted
///
/// # Errors
///
/// Returns an error if the directory cannot be listed
pub fn all_programs() -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(programs_dir())?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| stem(&path))
        .collect();
    names.sort();
    Ok(names)
}

fn stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string)
}
