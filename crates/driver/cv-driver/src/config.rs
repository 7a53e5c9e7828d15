//! Compiler configuration (`corvid.toml`)

use anyhow::{Context, Result};
use cv_interpreter::DEFAULT_FUEL;
use cv_lower::LowerOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration; every section and field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lowering options
    pub lowering: LoweringConfig,

    /// Graph fact extraction
    pub facts: FactsConfig,

    /// Reference interpreter
    pub interpreter: InterpreterConfig,
}

/// `[lowering]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoweringConfig {
    /// Name of the produced module
    pub module_name: String,

    /// Synthesize `ret void` at the end of void functions
    pub implicit_void_return: bool,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        let options = LowerOptions::default();
        Self {
            module_name: options.module_name,
            implicit_void_return: options.implicit_void_return,
        }
    }
}

/// `[facts]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactsConfig {
    /// Extract graph facts after a successful compilation
    pub enabled: bool,
}

/// `[interpreter]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpreterConfig {
    /// Instruction budget per run
    pub fuel: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { fuel: DEFAULT_FUEL }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Options handed to the lowering
    pub fn lower_options(&self) -> LowerOptions {
        LowerOptions {
            module_name: self.lowering.module_name.clone(),
            implicit_void_return: self.lowering.implicit_void_return,
        }
    }
}
