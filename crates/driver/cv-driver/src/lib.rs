//! Compilation driver and high-level APIs
//!
//! Orchestrates the pipeline: parse (through a [`SourceParser`]), lower,
//! verify, print, and optionally extract graph facts. Each call owns all of
//! its state, so independent compilations can run on separate threads.

pub mod config;
pub mod error;
pub mod parser;
pub mod request;

pub use config::Config;
pub use error::CompileError;
pub use parser::{JsonTreeParser, ParseError, SourceParser};
pub use request::{CompileRequest, CompileResponse, ErrorReport, Location, handle};

use cv_facts::FactSet;
use cv_interpreter::{Interpreter, InterpreterError, Value};
use cv_ir::Module;
use cv_syntax::Program;
use tracing::info;

/// Result of a successful compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    /// Lowered module
    pub module: Module,
    /// Textual IR of `module`
    pub ir: String,
    /// Graph facts, when `[facts] enabled`
    pub facts: Option<FactSet>,
}

/// Compile an already-parsed program
///
/// # Errors
///
/// Returns the first lowering error, or a verification failure if the
/// lowered IR is malformed.
pub fn compile(program: &Program, config: &Config) -> Result<Compilation, CompileError> {
    let module = cv_lower::lower_program(program, &config.lower_options())?;
    cv_ir::verify_module(&module)?;

    let ir = module.to_string();
    let facts = config.facts.enabled.then(|| cv_facts::extract(program));
    info!(
        module = %module.name,
        functions = module.functions.len(),
        facts = facts.is_some(),
        "compiled module"
    );

    Ok(Compilation { module, ir, facts })
}

/// Parse and compile source text
///
/// # Errors
///
/// Returns the parser's error unchanged, or any error from [`compile`].
pub fn compile_source(
    parser: &impl SourceParser,
    source: &str,
    config: &Config,
) -> Result<Compilation, CompileError> {
    let program = parser.parse(source)?;
    compile(&program, config)
}

/// Run `function` of a compiled module in the reference interpreter
///
/// # Errors
///
/// Returns `InterpreterError` if the function is missing or execution fails.
pub fn run(
    compilation: &Compilation,
    function: &str,
    args: &[i32],
    config: &Config,
) -> Result<Value, InterpreterError> {
    Interpreter::with_fuel(config.interpreter.fuel).run(&compilation.module, function, args)
}
