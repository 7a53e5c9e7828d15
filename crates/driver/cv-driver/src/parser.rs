//! Parser seam
//!
//! Source parsing belongs to an external grammar-driven parser. The driver
//! only needs something that turns text into a [`Program`]; whatever it
//! reports is passed through as a [`ParseError`].

use cv_syntax::Program;
use miette::Diagnostic;
use thiserror::Error;

/// Error reported by a [`SourceParser`]
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[error("parse error at {line}:{column}: {message}")]
#[diagnostic(code(parser::syntax_error))]
pub struct ParseError {
    /// Parser message, unchanged
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

/// Turns source text into a syntax tree
pub trait SourceParser {
    /// Parse `source`
    ///
    /// # Errors
    ///
    /// Returns the parser's error when `source` is not a valid program.
    fn parse(&self, source: &str) -> Result<Program, ParseError>;
}

/// Parser for syntax trees serialized as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTreeParser;

impl SourceParser for JsonTreeParser {
    fn parse(&self, source: &str) -> Result<Program, ParseError> {
        serde_json::from_str(source).map_err(|err| ParseError {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        })
    }
}
