//! Request/response boundary
//!
//! A request carries serialized source; the response carries either the
//! complete IR text or exactly one error. Partial IR is never returned.

use crate::error::CompileError;
use crate::parser::SourceParser;
use crate::{Config, compile_source};
use cv_facts::FactSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A compilation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRequest {
    /// Source handed to the parser
    pub source: String,
}

/// Outcome of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompileResponse {
    /// The whole module lowered
    Success {
        /// Textual IR of the module
        ir: String,
        /// Graph facts, when enabled
        #[serde(default, skip_serializing_if = "Option::is_none")]
        facts: Option<FactSet>,
    },
    /// Compilation stopped at the first error
    Failure {
        /// The error
        error: ErrorReport,
    },
}

/// Serializable description of a [`CompileError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error kind, e.g. `RedeclarationError`
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// Where the error was found
    pub location: Location,
}

/// Position of an error in the source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<u32>,
    /// Start byte offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    /// End byte offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u32>,
    /// 1-based line, for parser errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 1-based column, for parser errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl From<&CompileError> for ErrorReport {
    fn from(err: &CompileError) -> Self {
        let location = match err {
            CompileError::Parse(parse) => Location {
                line: Some(parse.line),
                column: Some(parse.column),
                ..Location::default()
            },
            _ => err.span().map_or_else(Location::default, |span| Location {
                file: Some(span.file.0),
                start: Some(span.span.start),
                end: Some(span.span.end),
                ..Location::default()
            }),
        };
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            location,
        }
    }
}

/// Serves one request
pub fn handle(parser: &impl SourceParser, request: &CompileRequest, config: &Config) -> CompileResponse {
    match compile_source(parser, &request.source, config) {
        Ok(compilation) => CompileResponse::Success {
            ir: compilation.ir,
            facts: compilation.facts,
        },
        Err(err) => {
            warn!(kind = err.kind(), "request failed: {err}");
            CompileResponse::Failure {
                error: ErrorReport::from(&err),
            }
        }
    }
}
