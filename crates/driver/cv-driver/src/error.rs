//! Errors surfaced by a compilation

use crate::parser::ParseError;
use cv_ir::VerifyError;
use cv_lower::LowerError;
use cv_span::FileSpan;
use miette::Diagnostic;
use thiserror::Error;

/// Why a compilation produced no module
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum CompileError {
    /// The parser rejected the source
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// The program is invalid
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lower(#[from] LowerError),

    /// Lowering produced malformed IR; always a compiler bug
    #[error("internal error: {0}")]
    #[diagnostic(code(driver::invalid_ir))]
    Verify(#[from] VerifyError),
}

impl CompileError {
    /// Stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "ParseError",
            Self::Lower(err) => err.kind(),
            Self::Verify(_) => "InternalError",
        }
    }

    /// Source location, when the error has one
    pub fn span(&self) -> Option<FileSpan> {
        match self {
            Self::Lower(err) => Some(err.span()),
            Self::Parse(_) | Self::Verify(_) => None,
        }
    }
}
