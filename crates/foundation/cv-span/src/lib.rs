//! Source file spans and locations
//!
//! Every node the external parser hands over carries a [`FileSpan`]; the
//! lowering errors report it back so a front end can point at the source.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A unique identifier for a source file
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    /// Creates a file id
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset
    pub start: u32,
    /// Exclusive end offset
    pub end: u32,
}

impl Span {
    /// Creates a span from byte offsets
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Byte range covered by the span
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Length in bytes
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A span with associated file
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileSpan {
    /// File the span belongs to
    pub file: FileId,
    /// Byte offsets inside the file
    pub span: Span,
}

impl FileSpan {
    /// Creates a file span
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }

    /// Byte range covered by the span
    pub fn range(&self) -> Range<usize> {
        self.span.range()
    }
}

impl fmt::Display for FileSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {} at {}..{}", self.file.0, self.span.start, self.span.end)
    }
}

impl From<FileSpan> for miette::SourceSpan {
    fn from(span: FileSpan) -> Self {
        Self::new((span.span.start as usize).into(), span.span.len() as usize)
    }
}
