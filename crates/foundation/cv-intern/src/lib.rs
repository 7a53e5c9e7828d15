//! String interning for identifiers
//!
//! Each compilation owns its own interner; symbols from one interner are
//! meaningless in another.

pub use lasso::Spur as Symbol;
use lasso::Rodeo;

/// Per-compilation string interner
#[derive(Debug, Default)]
pub struct Interner {
    inner: Rodeo,
}

impl Interner {
    /// Creates an empty interner
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `text`, returning the existing symbol when already present
    pub fn intern(&mut self, text: &str) -> Symbol {
        self.inner.get_or_intern(text)
    }

    /// Looks up `text` without interning it
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.inner.get(text)
    }

    /// Resolves a symbol produced by this interner
    pub fn resolve(&self, sym: &Symbol) -> &str {
        self.inner.resolve(sym)
    }

    /// Resolves a symbol that may come from another interner
    pub fn try_resolve(&self, sym: &Symbol) -> Option<&str> {
        self.inner.try_resolve(sym)
    }

    /// Number of distinct strings interned so far
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been interned yet
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
