//! Lexical scopes for local bindings

use cv_intern::Symbol;
use cv_ir::{IrType, SlotId};
use cv_span::FileSpan;
use rustc_hash::FxHashMap;

/// What a name is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Storage slot of the local
    pub slot: SlotId,
    /// Declared type
    pub ty: IrType,
    /// Where it was declared
    pub span: FileSpan,
}

/// Stack of scopes; the innermost is last
///
/// The outermost frame belongs to the function and holds its parameters.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<FxHashMap<Symbol, Binding>>,
}

impl ScopeStack {
    /// Empty stack with no frames
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a new innermost scope
    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Leaves the innermost scope, discarding its bindings
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Binding of `name` in the innermost scope only
    pub fn lookup_local(&self, name: Symbol) -> Option<&Binding> {
        self.frames.last().and_then(|frame| frame.get(&name))
    }

    /// Adds a binding to the innermost scope
    ///
    /// # Errors
    ///
    /// Returns the existing binding when the innermost scope already has
    /// `name`; the stack is left unchanged.
    pub fn declare(&mut self, name: Symbol, binding: Binding) -> Result<(), Binding> {
        if let Some(existing) = self.lookup_local(name) {
            return Err(*existing);
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, binding);
        }
        Ok(())
    }

    /// Innermost binding of `name`
    pub fn lookup(&self, name: Symbol) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(&name))
    }

    /// Every name visible from the innermost scope
    pub fn visible(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.frames.iter().flat_map(|frame| frame.keys().copied())
    }
}
