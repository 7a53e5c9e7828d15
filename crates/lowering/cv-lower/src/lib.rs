//! Syntax tree → IR lowering
//!
//! [`lower_program`] is the entry point: it walks the top-level items of a
//! [`Program`] in source order and lowers each function into a
//! [`cv_ir::Function`] of one [`Module`]. The first error aborts the whole
//! module; no partial IR is ever returned.

pub mod context;
pub mod error;
mod expr;
pub mod scope;
mod stmt;
pub mod types;

#[cfg(test)]
mod tests;

pub use context::LoweringContext;
pub use error::{LowerError, LowerResult};
pub use scope::{Binding, ScopeStack};
pub use types::TypeResolver;

use cv_intern::{Interner, Symbol};
use cv_ir::Module;
use cv_span::FileSpan;
use cv_syntax::{Item, Program};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Knobs for a lowering run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerOptions {
    /// Name given to the produced module
    pub module_name: String,
    /// Synthesize `ret void` when a void function falls off its end;
    /// otherwise that is a [`LowerError::MissingReturn`]
    pub implicit_void_return: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            module_name: "main".to_string(),
            implicit_void_return: true,
        }
    }
}

/// Lowers a whole program into one module
///
/// # Errors
///
/// Returns the first [`LowerError`] encountered, in source order.
pub fn lower_program(program: &Program, options: &LowerOptions) -> LowerResult<Module> {
    let mut interner = Interner::new();
    let types = TypeResolver::new();
    let mut defined: FxHashMap<Symbol, FileSpan> = FxHashMap::default();
    let mut module = Module::new(options.module_name.clone());

    for item in &program.items {
        match item {
            Item::Function(decl) => {
                let name = interner.intern(&decl.name);
                if let Some(first) = defined.insert(name, decl.span) {
                    return Err(LowerError::DuplicateFunction {
                        name: decl.name.clone(),
                        first,
                        second: decl.span,
                    });
                }
                let function = LoweringContext::lower_function(decl, &mut interner, &types, options)?;
                module.functions.push(function);
            }
            Item::Global(global) => {
                debug!(name = %global.name, "skipping global declaration");
            }
        }
    }

    debug!(
        module = %module.name,
        functions = module.functions.len(),
        "lowered module"
    );
    Ok(module)
}
