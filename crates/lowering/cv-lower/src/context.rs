//! Per-function lowering state

use crate::LowerOptions;
use crate::error::{LowerError, LowerResult};
use crate::scope::{Binding, ScopeStack};
use crate::types::TypeResolver;
use cv_intern::Interner;
use cv_ir::{BlockId, Function, FunctionBuilder, IrType, SlotId, Value};
use cv_span::FileSpan;
use cv_syntax::FunctionDecl;
use tracing::{debug, trace};

/// Jump targets of the innermost enclosing loop
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoopTargets {
    /// Where `break` goes
    pub break_to: BlockId,
    /// Where `continue` goes
    pub continue_to: BlockId,
}

/// State threaded through the lowering of one function body
pub struct LoweringContext<'ctx> {
    /// IR builder, owns the block cursor
    pub(crate) builder: FunctionBuilder,
    /// Local bindings
    pub(crate) scopes: ScopeStack,
    /// Enclosing loops, innermost last
    pub(crate) loops: Vec<LoopTargets>,
    /// Name interner shared by the whole compilation
    pub(crate) interner: &'ctx mut Interner,
    types: &'ctx TypeResolver,
    options: &'ctx LowerOptions,
    function_name: String,
}

impl<'ctx> LoweringContext<'ctx> {
    /// Lowers one function declaration
    ///
    /// # Errors
    ///
    /// Returns the first error found in the signature or the body.
    pub fn lower_function(
        decl: &FunctionDecl,
        interner: &'ctx mut Interner,
        types: &'ctx TypeResolver,
        options: &'ctx LowerOptions,
    ) -> LowerResult<Function> {
        let return_type = types.resolve(&decl.return_type)?;
        let params = decl
            .params
            .iter()
            .map(|param| Ok((param.name.clone(), types.resolve_value(&param.name, &param.ty)?)))
            .collect::<LowerResult<Vec<_>>>()?;

        let mut ctx = Self {
            builder: FunctionBuilder::new(decl.name.clone(), return_type, params),
            scopes: ScopeStack::new(),
            loops: Vec::new(),
            interner,
            types,
            options,
            function_name: decl.name.clone(),
        };

        ctx.scoped(|ctx| {
            for (index, param) in decl.params.iter().enumerate() {
                let ty = ctx.builder.params()[index].ty;
                let incoming = ctx.builder.params()[index].value();
                let slot = ctx.declare(&param.name, ty, param.span)?;
                ctx.builder.store(incoming, slot);
            }
            ctx.lower_stmts(&decl.body.stmts)?;
            ctx.finish_body(decl.body.span)
        })?;

        let function = ctx.builder.finish();
        debug!(
            function = %function.name,
            blocks = function.blocks.len(),
            slots = function.slots.len(),
            "lowered function"
        );
        Ok(function)
    }

    /// Handles control falling off the end of the body
    fn finish_body(&mut self, body_span: FileSpan) -> LowerResult<()> {
        if !self.builder.is_open() {
            return Ok(());
        }
        if self.builder.return_type() == IrType::Void && self.options.implicit_void_return {
            trace!(function = %self.function_name, "synthesized implicit return");
            self.builder.ret(None);
            return Ok(());
        }
        Err(LowerError::MissingReturn {
            function: self.function_name.clone(),
            span: body_span,
        })
    }

    /// Runs `f` inside a fresh scope; the scope is popped whether `f`
    /// succeeds or fails
    pub(crate) fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> LowerResult<T>) -> LowerResult<T> {
        self.scopes.push();
        let result = f(self);
        self.scopes.pop();
        result
    }

    /// Runs `f` with `targets` as the innermost loop
    pub(crate) fn in_loop<T>(
        &mut self,
        targets: LoopTargets,
        f: impl FnOnce(&mut Self) -> LowerResult<T>,
    ) -> LowerResult<T> {
        self.loops.push(targets);
        let result = f(self);
        self.loops.pop();
        result
    }

    /// Appends a block labelled `{construct}.{part}.{suffix}`
    pub(crate) fn new_block(&mut self, construct: &str, part: &str, suffix: u32) -> BlockId {
        let label = format!("{construct}.{part}.{suffix}");
        trace!(function = %self.function_name, %label, "new block");
        self.builder.new_block(label)
    }

    /// Binds `name` in the innermost scope to a fresh slot
    pub(crate) fn declare(&mut self, name: &str, ty: IrType, span: FileSpan) -> LowerResult<SlotId> {
        let redeclared = |existing: &Binding| LowerError::Redeclaration {
            name: name.to_string(),
            first: existing.span,
            second: span,
        };

        let symbol = self.interner.intern(name);
        if let Some(existing) = self.scopes.lookup_local(symbol) {
            return Err(redeclared(existing));
        }

        let slot = self.builder.allocate(name, ty);
        self.scopes
            .declare(symbol, Binding { slot, ty, span })
            .map_err(|existing| redeclared(&existing))?;
        Ok(slot)
    }

    /// Innermost binding of `name`
    pub(crate) fn lookup(&self, name: &str, span: FileSpan) -> LowerResult<Binding> {
        self.interner
            .get(name)
            .and_then(|symbol| self.scopes.lookup(symbol))
            .copied()
            .ok_or_else(|| {
                let visible = self.scopes.visible().map(|symbol| self.interner.resolve(&symbol));
                LowerError::undeclared(name, span, visible)
            })
    }

    /// Resolves the type of a local binding
    pub(crate) fn resolve_value_type(&self, name: &str, ty: &cv_syntax::TypeRef) -> LowerResult<IrType> {
        self.types.resolve_value(name, ty)
    }

    /// Stores `value` into a binding of the same type
    pub(crate) fn store_checked(
        &mut self,
        value: Value,
        binding: Binding,
        name: &str,
        span: FileSpan,
    ) -> LowerResult<()> {
        if value.ty() != binding.ty {
            return Err(LowerError::TypeMismatch {
                context: format!("assignment to `{name}`"),
                expected: binding.ty,
                found: value.ty(),
                span,
            });
        }
        self.builder.store(value, binding.slot);
        Ok(())
    }
}
