//! Statement lowering
//!
//! Statements are lowered into the block under the builder's cursor. Control
//! constructs create their blocks up front, sharing one label suffix, and
//! leave the cursor on their exit block. When no path reaches that block the
//! cursor stays closed and any following statement is unreachable.

use crate::context::{LoopTargets, LoweringContext};
use crate::error::{LowerError, LowerResult};
use crate::expr::expect_type;
use crate::scope::Binding;
use cv_ir::IrType;
use cv_span::FileSpan;
use cv_syntax::{Block, Expr, Stmt, TypeRef};

impl LoweringContext<'_> {
    /// Lowers statements in order into the current scope
    pub(crate) fn lower_stmts(&mut self, stmts: &[Stmt]) -> LowerResult<()> {
        stmts.iter().try_for_each(|stmt| self.lower_stmt(stmt))
    }

    pub(crate) fn lower_stmt(&mut self, stmt: &Stmt) -> LowerResult<()> {
        if !self.builder.is_open() {
            return Err(LowerError::UnreachableCode { span: stmt.span() });
        }

        match stmt {
            Stmt::VarDecl { name, ty, init, span } => {
                self.lower_var_decl(name, ty, init.as_ref(), *span)
            }
            Stmt::Assign { target, value, span } => {
                let binding = self.lookup(target, *span)?;
                let value = self.lower_expr(value)?;
                self.store_checked(value, binding, target, *span)
            }
            Stmt::Return { value, span } => self.lower_return(value.as_ref(), *span),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => self.lower_if(condition, then_branch, else_branch.as_ref()),
            Stmt::While { condition, body, .. } => self.lower_while(condition, body),
            Stmt::For {
                init,
                condition,
                step,
                body,
                ..
            } => self.lower_for(init.as_deref(), condition.as_ref(), step.as_deref(), body),
            Stmt::Break { span } => {
                let targets = self.innermost_loop("break", *span)?;
                self.builder.branch(targets.break_to);
                Ok(())
            }
            Stmt::Continue { span } => {
                let targets = self.innermost_loop("continue", *span)?;
                self.builder.branch(targets.continue_to);
                Ok(())
            }
            Stmt::Block(block) => self.scoped(|ctx| ctx.lower_stmts(&block.stmts)),
            Stmt::Expr { expr, .. } => self.lower_expr(expr).map(drop),
        }
    }

    fn lower_var_decl(
        &mut self,
        name: &str,
        ty: &TypeRef,
        init: Option<&Expr>,
        span: FileSpan,
    ) -> LowerResult<()> {
        let ty = self.resolve_value_type(name, ty)?;
        // The initializer sees the enclosing binding, not the one being declared.
        let value = init.map(|init| self.lower_expr(init)).transpose()?;
        let slot = self.declare(name, ty, span)?;
        if let Some(value) = value {
            self.store_checked(value, Binding { slot, ty, span }, name, span)?;
        }
        Ok(())
    }

    fn lower_return(&mut self, value: Option<&Expr>, span: FileSpan) -> LowerResult<()> {
        let return_type = self.builder.return_type();
        match (value, return_type) {
            (None, IrType::Void) => self.builder.ret(None),
            (None, expected) => {
                return Err(LowerError::TypeMismatch {
                    context: "return value".to_string(),
                    expected,
                    found: IrType::Void,
                    span,
                });
            }
            (Some(expr), IrType::Void) => {
                let found = self.lower_expr(expr)?.ty();
                return Err(LowerError::TypeMismatch {
                    context: "return value".to_string(),
                    expected: IrType::Void,
                    found,
                    span: expr.span(),
                });
            }
            (Some(expr), expected) => {
                let value = self.lower_expr(expr)?;
                let value = expect_type(value, expected, "return value", expr.span())?;
                self.builder.ret(Some(value));
            }
        }
        Ok(())
    }

    fn lower_if(
        &mut self,
        condition: &Expr,
        then_branch: &Block,
        else_branch: Option<&Block>,
    ) -> LowerResult<()> {
        let cond = self.lower_condition(condition)?;

        let suffix = self.builder.next_label_suffix();
        let then_block = self.new_block("if", "then", suffix);
        let else_block = else_branch.map(|_| self.new_block("if", "else", suffix));
        let end_block = self.new_block("if", "end", suffix);

        self.builder.cond_branch(cond, then_block, else_block.unwrap_or(end_block));

        self.builder.position_at(then_block);
        self.scoped(|ctx| ctx.lower_stmts(&then_branch.stmts))?;
        self.builder.branch(end_block);

        if let (Some(else_block), Some(else_branch)) = (else_block, else_branch) {
            self.builder.position_at(else_block);
            self.scoped(|ctx| ctx.lower_stmts(&else_branch.stmts))?;
            self.builder.branch(end_block);
        }

        self.builder.position_at(end_block);
        Ok(())
    }

    fn lower_while(&mut self, condition: &Expr, body: &Block) -> LowerResult<()> {
        let suffix = self.builder.next_label_suffix();
        let cond_block = self.new_block("while", "cond", suffix);
        let body_block = self.new_block("while", "body", suffix);
        let end_block = self.new_block("while", "end", suffix);

        self.builder.branch(cond_block);
        self.builder.position_at(cond_block);
        let cond = self.lower_condition(condition)?;
        self.builder.cond_branch(cond, body_block, end_block);

        self.builder.position_at(body_block);
        let targets = LoopTargets {
            break_to: end_block,
            continue_to: cond_block,
        };
        self.in_loop(targets, |ctx| ctx.scoped(|ctx| ctx.lower_stmts(&body.stmts)))?;
        self.builder.branch(cond_block);

        self.builder.position_at(end_block);
        Ok(())
    }

    fn lower_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        step: Option<&Stmt>,
        body: &Block,
    ) -> LowerResult<()> {
        self.scoped(|ctx| {
            if let Some(init) = init {
                ctx.lower_stmt(init)?;
            }

            let suffix = ctx.builder.next_label_suffix();
            let cond_block = ctx.new_block("for", "cond", suffix);
            let body_block = ctx.new_block("for", "body", suffix);
            let step_block = ctx.new_block("for", "step", suffix);
            let end_block = ctx.new_block("for", "end", suffix);

            ctx.builder.branch(cond_block);
            ctx.builder.position_at(cond_block);
            match condition {
                Some(condition) => {
                    let cond = ctx.lower_condition(condition)?;
                    ctx.builder.cond_branch(cond, body_block, end_block);
                }
                None => ctx.builder.branch(body_block),
            }

            ctx.builder.position_at(body_block);
            let targets = LoopTargets {
                break_to: end_block,
                continue_to: step_block,
            };
            ctx.in_loop(targets, |ctx| ctx.scoped(|ctx| ctx.lower_stmts(&body.stmts)))?;
            ctx.builder.branch(step_block);

            if ctx.builder.position_at(step_block) {
                if let Some(step) = step {
                    ctx.lower_stmt(step)?;
                }
                ctx.builder.branch(cond_block);
            }

            ctx.builder.position_at(end_block);
            Ok(())
        })
    }

    fn innermost_loop(&self, keyword: &str, span: FileSpan) -> LowerResult<LoopTargets> {
        self.loops.last().copied().ok_or_else(|| LowerError::JumpOutsideLoop {
            keyword: keyword.to_string(),
            span,
        })
    }
}
