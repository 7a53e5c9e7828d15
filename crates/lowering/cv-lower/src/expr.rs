//! Expression lowering

use crate::context::LoweringContext;
use crate::error::{LowerError, LowerResult};
use cv_ir::{BinaryOp, CompareOp, IrType, Value};
use cv_span::FileSpan;
use cv_syntax::{BinaryOp as SyntaxOp, Expr, UnaryOp};

/// How a source binary operator lowers
enum OpKind {
    Arith(BinaryOp),
    Compare(CompareOp),
    ShortCircuit,
}

fn classify(op: SyntaxOp) -> OpKind {
    match op {
        SyntaxOp::Add => OpKind::Arith(BinaryOp::Add),
        SyntaxOp::Sub => OpKind::Arith(BinaryOp::Sub),
        SyntaxOp::Mul => OpKind::Arith(BinaryOp::Mul),
        SyntaxOp::Div => OpKind::Arith(BinaryOp::Div),
        SyntaxOp::Rem => OpKind::Arith(BinaryOp::Rem),
        SyntaxOp::Eq => OpKind::Compare(CompareOp::Eq),
        SyntaxOp::Ne => OpKind::Compare(CompareOp::Ne),
        SyntaxOp::Lt => OpKind::Compare(CompareOp::Lt),
        SyntaxOp::Le => OpKind::Compare(CompareOp::Le),
        SyntaxOp::Gt => OpKind::Compare(CompareOp::Gt),
        SyntaxOp::Ge => OpKind::Compare(CompareOp::Ge),
        SyntaxOp::And | SyntaxOp::Or => OpKind::ShortCircuit,
    }
}

impl LoweringContext<'_> {
    /// Lowers an expression to a value; comparisons yield `i1`, everything
    /// else `i32`
    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> LowerResult<Value> {
        match expr {
            Expr::Int { value, span } => i32::try_from(*value)
                .map(Value::int)
                .map_err(|_| LowerError::LiteralOutOfRange {
                    value: *value,
                    span: *span,
                }),

            Expr::Variable { name, span } => {
                let binding = self.lookup(name, *span)?;
                Ok(self.builder.load(binding.slot))
            }

            Expr::Binary { op, lhs, rhs, span } => match classify(*op) {
                OpKind::Arith(arith) => {
                    let context = format!("operand of `{op}`");
                    let lhs = self.lower_int(lhs, &context)?;
                    let rhs = self.lower_int(rhs, &context)?;
                    Ok(self.builder.binary(arith, lhs, rhs))
                }
                OpKind::Compare(cmp) => {
                    let context = format!("operand of `{op}`");
                    let lhs = self.lower_int(lhs, &context)?;
                    let rhs = self.lower_int(rhs, &context)?;
                    Ok(self.builder.compare(cmp, lhs, rhs))
                }
                OpKind::ShortCircuit => Err(LowerError::UnsupportedConstruct {
                    construct: format!("short-circuit operator `{op}`"),
                    span: *span,
                }),
            },

            Expr::Unary { op, operand, .. } => match op {
                UnaryOp::Neg => {
                    let value = self.lower_int(operand, "operand of unary `-`")?;
                    Ok(self.builder.binary(BinaryOp::Sub, Value::int(0), value))
                }
                UnaryOp::Not => {
                    let value = self.lower_int(operand, "operand of `!`")?;
                    Ok(self.builder.compare(CompareOp::Eq, value, Value::int(0)))
                }
            },

            Expr::Call { callee, span, .. } => Err(LowerError::UnsupportedConstruct {
                construct: format!("call to `{callee}`"),
                span: *span,
            }),
        }
    }

    /// Lowers an expression that must produce an `i32`
    pub(crate) fn lower_int(&mut self, expr: &Expr, context: &str) -> LowerResult<Value> {
        let value = self.lower_expr(expr)?;
        expect_type(value, IrType::I32, context, expr.span())
    }

    /// Lowers a branch condition to an `i1`; an `i32` is compared against
    /// zero
    pub(crate) fn lower_condition(&mut self, expr: &Expr) -> LowerResult<Value> {
        let value = self.lower_expr(expr)?;
        match value.ty() {
            IrType::Bool => Ok(value),
            _ => Ok(self.builder.compare(CompareOp::Ne, value, Value::int(0))),
        }
    }
}

/// Checks that `value` has type `expected`
pub(crate) fn expect_type(value: Value, expected: IrType, context: &str, span: FileSpan) -> LowerResult<Value> {
    if value.ty() == expected {
        Ok(value)
    } else {
        Err(LowerError::TypeMismatch {
            context: context.to_string(),
            expected,
            found: value.ty(),
            span,
        })
    }
}
