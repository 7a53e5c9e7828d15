//! Tree construction helpers
//!
//! Builds nodes with empty spans. Used by tests and by tools that synthesize
//! programs instead of parsing them.

use crate::{BinaryOp, Block, Expr, FunctionDecl, GlobalDecl, Item, Param, Program, Stmt, TypeRef, UnaryOp};
use cv_span::FileSpan;

/// A program from its items
pub fn program(items: Vec<Item>) -> Program {
    Program {
        items,
        span: FileSpan::default(),
    }
}

/// A function item; `params` are `(name, type)` pairs
pub fn function(name: &str, params: &[(&str, &str)], return_type: &str, stmts: Vec<Stmt>) -> Item {
    Item::Function(FunctionDecl {
        name: name.to_string(),
        params: params
            .iter()
            .map(|(param, ty)| Param {
                name: (*param).to_string(),
                ty: ty_ref(ty),
                span: FileSpan::default(),
            })
            .collect(),
        return_type: ty_ref(return_type),
        body: block(stmts),
        span: FileSpan::default(),
    })
}

/// A global variable item
pub fn global(name: &str, ty: &str) -> Item {
    Item::Global(GlobalDecl {
        name: name.to_string(),
        ty: ty_ref(ty),
        span: FileSpan::default(),
    })
}

/// A type reference
pub fn ty_ref(name: &str) -> TypeRef {
    TypeRef {
        name: name.to_string(),
        span: FileSpan::default(),
    }
}

/// A statement block
pub fn block(stmts: Vec<Stmt>) -> Block {
    Block {
        stmts,
        span: FileSpan::default(),
    }
}

/// `ty name = init;`
pub fn var_decl(name: &str, ty: &str, init: Option<Expr>) -> Stmt {
    Stmt::VarDecl {
        name: name.to_string(),
        ty: ty_ref(ty),
        init,
        span: FileSpan::default(),
    }
}

/// `target = value;`
pub fn assign(target: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        target: target.to_string(),
        value,
        span: FileSpan::default(),
    }
}

/// `return value;`
pub fn ret(value: Expr) -> Stmt {
    Stmt::Return {
        value: Some(value),
        span: FileSpan::default(),
    }
}

/// `return;`
pub fn ret_void() -> Stmt {
    Stmt::Return {
        value: None,
        span: FileSpan::default(),
    }
}

/// `if (condition) { then } else { otherwise }`
pub fn if_else(condition: Expr, then_branch: Vec<Stmt>, else_branch: Option<Vec<Stmt>>) -> Stmt {
    Stmt::If {
        condition,
        then_branch: block(then_branch),
        else_branch: else_branch.map(block),
        span: FileSpan::default(),
    }
}

/// `while (condition) { body }`
pub fn while_loop(condition: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While {
        condition,
        body: block(body),
        span: FileSpan::default(),
    }
}

/// `for (init; condition; step) { body }`
pub fn for_loop(init: Option<Stmt>, condition: Option<Expr>, step: Option<Stmt>, body: Vec<Stmt>) -> Stmt {
    Stmt::For {
        init: init.map(Box::new),
        condition,
        step: step.map(Box::new),
        body: block(body),
        span: FileSpan::default(),
    }
}

/// `break;`
pub fn break_stmt() -> Stmt {
    Stmt::Break {
        span: FileSpan::default(),
    }
}

/// `continue;`
pub fn continue_stmt() -> Stmt {
    Stmt::Continue {
        span: FileSpan::default(),
    }
}

/// `{ stmts }`
pub fn nested(stmts: Vec<Stmt>) -> Stmt {
    Stmt::Block(block(stmts))
}

/// `expr;`
pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr {
        expr,
        span: FileSpan::default(),
    }
}

/// Integer literal
pub fn int(value: i64) -> Expr {
    Expr::Int {
        value,
        span: FileSpan::default(),
    }
}

/// Variable reference
pub fn var(name: &str) -> Expr {
    Expr::Variable {
        name: name.to_string(),
        span: FileSpan::default(),
    }
}

/// Binary expression
pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        span: FileSpan::default(),
    }
}

/// Unary expression
pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary {
        op,
        operand: Box::new(operand),
        span: FileSpan::default(),
    }
}

/// Function call
pub fn call(callee: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: callee.to_string(),
        args,
        span: FileSpan::default(),
    }
}
