//! Parsed program tree
//!
//! This is the boundary with the external grammar-driven parser: it hands
//! over a [`Program`], usually serialized as JSON. Each enum is tagged with a
//! `kind` field and every `span` may be omitted, in which case it defaults to
//! an empty span in file 0.

pub mod make;

use cv_span::FileSpan;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole translation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Top-level items in source order
    pub items: Vec<Item>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    /// Function definition
    Function(FunctionDecl),
    /// Global variable declaration
    Global(GlobalDecl),
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Function name
    pub name: String,
    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<Param>,
    /// Declared return type
    pub return_type: TypeRef,
    /// Function body
    pub body: Block,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Global variable declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalDecl {
    /// Variable name
    pub name: String,
    /// Declared type
    pub ty: TypeRef,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub ty: TypeRef,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// A type as written in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Type name (`int`, `void`, ...)
    pub name: String,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Brace-delimited statement list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Statements in source order
    #[serde(default)]
    pub stmts: Vec<Stmt>,
    /// Source location
    #[serde(default)]
    pub span: FileSpan,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `int x = init;`
    VarDecl {
        /// Variable name
        name: String,
        /// Declared type
        ty: TypeRef,
        /// Optional initializer
        #[serde(default)]
        init: Option<Expr>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `x = value;`
    Assign {
        /// Assigned variable
        target: String,
        /// Right-hand side
        value: Expr,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `return value;`
    Return {
        /// Returned value, absent for `return;`
        #[serde(default)]
        value: Option<Expr>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `if (condition) then_branch else else_branch`
    If {
        /// Branch condition
        condition: Expr,
        /// Taken when the condition holds
        then_branch: Block,
        /// Taken otherwise
        #[serde(default)]
        else_branch: Option<Block>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `while (condition) body`
    While {
        /// Loop guard, checked before every iteration
        condition: Expr,
        /// Loop body
        body: Block,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `for (init; condition; step) body`
    For {
        /// Runs once before the loop
        #[serde(default)]
        init: Option<Box<Stmt>>,
        /// Loop guard, absent means loop forever
        #[serde(default)]
        condition: Option<Expr>,
        /// Runs after each iteration
        #[serde(default)]
        step: Option<Box<Stmt>>,
        /// Loop body
        body: Block,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `break;`
    Break {
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// `continue;`
    Continue {
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// Nested `{ ... }`
    Block(Block),
    /// Expression evaluated for its own sake
    Expr {
        /// The expression
        expr: Expr,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
}

impl Stmt {
    /// Source location of the statement
    pub fn span(&self) -> FileSpan {
        match self {
            Self::VarDecl { span, .. }
            | Self::Assign { span, .. }
            | Self::Return { span, .. }
            | Self::If { span, .. }
            | Self::While { span, .. }
            | Self::For { span, .. }
            | Self::Break { span }
            | Self::Continue { span }
            | Self::Expr { span, .. } => *span,
            Self::Block(block) => block.span,
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// Integer literal
    Int {
        /// Literal value
        value: i64,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// Variable reference
    Variable {
        /// Variable name
        name: String,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// Binary operation
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// Unary operation
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
    /// Function call
    Call {
        /// Called function name
        callee: String,
        /// Arguments
        #[serde(default)]
        args: Vec<Expr>,
        /// Source location
        #[serde(default)]
        span: FileSpan,
    },
}

impl Expr {
    /// Source location of the expression
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Int { span, .. }
            | Self::Variable { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Call { span, .. } => *span,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Remainder (%)
    Rem,
    /// Equality (==)
    Eq,
    /// Inequality (!=)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Logical AND (&&)
    And,
    /// Logical OR (||)
    Or,
}

impl BinaryOp {
    /// Source spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical NOT (!)
    Not,
}
