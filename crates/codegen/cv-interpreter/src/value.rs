//! Runtime value representation

use cv_ir::{Constant, IrType};
use std::fmt;

/// Runtime value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    /// Result of a void function
    Void,
    /// Comparison result
    Bool(bool),
    /// 32-bit integer
    Int(i32),
}

impl Value {
    /// Get the value as a boolean, if possible
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(flag),
            _ => None,
        }
    }

    /// Get the value as an integer, if possible
    #[must_use]
    pub fn as_int(self) -> Option<i32> {
        match self {
            Self::Int(int) => Some(int),
            _ => None,
        }
    }

    /// IR type the value inhabits
    #[must_use]
    pub fn ty(self) -> IrType {
        match self {
            Self::Void => IrType::Void,
            Self::Bool(_) => IrType::Bool,
            Self::Int(_) => IrType::I32,
        }
    }
}

impl From<Constant> for Value {
    fn from(constant: Constant) -> Self {
        match constant {
            Constant::I32(int) => Self::Int(int),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(int) => write!(f, "{int}"),
        }
    }
}
