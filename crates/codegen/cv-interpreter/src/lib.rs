//! Reference interpreter for lowered IR
//!
//! Executes one function at a time over `i32` arguments. Used to check that
//! lowered code computes what the source says, not for speed.

pub mod interpreter;
pub mod value;

pub use interpreter::{DEFAULT_FUEL, Interpreter, InterpreterError};
pub use value::Value;
