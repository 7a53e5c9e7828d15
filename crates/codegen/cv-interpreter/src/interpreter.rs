//! IR interpreter

#![allow(
    clippy::min_ident_chars,
    reason = "Short identifiers like op, l, r are conventional in operator implementations"
)]

use crate::value::Value;
use cv_ir::{BinaryOp, BlockId, CompareOp, Function, Instruction, Module, Register, SlotId, Value as Operand};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Instructions a run may execute before giving up
pub const DEFAULT_FUEL: u64 = 1_000_000;

/// Interpreter error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    /// No function with this name in the module
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    /// Wrong number of arguments
    #[error("function `{function}` takes {expected} arguments, got {got}")]
    ArityMismatch {
        /// Function name
        function: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },
    /// Register read before it was written
    #[error("undefined register: {0}")]
    UndefinedRegister(Register),
    /// Slot read before any store
    #[error("load of uninitialized variable `{0}`")]
    UninitializedSlot(String),
    /// Operand of the wrong kind
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type
        expected: String,
        /// Got value
        got: String,
    },
    /// Division by zero
    #[error("division by zero")]
    DivisionByZero,
    /// Block without a terminator
    #[error("block `{0}` has no terminator")]
    MissingTerminator(String),
    /// Execution budget used up
    #[error("execution ran out of fuel after {0} instructions")]
    FuelExhausted(u64),
}

/// Interpreter state
#[derive(Debug, Clone)]
pub struct Interpreter {
    fuel: u64,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers and slots of one activation
struct Frame {
    registers: Vec<Option<Value>>,
    slots: FxHashMap<SlotId, Value>,
}

impl Interpreter {
    /// Create a new interpreter with [`DEFAULT_FUEL`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_fuel(DEFAULT_FUEL)
    }

    /// Create a new interpreter with an explicit instruction budget
    #[must_use]
    pub fn with_fuel(fuel: u64) -> Self {
        Self { fuel }
    }

    /// Execute the function called `name` in `module`
    ///
    /// # Errors
    /// Returns `InterpreterError` if the function is missing or execution fails
    pub fn run(&self, module: &Module, name: &str, args: &[i32]) -> Result<Value, InterpreterError> {
        let function = module
            .function(name)
            .ok_or_else(|| InterpreterError::UnknownFunction(name.to_string()))?;
        self.execute(function, args)
    }

    /// Execute a function and return the result
    ///
    /// # Errors
    /// Returns `InterpreterError` if execution fails
    pub fn execute(&self, function: &Function, args: &[i32]) -> Result<Value, InterpreterError> {
        if args.len() != function.params.len() {
            return Err(InterpreterError::ArityMismatch {
                function: function.name.clone(),
                expected: function.params.len(),
                got: args.len(),
            });
        }

        let mut frame = Frame {
            registers: vec![None; function.register_count as usize],
            slots: FxHashMap::default(),
        };
        for (param, arg) in function.params.iter().zip(args) {
            frame.registers[param.register.0 as usize] = Some(Value::Int(*arg));
        }

        let mut remaining = self.fuel;
        let mut current = function.entry;
        debug!(function = %function.name, ?args, "executing");

        loop {
            let block = function.block(current);
            trace!(block = %block.label, "entering block");

            for instr in &block.instructions {
                remaining = remaining
                    .checked_sub(1)
                    .ok_or(InterpreterError::FuelExhausted(self.fuel))?;

                match Self::step(function, &mut frame, instr)? {
                    Flow::Next => {}
                    Flow::Jump(target) => {
                        current = target;
                        break;
                    }
                    Flow::Return(value) => return Ok(value),
                }
            }

            if !block.is_terminated() {
                return Err(InterpreterError::MissingTerminator(block.label.clone()));
            }
        }
    }

    /// Execute one instruction
    fn step(function: &Function, frame: &mut Frame, instr: &Instruction) -> Result<Flow, InterpreterError> {
        match instr {
            Instruction::Allocate { .. } => {}
            Instruction::Store { value, slot } => {
                let value = Self::eval(frame, *value)?;
                frame.slots.insert(*slot, value);
            }
            Instruction::Load { dest, slot, .. } => {
                let value = frame
                    .slots
                    .get(slot)
                    .copied()
                    .ok_or_else(|| InterpreterError::UninitializedSlot(function.slot(*slot).name.clone()))?;
                frame.registers[dest.0 as usize] = Some(value);
            }
            Instruction::Binary { dest, op, lhs, rhs } => {
                let l = Self::eval_int(frame, *lhs)?;
                let r = Self::eval_int(frame, *rhs)?;
                frame.registers[dest.0 as usize] = Some(Value::Int(Self::eval_binary_op(*op, l, r)?));
            }
            Instruction::Compare { dest, op, lhs, rhs } => {
                let l = Self::eval_int(frame, *lhs)?;
                let r = Self::eval_int(frame, *rhs)?;
                frame.registers[dest.0 as usize] = Some(Value::Bool(Self::eval_compare_op(*op, l, r)));
            }
            Instruction::Branch { target } => return Ok(Flow::Jump(*target)),
            Instruction::CondBranch {
                cond,
                then_target,
                else_target,
            } => {
                let value = Self::eval(frame, *cond)?;
                let taken = value.as_bool().ok_or_else(|| InterpreterError::TypeMismatch {
                    expected: "i1".to_string(),
                    got: value.to_string(),
                })?;
                return Ok(Flow::Jump(if taken { *then_target } else { *else_target }));
            }
            Instruction::Return { value } => {
                let value = value.map_or(Ok(Value::Void), |value| Self::eval(frame, value))?;
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Next)
    }

    fn eval(frame: &Frame, operand: Operand) -> Result<Value, InterpreterError> {
        match operand {
            Operand::Constant(constant) => Ok(constant.into()),
            Operand::Register { id, .. } => frame
                .registers
                .get(id.0 as usize)
                .copied()
                .flatten()
                .ok_or(InterpreterError::UndefinedRegister(id)),
        }
    }

    fn eval_int(frame: &Frame, operand: Operand) -> Result<i32, InterpreterError> {
        let value = Self::eval(frame, operand)?;
        value.as_int().ok_or_else(|| InterpreterError::TypeMismatch {
            expected: "i32".to_string(),
            got: value.to_string(),
        })
    }

    /// Wrapping two's-complement arithmetic
    fn eval_binary_op(op: BinaryOp, l: i32, r: i32) -> Result<i32, InterpreterError> {
        match op {
            BinaryOp::Add => Ok(l.wrapping_add(r)),
            BinaryOp::Sub => Ok(l.wrapping_sub(r)),
            BinaryOp::Mul => Ok(l.wrapping_mul(r)),
            BinaryOp::Div | BinaryOp::Rem if r == 0 => Err(InterpreterError::DivisionByZero),
            BinaryOp::Div => Ok(l.wrapping_div(r)),
            BinaryOp::Rem => Ok(l.wrapping_rem(r)),
        }
    }

    fn eval_compare_op(op: CompareOp, l: i32, r: i32) -> bool {
        match op {
            CompareOp::Eq => l == r,
            CompareOp::Ne => l != r,
            CompareOp::Lt => l < r,
            CompareOp::Le => l <= r,
            CompareOp::Gt => l > r,
            CompareOp::Ge => l >= r,
        }
    }
}

/// What happens after an instruction
enum Flow {
    Next,
    Jump(BlockId),
    Return(Value),
}
