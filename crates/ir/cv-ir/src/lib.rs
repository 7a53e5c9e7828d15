//! Basic-block intermediate representation
//!
//! A [`Module`] owns [`Function`]s; a function owns its [`BasicBlock`]s and an
//! arena of stack [`SlotData`]. Mutable locals live in slots and are accessed
//! with explicit `Load`/`Store`; every other value is an immutable
//! [`Register`] or a [`Constant`].

pub mod builder;
pub mod cfg;
pub mod print;
pub mod verify;

pub use builder::FunctionBuilder;
pub use verify::{VerifyError, verify_function, verify_module};

use derive_more::Display;
use la_arena::{Arena, Idx};
use serde::{Deserialize, Serialize};

/// Value types
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrType {
    /// 32-bit signed integer
    #[display("i32")]
    I32,
    /// Boolean, produced only by comparisons
    #[display("i1")]
    Bool,
    /// No value; only valid as a return type
    #[display("void")]
    Void,
}

/// SSA register, numbered per function
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display("%{_0}")]
pub struct Register(pub u32);

/// Index of a basic block inside its function
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display("bb{_0}")]
pub struct BlockId(pub u32);

impl BlockId {
    /// Position in [`Function::blocks`]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stack slot handle
pub type SlotId = Idx<SlotData>;

/// Storage for one mutable local
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotData {
    /// Source name of the local (for dumps)
    pub name: String,
    /// Declared type, fixed for the slot's lifetime
    pub ty: IrType,
}

/// Number used for a slot in textual dumps
pub fn slot_index(slot: SlotId) -> u32 {
    u32::from(slot.into_raw())
}

/// Literal value
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// 32-bit integer literal
    #[display("{_0}")]
    I32(i32),
}

impl Constant {
    /// Type of the constant
    pub fn ty(self) -> IrType {
        match self {
            Self::I32(_) => IrType::I32,
        }
    }
}

/// Operand of an instruction
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    /// Literal
    #[display("{_0}")]
    Constant(Constant),
    /// Result of a prior instruction, or an incoming argument
    #[display("{id}")]
    Register {
        /// Register holding the value
        id: Register,
        /// Type of the value
        ty: IrType,
    },
}

impl Value {
    /// `i32` literal
    pub fn int(value: i32) -> Self {
        Self::Constant(Constant::I32(value))
    }

    /// Type of the value
    pub fn ty(self) -> IrType {
        match self {
            Self::Constant(constant) => constant.ty(),
            Self::Register { ty, .. } => ty,
        }
    }
}

/// Arithmetic operators
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Wrapping addition
    #[display("add")]
    Add,
    /// Wrapping subtraction
    #[display("sub")]
    Sub,
    /// Wrapping multiplication
    #[display("mul")]
    Mul,
    /// Signed division
    #[display("sdiv")]
    Div,
    /// Signed remainder
    #[display("srem")]
    Rem,
}

/// Signed integer comparisons
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// Equal
    #[display("eq")]
    Eq,
    /// Not equal
    #[display("ne")]
    Ne,
    /// Less than
    #[display("slt")]
    Lt,
    /// Less than or equal
    #[display("sle")]
    Le,
    /// Greater than
    #[display("sgt")]
    Gt,
    /// Greater than or equal
    #[display("sge")]
    Ge,
}

/// IR instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Reserve storage for a slot
    Allocate {
        /// Slot being allocated
        slot: SlotId,
        /// Slot type
        ty: IrType,
    },
    /// Write a value into a slot
    Store {
        /// Stored value
        value: Value,
        /// Destination slot
        slot: SlotId,
    },
    /// Read a slot into a register
    Load {
        /// Result register
        dest: Register,
        /// Loaded type
        ty: IrType,
        /// Source slot
        slot: SlotId,
    },
    /// Arithmetic on two `i32` values
    Binary {
        /// Result register
        dest: Register,
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Value,
        /// Right operand
        rhs: Value,
    },
    /// Comparison producing an `i1`
    Compare {
        /// Result register
        dest: Register,
        /// Operator
        op: CompareOp,
        /// Left operand
        lhs: Value,
        /// Right operand
        rhs: Value,
    },
    /// Unconditional jump
    Branch {
        /// Jump target
        target: BlockId,
    },
    /// Two-way jump on an `i1`
    CondBranch {
        /// Branch condition
        cond: Value,
        /// Taken when `cond` is true
        then_target: BlockId,
        /// Taken when `cond` is false
        else_target: BlockId,
    },
    /// Leave the function
    Return {
        /// Returned value, `None` for void functions
        value: Option<Value>,
    },
}

impl Instruction {
    /// Whether the instruction ends a block
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Self::Branch { .. } | Self::CondBranch { .. } | Self::Return { .. }
        )
    }

    /// Blocks control may transfer to
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Self::Branch { target } => vec![*target],
            Self::CondBranch {
                then_target,
                else_target,
                ..
            } => vec![*then_target, *else_target],
            _ => Vec::new(),
        }
    }

    /// Rewrites every block reference through `map`
    pub fn remap_targets(&mut self, map: impl Fn(BlockId) -> BlockId) {
        match self {
            Self::Branch { target } => *target = map(*target),
            Self::CondBranch {
                then_target,
                else_target,
                ..
            } => {
                *then_target = map(*then_target);
                *else_target = map(*else_target);
            }
            _ => {}
        }
    }
}

/// Basic block in the control flow graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    /// Block ID
    pub id: BlockId,
    /// Label, unique within the function
    pub label: String,
    /// Instructions; the last one is the terminator
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    /// The block's terminator, if it has one
    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|instr| instr.is_terminator())
    }

    /// Whether a terminator has been emitted
    pub fn is_terminated(&self) -> bool {
        self.terminator().is_some()
    }

    /// Blocks reachable in one step
    pub fn successors(&self) -> Vec<BlockId> {
        self.terminator().map(Instruction::successors).unwrap_or_default()
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Source name
    pub name: String,
    /// Parameter type
    pub ty: IrType,
    /// Register holding the incoming argument
    pub register: Register,
}

impl Param {
    /// The incoming argument as an operand
    pub fn value(&self) -> Value {
        Value::Register {
            id: self.register,
            ty: self.ty,
        }
    }
}

/// An IR function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Return type
    pub return_type: IrType,
    /// Parameters in declaration order
    pub params: Vec<Param>,
    /// Basic blocks, indexed by [`BlockId`]
    pub blocks: Vec<BasicBlock>,
    /// Stack slots
    pub slots: Arena<SlotData>,
    /// Entry block ID
    pub entry: BlockId,
    /// Number of registers used (arguments included)
    pub register_count: u32,
}

impl Function {
    /// Block by id
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    /// The entry block
    pub fn entry_block(&self) -> &BasicBlock {
        self.block(self.entry)
    }

    /// Block by label
    pub fn block_by_label(&self, label: &str) -> Option<&BasicBlock> {
        self.blocks.iter().find(|block| block.label == label)
    }

    /// Slot metadata
    pub fn slot(&self, slot: SlotId) -> &SlotData {
        &self.slots[slot]
    }

    /// All instructions in block order
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.blocks.iter().flat_map(|block| block.instructions.iter())
    }
}

/// A compiled translation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Module name
    pub name: String,
    /// Functions in source order
    pub functions: Vec<Function>,
}

impl Module {
    /// Creates an empty module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    /// Function by name
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|func| func.name == name)
    }
}
