//! Textual IR dump
//!
//! The format is LLVM-flavoured: registers are `%N`, slots are `$N`, blocks
//! are referenced by label.

use crate::{BasicBlock, Function, Instruction, Module, slot_index};
use std::fmt;

struct InstrDisplay<'func> {
    function: &'func Function,
    instr: &'func Instruction,
}

impl fmt::Display for InstrDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = |target: crate::BlockId| &self.function.block(target).label;
        match self.instr {
            Instruction::Allocate { slot, ty } => {
                write!(
                    f,
                    "${} = alloca {ty} ; {}",
                    slot_index(*slot),
                    self.function.slot(*slot).name
                )
            }
            Instruction::Store { value, slot } => {
                write!(f, "store {} {value}, ${}", value.ty(), slot_index(*slot))
            }
            Instruction::Load { dest, ty, slot } => {
                write!(f, "{dest} = load {ty}, ${}", slot_index(*slot))
            }
            Instruction::Binary { dest, op, lhs, rhs } => {
                write!(f, "{dest} = {op} {} {lhs}, {rhs}", lhs.ty())
            }
            Instruction::Compare { dest, op, lhs, rhs } => {
                write!(f, "{dest} = icmp {op} {} {lhs}, {rhs}", lhs.ty())
            }
            Instruction::Branch { target } => write!(f, "br label %{}", label(*target)),
            Instruction::CondBranch {
                cond,
                then_target,
                else_target,
            } => write!(
                f,
                "br {} {cond}, label %{}, label %{}",
                cond.ty(),
                label(*then_target),
                label(*else_target)
            ),
            Instruction::Return { value: Some(value) } => write!(f, "ret {} {value}", value.ty()),
            Instruction::Return { value: None } => write!(f, "ret void"),
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, function: &Function, block: &BasicBlock) -> fmt::Result {
    writeln!(f, "{}:", block.label)?;
    for instr in &block.instructions {
        writeln!(f, "  {}", InstrDisplay { function, instr })?;
    }
    Ok(())
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "define {} @{}(", self.return_type, self.name)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", param.ty, param.register)?;
        }
        writeln!(f, ") {{")?;
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write_block(f, self, block)?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module {}", self.name)?;
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{function}")?;
        }
        Ok(())
    }
}
