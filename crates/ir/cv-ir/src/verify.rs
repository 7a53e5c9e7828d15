//! Structural checks for lowered IR
//!
//! A well-formed function has blocks numbered by position, exactly one
//! terminator per block (in last position), branch targets inside the
//! function, every block reachable from the entry, and all `Allocate`
//! instructions in the entry block.

use crate::{BlockId, Function, Instruction, Module, cfg};
use thiserror::Error;

/// A violated IR invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Entry block id does not name a block
    #[error("function `{function}` has no entry block {entry}")]
    MissingEntry {
        /// Function name
        function: String,
        /// The dangling entry id
        entry: BlockId,
    },
    /// Block id does not match its position
    #[error("function `{function}`: block `{label}` is stored at {position} but numbered {id}")]
    MisnumberedBlock {
        /// Function name
        function: String,
        /// Block label
        label: String,
        /// Position in the block list
        position: usize,
        /// Id carried by the block
        id: BlockId,
    },
    /// Block does not end in a terminator
    #[error("function `{function}`: block `{label}` does not end in a terminator")]
    MissingTerminator {
        /// Function name
        function: String,
        /// Block label
        label: String,
    },
    /// Terminator followed by more instructions
    #[error("function `{function}`: block `{label}` has a terminator at position {index} before its end")]
    EarlyTerminator {
        /// Function name
        function: String,
        /// Block label
        label: String,
        /// Index of the misplaced terminator
        index: usize,
    },
    /// Branch to a block that does not exist
    #[error("function `{function}`: block `{label}` branches to missing block {target}")]
    UnknownTarget {
        /// Function name
        function: String,
        /// Block label
        label: String,
        /// The dangling target
        target: BlockId,
    },
    /// Block cannot be reached from the entry
    #[error("function `{function}`: block `{label}` is unreachable")]
    UnreachableBlock {
        /// Function name
        function: String,
        /// Block label
        label: String,
    },
    /// `Allocate` outside the entry block
    #[error("function `{function}`: block `{label}` allocates a slot outside the entry block")]
    AllocationOutsideEntry {
        /// Function name
        function: String,
        /// Block label
        label: String,
    },
}

/// Checks every function of `module`
///
/// # Errors
/// Returns the first violated invariant
pub fn verify_module(module: &Module) -> Result<(), VerifyError> {
    module.functions.iter().try_for_each(verify_function)
}

/// Checks one function
///
/// # Errors
/// Returns the first violated invariant
pub fn verify_function(function: &Function) -> Result<(), VerifyError> {
    let name = || function.name.clone();

    if function.entry.index() >= function.blocks.len() {
        return Err(VerifyError::MissingEntry {
            function: name(),
            entry: function.entry,
        });
    }

    for (position, block) in function.blocks.iter().enumerate() {
        if block.id.index() != position {
            return Err(VerifyError::MisnumberedBlock {
                function: name(),
                label: block.label.clone(),
                position,
                id: block.id,
            });
        }
        if !block.is_terminated() {
            return Err(VerifyError::MissingTerminator {
                function: name(),
                label: block.label.clone(),
            });
        }

        let last = block.instructions.len() - 1;
        for (index, instr) in block.instructions.iter().enumerate() {
            if instr.is_terminator() && index != last {
                return Err(VerifyError::EarlyTerminator {
                    function: name(),
                    label: block.label.clone(),
                    index,
                });
            }
            if matches!(instr, Instruction::Allocate { .. }) && block.id != function.entry {
                return Err(VerifyError::AllocationOutsideEntry {
                    function: name(),
                    label: block.label.clone(),
                });
            }
            if let Some(target) = instr
                .successors()
                .into_iter()
                .find(|target| target.index() >= function.blocks.len())
            {
                return Err(VerifyError::UnknownTarget {
                    function: name(),
                    label: block.label.clone(),
                    target,
                });
            }
        }
    }

    let reachable = cfg::reachable(function);
    if let Some(block) = function.blocks.iter().find(|block| !reachable.contains(&block.id)) {
        return Err(VerifyError::UnreachableBlock {
            function: name(),
            label: block.label.clone(),
        });
    }

    Ok(())
}
