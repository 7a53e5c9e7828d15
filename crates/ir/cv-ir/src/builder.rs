//! Builder for constructing IR functions
//!
//! The builder owns an insertion cursor. Emitting a terminator closes the
//! current block and leaves the cursor unset until [`FunctionBuilder::position_at`]
//! moves it; a block nothing branches to never becomes current, so code is
//! only ever emitted into reachable blocks.

use crate::{
    BasicBlock, BinaryOp, BlockId, CompareOp, Function, Instruction, IrType, Param, Register,
    SlotData, SlotId, Value,
};
use la_arena::Arena;

/// Incrementally builds one [`Function`]
#[derive(Debug)]
pub struct FunctionBuilder {
    function: Function,
    current: Option<BlockId>,
    /// Number of incoming edges per block
    predecessors: Vec<u32>,
    /// Length of the `Allocate` prefix of the entry block
    allocations: usize,
    next_label: u32,
}

impl FunctionBuilder {
    /// Creates a builder positioned at a fresh `entry` block; parameters get
    /// registers `%0..%n`
    pub fn new(name: impl Into<String>, return_type: IrType, params: Vec<(String, IrType)>) -> Self {
        let params: Vec<Param> = params
            .into_iter()
            .enumerate()
            .map(|(index, (name, ty))| Param {
                name,
                ty,
                register: Register(index as u32),
            })
            .collect();
        let register_count = params.len() as u32;
        let entry = BlockId(0);

        Self {
            function: Function {
                name: name.into(),
                return_type,
                params,
                blocks: vec![BasicBlock {
                    id: entry,
                    label: "entry".to_string(),
                    instructions: Vec::new(),
                }],
                slots: Arena::new(),
                entry,
                register_count,
            },
            current: Some(entry),
            predecessors: vec![0],
            allocations: 0,
            next_label: 0,
        }
    }

    /// Parameters of the function being built
    pub fn params(&self) -> &[Param] {
        &self.function.params
    }

    /// Return type of the function being built
    pub fn return_type(&self) -> IrType {
        self.function.return_type
    }

    /// Reserves a label suffix; all blocks of one construct share it
    pub fn next_label_suffix(&mut self) -> u32 {
        let suffix = self.next_label;
        self.next_label += 1;
        suffix
    }

    /// Appends an empty block
    pub fn new_block(&mut self, label: impl Into<String>) -> BlockId {
        let id = BlockId(self.function.blocks.len() as u32);
        self.function.blocks.push(BasicBlock {
            id,
            label: label.into(),
            instructions: Vec::new(),
        });
        self.predecessors.push(0);
        id
    }

    /// Moves the cursor to `block`. Returns `false`, leaving the cursor
    /// unset, when nothing branches to the block yet.
    pub fn position_at(&mut self, block: BlockId) -> bool {
        let reachable = block == self.function.entry || self.predecessors[block.index()] > 0;
        self.current = reachable.then_some(block);
        reachable
    }

    /// Block receiving instructions, `None` after a terminator
    pub fn current_block(&self) -> Option<BlockId> {
        self.current
    }

    /// Whether the cursor points at an open block
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Type of a slot
    pub fn slot_type(&self, slot: SlotId) -> IrType {
        self.function.slots[slot].ty
    }

    /// Creates a slot and places its `Allocate` at the head of the entry block
    pub fn allocate(&mut self, name: impl Into<String>, ty: IrType) -> SlotId {
        let slot = self.function.slots.alloc(SlotData {
            name: name.into(),
            ty,
        });
        let entry = self.function.entry.index();
        self.function.blocks[entry]
            .instructions
            .insert(self.allocations, Instruction::Allocate { slot, ty });
        self.allocations += 1;
        slot
    }

    /// Emits `store value, slot`
    pub fn store(&mut self, value: Value, slot: SlotId) {
        self.emit(Instruction::Store { value, slot });
    }

    /// Emits `load slot` and returns the loaded value
    pub fn load(&mut self, slot: SlotId) -> Value {
        let ty = self.slot_type(slot);
        let dest = self.fresh_register();
        self.emit(Instruction::Load { dest, ty, slot });
        Value::Register { id: dest, ty }
    }

    /// Emits an arithmetic instruction and returns its `i32` result
    pub fn binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> Value {
        let dest = self.fresh_register();
        self.emit(Instruction::Binary { dest, op, lhs, rhs });
        Value::Register {
            id: dest,
            ty: IrType::I32,
        }
    }

    /// Emits a comparison and returns its `i1` result
    pub fn compare(&mut self, op: CompareOp, lhs: Value, rhs: Value) -> Value {
        let dest = self.fresh_register();
        self.emit(Instruction::Compare { dest, op, lhs, rhs });
        Value::Register {
            id: dest,
            ty: IrType::Bool,
        }
    }

    /// Terminates the current block with `br target`
    pub fn branch(&mut self, target: BlockId) {
        self.terminate(Instruction::Branch { target });
    }

    /// Terminates the current block with a conditional branch
    pub fn cond_branch(&mut self, cond: Value, then_target: BlockId, else_target: BlockId) {
        self.terminate(Instruction::CondBranch {
            cond,
            then_target,
            else_target,
        });
    }

    /// Terminates the current block with `ret`
    pub fn ret(&mut self, value: Option<Value>) {
        self.terminate(Instruction::Return { value });
    }

    /// Finishes building: blocks that never gained a predecessor are dropped
    /// and the remaining ones renumbered in order
    #[must_use]
    pub fn finish(self) -> Function {
        let mut function = self.function;
        let entry = function.entry;
        let keep: Vec<bool> = self
            .predecessors
            .iter()
            .enumerate()
            .map(|(index, preds)| index == entry.index() || *preds > 0)
            .collect();

        let mut remap = vec![BlockId(0); keep.len()];
        let mut next = 0;
        for (index, kept) in keep.iter().enumerate() {
            if *kept {
                remap[index] = BlockId(next);
                next += 1;
            }
        }

        let blocks = std::mem::take(&mut function.blocks);
        function.blocks = blocks
            .into_iter()
            .filter(|block| keep[block.id.index()])
            .map(|mut block| {
                block.id = remap[block.id.index()];
                for instr in &mut block.instructions {
                    instr.remap_targets(|target| remap[target.index()]);
                }
                block
            })
            .collect();
        function.entry = remap[entry.index()];
        function
    }

    fn fresh_register(&mut self) -> Register {
        let register = Register(self.function.register_count);
        self.function.register_count += 1;
        register
    }

    fn emit(&mut self, instr: Instruction) {
        if let Some(block) = self.current {
            self.function.blocks[block.index()].instructions.push(instr);
        }
    }

    fn terminate(&mut self, instr: Instruction) {
        if let Some(block) = self.current.take() {
            for target in instr.successors() {
                self.predecessors[target.index()] += 1;
            }
            self.function.blocks[block.index()].instructions.push(instr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocations_are_hoisted_to_entry() {
        let mut builder = FunctionBuilder::new("f", IrType::Void, Vec::new());
        let body = builder.new_block("body.0");
        builder.branch(body);
        assert!(builder.position_at(body));
        let slot = builder.allocate("x", IrType::I32);
        builder.store(Value::int(1), slot);
        builder.ret(None);

        let func = builder.finish();
        let entry = func.entry_block();
        assert_eq!(entry.instructions[0], Instruction::Allocate { slot, ty: IrType::I32 });
        assert_eq!(entry.instructions.len(), 2);
        assert_eq!(func.blocks[1].instructions.len(), 2);
    }

    #[test]
    fn test_unreached_blocks_are_dropped_and_renumbered() {
        let mut builder = FunctionBuilder::new("f", IrType::Void, Vec::new());
        let dead = builder.new_block("dead");
        let live = builder.new_block("live");
        builder.branch(live);
        assert!(!builder.position_at(dead));
        assert!(!builder.is_open());
        assert!(builder.position_at(live));
        builder.ret(None);

        let func = builder.finish();
        assert_eq!(func.blocks.len(), 2);
        assert_eq!(func.blocks[1].label, "live");
        assert_eq!(func.blocks[1].id, BlockId(1));
        assert_eq!(
            func.blocks[0].terminator(),
            Some(&Instruction::Branch { target: BlockId(1) })
        );
    }

    #[test]
    fn test_registers_start_after_parameters() {
        let params = vec![("a".to_string(), IrType::I32), ("b".to_string(), IrType::I32)];
        let mut builder = FunctionBuilder::new("f", IrType::I32, params);
        let lhs = builder.params()[0].value();
        let rhs = builder.params()[1].value();
        let sum = builder.binary(BinaryOp::Add, lhs, rhs);
        assert_eq!(
            sum,
            Value::Register {
                id: Register(2),
                ty: IrType::I32
            }
        );
    }

    #[test]
    fn test_terminator_closes_cursor() {
        let mut builder = FunctionBuilder::new("f", IrType::I32, Vec::new());
        let slot = builder.allocate("y", IrType::I32);
        builder.ret(Some(Value::int(0)));
        assert_eq!(builder.current_block(), None);
        builder.store(Value::int(1), slot);
        let func = builder.finish();
        assert_eq!(func.entry_block().instructions.len(), 2);
        assert!(func.entry_block().is_terminated());
    }
}
