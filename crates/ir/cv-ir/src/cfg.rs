//! Control-flow graph queries

use crate::{BlockId, Function};
use rustc_hash::FxHashSet;

/// Every `(from, to)` edge, in block order
pub fn edges(function: &Function) -> Vec<(BlockId, BlockId)> {
    function
        .blocks
        .iter()
        .flat_map(|block| block.successors().into_iter().map(move |succ| (block.id, succ)))
        .collect()
}

/// Predecessor lists indexed by block
pub fn predecessors(function: &Function) -> Vec<Vec<BlockId>> {
    let mut preds = vec![Vec::new(); function.blocks.len()];
    for (from, to) in edges(function) {
        if let Some(list) = preds.get_mut(to.index()) {
            list.push(from);
        }
    }
    preds
}

/// Blocks reachable from the entry block
pub fn reachable(function: &Function) -> FxHashSet<BlockId> {
    let mut seen = FxHashSet::default();
    let mut worklist = vec![function.entry];
    while let Some(block) = worklist.pop() {
        if block.index() >= function.blocks.len() || !seen.insert(block) {
            continue;
        }
        worklist.extend(function.block(block).successors());
    }
    seen
}

/// Whether `from` has an edge to `to`
pub fn has_edge(function: &Function, from: BlockId, to: BlockId) -> bool {
    function
        .blocks
        .get(from.index())
        .is_some_and(|block| block.successors().contains(&to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompareOp, FunctionBuilder, IrType, Value};

    fn countdown() -> Function {
        let params = vec![("n".to_string(), IrType::I32)];
        let mut builder = FunctionBuilder::new("countdown", IrType::Void, params);
        let cond = builder.new_block("cond");
        let body = builder.new_block("body");
        let done = builder.new_block("done");
        builder.branch(cond);
        builder.position_at(cond);
        let arg = builder.params()[0].value();
        let check = builder.compare(CompareOp::Gt, arg, Value::int(0));
        builder.cond_branch(check, body, done);
        builder.position_at(body);
        builder.branch(cond);
        builder.position_at(done);
        builder.ret(None);
        builder.finish()
    }

    #[test]
    fn test_edges_and_predecessors() {
        let func = countdown();
        assert_eq!(
            edges(&func),
            vec![
                (BlockId(0), BlockId(1)),
                (BlockId(1), BlockId(2)),
                (BlockId(1), BlockId(3)),
                (BlockId(2), BlockId(1)),
            ]
        );
        let preds = predecessors(&func);
        assert_eq!(preds[1], vec![BlockId(0), BlockId(2)]);
        assert!(has_edge(&func, BlockId(2), BlockId(1)));
        assert!(!has_edge(&func, BlockId(2), BlockId(2)));
    }

    #[test]
    fn test_reachable_covers_loop() {
        let func = countdown();
        assert_eq!(reachable(&func).len(), 4);
    }
}
