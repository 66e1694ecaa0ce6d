use smallvec::SmallVec;

use crate::{BlockId, DataFlowGraph, Id, ValueId};

/// A function body under construction.
///
/// Blocks are laid out in creation order.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Id,
    pub arg_values: SmallVec<[ValueId; 8]>,
    pub dfg: DataFlowGraph,
}

impl Function {
    pub fn new(name: Id) -> Self {
        Self {
            name,
            arg_values: SmallVec::new(),
            dfg: DataFlowGraph::new(),
        }
    }

    pub fn args(&self) -> &[ValueId] {
        &self.arg_values
    }

    pub fn blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.dfg.blocks().map(|(block, _)| block)
    }

    pub fn entry_block(&self) -> Option<BlockId> {
        self.blocks().next()
    }
}
