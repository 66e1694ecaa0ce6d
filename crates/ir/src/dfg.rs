//! This module contains basalt IR data flow graph.
use cranelift_entity::{entity_impl, PrimaryMap};
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    inst::{HasSlots, Inst, InstData, InstKind},
    value::{Payload, Use, ValueData},
    Id, IrError, IrResult, Type, ValueId, ValueKind,
};

/// An opaque reference to [`BlockData`].
#[derive(Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);
entity_impl!(BlockId, "block");

/// A block data definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockData {
    insts: Vec<ValueId>,
    preds: SmallVec<[BlockId; 4]>,
}

impl BlockData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values placed in the block, in program order.
    pub fn insts(&self) -> &[ValueId] {
        &self.insts
    }

    /// Blocks whose terminator branches here, in the order the branches were
    /// created. A block branching here twice appears twice.
    pub fn preds(&self) -> &[BlockId] {
        &self.preds
    }

    pub fn first_inst(&self) -> Option<ValueId> {
        self.insts.first().copied()
    }

    pub fn last_inst(&self) -> Option<ValueId> {
        self.insts.last().copied()
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataFlowGraph {
    values: PrimaryMap<ValueId, ValueData>,
    blocks: PrimaryMap<BlockId, BlockData>,
}

impl DataFlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_block(&mut self) -> BlockId {
        self.blocks.push(BlockData::new())
    }

    /// Makes a function argument. Arguments belong to no block.
    pub fn make_arg(&mut self, ty: Type, index: u32, name: Option<Id>) -> ValueId {
        self.values
            .push(ValueData::new(Some(ty), name, Payload::Arg { index }))
    }

    /// Places `data` at the end of `block` and records the uses of its
    /// operands.
    pub fn append_value(&mut self, block: BlockId, mut data: ValueData) -> ValueId {
        data.block = Some(block);
        let dests = data
            .inst()
            .map(InstData::branch_dests)
            .unwrap_or_default();

        let value = self.values.push(data);
        self.blocks[block].insts.push(value);
        for dest in dests {
            self.blocks[dest].preds.push(block);
        }
        self.attach_user(value);
        value
    }

    pub fn block(&self, block: BlockId) -> &BlockData {
        &self.blocks[block]
    }

    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &BlockData)> {
        self.blocks.iter()
    }

    pub fn block_num(&self) -> usize {
        self.blocks.len()
    }

    pub fn value(&self, value: ValueId) -> &ValueData {
        &self.values[value]
    }

    pub fn value_mut(&mut self, value: ValueId) -> &mut ValueData {
        &mut self.values[value]
    }

    pub fn values(&self) -> impl Iterator<Item = (ValueId, &ValueData)> {
        self.values.iter()
    }

    pub fn value_num(&self) -> usize {
        self.values.len()
    }

    pub fn value_kind(&self, value: ValueId) -> ValueKind {
        self.values[value].kind()
    }

    pub fn value_ty(&self, value: ValueId) -> Option<Type> {
        self.values[value].ty()
    }

    pub fn value_name(&self, value: ValueId) -> Option<Id> {
        self.values[value].name()
    }

    pub fn value_block(&self, value: ValueId) -> Option<BlockId> {
        self.values[value].block()
    }

    /// Records `inst` as a user of each of its operands, once per reference.
    ///
    /// Phi alternatives additionally record their incoming block on the value
    /// flowing in. [`Self::append_value`] already does this; call it directly
    /// only for values pushed some other way.
    pub fn attach_user(&mut self, inst: ValueId) {
        let Some(data) = self.values[inst].inst() else {
            return;
        };

        let operands = data.operands();
        let phi_blocks: SmallVec<[(ValueId, BlockId); 4]> = match data {
            InstData::Phi(phi) => phi.alts().iter().map(|alt| (alt.value, alt.from)).collect(),
            _ => SmallVec::new(),
        };

        for value in operands {
            self.values[value].uses.push(Use { value, user: inst });
        }
        for (value, block) in phi_blocks {
            self.values[value].block_uses.push(block);
        }
    }

    /// Returns every instruction using `value`, once per operand reference.
    pub fn users(&self, value: ValueId) -> impl Iterator<Item = ValueId> + '_ {
        self.values[value].uses.iter().map(|u| u.user)
    }

    /// Returns the number of operand references to `value`.
    pub fn users_num(&self, value: ValueId) -> usize {
        self.values[value].uses.len()
    }

    pub fn block_users(&self, value: ValueId) -> &[BlockId] {
        &self.values[value].block_uses
    }

    /// Removes one use record of `value` by `user`.
    pub fn remove_use(&mut self, value: ValueId, user: ValueId) -> IrResult<()> {
        let uses = &mut self.values[value].uses;
        let pos = uses
            .iter()
            .position(|u| u.user == user)
            .ok_or(IrError::UseNotFound { value, user })?;
        uses.remove(pos);
        Ok(())
    }

    /// Rewrites every reference to `old` inside `user` to `new`, moving the
    /// use records along. Returns the number of rewritten references.
    pub fn replace_operand(&mut self, user: ValueId, old: ValueId, new: ValueId) -> IrResult<usize> {
        let data = self.values[user]
            .inst_mut()
            .ok_or(IrError::NotAnInst(user))?;

        let moved_blocks: SmallVec<[BlockId; 4]> = match &*data {
            InstData::Phi(phi) => phi
                .alts()
                .iter()
                .filter(|alt| alt.value == old)
                .map(|alt| alt.from)
                .collect(),
            _ => SmallVec::new(),
        };

        let mut count = 0;
        data.visit_operands_mut(|value| {
            if *value == old {
                *value = new;
                count += 1;
            }
        });
        if count == 0 {
            return Err(IrError::OperandNotFound { user, value: old });
        }

        for _ in 0..count {
            self.remove_use(old, user)?;
            self.values[new].uses.push(Use { value: new, user });
        }
        for block in moved_blocks {
            let block_uses = &mut self.values[old].block_uses;
            if let Some(pos) = block_uses.iter().position(|b| *b == block) {
                block_uses.remove(pos);
            }
            self.values[new].block_uses.push(block);
        }

        trace!(%user, %old, %new, count, "replaced operand");
        Ok(count)
    }

    /// Redirects every user of `old` to `new`. Returns the number of
    /// rewritten references.
    pub fn replace_all_uses(&mut self, old: ValueId, new: ValueId) -> IrResult<usize> {
        if old == new {
            return Ok(self.users_num(old));
        }

        let mut users: SmallVec<[ValueId; 8]> = SmallVec::new();
        for user in self.users(old) {
            if !users.contains(&user) {
                users.push(user);
            }
        }

        let mut count = 0;
        for user in users {
            count += self.replace_operand(user, old, new)?;
        }
        Ok(count)
    }

    /// Unlinks `inst` from its block and drops the use records it holds on its
    /// operands. The value itself stays allocated.
    pub fn detach_inst(&mut self, inst: ValueId) -> IrResult<()> {
        let data = self.values[inst].inst().ok_or(IrError::NotAnInst(inst))?;
        let operands = data.operands();
        let dests = data.branch_dests();
        let phi_blocks: SmallVec<[(ValueId, BlockId); 4]> = match data {
            InstData::Phi(phi) => phi.alts().iter().map(|alt| (alt.value, alt.from)).collect(),
            _ => SmallVec::new(),
        };

        for value in operands {
            self.remove_use(value, inst)?;
        }
        for (value, block) in phi_blocks {
            let block_uses = &mut self.values[value].block_uses;
            if let Some(pos) = block_uses.iter().position(|b| *b == block) {
                block_uses.remove(pos);
            }
        }

        if let Some(block) = self.values[inst].block.take() {
            self.blocks[block].insts.retain(|v| *v != inst);
            for dest in dests {
                let preds = &mut self.blocks[dest].preds;
                if let Some(pos) = preds.iter().position(|b| *b == block) {
                    preds.remove(pos);
                }
            }
        }
        Ok(())
    }

    pub fn is_terminator(&self, value: ValueId) -> bool {
        self.value_kind(value).is_terminating()
    }

    pub fn is_phi(&self, value: ValueId) -> bool {
        self.value_kind(value).is_phi()
    }

    pub fn inst_data(&self, value: ValueId) -> Option<&InstData> {
        self.values[value].inst()
    }

    /// Returns a typed handle if `value` is an instruction of kind `K`.
    pub fn downcast<K: InstKind>(&self, value: ValueId) -> Option<Inst<K>> {
        let data = self.values[value].inst()?;
        K::data(data).map(|_| Inst::new(value))
    }

    /// Returns the payload of `inst`.
    ///
    /// # Panics
    /// Panics if `inst` was handed out by another graph.
    pub fn inst<K: InstKind>(&self, inst: Inst<K>) -> &K::Data {
        self.values[inst.value()]
            .inst()
            .and_then(K::data)
            .expect("instruction handle from another graph")
    }

    /// Returns the payload of `inst` for mutating its non-operand fields.
    ///
    /// # Panics
    /// Panics if `inst` was handed out by another graph.
    pub fn inst_mut<K: InstKind>(&mut self, inst: Inst<K>) -> &mut K::Data {
        self.values[inst.value()]
            .inst_mut()
            .and_then(K::data_mut)
            .expect("instruction handle from another graph")
    }

    pub fn slots<K: HasSlots>(&self, inst: Inst<K>) -> &[Option<ValueId>] {
        K::slots(self.inst(inst))
    }

    /// Stores `value` in slot `index` of `inst`, replacing and untracking any
    /// operand set earlier.
    pub fn set_slot<K: HasSlots>(
        &mut self,
        inst: Inst<K>,
        index: usize,
        value: ValueId,
    ) -> IrResult<()> {
        let user = inst.value();
        let slots = K::slots_mut(self.inst_mut(inst));
        let len = slots.len();
        let slot = slots.get_mut(index).ok_or(IrError::SlotOutOfRange {
            inst: user,
            index,
            len,
        })?;

        if let Some(old) = slot.replace(value) {
            self.remove_use(old, user)?;
        }
        self.values[value].uses.push(Use { value, user });
        Ok(())
    }

    pub fn set_codegen(&mut self, value: ValueId, word: u64) {
        self.values[value].codegen = Some(word);
    }

    pub fn codegen(&self, value: ValueId) -> Option<u64> {
        self.values[value].codegen
    }
}

#[cfg(test)]
mod tests {
    use cranelift_entity::EntityRef;

    use super::*;
    use crate::inst::{Add, Binary, Jmp, JmpData, Phi, PhiAlt, PhiData, Ret, RetData};

    fn ty() -> Type {
        Type::new(0)
    }

    fn add(dfg: &mut DataFlowGraph, block: BlockId, lhs: ValueId, rhs: ValueId) -> ValueId {
        let data = ValueData::new(
            Some(ty()),
            None,
            Payload::Inst(Add::wrap(Binary::new(lhs, rhs))),
        );
        dfg.append_value(block, data)
    }

    #[test]
    fn uses_are_recorded_per_reference() {
        let mut dfg = DataFlowGraph::new();
        let b0 = dfg.make_block();
        let v0 = dfg.make_arg(ty(), 0, None);
        let v1 = add(&mut dfg, b0, v0, v0);

        assert_eq!(dfg.users(v0).collect::<Vec<_>>(), [v1, v1]);
        assert_eq!(dfg.users_num(v0), 2);
        assert_eq!(dfg.users_num(v1), 0);
        assert_eq!(dfg.block(b0).insts(), &[v1]);
        assert_eq!(dfg.value_block(v1), Some(b0));
        assert_eq!(dfg.value_block(v0), None);
    }

    #[test]
    fn remove_use_removes_one_record() {
        let mut dfg = DataFlowGraph::new();
        let b0 = dfg.make_block();
        let v0 = dfg.make_arg(ty(), 0, None);
        let v1 = add(&mut dfg, b0, v0, v0);

        dfg.remove_use(v0, v1).unwrap();
        assert_eq!(dfg.users_num(v0), 1);
        dfg.remove_use(v0, v1).unwrap();
        assert_eq!(
            dfg.remove_use(v0, v1),
            Err(IrError::UseNotFound { value: v0, user: v1 })
        );
    }

    #[test]
    fn replace_operand_moves_uses() {
        let mut dfg = DataFlowGraph::new();
        let b0 = dfg.make_block();
        let v0 = dfg.make_arg(ty(), 0, None);
        let v1 = dfg.make_arg(ty(), 1, None);
        let v2 = add(&mut dfg, b0, v0, v0);

        assert_eq!(dfg.replace_operand(v2, v0, v1), Ok(2));
        assert_eq!(dfg.users_num(v0), 0);
        assert_eq!(dfg.users(v1).collect::<Vec<_>>(), [v2, v2]);
        assert_eq!(
            dfg.inst_data(v2).map(|data| data.operands().to_vec()),
            Some(vec![v1, v1])
        );

        assert_eq!(
            dfg.replace_operand(v2, v0, v1),
            Err(IrError::OperandNotFound { user: v2, value: v0 })
        );
        assert_eq!(dfg.replace_operand(v0, v1, v0), Err(IrError::NotAnInst(v0)));
    }

    #[test]
    fn phi_alternatives_record_blocks() {
        let mut dfg = DataFlowGraph::new();
        let b0 = dfg.make_block();
        let b1 = dfg.make_block();
        let v0 = dfg.make_arg(ty(), 0, None);
        let v1 = dfg.make_arg(ty(), 1, None);

        let jmp = ValueData::new(None, None, Payload::Inst(Jmp::wrap(JmpData::new(b1))));
        dfg.append_value(b0, jmp);
        assert_eq!(dfg.block(b1).preds(), &[b0]);

        let alts = vec![PhiAlt::new(b0, v0)];
        let phi = ValueData::new(
            Some(ty()),
            None,
            Payload::Inst(Phi::wrap(PhiData::new(alts))),
        );
        let v2 = dfg.append_value(b1, phi);
        assert_eq!(dfg.block_users(v0), &[b0]);
        assert!(dfg.is_phi(v2));

        dfg.replace_all_uses(v0, v1).unwrap();
        assert!(dfg.block_users(v0).is_empty());
        assert_eq!(dfg.block_users(v1), &[b0]);
        assert_eq!(dfg.users(v1).collect::<Vec<_>>(), [v2]);
    }

    #[test]
    fn detach_inst_drops_bookkeeping() {
        let mut dfg = DataFlowGraph::new();
        let b0 = dfg.make_block();
        let b1 = dfg.make_block();
        let v0 = dfg.make_arg(ty(), 0, None);
        let v1 = add(&mut dfg, b0, v0, v0);
        let jmp = ValueData::new(None, None, Payload::Inst(Jmp::wrap(JmpData::new(b1))));
        let v2 = dfg.append_value(b0, jmp);

        dfg.detach_inst(v1).unwrap();
        assert_eq!(dfg.users_num(v0), 0);
        assert_eq!(dfg.block(b0).insts(), &[v2]);
        assert_eq!(dfg.value_block(v1), None);

        dfg.detach_inst(v2).unwrap();
        assert!(dfg.block(b1).preds().is_empty());
        assert!(dfg.block(b0).is_empty());
    }

    #[test]
    fn downcast_and_codegen() {
        let mut dfg = DataFlowGraph::new();
        let b0 = dfg.make_block();
        let v0 = dfg.make_arg(ty(), 0, None);
        let v1 = add(&mut dfg, b0, v0, v0);
        let ret = ValueData::new(None, None, Payload::Inst(Ret::wrap(RetData::new(Some(v1)))));
        let v2 = dfg.append_value(b0, ret);

        let inst = dfg.downcast::<Add>(v1).unwrap();
        assert_eq!(dfg.inst(inst).lhs(), v0);
        assert!(dfg.downcast::<Add>(v2).is_none());
        assert!(dfg.downcast::<Add>(v0).is_none());
        assert!(dfg.is_terminator(v2));
        assert_eq!(dfg.value_ty(v2), None);

        assert_eq!(dfg.codegen(v1), None);
        dfg.set_codegen(v1, 0xdead_beef);
        assert_eq!(dfg.codegen(v1), Some(0xdead_beef));
        assert_eq!(BlockId::new(3).to_string(), "block3");
    }
}
