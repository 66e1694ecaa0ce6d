use crate::{
    visitor::{Visitable, VisitableMut, Visitor, VisitorMut},
    BlockId, ForeignFuncRef, FuncRef, ValueId,
};

use super::Slots;

/// A direct call. Shared by `call` and the generator-producing `call.gen`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallData {
    fun: FuncRef,
    args: Slots,
}

impl CallData {
    pub(crate) fn new(fun: FuncRef, args: Slots) -> Self {
        Self { fun, args }
    }

    pub fn fun(&self) -> FuncRef {
        self.fun
    }

    pub fn args(&self) -> &[Option<ValueId>] {
        &self.args
    }

    pub(crate) fn slots(&self) -> &[Option<ValueId>] {
        &self.args
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<ValueId>] {
        &mut self.args
    }
}

impl Visitable for CallData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.args.accept(visitor);
    }
}

impl VisitableMut for CallData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.args.accept_mut(visitor);
    }
}

/// A call through a closure value. The callee is itself an operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallDynData {
    fun: ValueId,
    args: Slots,
}

impl CallDynData {
    pub(crate) fn new(fun: ValueId, args: Slots) -> Self {
        Self { fun, args }
    }

    pub fn fun(&self) -> ValueId {
        self.fun
    }

    pub fn args(&self) -> &[Option<ValueId>] {
        &self.args
    }

    pub(crate) fn slots(&self) -> &[Option<ValueId>] {
        &self.args
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<ValueId>] {
        &mut self.args
    }
}

impl Visitable for CallDynData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.fun.accept(visitor);
        self.args.accept(visitor);
    }
}

impl VisitableMut for CallDynData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.fun.accept_mut(visitor);
        self.args.accept_mut(visitor);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallForeignData {
    fun: ForeignFuncRef,
    args: Slots,
}

impl CallForeignData {
    pub(crate) fn new(fun: ForeignFuncRef, args: Slots) -> Self {
        Self { fun, args }
    }

    pub fn fun(&self) -> ForeignFuncRef {
        self.fun
    }

    pub fn args(&self) -> &[Option<ValueId>] {
        &self.args
    }

    pub(crate) fn slots(&self) -> &[Option<ValueId>] {
        &self.args
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<ValueId>] {
        &mut self.args
    }
}

impl Visitable for CallForeignData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.args.accept(visitor);
    }
}

impl VisitableMut for CallForeignData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.args.accept_mut(visitor);
    }
}

/// Conditional branch: `then` is taken when `cond` is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JeData {
    cond: ValueId,
    then: BlockId,
    otherwise: BlockId,
}

impl JeData {
    pub(crate) fn new(cond: ValueId, then: BlockId, otherwise: BlockId) -> Self {
        Self {
            cond,
            then,
            otherwise,
        }
    }

    pub fn cond(&self) -> ValueId {
        self.cond
    }

    pub fn then(&self) -> BlockId {
        self.then
    }

    pub fn otherwise(&self) -> BlockId {
        self.otherwise
    }
}

impl Visitable for JeData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.cond.accept(visitor);
        self.then.accept(visitor);
        self.otherwise.accept(visitor);
    }
}

impl VisitableMut for JeData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.cond.accept_mut(visitor);
        self.then.accept_mut(visitor);
        self.otherwise.accept_mut(visitor);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JmpData {
    to: BlockId,
}

impl JmpData {
    pub(crate) fn new(to: BlockId) -> Self {
        Self { to }
    }

    pub fn to(&self) -> BlockId {
        self.to
    }
}

impl Visitable for JmpData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.to.accept(visitor);
    }
}

impl VisitableMut for JmpData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.to.accept_mut(visitor);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetData {
    value: Option<ValueId>,
}

impl RetData {
    pub(crate) fn new(value: Option<ValueId>) -> Self {
        Self { value }
    }

    pub fn value(&self) -> Option<ValueId> {
        self.value
    }
}

impl Visitable for RetData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.value.accept(visitor);
    }
}

impl VisitableMut for RetData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.value.accept_mut(visitor);
    }
}

/// `value` flows into the phi when control arrives from `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhiAlt {
    pub from: BlockId,
    pub value: ValueId,
}

impl PhiAlt {
    pub fn new(from: BlockId, value: ValueId) -> Self {
        Self { from, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhiData {
    alts: Vec<PhiAlt>,
}

impl PhiData {
    pub(crate) fn new(alts: Vec<PhiAlt>) -> Self {
        Self { alts }
    }

    pub fn alts(&self) -> &[PhiAlt] {
        &self.alts
    }

    /// Returns the value flowing in from `block`, if any.
    pub fn incoming(&self, block: BlockId) -> Option<ValueId> {
        self.alts
            .iter()
            .find(|alt| alt.from == block)
            .map(|alt| alt.value)
    }
}

impl Visitable for PhiData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.alts.accept(visitor);
    }
}

impl VisitableMut for PhiData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.alts.accept_mut(visitor);
    }
}
