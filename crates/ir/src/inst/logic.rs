use crate::{
    visitor::{Visitable, VisitableMut, Visitor, VisitorMut},
    ValueId,
};

/// Operands of `shl`, `shr` (logical) and `sar` (arithmetic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shift {
    arg: ValueId,
    amount: ValueId,
}

impl Shift {
    pub(crate) fn new(arg: ValueId, amount: ValueId) -> Self {
        Self { arg, amount }
    }

    pub fn arg(&self) -> ValueId {
        self.arg
    }

    pub fn amount(&self) -> ValueId {
        self.amount
    }
}

impl Visitable for Shift {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.arg.accept(visitor);
        self.amount.accept(visitor);
    }
}

impl VisitableMut for Shift {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.arg.accept_mut(visitor);
        self.amount.accept_mut(visitor);
    }
}
