use crate::{
    visitor::{Visitable, VisitableMut, Visitor, VisitorMut},
    ValueId,
};

/// Operands of the two-input arithmetic and bitwise instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binary {
    lhs: ValueId,
    rhs: ValueId,
}

impl Binary {
    pub(crate) fn new(lhs: ValueId, rhs: ValueId) -> Self {
        Self { lhs, rhs }
    }

    pub fn lhs(&self) -> ValueId {
        self.lhs
    }

    pub fn rhs(&self) -> ValueId {
        self.rhs
    }
}

impl Visitable for Binary {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.lhs.accept(visitor);
        self.rhs.accept(visitor);
    }
}

impl VisitableMut for Binary {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.lhs.accept_mut(visitor);
        self.rhs.accept_mut(visitor);
    }
}
