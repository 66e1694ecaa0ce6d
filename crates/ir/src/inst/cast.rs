use crate::{
    visitor::{Visitable, VisitableMut, Visitor, VisitorMut},
    ValueId,
};

/// Operand of the conversion instructions. The target type is the
/// instruction's own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cast {
    from: ValueId,
}

impl Cast {
    pub(crate) fn new(from: ValueId) -> Self {
        Self { from }
    }

    pub fn from(&self) -> ValueId {
        self.from
    }
}

impl Visitable for Cast {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.from.accept(visitor);
    }
}

impl VisitableMut for Cast {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.from.accept_mut(visitor);
    }
}
