use crate::{
    visitor::{Visitable, VisitableMut, Visitor, VisitorMut},
    ConRef, FuncRef, ValueId,
};

use super::{empty_slots, Slots};

/// Applies a tagged-union constructor to a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordData {
    con: ConRef,
    arg: ValueId,
}

impl RecordData {
    pub(crate) fn new(con: ConRef, arg: ValueId) -> Self {
        Self { con, arg }
    }

    pub fn con(&self) -> ConRef {
        self.con
    }

    pub fn arg(&self) -> ValueId {
        self.arg
    }
}

impl Visitable for RecordData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.arg.accept(visitor);
    }
}

impl VisitableMut for RecordData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.arg.accept_mut(visitor);
    }
}

/// A fixed-arity tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupData {
    fields: Slots,
}

impl TupData {
    pub(crate) fn new(field_count: usize) -> Self {
        Self {
            fields: empty_slots(field_count),
        }
    }

    pub fn fields(&self) -> &[Option<ValueId>] {
        &self.fields
    }

    pub(crate) fn slots(&self) -> &[Option<ValueId>] {
        &self.fields
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<ValueId>] {
        &mut self.fields
    }
}

impl Visitable for TupData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.fields.accept(visitor);
    }
}

impl VisitableMut for TupData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.fields.accept_mut(visitor);
    }
}

/// A closure over `body` capturing `frame`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunData {
    body: FuncRef,
    frame: Slots,
}

impl FunData {
    pub(crate) fn new(body: FuncRef, frame_count: usize) -> Self {
        Self {
            body,
            frame: empty_slots(frame_count),
        }
    }

    pub fn body(&self) -> FuncRef {
        self.body
    }

    pub fn frame(&self) -> &[Option<ValueId>] {
        &self.frame
    }

    pub(crate) fn slots(&self) -> &[Option<ValueId>] {
        &self.frame
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<ValueId>] {
        &mut self.frame
    }
}

impl Visitable for FunData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.frame.accept(visitor);
    }
}

impl VisitableMut for FunData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.frame.accept_mut(visitor);
    }
}
