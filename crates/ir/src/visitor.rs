//! This module contains the [`Visitor`]/[`Visitable`] and
//! [`VisitorMut`]/[`VisitableMut`] traits used to walk instruction operands.
use smallvec::{Array, SmallVec};

use crate::{inst::PhiAlt, BlockId, ValueId};

pub trait Visitable {
    fn accept(&self, visitor: &mut dyn Visitor);
}

#[allow(unused_variables)]
pub trait Visitor {
    fn visit_value_id(&mut self, item: ValueId) {}

    fn visit_block_id(&mut self, item: BlockId) {}

    /// Phi alternatives pair a block with a value, so they get their own hook.
    fn visit_phi_alt(&mut self, item: &PhiAlt) {
        self.visit_value_id(item.value);
        self.visit_block_id(item.from);
    }
}

pub trait VisitableMut {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut);
}

#[allow(unused_variables)]
pub trait VisitorMut {
    fn visit_value_id(&mut self, item: &mut ValueId) {}

    fn visit_block_id(&mut self, item: &mut BlockId) {}

    fn visit_phi_alt(&mut self, item: &mut PhiAlt) {
        self.visit_value_id(&mut item.value);
        self.visit_block_id(&mut item.from);
    }
}

impl Visitable for ValueId {
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_value_id(*self)
    }
}
impl VisitableMut for ValueId {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        visitor.visit_value_id(self);
    }
}

impl Visitable for BlockId {
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_block_id(*self);
    }
}
impl VisitableMut for BlockId {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        visitor.visit_block_id(self);
    }
}

impl Visitable for PhiAlt {
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_phi_alt(self);
    }
}
impl VisitableMut for PhiAlt {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        visitor.visit_phi_alt(self);
    }
}

impl<T> Visitable for Option<T>
where
    T: Visitable,
{
    fn accept(&self, visitor: &mut dyn Visitor) {
        if let Some(item) = self.as_ref() {
            item.accept(visitor);
        }
    }
}
impl<T> VisitableMut for Option<T>
where
    T: VisitableMut,
{
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        if let Some(item) = self.as_mut() {
            item.accept_mut(visitor);
        }
    }
}

impl<T> Visitable for Vec<T>
where
    T: Visitable,
{
    fn accept(&self, visitor: &mut dyn Visitor) {
        for item in self {
            item.accept(visitor);
        }
    }
}
impl<T> VisitableMut for Vec<T>
where
    T: VisitableMut,
{
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        for item in self {
            item.accept_mut(visitor);
        }
    }
}

impl<T, const N: usize> Visitable for SmallVec<[T; N]>
where
    T: Visitable,
    [T; N]: Array<Item = T>,
{
    fn accept(&self, visitor: &mut dyn Visitor) {
        for item in self {
            item.accept(visitor);
        }
    }
}
impl<T, const N: usize> VisitableMut for SmallVec<[T; N]>
where
    T: VisitableMut,
    [T; N]: Array<Item = T>,
{
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        for item in self {
            item.accept_mut(visitor);
        }
    }
}

/// Hands every visited value to a closure.
pub(crate) struct ValueVisitorFn<F>(pub(crate) F);

impl<F> Visitor for ValueVisitorFn<F>
where
    F: FnMut(ValueId),
{
    fn visit_value_id(&mut self, item: ValueId) {
        (self.0)(item);
    }
}

/// Hands every visited value slot to a closure.
pub(crate) struct ValueVisitorMutFn<F>(pub(crate) F);

impl<F> VisitorMut for ValueVisitorMutFn<F>
where
    F: FnMut(&mut ValueId),
{
    fn visit_value_id(&mut self, item: &mut ValueId) {
        (self.0)(item);
    }
}
