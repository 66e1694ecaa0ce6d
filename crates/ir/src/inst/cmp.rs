use std::fmt;

use crate::{
    visitor::{Visitable, VisitableMut, Visitor, VisitorMut},
    ValueId,
};

/// Integer comparison conditions.
///
/// `Gt`..`Le` compare as unsigned, `IGt`..`ILe` as signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ICmpCond {
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
    IGt,
    IGe,
    ILt,
    ILe,
}

impl ICmpCond {
    pub fn is_signed(self) -> bool {
        matches!(self, Self::IGt | Self::IGe | Self::ILt | Self::ILe)
    }

    /// Returns the condition that holds when the operands are swapped.
    pub fn swap_operands(self) -> Self {
        match self {
            Self::Eq => Self::Eq,
            Self::Neq => Self::Neq,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::IGt => Self::ILt,
            Self::IGe => Self::ILe,
            Self::ILt => Self::IGt,
            Self::ILe => Self::IGe,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::IGt => "igt",
            Self::IGe => "ige",
            Self::ILt => "ilt",
            Self::ILe => "ile",
        }
    }
}

impl fmt::Display for ICmpCond {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Floating point comparison conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FCmpCond {
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl FCmpCond {
    pub fn swap_operands(self) -> Self {
        match self {
            Self::Eq => Self::Eq,
            Self::Neq => Self::Neq,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        }
    }
}

impl fmt::Display for FCmpCond {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ICmpData {
    lhs: ValueId,
    rhs: ValueId,
    cond: ICmpCond,
}

impl ICmpData {
    pub(crate) fn new(lhs: ValueId, rhs: ValueId, cond: ICmpCond) -> Self {
        Self { lhs, rhs, cond }
    }

    pub fn lhs(&self) -> ValueId {
        self.lhs
    }

    pub fn rhs(&self) -> ValueId {
        self.rhs
    }

    pub fn cond(&self) -> ICmpCond {
        self.cond
    }

    pub fn set_cond(&mut self, cond: ICmpCond) {
        self.cond = cond;
    }
}

impl Visitable for ICmpData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.lhs.accept(visitor);
        self.rhs.accept(visitor);
    }
}

impl VisitableMut for ICmpData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.lhs.accept_mut(visitor);
        self.rhs.accept_mut(visitor);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FCmpData {
    lhs: ValueId,
    rhs: ValueId,
    cond: FCmpCond,
}

impl FCmpData {
    pub(crate) fn new(lhs: ValueId, rhs: ValueId, cond: FCmpCond) -> Self {
        Self { lhs, rhs, cond }
    }

    pub fn lhs(&self) -> ValueId {
        self.lhs
    }

    pub fn rhs(&self) -> ValueId {
        self.rhs
    }

    pub fn cond(&self) -> FCmpCond {
        self.cond
    }

    pub fn set_cond(&mut self, cond: FCmpCond) {
        self.cond = cond;
    }
}

impl Visitable for FCmpData {
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.lhs.accept(visitor);
        self.rhs.accept(visitor);
    }
}

impl VisitableMut for FCmpData {
    fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
        self.lhs.accept_mut(visitor);
        self.rhs.accept_mut(visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapping_twice_is_identity() {
        for cond in [
            ICmpCond::Eq,
            ICmpCond::Neq,
            ICmpCond::Gt,
            ICmpCond::Ge,
            ICmpCond::Lt,
            ICmpCond::Le,
            ICmpCond::IGt,
            ICmpCond::IGe,
            ICmpCond::ILt,
            ICmpCond::ILe,
        ] {
            assert_eq!(cond.swap_operands().swap_operands(), cond);
            assert_eq!(cond.swap_operands().is_signed(), cond.is_signed());
        }
        assert_eq!(FCmpCond::Ge.swap_operands(), FCmpCond::Le);
    }
}
