//! This module contains the opaque handles the IR core receives from its
//! neighbouring compiler stages.
//!
//! None of these are interpreted here: types come from the type checker,
//! functions and constructors from the front end's symbol tables.
use std::fmt;

use cranelift_entity::entity_impl;

/// An opaque reference to a type produced by the type checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Type(u32);
entity_impl!(Type);

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// An opaque reference to a function defined in the compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuncRef(u32);
entity_impl!(FuncRef);

impl fmt::Display for FuncRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fn{}", self.0)
    }
}

/// An opaque reference to a function defined outside the compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ForeignFuncRef(u32);
entity_impl!(ForeignFuncRef);

impl fmt::Display for ForeignFuncRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "foreign{}", self.0)
    }
}

/// An opaque reference to a constructor of a tagged union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConRef(u32);
entity_impl!(ConRef);

impl fmt::Display for ConRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "con{}", self.0)
    }
}
