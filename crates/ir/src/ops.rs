//! This module contains the parser-facing operator table.
use rustc_hash::FxHashMap;

use crate::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpProperties {
    pub precedence: u16,
    pub assoc: Assoc,
}

impl OpProperties {
    /// Properties of every operator that was never registered.
    pub const DEFAULT: Self = Self::new(9, Assoc::Left);

    pub const fn new(precedence: u16, assoc: Assoc) -> Self {
        Self { precedence, assoc }
    }
}

impl Default for OpProperties {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone)]
pub struct OpTable {
    ops: FxHashMap<Id, OpProperties>,
    fallback: OpProperties,
}

impl OpTable {
    pub fn new() -> Self {
        Self::with_fallback(OpProperties::DEFAULT)
    }

    pub fn with_fallback(fallback: OpProperties) -> Self {
        Self {
            ops: FxHashMap::default(),
            fallback,
        }
    }

    /// Registers `op`, replacing any earlier registration.
    pub fn insert(&mut self, op: Id, props: OpProperties) {
        self.ops.insert(op, props);
    }

    /// Returns the registered properties of `op`, or the fallback for operators
    /// that were never registered.
    pub fn get(&self, op: Id) -> OpProperties {
        self.ops.get(&op).copied().unwrap_or(self.fallback)
    }

    pub fn is_registered(&self, op: Id) -> bool {
        self.ops.contains_key(&op)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Default for OpTable {
    fn default() -> Self {
        Self::new()
    }
}
