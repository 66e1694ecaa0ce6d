//! This module contains basalt IR value definitions.
use std::fmt;

use crate::{arena::ArenaSlice, inst::InstData, BlockId, Id, Type};

/// An opaque reference to [`ValueData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueId(pub u32);
cranelift_entity::entity_impl!(ValueId);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A single use of `value` as an operand of `user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Use {
    pub value: ValueId,
    pub user: ValueId,
}

/// Discriminant of every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    Arg,

    ConstInt,
    ConstFloat,
    ConstString,

    Trunc,
    FTrunc,
    ZExt,
    SExt,
    FExt,

    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Rem,
    IRem,
    FAdd,
    FSub,
    FMul,
    FDiv,

    ICmp,
    FCmp,

    Shl,
    Shr,
    Sar,
    And,
    Or,
    Xor,

    Record,
    Tup,
    Fun,

    Call,
    CallGen,
    CallDyn,
    CallDynGen,
    CallForeign,

    Je,
    Jmp,
    Ret,
    Phi,
}

impl ValueKind {
    pub fn is_const(self) -> bool {
        matches!(self, Self::ConstInt | Self::ConstFloat | Self::ConstString)
    }

    pub fn is_inst(self) -> bool {
        self >= Self::Trunc
    }

    pub fn is_terminating(self) -> bool {
        is_terminating(self)
    }

    pub fn is_phi(self) -> bool {
        self == Self::Phi
    }

    pub fn is_call(self) -> bool {
        matches!(
            self,
            Self::Call | Self::CallGen | Self::CallDyn | Self::CallDynGen | Self::CallForeign
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arg => "arg",
            Self::ConstInt => "const.int",
            Self::ConstFloat => "const.float",
            Self::ConstString => "const.str",
            Self::Trunc => "trunc",
            Self::FTrunc => "ftrunc",
            Self::ZExt => "zext",
            Self::SExt => "sext",
            Self::FExt => "fext",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::IDiv => "idiv",
            Self::Rem => "rem",
            Self::IRem => "irem",
            Self::FAdd => "fadd",
            Self::FSub => "fsub",
            Self::FMul => "fmul",
            Self::FDiv => "fdiv",
            Self::ICmp => "icmp",
            Self::FCmp => "fcmp",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::Sar => "sar",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Record => "record",
            Self::Tup => "tup",
            Self::Fun => "fun",
            Self::Call => "call",
            Self::CallGen => "call.gen",
            Self::CallDyn => "call.dyn",
            Self::CallDynGen => "call.dyn.gen",
            Self::CallForeign => "call.foreign",
            Self::Je => "je",
            Self::Jmp => "jmp",
            Self::Ret => "ret",
            Self::Phi => "phi",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` for the kinds that may end a block.
pub fn is_terminating(kind: ValueKind) -> bool {
    matches!(kind, ValueKind::Ret | ValueKind::Je | ValueKind::Jmp)
}

/// The kind-specific part of a value. Private so that a value's kind can't be
/// reassigned after construction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    Arg { index: u32 },
    ConstInt(i64),
    ConstFloat(f64),
    ConstString(ArenaSlice),
    Inst(InstData),
}

/// A value data definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueData {
    /// The block the value is placed in. `None` for function arguments.
    pub(crate) block: Option<BlockId>,
    /// `None` for terminators, which produce nothing.
    pub(crate) ty: Option<Type>,
    pub(crate) uses: Vec<Use>,
    pub(crate) block_uses: Vec<BlockId>,
    pub(crate) codegen: Option<u64>,
    pub(crate) name: Option<Id>,
    pub(crate) payload: Payload,
}

impl ValueData {
    pub(crate) fn new(ty: Option<Type>, name: Option<Id>, payload: Payload) -> Self {
        Self {
            block: None,
            ty,
            uses: Vec::new(),
            block_uses: Vec::new(),
            codegen: None,
            name,
            payload,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match &self.payload {
            Payload::Arg { .. } => ValueKind::Arg,
            Payload::ConstInt(_) => ValueKind::ConstInt,
            Payload::ConstFloat(_) => ValueKind::ConstFloat,
            Payload::ConstString(_) => ValueKind::ConstString,
            Payload::Inst(inst) => inst.kind(),
        }
    }

    pub fn block(&self) -> Option<BlockId> {
        self.block
    }

    pub fn ty(&self) -> Option<Type> {
        self.ty
    }

    pub fn name(&self) -> Option<Id> {
        self.name
    }

    /// Every instruction using this value, one entry per operand reference.
    pub fn uses(&self) -> &[Use] {
        &self.uses
    }

    /// Every block referencing this value, e.g. as the predecessor a phi
    /// alternative flows in from.
    pub fn block_uses(&self) -> &[BlockId] {
        &self.block_uses
    }

    pub fn codegen(&self) -> Option<u64> {
        self.codegen
    }

    pub fn arg_index(&self) -> Option<u32> {
        match self.payload {
            Payload::Arg { index } => Some(index),
            _ => None,
        }
    }

    pub fn const_int(&self) -> Option<i64> {
        match self.payload {
            Payload::ConstInt(value) => Some(value),
            _ => None,
        }
    }

    pub fn const_float(&self) -> Option<f64> {
        match self.payload {
            Payload::ConstFloat(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the arena slice holding a string constant's text.
    pub fn const_string(&self) -> Option<ArenaSlice> {
        match self.payload {
            Payload::ConstString(slice) => Some(slice),
            _ => None,
        }
    }

    pub fn inst(&self) -> Option<&InstData> {
        match &self.payload {
            Payload::Inst(inst) => Some(inst),
            _ => None,
        }
    }

    pub(crate) fn inst_mut(&mut self) -> Option<&mut InstData> {
        match &mut self.payload {
            Payload::Inst(inst) => Some(inst),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_classification() {
        assert!(ValueKind::ConstString.is_const());
        assert!(!ValueKind::ConstString.is_inst());
        assert!(!ValueKind::Arg.is_inst());
        assert!(ValueKind::Trunc.is_inst());
        assert!(ValueKind::Phi.is_inst());
        assert!(ValueKind::CallDynGen.is_call());

        let terminators: Vec<_> = [
            ValueKind::Add,
            ValueKind::Je,
            ValueKind::Jmp,
            ValueKind::Ret,
            ValueKind::Phi,
            ValueKind::Call,
        ]
        .into_iter()
        .filter(|kind| is_terminating(*kind))
        .collect();
        assert_eq!(terminators, [ValueKind::Je, ValueKind::Jmp, ValueKind::Ret]);
    }
}
