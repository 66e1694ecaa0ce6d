//! This module contains basalt IR instruction definitions.
//!
//! Every concrete instruction kind has a zero-sized marker type (e.g. [`Add`])
//! implementing [`InstKind`], which names the payload struct the kind carries.
//! The builder hands out [`Inst<K>`] handles, so reading a kind's fields never
//! needs a manual downcast.
pub mod arith;
pub mod cast;
pub mod cmp;
pub mod control_flow;
pub mod data;
pub mod logic;

use std::{fmt, hash, marker::PhantomData};

use smallvec::SmallVec;

pub use arith::Binary;
pub use cast::Cast;
pub use cmp::{FCmpCond, FCmpData, ICmpCond, ICmpData};
pub use control_flow::{
    CallData, CallDynData, CallForeignData, JeData, JmpData, PhiAlt, PhiData, RetData,
};
pub use data::{FunData, RecordData, TupData};
pub use logic::Shift;

use crate::{
    visitor::{ValueVisitorFn, ValueVisitorMutFn, Visitable, VisitableMut, Visitor, VisitorMut},
    BlockId, ValueId, ValueKind,
};

/// Operand slots of a variable-arity instruction. `None` marks a slot that has
/// not been set yet.
pub type Slots = SmallVec<[Option<ValueId>; 4]>;

pub(crate) fn empty_slots(len: usize) -> Slots {
    SmallVec::from_elem(None, len)
}

mod sealed {
    pub trait Sealed {}
}

/// A concrete instruction kind.
pub trait InstKind: sealed::Sealed + Copy + fmt::Debug + 'static {
    type Data: Visitable + VisitableMut + fmt::Debug;

    const KIND: ValueKind;

    fn wrap(data: Self::Data) -> InstData;

    fn data(inst: &InstData) -> Option<&Self::Data>;

    fn data_mut(inst: &mut InstData) -> Option<&mut Self::Data>;
}

/// Kinds whose operand count is fixed at construction and whose operands are
/// filled in afterwards, one slot at a time.
pub trait HasSlots: InstKind {
    fn slots(data: &Self::Data) -> &[Option<ValueId>];

    fn slots_mut(data: &mut Self::Data) -> &mut [Option<ValueId>];
}

/// A typed reference to an instruction of kind `K`.
pub struct Inst<K> {
    value: ValueId,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Inst<K> {
    pub(crate) fn new(value: ValueId) -> Self {
        Self {
            value,
            _kind: PhantomData,
        }
    }

    /// Returns the untyped value this instruction defines.
    pub fn value(self) -> ValueId {
        self.value
    }
}

impl<K> Clone for Inst<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Inst<K> {}

impl<K> PartialEq for Inst<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K> Eq for Inst<K> {}

impl<K> hash::Hash for Inst<K> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K: InstKind> fmt::Debug for Inst<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Inst<{}>({})", K::KIND, self.value)
    }
}

impl<K> From<Inst<K>> for ValueId {
    fn from(inst: Inst<K>) -> Self {
        inst.value
    }
}

macro_rules! define_insts {
    ($($kind:ident($data:ty)),* $(,)?) => {
        /// An instruction data definition.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum InstData {
            $($kind($data),)*
        }

        impl InstData {
            pub fn kind(&self) -> ValueKind {
                match self {
                    $(Self::$kind(_) => ValueKind::$kind,)*
                }
            }
        }

        impl Visitable for InstData {
            fn accept(&self, visitor: &mut dyn Visitor) {
                match self {
                    $(Self::$kind(data) => data.accept(visitor),)*
                }
            }
        }

        impl VisitableMut for InstData {
            fn accept_mut(&mut self, visitor: &mut dyn VisitorMut) {
                match self {
                    $(Self::$kind(data) => data.accept_mut(visitor),)*
                }
            }
        }

        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $kind;

            impl sealed::Sealed for $kind {}

            impl InstKind for $kind {
                type Data = $data;

                const KIND: ValueKind = ValueKind::$kind;

                fn wrap(data: $data) -> InstData {
                    InstData::$kind(data)
                }

                fn data(inst: &InstData) -> Option<&$data> {
                    match inst {
                        InstData::$kind(data) => Some(data),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn data_mut(inst: &mut InstData) -> Option<&mut $data> {
                    match inst {
                        InstData::$kind(data) => Some(data),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )*
    };
}

define_insts! {
    Trunc(Cast),
    FTrunc(Cast),
    ZExt(Cast),
    SExt(Cast),
    FExt(Cast),

    Add(Binary),
    Sub(Binary),
    Mul(Binary),
    Div(Binary),
    IDiv(Binary),
    Rem(Binary),
    IRem(Binary),
    FAdd(Binary),
    FSub(Binary),
    FMul(Binary),
    FDiv(Binary),

    ICmp(ICmpData),
    FCmp(FCmpData),

    Shl(Shift),
    Shr(Shift),
    Sar(Shift),
    And(Binary),
    Or(Binary),
    Xor(Binary),

    Record(RecordData),
    Tup(TupData),
    Fun(FunData),

    Call(CallData),
    CallGen(CallData),
    CallDyn(CallDynData),
    CallDynGen(CallDynData),
    CallForeign(CallForeignData),

    Je(JeData),
    Jmp(JmpData),
    Ret(RetData),
    Phi(PhiData),
}

macro_rules! impl_has_slots {
    ($($kind:ident),* $(,)?) => {
        $(
            impl HasSlots for $kind {
                fn slots(data: &Self::Data) -> &[Option<ValueId>] {
                    data.slots()
                }

                fn slots_mut(data: &mut Self::Data) -> &mut [Option<ValueId>] {
                    data.slots_mut()
                }
            }
        )*
    };
}

impl_has_slots!(Tup, Fun, Call, CallGen, CallDyn, CallDynGen, CallForeign);

impl InstData {
    /// Returns every operand in field order, one entry per reference.
    ///
    /// Unset argument slots are skipped.
    pub fn operands(&self) -> SmallVec<[ValueId; 4]> {
        let mut operands = SmallVec::new();
        self.for_each_operand(|value| operands.push(value));
        operands
    }

    pub fn for_each_operand(&self, f: impl FnMut(ValueId)) {
        self.accept(&mut ValueVisitorFn(f));
    }

    pub(crate) fn visit_operands_mut(&mut self, f: impl FnMut(&mut ValueId)) {
        self.accept_mut(&mut ValueVisitorMutFn(f));
    }

    pub fn is_terminator(&self) -> bool {
        self.kind().is_terminating()
    }

    pub fn is_phi(&self) -> bool {
        matches!(self, Self::Phi(_))
    }

    /// Returns the blocks control may transfer to.
    pub fn branch_dests(&self) -> SmallVec<[BlockId; 2]> {
        match self {
            Self::Je(je) => SmallVec::from_slice(&[je.then(), je.otherwise()]),
            Self::Jmp(jmp) => SmallVec::from_slice(&[jmp.to()]),
            _ => SmallVec::new(),
        }
    }

    /// Returns the variable-arity operand slots, if the kind has any.
    pub fn slots(&self) -> Option<&[Option<ValueId>]> {
        match self {
            Self::Tup(data) => Some(data.slots()),
            Self::Fun(data) => Some(data.slots()),
            Self::Call(data) | Self::CallGen(data) => Some(data.slots()),
            Self::CallDyn(data) | Self::CallDynGen(data) => Some(data.slots()),
            Self::CallForeign(data) => Some(data.slots()),
            _ => None,
        }
    }
}
