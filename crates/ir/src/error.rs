use thiserror::Error;

use crate::{Id, ValueId, ValueKind};

pub type IrResult<T> = Result<T, IrError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    #[error("identifier {0} was never interned")]
    UnknownIdent(Id),

    #[error("identifier hash collision on {id}: `{existing}` is already interned, `{incoming}` hashes the same")]
    IdentCollision {
        id: Id,
        existing: String,
        incoming: String,
    },

    #[error("expected {expected} segment(s) but `{text}` has {found}")]
    InvalidSegmentCount {
        text: String,
        expected: usize,
        found: usize,
    },

    #[error("{0} is not an instruction")]
    NotAnInst(ValueId),

    #[error("{inst} is a `{found}`, not a `{expected}`")]
    KindMismatch {
        inst: ValueId,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("argument slot {index} is out of range for {inst} with {len} slot(s)")]
    SlotOutOfRange {
        inst: ValueId,
        index: usize,
        len: usize,
    },

    #[error("argument slot {index} of {inst} was never set")]
    UnsetSlot { inst: ValueId, index: usize },

    #[error("{user} is not recorded as a user of {value}")]
    UseNotFound { value: ValueId, user: ValueId },

    #[error("{user} does not reference {value}")]
    OperandNotFound { user: ValueId, value: ValueId },
}
