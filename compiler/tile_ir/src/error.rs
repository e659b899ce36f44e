//! Structural errors reported by the builder and the verifier.

use crate::ids::{BlockId, ValueId};
use crate::op::OpCode;

/// A malformed function.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    #[error("function has no entry block")]
    MissingEntry,

    #[error("block {0} has no terminator")]
    UnterminatedBlock(BlockId),

    #[error("block {0} is referenced but not defined")]
    UnknownBlock(BlockId),

    #[error("value {0} is referenced but not defined")]
    UnknownValue(ValueId),

    #[error("value {0} is defined more than once")]
    DuplicateDefinition(ValueId),

    #[error("{op} does not accept {found} operands")]
    OperandCount { op: OpCode, found: usize },

    #[error("{op} expects {expected} results, found {found}")]
    ResultCount {
        op: OpCode,
        expected: usize,
        found: usize,
    },

    #[error("edge to {target} passes {found} arguments, block takes {expected}")]
    ArgumentCount {
        target: BlockId,
        expected: usize,
        found: usize,
    },

    #[error("entry block parameters do not match the function parameters")]
    ParamMismatch,

    #[error("divisibility hint {hint} on {value} is not positive")]
    InvalidHint { value: ValueId, hint: i64 },

    #[error("make_range({start}, {end}) does not match the type of {value}")]
    InvalidRange { value: ValueId, start: i64, end: i64 },

    #[error("value {0} has an invalid tensor type (non-positive extent or bad layout)")]
    InvalidType(ValueId),
}
