//! Errors raised by instruction construction and instruction queries.

use crate::Opcode;

/// Result alias for instruction-level operations.
pub type IrResult<T> = Result<T, IrError>;

/// Instruction-level error.
///
/// Carries resolved strings, never raw `Name`s, so it displays without an
/// interner at hand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// A visitor was handed a variant it does not handle.
    #[error("visitor does not handle `{opcode}` instructions")]
    UnsupportedVariant { opcode: Opcode },

    /// The dialect's factory has no such instruction shape.
    #[error("dialect `{dialect}` does not support `{operation}`")]
    UnsupportedOperation {
        dialect: String,
        operation: &'static str,
    },

    /// An overflow-checked conversion was requested from a dialect
    /// without checked conversions.
    #[error("dialect `{dialect}` cannot build an overflow-checked conversion from `{from}` to `{to}`")]
    UnsupportedConversion {
        dialect: String,
        from: String,
        to: String,
    },

    /// The query has no meaning for this instruction or code body.
    #[error("`{query}` is not applicable here")]
    NotApplicable { query: &'static str },

    /// Operands do not form a valid shape for the operation.
    #[error("malformed `{operation}`: {reason}")]
    MalformedShape {
        operation: &'static str,
        reason: &'static str,
    },
}
