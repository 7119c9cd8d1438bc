//! Error types for the ledgerwire core.

use thiserror::Error;

/// Errors surfaced by dictionary lookups, format checks, and the codec.
///
/// Per-call encode/decode failures are always reported to the caller;
/// nothing is silently coerced or skipped. Construction-time table
/// inconsistencies are not represented here: those panic while the
/// process-wide tables are built, since the process must not start with
/// an internally inconsistent dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown field code: type {type_id}, code {code}")]
    UnknownFieldCode { type_id: u16, code: u16 },

    #[error("unknown kind: {0}")]
    UnknownKind(String),

    #[error("field {field} is not allowed in {kind}")]
    FieldNotAllowed {
        kind: &'static str,
        field: &'static str,
    },

    #[error("missing required field {field} for {kind}")]
    MissingRequiredField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("type mismatch for field {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("malformed input: {0}")]
    MalformedInput(String),
}
