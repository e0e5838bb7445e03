//! Error types for record decoding.

use thiserror::Error;

/// Result type for record operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors that can occur while decoding entity records.
#[derive(Debug, Error)]
pub enum EntityError {
    /// Input ended in the middle of a field.
    #[error("unexpected end of input at offset {0}")]
    Truncated(usize),

    /// Varint longer than ten bytes or overflowing 64 bits.
    #[error("malformed varint at offset {0}")]
    VarintOverflow(usize),

    /// Tag with field number zero or above the protobuf maximum.
    #[error("invalid field number at offset {0}")]
    InvalidFieldNumber(usize),

    /// Wire type 6 or 7.
    #[error("invalid wire type {wire_type} for field {field}")]
    InvalidWireType { field: u32, wire_type: u8 },

    /// End-group tag that does not close the open group.
    #[error("unmatched end-group tag for field {0}")]
    UnmatchedGroup(u32),

    /// Key or name string that is not UTF-8.
    #[error("invalid UTF-8 in field {0}")]
    InvalidUtf8(u32),

    /// Groups or embedded entities nested past the limit.
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),

    /// `ENTITY_PROTO` property whose value has no string payload.
    #[error("embedded entity property {0:?} has no payload")]
    MissingEmbeddedPayload(String),

    /// Top-level record without a key.
    #[error("entity record has no key")]
    MissingKey,

    /// Type-level error (mapping form, keys).
    #[error(transparent)]
    Types(#[from] dsexport_types::Error),
}
