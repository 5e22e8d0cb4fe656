//! Error types for the protocol-buffer codec.

use thiserror::Error;

use crate::constants::MAX_RECURSION_DEPTH;
use crate::wire::WireType;

/// Input bytes that cannot be decoded.
///
/// Offsets are absolute positions in the buffer handed to the decoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },
    #[error("varint longer than 10 bytes at offset {offset}")]
    VarintOverflow { offset: usize },
    #[error(
        "length-delimited region at offset {offset} declares {length} byte(s), {remaining} remaining"
    )]
    LengthOverrun {
        offset: usize,
        length: u64,
        remaining: usize,
    },
    #[error("unknown wire type {wire_type} at offset {offset}")]
    InvalidWireType { offset: usize, wire_type: u8 },
    #[error("field {field} uses the unsupported group encoding")]
    DeprecatedGroup { field: u32 },
    #[error("invalid field number in tag at offset {offset}")]
    InvalidFieldNumber { offset: usize },
    #[error("field `{field}` expects wire type {expected}, got {actual}")]
    WireTypeMismatch {
        field: String,
        expected: WireType,
        actual: WireType,
    },
    #[error("field `{field}` holds invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { field: String, offset: usize },
    #[error("message nested deeper than {} levels at offset {offset}", MAX_RECURSION_DEPTH)]
    RecursionLimit { offset: usize },
}

impl MalformedInput {
    pub(crate) fn from_buffer(err: protopack_buffers::BufferError, field: &str) -> Self {
        use protopack_buffers::BufferError;
        match err {
            BufferError::EndOfBuffer { offset, .. } => MalformedInput::UnexpectedEof { offset },
            BufferError::VarintOverflow { offset } => MalformedInput::VarintOverflow { offset },
            BufferError::InvalidUtf8 { offset } => MalformedInput::InvalidUtf8 {
                field: field.to_owned(),
                offset,
            },
        }
    }
}

/// Schema definition errors, raised when a schema is built or loaded.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("message `{message}` declares field number {number} more than once")]
    FieldNumberCollision { message: String, number: u32 },
    #[error("message `{message}` declares field name `{name}` more than once")]
    FieldNameCollision { message: String, name: String },
    #[error("message `{message}` uses invalid field number {number}")]
    InvalidFieldNumber { message: String, number: u32 },
    #[error("message type `{0}` is registered more than once")]
    DuplicateMessageType(String),
    #[error("unknown message type `{0}`")]
    UnknownMessageType(String),
    #[error("unknown field type `{0}`")]
    UnknownKind(String),
    #[error("field `{field}`: `{kind}` cannot be used as a map key")]
    InvalidMapKey { field: String, kind: String },
    #[error("field `{field}`: map values cannot be maps")]
    NestedMap { field: String },
    #[error("field `{field}`: {reason}")]
    IncompleteField { field: String, reason: &'static str },
    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level codec error.
#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("value {value} for field `{field}` does not fit {kind}")]
    IntegerOutOfRange {
        field: String,
        value: i128,
        kind: &'static str,
    },
    #[error("message `{message}` has no field `{field}`")]
    UnknownField { message: String, field: String },
    #[error("field `{field}` expects a {expected} value")]
    KindMismatch { field: String, expected: String },
    #[error("expected a `{expected}` message, got `{actual}`")]
    MessageTypeMismatch { expected: String, actual: String },
    #[error("field `{field}`: {reason}")]
    InvalidJson { field: String, reason: String },
}
