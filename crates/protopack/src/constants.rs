//! Top-level constants for protopack.

/// Encoding format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingFormat {
    Binary = 0,
    Json = 1,
}

/// Smallest valid field number.
pub const MIN_FIELD_NUMBER: u32 = 1;

/// Largest valid field number (2^29 - 1); the tag keeps three bits for the
/// wire type.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Field numbers reserved for the protobuf implementation itself.
pub const RESERVED_FIELD_NUMBERS: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// Field number of the key inside a map entry.
pub const MAP_KEY_FIELD: u32 = 1;

/// Field number of the value inside a map entry.
pub const MAP_VALUE_FIELD: u32 = 2;

/// Deepest message nesting the decoder accepts. Map entries count as a
/// level of their own.
pub const MAX_RECURSION_DEPTH: usize = 100;
