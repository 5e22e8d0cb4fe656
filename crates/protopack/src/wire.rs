//! Wire types and field tags.
//!
//! A tag is the varint `(field_number << 3) | wire_type`.

use std::fmt;

/// How a field's payload is framed on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Base-128 varint.
    Varint = 0,
    /// Eight little-endian bytes.
    I64 = 1,
    /// Varint length followed by that many bytes.
    Len = 2,
    /// Group start (deprecated).
    SGroup = 3,
    /// Group end (deprecated).
    EGroup = 4,
    /// Four little-endian bytes.
    I32 = 5,
}

impl WireType {
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Varint),
            1 => Some(Self::I64),
            2 => Some(Self::Len),
            3 => Some(Self::SGroup),
            4 => Some(Self::EGroup),
            5 => Some(Self::I32),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Varint => "VARINT",
            Self::I64 => "I64",
            Self::Len => "LEN",
            Self::SGroup => "SGROUP",
            Self::EGroup => "EGROUP",
            Self::I32 => "I32",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), *self as u8)
    }
}

/// Builds the tag for `number` and `wire_type`.
#[inline]
pub fn make_tag(number: u32, wire_type: WireType) -> u64 {
    ((number as u64) << 3) | wire_type as u64
}

/// Splits a raw tag into field number and wire-type bits.
///
/// The field number is returned as `u64` so callers can reject values that
/// overflow the 29-bit range.
#[inline]
pub fn split_tag(tag: u64) -> (u64, u8) {
    (tag >> 3, (tag & 0x07) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_tag() {
        assert_eq!(make_tag(1, WireType::Varint), 0x08);
        assert_eq!(make_tag(2, WireType::Varint), 0x10);
        assert_eq!(make_tag(3, WireType::Len), 0x1a);
        assert_eq!(make_tag(10, WireType::Len), 0x52);
    }

    #[test]
    fn test_split_tag_roundtrip() {
        for wt in [
            WireType::Varint,
            WireType::I64,
            WireType::Len,
            WireType::I32,
        ] {
            let (number, bits) = split_tag(make_tag(536_870_911, wt));
            assert_eq!(number, 536_870_911);
            assert_eq!(WireType::from_u8(bits), Some(wt));
        }
        assert_eq!(WireType::from_u8(6), None);
        assert_eq!(WireType::from_u8(7), None);
    }
}
