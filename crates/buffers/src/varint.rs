//! Base-128 varint sizing and zig-zag transforms.
//!
//! Each varint byte carries seven payload bits, least significant group
//! first; the high bit is set on every byte except the last. A `u64` needs at
//! most [`MAX_VARINT_LEN`] bytes.

/// Longest possible encoding of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `value` occupies as a varint.
#[inline]
pub fn varint_len(value: u64) -> usize {
    // ceil(bit_length / 7), with 0 taking one byte.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Zig-zag maps signed integers onto unsigned ones so small magnitudes stay
/// short: 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...
#[inline]
pub fn zigzag_encode32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

#[inline]
pub fn zigzag_decode32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

#[inline]
pub fn zigzag_encode64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
pub fn zigzag_decode64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}
