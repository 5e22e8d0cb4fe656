//! Auto-growing binary buffer writer.

use crate::varint::MAX_VARINT_LEN;

/// A binary writer that appends to an internally managed, growing buffer.
///
/// Bytes written since the last [`flush`](Writer::flush) form the current
/// chunk; `flush` hands that chunk out and starts a new one while keeping the
/// allocation, so a single writer can be reused across many encode calls.
///
/// # Example
///
/// ```
/// use protopack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.varint(150);
/// assert_eq!(writer.flush(), vec![0x96, 0x01]);
///
/// writer.u8(0x2a);
/// assert_eq!(writer.flush(), vec![0x2a]);
/// ```
pub struct Writer {
    /// The underlying buffer.
    pub uint8: Vec<u8>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size.
    pub fn new() -> Self {
        Self::with_alloc_size(64 * 1024)
    }

    /// Creates a new writer that pre-allocates `alloc_size` bytes.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(alloc_size),
        }
    }

    /// Number of bytes in the current chunk.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes sure at least `capacity` more bytes fit without reallocating.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        self.uint8.reserve(capacity);
    }

    /// Discards everything written so far, keeping the allocation.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Hands over the current chunk and starts a new, empty one. The
    /// allocation moves out with the chunk.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    /// Returns the current chunk without flushing it.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    /// Writes an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32_le(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64_le(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a 32-bit float (little-endian).
    #[inline]
    pub fn f32_le(&mut self, val: f32) {
        self.u32_le(val.to_bits());
    }

    /// Writes a 64-bit float (little-endian).
    #[inline]
    pub fn f64_le(&mut self, val: f64) {
        self.u64_le(val.to_bits());
    }

    /// Writes a base-128 varint, least significant group first.
    #[inline]
    pub fn varint(&mut self, mut val: u64) {
        let mut scratch = [0u8; MAX_VARINT_LEN];
        let mut n = 0;
        while val >= 0x80 {
            scratch[n] = (val as u8 & 0x7f) | 0x80;
            val >>= 7;
            n += 1;
        }
        scratch[n] = val as u8;
        self.uint8.extend_from_slice(&scratch[..=n]);
    }

    /// Writes raw bytes.
    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }

    /// Writes the UTF-8 bytes of `s`, without a length prefix.
    pub fn utf8(&mut self, s: &str) {
        self.uint8.extend_from_slice(s.as_bytes());
    }
}
