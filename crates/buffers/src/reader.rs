//! Binary buffer reader with cursor tracking.

use std::str;

use crate::varint::MAX_VARINT_LEN;
use crate::BufferError;

/// A binary buffer reader that reads data from a byte slice.
///
/// The reader maintains a cursor position and provides bounds-checked methods
/// for reading bytes, little-endian fixed-width integers, varints and
/// strings. Every read either advances the cursor past the consumed bytes or
/// leaves it untouched and returns an error.
///
/// # Example
///
/// ```
/// use protopack_buffers::Reader;
///
/// let data = [0x96, 0x01, 0x2a];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.varint().unwrap(), 150);
/// assert_eq!(reader.u8().unwrap(), 0x2a);
/// assert!(reader.u8().is_err());
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Creates a reader from a slice with custom start and end positions.
    pub fn from_slice(uint8: &'a [u8], x: usize, end: usize) -> Self {
        Self { uint8, x, end }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    /// Whether every byte up to `end` has been consumed.
    pub fn is_empty(&self) -> bool {
        self.x >= self.end
    }

    fn assert_size(&self, needed: usize) -> Result<(), BufferError> {
        if needed > self.size() {
            return Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed,
                remaining: self.size(),
            });
        }
        Ok(())
    }

    /// Advances the cursor by the given number of bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.assert_size(length)?;
        self.x += length;
        Ok(())
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.assert_size(size)?;
        let x = self.x;
        let end = x + size;
        self.x = end;
        Ok(&self.uint8[x..end])
    }

    /// Creates a new Reader over the next `size` bytes and advances the cursor
    /// past them. The returned reader keeps absolute offsets, so errors raised
    /// inside it point into the original buffer.
    pub fn cut(&mut self, size: usize) -> Result<Reader<'a>, BufferError> {
        self.assert_size(size)?;
        let slice = Reader::from_slice(self.uint8, self.x, self.x + size);
        self.x += size;
        Ok(slice)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.assert_size(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32_le(&mut self) -> Result<u32, BufferError> {
        let bytes = self.buf(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64_le(&mut self) -> Result<u64, BufferError> {
        let bytes = self.buf(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    /// Reads a 32-bit floating point number (little-endian).
    #[inline]
    pub fn f32_le(&mut self) -> Result<f32, BufferError> {
        Ok(f32::from_bits(self.u32_le()?))
    }

    /// Reads a 64-bit floating point number (little-endian).
    #[inline]
    pub fn f64_le(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_bits(self.u64_le()?))
    }

    /// Reads a base-128 varint.
    ///
    /// Rejects encodings longer than ten bytes and tenth bytes carrying more
    /// than the single remaining bit of a `u64`. On error the cursor is left
    /// at the start of the varint.
    pub fn varint(&mut self) -> Result<u64, BufferError> {
        let start = self.x;
        let mut result: u64 = 0;
        for i in 0..MAX_VARINT_LEN {
            let pos = start + i;
            if pos >= self.end {
                return Err(BufferError::EndOfBuffer {
                    offset: start,
                    needed: i + 1,
                    remaining: self.end - start,
                });
            }
            let byte = self.uint8[pos];
            if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
                return Err(BufferError::VarintOverflow { offset: start });
            }
            result |= ((byte & 0x7f) as u64) << (7 * i);
            if byte & 0x80 == 0 {
                self.x = pos + 1;
                return Ok(result);
            }
        }
        Err(BufferError::VarintOverflow { offset: start })
    }

    /// Reads a UTF-8 string of the given size.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        let start = self.x;
        let bytes = self.buf(size)?;
        str::from_utf8(bytes).map_err(|_| {
            self.x = start;
            BufferError::InvalidUtf8 { offset: start }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8().unwrap(), 0x01);
        assert_eq!(reader.u8().unwrap(), 0x02);
        assert_eq!(reader.u8().unwrap(), 0x03);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_u32_le() {
        let data = [0x04, 0x03, 0x02, 0x01];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u32_le().unwrap(), 0x01020304);
    }

    #[test]
    fn test_skip() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = Reader::new(&data);
        reader.skip(2).unwrap();
        assert_eq!(reader.u8().unwrap(), 0x03);
        assert!(reader.skip(2).is_err());
    }

    #[test]
    fn test_cut_keeps_absolute_offsets() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut reader = Reader::new(&data);
        reader.u8().unwrap();
        let mut inner = reader.cut(2).unwrap();
        assert_eq!(inner.x, 1);
        assert_eq!(inner.u8().unwrap(), 0x02);
        assert_eq!(inner.u8().unwrap(), 0x03);
        assert!(inner.u8().is_err());
        assert_eq!(reader.u8().unwrap(), 0x04);
    }

    #[test]
    fn test_varint() {
        let data = [0x00, 0x7f, 0x80, 0x01, 0xac, 0x02];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.varint().unwrap(), 0);
        assert_eq!(reader.varint().unwrap(), 127);
        assert_eq!(reader.varint().unwrap(), 128);
        assert_eq!(reader.varint().unwrap(), 300);
    }

    #[test]
    fn test_varint_max() {
        let data = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.varint().unwrap(), u64::MAX);
    }

    #[test]
    fn test_varint_truncated() {
        let data = [0x01, 0xff, 0xff];
        let mut reader = Reader::new(&data);
        reader.u8().unwrap();
        assert_eq!(
            reader.varint(),
            Err(BufferError::EndOfBuffer {
                offset: 1,
                needed: 3,
                remaining: 2
            })
        );
        assert_eq!(reader.x, 1);
    }

    #[test]
    fn test_varint_overflow() {
        let data = [0xff; 11];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.varint(),
            Err(BufferError::VarintOverflow { offset: 0 })
        );

        let data = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
        let mut reader = Reader::new(&data);
        assert!(matches!(
            reader.varint(),
            Err(BufferError::VarintOverflow { .. })
        ));
    }

    #[test]
    fn test_utf8() {
        let data = b"hello world";
        let mut reader = Reader::new(data);
        assert_eq!(reader.utf8(5).unwrap(), "hello");
        assert_eq!(reader.utf8(6).unwrap(), " world");
    }

    #[test]
    fn test_utf8_invalid() {
        let data = [0xff, 0xfe];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.utf8(2),
            Err(BufferError::InvalidUtf8 { offset: 0 })
        );
        assert_eq!(reader.x, 0);
    }
}
