//! Binary buffer utilities for protopack.
//!
//! This crate provides the byte-level plumbing the protocol-buffer codec is
//! built on: a bounds-checked cursor reader, an auto-growing writer, and the
//! base-128 varint and zig-zag transforms.
//!
//! # Overview
//!
//! - [`Reader`] - Reads binary data from a byte slice with cursor tracking
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//! - [`varint`] - Varint sizing and zig-zag helpers
//!
//! # Example
//!
//! ```
//! use protopack_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x08);
//! writer.varint(300);
//! writer.utf8("hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x08);
//! assert_eq!(reader.varint().unwrap(), 300);
//! assert_eq!(reader.utf8(5).unwrap(), "hello");
//! ```

mod print_octets;
mod reader;
pub mod varint;
mod writer;

pub use print_octets::{print_byte_literal, print_octets, print_octets_default};
pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("end of buffer at offset {offset}: needed {needed} byte(s), {remaining} remaining")]
    EndOfBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// Invalid UTF-8 sequence.
    #[error("invalid UTF-8 sequence at offset {offset}")]
    InvalidUtf8 { offset: usize },
    /// A varint ran past ten bytes or past 64 bits of payload.
    #[error("varint overflow at offset {offset}")]
    VarintOverflow { offset: usize },
}

impl BufferError {
    /// Offset at which the failing read started.
    pub fn offset(&self) -> usize {
        match self {
            BufferError::EndOfBuffer { offset, .. }
            | BufferError::InvalidUtf8 { offset }
            | BufferError::VarintOverflow { offset } => *offset,
        }
    }
}
