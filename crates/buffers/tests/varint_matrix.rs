//! Writer/Reader varint and fixed-width roundtrip matrix for the buffers crate.

use proptest::prelude::*;
use protopack_buffers::varint::{
    varint_len, zigzag_decode32, zigzag_decode64, zigzag_encode32, zigzag_encode64,
};
use protopack_buffers::{BufferError, Reader, Writer};

// ---------------------------------------------------------------------------
// Fixed vectors
// ---------------------------------------------------------------------------

#[test]
fn varint_known_encodings() {
    let cases: &[(u64, &[u8])] = &[
        (0, &[0x00]),
        (1, &[0x01]),
        (127, &[0x7f]),
        (128, &[0x80, 0x01]),
        (150, &[0x96, 0x01]),
        (16_384, &[0x80, 0x80, 0x01]),
        (
            // int32 -2147483648 sign-extended to 64 bits.
            (i32::MIN as i64) as u64,
            &[0x80, 0x80, 0x80, 0x80, 0xf8, 0xff, 0xff, 0xff, 0xff, 0x01],
        ),
    ];
    let mut w = Writer::new();
    for (value, bytes) in cases {
        w.varint(*value);
        let data = w.flush();
        assert_eq!(&data, bytes, "encode {value}");
        assert_eq!(varint_len(*value), bytes.len(), "len {value}");
        let mut r = Reader::new(&data);
        assert_eq!(r.varint().unwrap(), *value, "decode {value}");
        assert!(r.is_empty());
    }
}

#[test]
fn mixed_sequence_roundtrip() {
    let mut w = Writer::new();
    w.varint(8);
    w.u32_le(0xdead_beef);
    w.f64_le(-0.5);
    w.varint(3);
    w.utf8("abc");
    w.f32_le(1.25);
    let data = w.flush();

    let mut r = Reader::new(&data);
    assert_eq!(r.varint().unwrap(), 8);
    assert_eq!(r.u32_le().unwrap(), 0xdead_beef);
    assert_eq!(r.f64_le().unwrap(), -0.5);
    let len = r.varint().unwrap() as usize;
    assert_eq!(r.utf8(len).unwrap(), "abc");
    assert_eq!(r.f32_le().unwrap(), 1.25);
    assert!(r.is_empty());
}

#[test]
fn reads_past_end_report_offsets() {
    let data = [0x01, 0x02, 0x03];
    let mut r = Reader::new(&data);
    r.u8().unwrap();
    let err = r.u64_le().unwrap_err();
    assert_eq!(
        err,
        BufferError::EndOfBuffer {
            offset: 1,
            needed: 8,
            remaining: 2
        }
    );
    assert_eq!(err.offset(), 1);
    // A failed read leaves the cursor in place.
    assert_eq!(r.buf(2).unwrap(), &[0x02, 0x03]);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn varint_roundtrip(value: u64) {
        let mut w = Writer::new();
        w.varint(value);
        let data = w.flush();
        prop_assert_eq!(data.len(), varint_len(value));
        let mut r = Reader::new(&data);
        prop_assert_eq!(r.varint().unwrap(), value);
        prop_assert!(r.is_empty());
    }

    #[test]
    fn truncated_varint_never_decodes(value in 128u64.., cut in 1usize..10) {
        let mut w = Writer::new();
        w.varint(value);
        let data = w.flush();
        let cut = cut.min(data.len() - 1);
        let mut r = Reader::new(&data[..cut]);
        let is_eof = matches!(r.varint(), Err(BufferError::EndOfBuffer { .. }));
        prop_assert!(is_eof);
    }

    #[test]
    fn zigzag32_roundtrip(n: i32) {
        prop_assert_eq!(zigzag_decode32(zigzag_encode32(n)), n);
    }

    #[test]
    fn zigzag64_roundtrip(n: i64) {
        prop_assert_eq!(zigzag_decode64(zigzag_encode64(n)), n);
    }
}
