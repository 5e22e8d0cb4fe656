use protopack::{
    samples, FieldKind, MalformedInput, MapKeyKind, MessageSchema, MessageValue, ProtoCodec,
    ProtoError, SchemaRegistry, Value, WireType, MAX_RECURSION_DEPTH,
};
use protopack_buffers::varint::varint_len;
use protopack_buffers::Writer;

fn scalars_codec() -> ProtoCodec {
    let scalars = MessageSchema::builder("Scalars")
        .field(1, "i32", FieldKind::Int32)
        .field(2, "i64", FieldKind::Int64)
        .field(3, "u32", FieldKind::UInt32)
        .field(4, "u64", FieldKind::UInt64)
        .field(5, "s32", FieldKind::SInt32)
        .field(6, "s64", FieldKind::SInt64)
        .field(7, "flag", FieldKind::Bool)
        .field(8, "f32", FieldKind::Float)
        .field(9, "f64", FieldKind::Double)
        .field(10, "text", FieldKind::String)
        .field(11, "blob", FieldKind::Bytes)
        .field(12, "child", FieldKind::Message("Scalars".into()))
        .field(
            13,
            "ids",
            FieldKind::Map {
                key: MapKeyKind::SInt64,
                value: Box::new(FieldKind::Bool),
            },
        )
        .build()
        .unwrap();
    ProtoCodec::new(SchemaRegistry::new().with(scalars).unwrap()).unwrap()
}

fn single(codec: &ProtoCodec, field: &str, value: impl Into<Value>) -> MessageValue {
    codec
        .builder("Scalars")
        .unwrap()
        .set(field, value)
        .unwrap()
        .build()
}

#[test]
fn scalar_encoding_matrix() {
    let codec = scalars_codec();
    let cases: Vec<(&str, Value, Vec<u8>)> = vec![
        ("i32", Value::I32(150), vec![0x08, 0x96, 0x01]),
        ("i32", Value::I32(i32::MAX), vec![0x08, 0xff, 0xff, 0xff, 0xff, 0x07]),
        (
            "i64",
            Value::I64(i64::MIN),
            vec![0x10, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01],
        ),
        ("u32", Value::U32(300), vec![0x18, 0xac, 0x02]),
        ("u32", Value::U32(u32::MAX), vec![0x18, 0xff, 0xff, 0xff, 0xff, 0x0f]),
        (
            "u64",
            Value::U64(u64::MAX),
            vec![0x20, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
        ),
        ("s32", Value::I32(-1), vec![0x28, 0x01]),
        ("s32", Value::I32(1), vec![0x28, 0x02]),
        ("s32", Value::I32(i32::MIN), vec![0x28, 0xff, 0xff, 0xff, 0xff, 0x0f]),
        (
            "s64",
            Value::I64(i64::MIN),
            vec![0x30, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
        ),
        ("flag", Value::Bool(true), vec![0x38, 0x01]),
        ("f32", Value::F32(1.0), vec![0x45, 0x00, 0x00, 0x80, 0x3f]),
        (
            "f64",
            Value::F64(1.0),
            vec![0x49, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f],
        ),
        ("text", Value::from("hi"), vec![0x52, 0x02, b'h', b'i']),
        ("blob", Value::Bytes(vec![0x00, 0xff]), vec![0x5a, 0x02, 0x00, 0xff]),
    ];
    for (field, value, bytes) in cases {
        let message = single(&codec, field, value);
        assert_eq!(codec.encode(&message).unwrap(), bytes, "encode {field}");
        assert_eq!(codec.decode("Scalars", &bytes).unwrap(), message, "decode {field}");
    }
}

#[test]
fn text_rendering_matrix() {
    let codec = scalars_codec();
    let cases: Vec<(&str, Value, &str)> = vec![
        ("u64", Value::U64(u64::MAX), "u64: 18446744073709551615\n"),
        ("s32", Value::I32(-7), "s32: -7\n"),
        ("flag", Value::Bool(true), "flag: true\n"),
        ("f32", Value::F32(0.5), "f32: 0.5\n"),
        ("f64", Value::F64(1.0), "f64: 1.0\n"),
        ("f64", Value::F64(f64::NEG_INFINITY), "f64: -inf\n"),
        ("text", Value::from("a\"b\n"), "text: \"a\\\"b\\n\"\n"),
        ("blob", Value::Bytes(vec![0x00, b'x', 0xff]), "blob: \"\\000x\\377\"\n"),
    ];
    for (field, value, text) in cases {
        let message = single(&codec, field, value);
        assert_eq!(codec.to_text(&message).unwrap(), text, "text {field}");
    }
}

#[test]
fn nested_and_map_rendering() {
    let codec = scalars_codec();
    let child = single(&codec, "i32", 5);
    let message = codec
        .builder("Scalars")
        .unwrap()
        .set_message("child", child)
        .unwrap()
        .insert("ids", -3i64, true)
        .unwrap()
        .insert("ids", 0i64, true)
        .unwrap()
        .build();
    assert_eq!(
        codec.to_text(&message).unwrap(),
        "child {\n  i32: 5\n}\nids {\n  key: -3\n  value: true\n}\nids {\n  value: true\n}\n"
    );
    let bytes = codec.encode(&message).unwrap();
    assert_eq!(codec.decode("Scalars", &bytes).unwrap(), message);
}

#[test]
fn empty_child_is_present() {
    let codec = scalars_codec();
    let message = single(&codec, "child", MessageValue::new("Scalars"));
    let bytes = codec.encode(&message).unwrap();
    assert_eq!(bytes, [0x62, 0x00]);
    assert_eq!(codec.to_text(&message).unwrap(), "child {\n}\n");
    assert_eq!(codec.decode("Scalars", &bytes).unwrap(), message);
}

#[test]
fn repeated_child_messages_merge() {
    let codec = scalars_codec();
    // child { i32: 1 } child { u32: 2 }
    let bytes = [0x62, 0x02, 0x08, 0x01, 0x62, 0x02, 0x18, 0x02];
    let message = codec.decode("Scalars", &bytes).unwrap();
    let child = message.get(12).and_then(Value::as_message).unwrap();
    assert_eq!(child.get(1), Some(&Value::I32(1)));
    assert_eq!(child.get(3), Some(&Value::U32(2)));
}

#[test]
fn malformed_input_matrix() {
    let codec = scalars_codec();
    let cases: Vec<(&str, Vec<u8>, MalformedInput)> = vec![
        ("truncated tag", vec![0x80], MalformedInput::UnexpectedEof { offset: 0 }),
        ("truncated varint", vec![0x08, 0x96], MalformedInput::UnexpectedEof { offset: 1 }),
        (
            "overlong varint",
            vec![0x08, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01],
            MalformedInput::VarintOverflow { offset: 1 },
        ),
        (
            "length overrun",
            vec![0x52, 0x05, b'a'],
            MalformedInput::LengthOverrun {
                offset: 1,
                length: 5,
                remaining: 1,
            },
        ),
        (
            "truncated fixed32",
            vec![0x45, 0x00, 0x00],
            MalformedInput::UnexpectedEof { offset: 1 },
        ),
        (
            "wire type 6",
            vec![0x0e],
            MalformedInput::InvalidWireType {
                offset: 0,
                wire_type: 6,
            },
        ),
        (
            "wire type 7",
            vec![0x0f],
            MalformedInput::InvalidWireType {
                offset: 0,
                wire_type: 7,
            },
        ),
        ("group start", vec![0x0b], MalformedInput::DeprecatedGroup { field: 1 }),
        ("group end", vec![0x0c], MalformedInput::DeprecatedGroup { field: 1 }),
        ("field zero", vec![0x02, 0x00], MalformedInput::InvalidFieldNumber { offset: 0 }),
        (
            "varint for string",
            vec![0x50, 0x01],
            MalformedInput::WireTypeMismatch {
                field: "text".into(),
                expected: WireType::Len,
                actual: WireType::Varint,
            },
        ),
        (
            "len for int32",
            vec![0x0a, 0x00],
            MalformedInput::WireTypeMismatch {
                field: "i32".into(),
                expected: WireType::Varint,
                actual: WireType::Len,
            },
        ),
        (
            "invalid utf-8",
            vec![0x52, 0x02, 0xc3, 0x28],
            MalformedInput::InvalidUtf8 {
                field: "text".into(),
                offset: 2,
            },
        ),
        (
            "nested truncation",
            vec![0x62, 0x02, 0x08, 0x96],
            MalformedInput::UnexpectedEof { offset: 3 },
        ),
    ];
    for (name, bytes, expected) in cases {
        match codec.decode("Scalars", &bytes) {
            Err(ProtoError::MalformedInput(actual)) => assert_eq!(actual, expected, "{name}"),
            other => panic!("{name}: expected malformed input, got {other:?}"),
        }
    }
}

#[test]
fn unknown_fields_are_skipped() {
    let codec = scalars_codec();
    // field 100 LEN "zz", field 101 fixed64, then i32: 1
    let bytes = [
        0xa2, 0x06, 0x02, b'z', b'z', 0xa9, 0x06, 1, 2, 3, 4, 5, 6, 7, 8, 0x08, 0x01,
    ];
    let message = codec.decode("Scalars", &bytes).unwrap();
    assert_eq!(message, single(&codec, "i32", 1));
}

#[test]
fn out_of_range_32_bit_varints() {
    let codec = scalars_codec();
    let cases: Vec<(Vec<u8>, i128)> = vec![
        // int32 that is not a sign extension
        (vec![0x08, 0x80, 0x80, 0x80, 0x80, 0x08], 2_147_483_648),
        // uint32 above u32::MAX
        (vec![0x18, 0x80, 0x80, 0x80, 0x80, 0x10], 4_294_967_296),
        // sint32 above u32::MAX before zig-zag
        (vec![0x28, 0x80, 0x80, 0x80, 0x80, 0x10], 4_294_967_296),
    ];
    for (bytes, value) in cases {
        match codec.decode("Scalars", &bytes) {
            Err(ProtoError::IntegerOutOfRange { value: v, .. }) => assert_eq!(v, value),
            other => panic!("expected out of range, got {other:?}"),
        }
    }
}

/// `levels` nested length-delimited fields, tags cycling through `tags` from
/// the outside in; the innermost payload is empty.
fn nested(tags: &[u8], levels: usize) -> Vec<u8> {
    // Payload sizes, innermost first.
    let mut lens = vec![0usize];
    for _ in 1..levels {
        let inner = lens[lens.len() - 1];
        lens.push(1 + varint_len(inner as u64) + inner);
    }
    let mut writer = Writer::new();
    for (level, len) in lens.iter().rev().enumerate() {
        writer.u8(tags[level % tags.len()]);
        writer.varint(*len as u64);
    }
    writer.flush()
}

#[test]
fn nesting_depth_limit() {
    let codec = scalars_codec();

    let deepest = nested(&[0x62], MAX_RECURSION_DEPTH);
    let message = codec.decode("Scalars", &deepest).unwrap();
    assert_eq!(codec.encode(&message).unwrap(), deepest);

    let too_deep = nested(&[0x62], MAX_RECURSION_DEPTH + 1);
    match codec.decode("Scalars", &too_deep) {
        Err(ProtoError::MalformedInput(MalformedInput::RecursionLimit { offset })) => {
            assert_eq!(offset, too_deep.len())
        }
        other => panic!("expected recursion limit, got {other:?}"),
    }
}

#[test]
fn hostile_nesting_fails_without_overflowing() {
    // child { child { ... } } far past the limit
    let codec = scalars_codec();
    let bytes = nested(&[0x62], 100_000);
    assert!(matches!(
        codec.decode("Scalars", &bytes),
        Err(ProtoError::MalformedInput(MalformedInput::RecursionLimit { .. }))
    ));

    // AttrValue.func -> NameAttrList.attr entry -> AttrValue, repeated
    let codec = ProtoCodec::new(samples::registry().unwrap()).unwrap();
    let bytes = nested(&[0x52, 0x12, 0x12], 100_000);
    assert!(matches!(
        codec.decode("AttrValue", &bytes),
        Err(ProtoError::MalformedInput(MalformedInput::RecursionLimit { .. }))
    ));
}
