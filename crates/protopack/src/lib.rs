//! Schema-driven protocol-buffer (proto3) binary codec.
//!
//! Messages are plain values checked against an explicit [`SchemaRegistry`]:
//!
//! - [`MessageBuilder`] - typed, range-checked construction
//! - [`ProtoCodec`] - binary encode/decode, text rendering, JSON view
//! - [`codecs`] - the binary and JSON codecs behind one [`codecs::MessageCodec`] trait
//!
//! Schemas come from [`MessageSchema::builder`] or a JSON descriptor
//! document ([`SchemaRegistry::from_json_str`]); [`samples`] holds the
//! built-in `Foo`, `AttrValue` and `NameAttrList` types.

mod builder;
mod codec;
mod constants;
mod decoder;
mod encoder;
mod error;
mod value;
mod wire;

pub mod codecs;
pub mod json;
pub mod samples;
pub mod schema;
pub mod text;

pub use builder::{coerce, coerce_key, MessageBuilder};
pub use codec::ProtoCodec;
pub use constants::{
    EncodingFormat, MAP_KEY_FIELD, MAP_VALUE_FIELD, MAX_FIELD_NUMBER, MAX_RECURSION_DEPTH,
    MIN_FIELD_NUMBER, RESERVED_FIELD_NUMBERS,
};
pub use decoder::ProtoDecoder;
pub use encoder::{message_len, ProtoEncoder};
pub use error::{MalformedInput, ProtoError, SchemaError};
pub use schema::{FieldDescriptor, FieldKind, MapKeyKind, MessageSchema, SchemaRegistry};
pub use value::{MapKey, MessageValue, Value};
pub use wire::{make_tag, split_tag, WireType};
