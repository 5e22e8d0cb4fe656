//! Message codecs behind one trait, and an aggregate holder.

mod binary;
mod json;
mod registry;
mod types;

pub use binary::BinaryMessageCodec;
pub use json::JsonMessageCodec;
pub use registry::Codecs;
pub use types::{CodecError, MessageCodec};
