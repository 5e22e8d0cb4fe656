//! Aggregate codec holder.

use std::sync::Arc;

use super::{BinaryMessageCodec, JsonMessageCodec, MessageCodec};
use crate::{EncodingFormat, SchemaRegistry};

pub struct Codecs {
    pub binary: BinaryMessageCodec,
    pub json: JsonMessageCodec,
}

impl Codecs {
    /// Both codecs share `registry`.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            binary: BinaryMessageCodec::new(registry.clone()),
            json: JsonMessageCodec::new(registry),
        }
    }

    pub fn get(&mut self, format: EncodingFormat) -> &mut dyn MessageCodec {
        match format {
            EncodingFormat::Binary => &mut self.binary,
            EncodingFormat::Json => &mut self.json,
        }
    }
}
