use protopack::{MessageValue, ProtoCodec, ProtoError};

use crate::cli::{MessageArgs, OutputFormat};
use crate::config;
use crate::error::CliResult;
use crate::output;

pub fn run(codec: &ProtoCodec, args: &MessageArgs, format: OutputFormat) -> CliResult<()> {
    let messages = if args.is_empty() {
        sample_messages(codec)?
    } else {
        vec![config::build_message(codec, args, "Foo")?]
    };
    for message in &messages {
        let bytes = codec.encode(message)?;
        output::print_message(codec, message, &bytes, format)?;
    }
    Ok(())
}

/// The sample messages: `Foo` with signed boundary values and a map, then
/// `AttrValue` and a `NameAttrList` holding it.
pub fn sample_messages(codec: &ProtoCodec) -> Result<Vec<MessageValue>, ProtoError> {
    let foo = |a: i64, b: i64| -> Result<MessageValue, ProtoError> {
        Ok(codec.builder("Foo")?.set_int("a", a)?.set_int("b", b)?.build())
    };
    let min = i32::MIN as i64;
    let av = codec.builder("AttrValue")?.set_int("i", 1)?.build();
    Ok(vec![
        foo(1, 1)?,
        foo(-1, 0)?,
        foo(0, -1)?,
        foo(min, 0)?,
        foo(0, min)?,
        codec.builder("Foo")?.insert("f", "aa", 1)?.insert("f", "bb", 2)?.build(),
        av.clone(),
        codec
            .builder("NameAttrList")?
            .set("name", "nal")?
            .insert("attr", "av", av)?
            .build(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render_message;

    #[test]
    fn test_sample_dump() {
        let codec = config::load_codec(None).unwrap();
        let rendered: Vec<String> = sample_messages(&codec)
            .unwrap()
            .iter()
            .map(|m| {
                let bytes = codec.encode(m).unwrap();
                render_message(&codec, m, &bytes, OutputFormat::Text).unwrap()
            })
            .collect();
        assert_eq!(rendered.len(), 8);
        assert_eq!(
            rendered[3],
            "Foo\na: -2147483648\n\nb'\\x08\\x80\\x80\\x80\\x80\\xf8\\xff\\xff\\xff\\xff\\x01'\n"
        );
        assert_eq!(
            rendered[5],
            "Foo\nf {\n  key: \"aa\"\n  value: 1\n}\nf {\n  key: \"bb\"\n  value: 2\n}\n\n\
             b'\\x1a\\x06\\n\\x02aa\\x10\\x01\\x1a\\x06\\n\\x02bb\\x10\\x02'\n"
        );
        assert_eq!(
            rendered[7],
            "NameAttrList\nname: \"nal\"\nattr {\n  key: \"av\"\n  value {\n    i: 1\n  }\n}\n\n\
             b'\\n\\x03nal\\x12\\x08\\n\\x02av\\x12\\x02\\x18\\x01'\n"
        );
    }
}
