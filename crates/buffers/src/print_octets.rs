//! Human-readable dumps of wire bytes: spaced hex for logs, Python-style
//! byte-string literals for the `dump` output.

use std::fmt::Write as _;

/// Lowercase hex octets separated by single spaces. At most `max` octets are
/// shown; the rest are summarized as `... (N more)`.
///
/// ```
/// use protopack_buffers::print_octets;
///
/// assert_eq!(print_octets(&[0x08, 0x96, 0x01], 16), "08 96 01");
/// assert_eq!(print_octets(&[0x08, 0x96, 0x01], 2), "08 96... (1 more)");
/// assert_eq!(print_octets(&[], 16), "");
/// ```
pub fn print_octets(octets: &[u8], max: usize) -> String {
    let shown = octets.len().min(max);
    let mut out = String::with_capacity(shown * 3 + 16);
    for (i, byte) in octets[..shown].iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    if shown < octets.len() {
        let _ = write!(out, "... ({} more)", octets.len() - shown);
    }
    out
}

/// [`print_octets`] capped at 16 octets, the width used in trace logs.
pub fn print_octets_default(octets: &[u8]) -> String {
    print_octets(octets, 16)
}

/// Formats a byte slice as a quoted byte-string literal, e.g. `b'\x08\x01'`.
///
/// Printable ASCII is shown as-is, `\t`, `\n` and `\r` use their short
/// escapes, and every other byte is written as `\xNN`. Single quotes delimit
/// the literal unless the data contains a single quote and no double quote.
///
/// # Example
///
/// ```
/// use protopack_buffers::print_byte_literal;
///
/// assert_eq!(print_byte_literal(&[0x08, 0x01, b'a']), "b'\\x08\\x01a'");
/// ```
pub fn print_byte_literal(octets: &[u8]) -> String {
    let quote = if octets.contains(&b'\'') && !octets.contains(&b'"') {
        '"'
    } else {
        '\''
    };
    let mut result = String::with_capacity(octets.len() * 4 + 3);
    result.push('b');
    result.push(quote);
    for &byte in octets {
        match byte {
            b'\\' => result.push_str("\\\\"),
            b'\t' => result.push_str("\\t"),
            b'\n' => result.push_str("\\n"),
            b'\r' => result.push_str("\\r"),
            _ if byte as char == quote => {
                result.push('\\');
                result.push(quote);
            }
            0x20..=0x7e => result.push(byte as char),
            _ => {
                let _ = write!(result, "\\x{byte:02x}");
            }
        }
    }
    result.push(quote);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octets_capped() {
        let data: Vec<u8> = (0..20).collect();
        assert_eq!(print_octets(&data, 20).split(' ').count(), 20);
        assert!(print_octets(&data, 10).ends_with("09... (10 more)"));
        assert!(print_octets_default(&data).ends_with("0f... (4 more)"));
        assert_eq!(print_octets(&[0xff], usize::MAX), "ff");
    }

    #[test]
    fn test_byte_literal_escapes() {
        assert_eq!(print_byte_literal(&[]), "b''");
        assert_eq!(print_byte_literal(b"\x1a\x06\n\x02aa"), "b'\\x1a\\x06\\n\\x02aa'");
        assert_eq!(print_byte_literal(b"it's"), "b\"it's\"");
        assert_eq!(print_byte_literal(b"'\""), "b'\\'\"'");
        assert_eq!(print_byte_literal(b"a\\b"), "b'a\\\\b'");
    }
}
