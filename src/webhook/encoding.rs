use std::io;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, Serializer};

/// How a payload is turned into the bytes that get signed.
///
/// Key order is whatever the payload serializes in: insertion order for
/// `serde_json::Map`, declaration order for structs. Nothing is sorted, so the
/// signer and the verifier must agree on ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// Standard JSON text: `", "` and `": "` separators, non-ASCII escaped as
    /// `\uXXXX`. `{"event":"ping"}` encodes as `{"event": "ping"}`.
    #[default]
    Spaced,
    /// No whitespace, UTF-8 passed through. `{"event":"ping"}` stays as is.
    Compact,
}

impl PayloadEncoding {
    pub fn encode<T>(self, payload: &T) -> serde_json::Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let mut buf = Vec::with_capacity(128);
        match self {
            Self::Spaced => payload.serialize(&mut Serializer::with_formatter(
                &mut buf,
                SpacedFormatter,
            ))?,
            Self::Compact => payload.serialize(&mut Serializer::with_formatter(
                &mut buf,
                CompactFormatter,
            ))?,
        }
        Ok(buf)
    }
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    // Quotes, backslashes and C0 controls arrive through `write_char_escape`.
    // Everything else outside printable ASCII, DEL included, becomes `\uXXXX`.
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.bytes().all(is_printable_ascii) {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() && is_printable_ascii(ch as u8) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

fn is_printable_ascii(byte: u8) -> bool {
    (b' '..=b'~').contains(&byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spaced(value: &serde_json::Value) -> String {
        String::from_utf8(PayloadEncoding::Spaced.encode(value).unwrap()).unwrap()
    }

    fn compact(value: &serde_json::Value) -> String {
        String::from_utf8(PayloadEncoding::Compact.encode(value).unwrap()).unwrap()
    }

    #[test]
    fn spaced_uses_default_separators() {
        let value = json!({"event": "ping", "data": {"ids": [1, 2, 3], "ok": true, "none": null}});
        assert_eq!(
            spaced(&value),
            r#"{"event": "ping", "data": {"ids": [1, 2, 3], "ok": true, "none": null}}"#
        );
    }

    #[test]
    fn compact_has_no_whitespace() {
        let value = json!({"event": "ping", "ids": [1, 2]});
        assert_eq!(compact(&value), r#"{"event":"ping","ids":[1,2]}"#);
    }

    #[test]
    fn insertion_order_is_kept() {
        let value = json!({"b": 1, "a": 2});
        assert_eq!(spaced(&value), r#"{"b": 1, "a": 2}"#);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(spaced(&json!({})), "{}");
        assert_eq!(spaced(&json!({"list": []})), r#"{"list": []}"#);
    }

    #[test]
    fn spaced_escapes_non_ascii() {
        let value = json!({"name": "café ✓", "emoji": "😀"});
        assert_eq!(
            spaced(&value),
            r#"{"name": "caf\u00e9 \u2713", "emoji": "\ud83d\ude00"}"#
        );
    }

    #[test]
    fn compact_passes_utf8_through() {
        let value = json!({"name": "café"});
        assert_eq!(compact(&value), "{\"name\":\"café\"}");
    }

    #[test]
    fn control_characters_are_escaped() {
        let value = json!({"text": "line\n\"quoted\"\t\u{1}"});
        assert_eq!(
            spaced(&value),
            r#"{"text": "line\n\"quoted\"\t\u0001"}"#
        );
    }

    #[test]
    fn delete_character_is_escaped() {
        let value = json!({"a": "x\u{7f}y \u{e9}"});
        assert_eq!(spaced(&value), r#"{"a": "x\u007fy \u00e9"}"#);
        assert_eq!(compact(&value), "{\"a\":\"x\u{7f}y \u{e9}\"}");
    }

    #[test]
    fn structs_keep_declaration_order() {
        #[derive(Serialize)]
        struct Event<'a> {
            event: &'a str,
            chat_id: &'a str,
        }

        let bytes = PayloadEncoding::Spaced
            .encode(&Event {
                event: "message.created",
                chat_id: "c1",
            })
            .unwrap();
        assert_eq!(bytes, br#"{"event": "message.created", "chat_id": "c1"}"#);
    }
}
