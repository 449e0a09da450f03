//! Server-side NDJSON line codec.
//!
//! [`relay_payload`] turns one opaque stream payload into exactly one
//! `\n`-terminated line. Payloads that are JSON are re-encoded in compact
//! form; anything else is forwarded as-is so upstream malformation stays
//! visible to the consumer.

use bytes::Bytes;

use crate::record::message_of;

/// Media type of an NDJSON response body.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// How a payload was turned into a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// JSON carrying a string `message`, re-encoded.
    Record,
    /// JSON of some other shape, re-encoded.
    Json,
    /// The payload was not JSON and was forwarded verbatim.
    Verbatim,
}

/// A single complete NDJSON line, including the trailing `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedLine {
    pub kind: LineKind,
    pub bytes: Bytes,
}

/// Convert one raw stream payload into one NDJSON line.
///
/// Verbatim payloads have any embedded `\r` or `\n` replaced with a space;
/// one payload always yields exactly one line.
pub fn relay_payload(payload: &str) -> RelayedLine {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(payload) {
        if let Ok(mut buf) = serde_json::to_vec(&value) {
            buf.push(b'\n');
            let kind = if message_of(&value).is_some() {
                LineKind::Record
            } else {
                LineKind::Json
            };
            return RelayedLine {
                kind,
                bytes: Bytes::from(buf),
            };
        }
    }

    let mut line: String = payload
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    line.push('\n');

    RelayedLine {
        kind: LineKind::Verbatim,
        bytes: Bytes::from(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_payload_is_reencoded_compactly() {
        let line = relay_payload("{ \"message\" :  \"one\" }");
        assert_eq!(line.kind, LineKind::Record);
        assert_eq!(&line.bytes[..], b"{\"message\":\"one\"}\n");
    }

    #[test]
    fn coerced_object_text_is_forwarded_verbatim() {
        let line = relay_payload("[object Object]");
        assert_eq!(line.kind, LineKind::Verbatim);
        assert_eq!(&line.bytes[..], b"[object Object]\n");
    }

    #[test]
    fn verbatim_payload_never_splits_into_two_lines() {
        let line = relay_payload("not\njson\r\n");
        assert_eq!(line.kind, LineKind::Verbatim);
        assert_eq!(&line.bytes[..], b"not json  \n");
    }

    #[test]
    fn pretty_printed_json_collapses_to_one_line() {
        let line = relay_payload("{\n  \"message\": \"two\"\n}");
        assert_eq!(line.kind, LineKind::Record);
        assert_eq!(&line.bytes[..], b"{\"message\":\"two\"}\n");
    }

    #[test]
    fn json_that_is_not_a_record_is_still_relayed() {
        let line = relay_payload("[1,2,3]");
        assert_eq!(line.kind, LineKind::Json);
        assert_eq!(&line.bytes[..], b"[1,2,3]\n");
    }

    #[test]
    fn record_with_extra_fields_is_still_a_record() {
        let line = relay_payload(r#"{"message":"one","seq":1}"#);
        assert_eq!(line.kind, LineKind::Record);
        assert_eq!(&line.bytes[..], b"{\"message\":\"one\",\"seq\":1}\n");
    }
}
