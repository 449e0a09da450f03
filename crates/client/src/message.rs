use relay_core::record::message_of;
use relay_core::types::Timestamp;
use serde::Serialize;

/// Prefix of a display message built from a line that is not JSON.
pub const RAW_NOT_JSON: &str = "RAW (not JSON): ";

/// Prefix of a display message built from JSON that is not a message record.
pub const RAW_NOT_RECORD: &str = "RAW (not a message record): ";

/// One rendered item of the received stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMessage {
    pub message: String,
    pub received_at: Timestamp,
    /// `true` when the line could not be read as a record and `message`
    /// carries the raw line instead.
    pub raw: bool,
}

impl DisplayMessage {
    /// Build the display item for one complete NDJSON line.
    ///
    /// Lines that do not parse are kept, with the raw text embedded in a
    /// diagnostic message.
    pub fn from_line(line: &str, received_at: Timestamp) -> Self {
        let (message, raw) = match serde_json::from_str::<serde_json::Value>(line) {
            Ok(value) => match message_of(&value) {
                Some(message) => (message.to_owned(), false),
                None => (format!("{RAW_NOT_RECORD}{line}"), true),
            },
            Err(_) => (format!("{RAW_NOT_JSON}{line}"), true),
        };

        Self {
            message,
            received_at,
            raw,
        }
    }
}
