//! Newline deframing of a decoded byte stream.

use crate::decoder::Utf8StreamDecoder;

/// Rebuilds `\n`-terminated lines from chunks of arbitrary size.
///
/// Decoded text is appended to one buffer; everything up to the last `\n`
/// is split off into complete lines and the remainder stays buffered for
/// the next chunk. The result does not depend on how the bytes were
/// chunked.
#[derive(Debug, Default)]
pub struct LineDeframer {
    decoder: Utf8StreamDecoder,
    buffer: String,
}

impl LineDeframer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the lines it completed, without their `\n`.
    ///
    /// Empty lines are returned as empty strings.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&self.decoder.decode(chunk));

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.buffer.split_off(last_newline + 1);
        let mut complete = std::mem::replace(&mut self.buffer, rest);
        complete.pop();

        complete.split('\n').map(str::to_owned).collect()
    }

    /// Text received after the last `\n`.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// End of input: return the unterminated remainder, if any.
    pub fn finish(self) -> Option<String> {
        if self.buffer.is_empty() && self.decoder.pending_len() == 0 {
            None
        } else {
            Some(self.buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_with_several_lines_and_a_partial() {
        let mut deframer = LineDeframer::new();
        let lines = deframer.push(b"{\"a\":1}\n{\"b\":2}\n{\"c\"");
        assert_eq!(lines, vec!["{\"a\":1}", "{\"b\":2}"]);
        assert_eq!(deframer.buffered(), "{\"c\"");
    }

    #[test]
    fn line_spanning_chunks_is_emitted_once_complete() {
        let mut deframer = LineDeframer::new();
        assert!(deframer.push(b"{\"mess").is_empty());
        assert!(deframer.push(b"age\":\"x\"").is_empty());
        assert_eq!(deframer.push(b"}\n"), vec!["{\"message\":\"x\"}"]);
        assert_eq!(deframer.buffered(), "");
    }

    #[test]
    fn empty_lines_are_kept() {
        let mut deframer = LineDeframer::new();
        assert_eq!(deframer.push(b"a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn finish_reports_unterminated_remainder() {
        let mut deframer = LineDeframer::new();
        deframer.push(b"done\npartial");
        assert_eq!(deframer.finish().as_deref(), Some("partial"));

        let mut deframer = LineDeframer::new();
        deframer.push(b"done\n");
        assert_eq!(deframer.finish(), None);
    }

    #[test]
    fn newline_after_split_character() {
        let bytes = "ü\n".as_bytes();
        let mut deframer = LineDeframer::new();
        assert!(deframer.push(&bytes[..1]).is_empty());
        assert_eq!(deframer.push(&bytes[1..]), vec!["ü"]);
    }
}
