#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Failed to encode payload for stream '{stream_id}': {source}")]
    Encode {
        stream_id: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Payload on stream '{stream_id}' does not match its schema: {source}")]
    Decode {
        stream_id: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema mismatch on stream '{stream_id}': expected v{expected}, found v{found}")]
    SchemaMismatch {
        stream_id: String,
        expected: u32,
        found: u32,
    },
}
