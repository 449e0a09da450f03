//! Versioned stream definitions shared by producer and relay.
//!
//! A [`StreamDefinition`] pairs a stream id and schema version with the Rust
//! type carried on the stream. It is the only lawful way to turn a structured
//! value into a stream payload: transports accept `String` and nothing else,
//! so serialization is always an explicit [`StreamDefinition::encode`] call.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;
use crate::record::StreamRecord;

/// The stream the `emit-messages` task writes and the relay reads.
pub const MESSAGE_STREAM: StreamDefinition<StreamRecord> =
    StreamDefinition::new("message-stream", 1);

/// Identifier plus schema version of a named stream carrying `T`.
pub struct StreamDefinition<T> {
    id: &'static str,
    version: u32,
    _payload: PhantomData<fn() -> T>,
}

impl<T> StreamDefinition<T> {
    pub const fn new(id: &'static str, version: u32) -> Self {
        Self {
            id,
            version,
            _payload: PhantomData,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }
}

impl<T: Serialize> StreamDefinition<T> {
    /// Serialize `value` into the JSON text sent over the stream.
    pub fn encode(&self, value: &T) -> Result<String, CoreError> {
        serde_json::to_string(value).map_err(|source| CoreError::Encode {
            stream_id: self.id,
            source,
        })
    }
}

impl<T: DeserializeOwned> StreamDefinition<T> {
    /// Parse a raw payload read from the stream back into `T`.
    pub fn decode(&self, raw: &str) -> Result<T, CoreError> {
        serde_json::from_str(raw).map_err(|source| CoreError::Decode {
            stream_id: self.id,
            source,
        })
    }
}

impl<T> Clone for StreamDefinition<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StreamDefinition<T> {}

impl<T> fmt::Debug for StreamDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamDefinition")
            .field("id", &self.id)
            .field("version", &self.version)
            .finish()
    }
}
