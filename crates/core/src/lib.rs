//! Shared building blocks for the NDJSON stream relay.
//!
//! - [`record::StreamRecord`] is the application event carried end to end.
//! - [`schema::StreamDefinition`] is the versioned contract both the producer
//!   and the relay reference; [`schema::MESSAGE_STREAM`] is the one stream this
//!   system defines.
//! - [`ndjson`] holds the server-side line codec used by the relay.

pub mod error;
pub mod ndjson;
pub mod record;
pub mod schema;
pub mod types;
