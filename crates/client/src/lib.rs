//! Client side of the stream relay.
//!
//! - [`decoder::Utf8StreamDecoder`] and [`deframer::LineDeframer`] rebuild
//!   text lines from transport chunks of any size.
//! - [`consumer::StreamConsumer`] drives trigger, subscribe and the body read
//!   loop, accumulating [`message::DisplayMessage`]s.
//! - [`api::RelayClient`] is the HTTP client for the relay endpoints.

pub mod api;
pub mod consumer;
pub mod decoder;
pub mod deframer;
pub mod error;
pub mod message;

pub use api::RelayClient;
pub use consumer::{ConsumerState, StreamConsumer, StreamObserver};
pub use message::DisplayMessage;
