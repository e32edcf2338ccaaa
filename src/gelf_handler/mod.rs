//! GELF transport encoder.
//!
//! This module defines [`GelfTransport`], which serialises
//! [`GelfRecord`](crate::log_record::GelfRecord) values to GELF JSON,
//! compresses them with zlib, and writes them to a collector over UDP. Payloads
//! larger than the configured chunk size are split into at most 128 chunks
//! sharing one message id; larger messages are refused outright.

pub mod chunk;
mod config;
mod error;
mod handler;
pub mod message_id;
mod serialise;
mod transport;


pub use chunk::{CHUNK_HEADER_LEN, CHUNK_MAGIC, ChunkedEnvelope, MAX_CHUNKS};
pub use config::{
    ConfigError, DEFAULT_HOST, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_PORT, MAX_CHUNK_SIZE_LIMIT,
    TransportConfig, check_max_chunk_size,
};
pub use error::GelfError;
pub use handler::GelfTransport;
#[cfg(any(test, feature = "test-util"))]
pub use message_id::FixedMessageId;
pub use message_id::{DigestMessageId, MESSAGE_ID_LEN, MessageId, MessageIdStrategy};
pub use serialise::{compress_payload, serialise_record};
pub use transport::{DatagramSink, UdpSink};
#[cfg(any(test, feature = "test-util"))]
pub use transport::{MEMORY_SINK_RETAINED_MESSAGES, MemorySink};
