//! GELF encoding and UDP delivery for structured log events.
//!
//! Build a [`GelfRecord`] (or call one of the [`GelfLogger`] severity
//! methods), and the [`GelfTransport`] serialises it to GELF JSON, compresses
//! it with zlib, and writes it to a collector over UDP. Messages too large
//! for one datagram are split into at most 128 chunks.

pub mod field_value;
pub mod gelf_handler;
pub mod handlers;
pub mod hostname;
pub mod level;
pub mod log_compat;
pub mod log_record;
pub mod logger;
pub mod rate_limited_warner;

pub use field_value::FieldValue;
#[cfg(any(test, feature = "test-util"))]
pub use gelf_handler::MemorySink;
pub use gelf_handler::{
    ChunkedEnvelope, ConfigError, DatagramSink, GelfError, GelfTransport, TransportConfig, UdpSink,
};
pub use handlers::{GelfHandlerBuilder, HandlerBuildError};
pub use level::GelfLevel;
pub use log_compat::GelfLogAdapter;
pub use log_record::GelfRecord;
pub use logger::{GelfLogger, NO_CONTEXT};
