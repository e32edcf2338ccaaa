//! Builders for GELF transports and loggers.
//!
//! Builders collect optional overrides, validate them, and produce a ready
//! [`GelfTransport`](crate::gelf_handler::GelfTransport) or
//! [`GelfLogger`](crate::logger::GelfLogger).

use std::io;

use thiserror::Error;

pub mod gelf_builder;

pub use gelf_builder::GelfHandlerBuilder;

/// Errors that may occur while building a transport.
#[derive(Debug, Error)]
pub enum HandlerBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid handler configuration: {0}")]
    InvalidConfig(String),
    /// Underlying I/O error whilst resolving or binding the socket.
    #[error(transparent)]
    Io(#[from] io::Error),
}
