//! Failure modes of a GELF send.

use std::io;

use thiserror::Error;

use super::chunk::MAX_CHUNKS;
use super::config::ConfigError;

/// Errors produced while encoding or transmitting a record.
#[derive(Debug, Error)]
pub enum GelfError {
    /// The record could not be serialised or compressed.
    #[error("failed to encode GELF message: {0}")]
    Encoding(String),
    /// The compressed payload needs more chunks than the protocol allows.
    #[error("GELF message needs {chunks} chunks; at most {max} are allowed", max = MAX_CHUNKS)]
    OversizeMessage { chunks: usize },
    /// The transport settings cannot produce sendable datagrams.
    #[error("invalid GELF transport configuration: {0}")]
    Config(#[from] ConfigError),
    /// A datagram write failed. Chunks written before the failure stay sent.
    #[error("failed to write GELF datagram: {0}")]
    Transport(#[source] io::Error),
}

impl GelfError {
    pub(crate) fn encoding(err: impl std::fmt::Display) -> Self {
        GelfError::Encoding(err.to_string())
    }

    /// Short label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            GelfError::Encoding(_) => "encoding",
            GelfError::OversizeMessage { .. } => "oversize",
            GelfError::Config(_) => "config",
            GelfError::Transport(_) => "transport",
        }
    }
}
