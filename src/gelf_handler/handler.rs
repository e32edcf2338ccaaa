//! Public transport type exported by the crate.

use std::fmt;
use std::io;

use crate::log_record::GelfRecord;

use super::{
    chunk::into_datagrams,
    config::{ConfigError, TransportConfig},
    error::GelfError,
    message_id::{DigestMessageId, MessageIdStrategy},
    serialise::{compress_payload, serialise_record},
    transport::{DatagramSink, UdpSink},
};

/// Encodes records as GELF and writes them to a datagram sink.
///
/// Each [`send`](Self::send) is synchronous: the record is serialised,
/// compressed, split if needed, and every datagram is handed to the sink
/// before the call returns. A transport may be shared between threads; the
/// sink keeps each message's chunks together.
pub struct GelfTransport<S = UdpSink> {
    sink: S,
    config: TransportConfig,
    ids: Box<dyn MessageIdStrategy>,
}

impl GelfTransport<UdpSink> {
    /// Connect a UDP transport to the configured collector.
    ///
    /// An invalid configuration fails with [`io::ErrorKind::InvalidInput`].
    pub fn connect(config: TransportConfig) -> io::Result<Self> {
        config
            .validate()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        let sink = UdpSink::connect(&config)?;
        Ok(Self::assemble(config, sink))
    }
}

impl<S: DatagramSink> GelfTransport<S> {
    /// Build a transport writing to an arbitrary sink.
    pub fn with_sink(config: TransportConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, sink))
    }

    fn assemble(config: TransportConfig, sink: S) -> Self {
        Self {
            sink,
            config,
            ids: Box::new(DigestMessageId::<sha2::Sha256>::new()),
        }
    }

    /// Replace the message id strategy.
    pub fn with_message_ids(mut self, ids: impl MessageIdStrategy + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Encode `record` into the datagrams that [`send`](Self::send) would
    /// write, without touching the network.
    ///
    /// Either every datagram is produced or none is.
    pub fn prepare(&self, record: &GelfRecord) -> Result<Vec<Vec<u8>>, GelfError> {
        let json = serialise_record(record)?;
        let compressed = compress_payload(&json, self.config.compression())?;
        into_datagrams(compressed, self.config.max_chunk_size(), self.ids.as_ref())
    }

    /// Encode and transmit `record`.
    ///
    /// Success means the local socket layer accepted every datagram; UDP gives
    /// no delivery guarantee. Encoding failures and oversize messages send
    /// nothing. A write failure mid-way leaves earlier chunks sent.
    pub fn send(&self, record: &GelfRecord) -> Result<(), GelfError> {
        let datagrams = self.prepare(record)?;
        self.sink
            .send_all(&datagrams)
            .map_err(GelfError::Transport)
    }
}

impl<S> fmt::Debug for GelfTransport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GelfTransport")
            .field("config", &self.config)
            .field("ids", &self.ids)
            .finish()
    }
}
