//! Logger façade over [`GelfTransport`].
//!
//! [`GelfLogger`] turns `(level, message, context)` calls into
//! [`GelfRecord`]s and sends them. Logging must never disrupt the caller, so
//! every entry point reports success as a `bool` and failures are surfaced
//! only through rate-limited `log::warn!` diagnostics. Use
//! [`GelfLogger::try_log`] to get the underlying error instead.

mod convenience_methods;

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;

use crate::field_value::FieldValue;
use crate::gelf_handler::{DatagramSink, GelfError, GelfTransport, TransportConfig, UdpSink};
use crate::hostname::local_hostname;
use crate::level::GelfLevel;
use crate::log_record::GelfRecord;
use crate::rate_limited_warner::RateLimitedWarner;

/// Empty context for calls that attach no additional fields.
pub const NO_CONTEXT: [(&str, &str); 0] = [];

/// Sends log events to a GELF collector.
pub struct GelfLogger<S = UdpSink> {
    transport: GelfTransport<S>,
    host: String,
    warner: RateLimitedWarner,
    sent: AtomicU64,
    failed: AtomicU64,
}

impl GelfLogger<UdpSink> {
    /// Connect a logger to the collector described by `config`.
    pub fn connect(config: TransportConfig) -> io::Result<Self> {
        GelfTransport::connect(config).map(Self::new)
    }
}

impl<S: DatagramSink> GelfLogger<S> {
    /// Wrap a transport. Records originate from the local hostname.
    pub fn new(transport: GelfTransport<S>) -> Self {
        let warner = RateLimitedWarner::new(transport.config().warn_interval());
        Self {
            transport,
            host: local_hostname().to_owned(),
            warner,
            sent: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Override the `host` written into every record.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        if !host.trim().is_empty() {
            self.host = host;
        }
        self
    }

    /// Replace the diagnostic warner, e.g. to change its clock.
    pub fn with_warner(mut self, warner: RateLimitedWarner) -> Self {
        self.warner = warner;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn transport(&self) -> &GelfTransport<S> {
        &self.transport
    }

    /// Build the record that [`log`](Self::log) would send.
    pub fn record<I, K, V>(&self, level: GelfLevel, message: &str, context: I) -> GelfRecord
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        GelfRecord::with_context(&self.host, context)
            .with_level(level)
            .with_full_message(message)
    }

    /// Log `message` at `level` with additional `context` fields.
    ///
    /// Returns `false` if the message could not be handed to the socket.
    pub fn log<I, K, V>(&self, level: GelfLevel, message: &str, context: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        self.try_log(level, message, context).is_ok()
    }

    /// Like [`log`](Self::log) but returns the failure.
    pub fn try_log<I, K, V>(&self, level: GelfLevel, message: &str, context: I) -> Result<(), GelfError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let record = self.record(level, message, context);
        self.dispatch(&record)
    }

    /// Send a prepared record, reporting failures through the warner.
    pub fn send(&self, record: &GelfRecord) -> bool {
        self.dispatch(record).is_ok()
    }

    fn dispatch(&self, record: &GelfRecord) -> Result<(), GelfError> {
        match self.transport.send(record) {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(err) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                self.warner.record_drop();
                self.warner.warn_if_due(|count| {
                    warn!("GelfLogger dropped {count} messages; last {} failure: {err}", err.kind());
                });
                Err(err)
            }
        }
    }

    /// Report any failures not yet covered by a warning.
    pub fn flush(&self) {
        self.warner.flush(|count| {
            warn!("GelfLogger dropped {count} messages in the last interval");
        });
    }

    /// Messages handed to the socket so far.
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Messages that failed to encode or send.
    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

impl<S> fmt::Debug for GelfLogger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GelfLogger")
            .field("host", &self.host)
            .field("transport", &self.transport)
            .field("sent", &self.sent.load(Ordering::Relaxed))
            .field("failed", &self.failed.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
