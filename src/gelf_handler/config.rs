//! Configuration consumed by the GELF transport.
//!
//! [`GelfHandlerBuilder`](crate::handlers::GelfHandlerBuilder) validates these
//! values before handing them to [`GelfTransport`](super::GelfTransport).

use std::env;
use std::time::Duration;

use flate2::Compression;
use log::warn;
use thiserror::Error;

use super::chunk::CHUNK_HEADER_LEN;

/// Host of the log collector when none is configured.
pub const DEFAULT_HOST: &str = "localhost";
/// Port the collector listens on for GELF over UDP.
pub const DEFAULT_PORT: u16 = 12202;
/// Largest payload carried by one datagram, chunk header excluded.
///
/// Keeps datagrams below common jumbo-frame limits on a LAN.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 8154;
/// Largest UDP payload over IPv4.
pub const MAX_UDP_PAYLOAD: usize = 65_507;
/// Upper bound for `max_chunk_size` so a chunk plus header fits a datagram.
pub const MAX_CHUNK_SIZE_LIMIT: usize = MAX_UDP_PAYLOAD - CHUNK_HEADER_LEN;
/// Default zlib compression level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
/// Default minimum delay between repeated failure warnings.
pub const DEFAULT_WARN_INTERVAL: Duration = Duration::from_secs(5);

/// A [`TransportConfig`] setting outside its allowed range.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "max_chunk_size must be between 1 and {limit} bytes, got {size}",
        limit = MAX_CHUNK_SIZE_LIMIT
    )]
    MaxChunkSize { size: usize },
}

/// Accept `size` if a chunk of that many bytes plus its header fits a
/// datagram.
pub fn check_max_chunk_size(size: usize) -> Result<usize, ConfigError> {
    if (1..=MAX_CHUNK_SIZE_LIMIT).contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::MaxChunkSize { size })
    }
}

/// Destination and encoding parameters for a GELF transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    host: String,
    port: u16,
    max_chunk_size: usize,
    compression_level: u32,
    write_timeout: Option<Duration>,
    warn_interval: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            write_timeout: None,
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }
}

impl TransportConfig {
    /// Defaults overridden by `GELF_HOST`, `GELF_PORT`, and
    /// `GELF_MAX_CHUNK_SIZE` when set. Unparsable or out-of-range values are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = env::var("GELF_HOST")
            && !host.trim().is_empty()
        {
            config.host = host.trim().to_owned();
        }
        if let Some(port) = parse_env::<u16>("GELF_PORT") {
            config.port = port;
        }
        if let Some(size) = parse_env::<usize>("GELF_MAX_CHUNK_SIZE") {
            match check_max_chunk_size(size) {
                Ok(size) => config.max_chunk_size = size,
                Err(err) => warn!("femtogelf: ignoring GELF_MAX_CHUNK_SIZE: {err}"),
            }
        }
        config
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the chunk payload size. The range is checked by
    /// [`validate`](Self::validate) when a transport is built.
    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    /// Override the zlib level; values above 9 are clamped.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn with_warn_interval(mut self, interval: Duration) -> Self {
        self.warn_interval = interval;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub fn compression(&self) -> Compression {
        Compression::new(self.compression_level)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout
    }

    pub fn warn_interval(&self) -> Duration {
        self.warn_interval
    }

    /// Check the settings a transport cannot work without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_max_chunk_size(self.max_chunk_size).map(|_| ())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("femtogelf: ignoring invalid {key}={raw:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialised.
        unsafe {
            env::remove_var("GELF_HOST");
            env::remove_var("GELF_PORT");
            env::remove_var("GELF_MAX_CHUNK_SIZE");
        }
    }

    #[test]
    fn defaults_target_local_collector() {
        let config = TransportConfig::default();
        assert_eq!(config.host(), "localhost");
        assert_eq!(config.port(), 12202);
        assert_eq!(config.max_chunk_size(), 8154);
        assert_eq!(config.write_timeout(), None);
    }

    #[test]
    fn compression_level_is_clamped() {
        let config = TransportConfig::default().with_compression_level(42);
        assert_eq!(config.compression(), Compression::best());
    }

    #[test]
    #[serial]
    fn from_env_applies_overrides() {
        clear_env();
        // SAFETY: see `clear_env`.
        unsafe {
            env::set_var("GELF_HOST", "graylog.internal");
            env::set_var("GELF_PORT", "12201");
            env::set_var("GELF_MAX_CHUNK_SIZE", "1420");
        }
        let config = TransportConfig::from_env();
        clear_env();
        assert_eq!(config.host(), "graylog.internal");
        assert_eq!(config.port(), 12201);
        assert_eq!(config.max_chunk_size(), 1420);
    }

    #[rstest]
    #[case(0)]
    #[case(MAX_CHUNK_SIZE_LIMIT + 1)]
    fn out_of_range_chunk_size_fails_validation(#[case] size: usize) {
        let config = TransportConfig::default().with_max_chunk_size(size);
        assert_eq!(config.validate(), Err(ConfigError::MaxChunkSize { size }));
    }

    #[rstest]
    #[case(1)]
    #[case(MAX_CHUNK_SIZE_LIMIT)]
    fn chunk_size_bounds_are_inclusive(#[case] size: usize) {
        assert_eq!(check_max_chunk_size(size), Ok(size));
    }

    #[rstest]
    #[case("0")]
    #[case("65494")]
    #[serial]
    fn from_env_ignores_out_of_range_chunk_size(#[case] raw: &str) {
        clear_env();
        // SAFETY: see `clear_env`.
        unsafe {
            env::set_var("GELF_MAX_CHUNK_SIZE", raw);
        }
        let config = TransportConfig::from_env();
        clear_env();
        assert_eq!(config.max_chunk_size(), DEFAULT_MAX_CHUNK_SIZE);
    }

    #[test]
    #[serial]
    fn from_env_ignores_garbage() {
        clear_env();
        // SAFETY: see `clear_env`.
        unsafe {
            env::set_var("GELF_PORT", "not-a-port");
        }
        let config = TransportConfig::from_env();
        clear_env();
        assert_eq!(config, TransportConfig::default());
    }
}
