//! Builder for [`GelfTransport`] and [`GelfLogger`].
//!
//! Every setting is optional; unset values keep the [`TransportConfig`]
//! defaults (or the `GELF_*` environment overrides when starting from
//! [`GelfHandlerBuilder::from_env`]).

use std::time::Duration;

use crate::gelf_handler::{
    GelfTransport, MessageIdStrategy, TransportConfig, UdpSink, check_max_chunk_size,
};
use crate::logger::GelfLogger;

use super::HandlerBuildError;

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(HandlerBuildError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing GELF transports.
#[derive(Clone, Debug, Default)]
pub struct GelfHandlerBuilder {
    base: Option<TransportConfig>,
    host: Option<String>,
    port: Option<u16>,
    max_chunk_size: Option<usize>,
    compression_level: Option<u32>,
    write_timeout_ms: Option<u64>,
    warn_interval_ms: Option<u64>,
    source_host: Option<String>,
}

impl GelfHandlerBuilder {
    /// Create a builder targeting the default collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the defaults overridden by the `GELF_*` environment.
    pub fn from_env() -> Self {
        Self {
            base: Some(TransportConfig::from_env()),
            ..Self::default()
        }
    }

    /// Set the collector address.
    pub fn with_collector(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = Some(host.into());
        self.port = Some(port);
        self
    }

    option_setter!(
        #[doc = "Set the collector host."]
        with_host,
        host,
        String
    );
    option_setter!(
        #[doc = "Set the collector port."]
        with_port,
        port,
        u16
    );
    option_setter!(
        #[doc = "Set the largest payload per datagram, header excluded."]
        with_max_chunk_size,
        max_chunk_size,
        usize
    );
    option_setter!(
        #[doc = "Set the zlib compression level (0-9)."]
        with_compression_level,
        compression_level,
        u32
    );
    option_setter!(with_write_timeout_ms, write_timeout_ms, u64);
    option_setter!(with_warn_interval_ms, warn_interval_ms, u64);
    option_setter!(
        #[doc = "Set the `host` field written into records built by the logger."]
        with_source_host,
        source_host,
        String
    );

    fn validate(&self) -> Result<(), HandlerBuildError> {
        self.validate_host()?;
        self.validate_port()?;
        self.validate_chunk_size()?;
        self.validate_compression()?;
        if let Some(timeout) = self.write_timeout_ms {
            ensure_positive!(timeout, "write_timeout_ms")?;
        }
        Ok(())
    }

    fn validate_host(&self) -> Result<(), HandlerBuildError> {
        match &self.host {
            Some(host) if host.trim().is_empty() => Err(HandlerBuildError::InvalidConfig(
                "collector host must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_port(&self) -> Result<(), HandlerBuildError> {
        if let Some(port) = self.port {
            ensure_positive!(port, "port")?;
        }
        Ok(())
    }

    fn validate_chunk_size(&self) -> Result<(), HandlerBuildError> {
        let size = self
            .max_chunk_size
            .or_else(|| self.base.as_ref().map(TransportConfig::max_chunk_size));
        if let Some(size) = size {
            check_max_chunk_size(size)
                .map_err(|err| HandlerBuildError::InvalidConfig(err.to_string()))?;
        }
        Ok(())
    }

    fn validate_compression(&self) -> Result<(), HandlerBuildError> {
        match self.compression_level {
            Some(level) if level > 9 => Err(HandlerBuildError::InvalidConfig(format!(
                "compression_level must be between 0 and 9, got {level}"
            ))),
            _ => Ok(()),
        }
    }

    /// Validate the settings and produce the resulting configuration.
    pub fn build_config(&self) -> Result<TransportConfig, HandlerBuildError> {
        self.validate()?;
        let mut config = self.base.clone().unwrap_or_default();
        if let Some(host) = &self.host {
            config = config.with_host(host.trim());
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(size) = self.max_chunk_size {
            config = config.with_max_chunk_size(size);
        }
        if let Some(level) = self.compression_level {
            config = config.with_compression_level(level);
        }
        if let Some(timeout) = self.write_timeout_ms {
            config = config.with_write_timeout(Some(Duration::from_millis(timeout)));
        }
        if let Some(interval) = self.warn_interval_ms {
            config = config.with_warn_interval(Duration::from_millis(interval));
        }
        Ok(config)
    }

    /// Build a UDP transport connected to the collector.
    pub fn build_transport(&self) -> Result<GelfTransport<UdpSink>, HandlerBuildError> {
        let config = self.build_config()?;
        Ok(GelfTransport::connect(config)?)
    }

    /// Build a transport using a custom message id strategy.
    pub fn build_transport_with_ids(
        &self,
        ids: impl MessageIdStrategy + 'static,
    ) -> Result<GelfTransport<UdpSink>, HandlerBuildError> {
        Ok(self.build_transport()?.with_message_ids(ids))
    }

    /// Build a logger sending over UDP.
    pub fn build_logger(&self) -> Result<GelfLogger<UdpSink>, HandlerBuildError> {
        let logger = GelfLogger::new(self.build_transport()?);
        Ok(match &self.source_host {
            Some(host) => logger.with_host(host.clone()),
            None => logger,
        })
    }
}
