//! Compatibility bridge for the Rust `log` crate.
//!
//! [`GelfLogAdapter`] implements `log::Log` by forwarding each record to a
//! [`GelfLogger`]. Source location travels as the additional fields
//! `_target`, `_module_path`, `_file`, and `_line`. Records emitted by this
//! crate itself are never forwarded, so transport diagnostics cannot loop.

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::field_value::FieldValue;
use crate::gelf_handler::DatagramSink;
use crate::level::GelfLevel;
use crate::logger::GelfLogger;

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Adapter implementing the Rust `log::Log` trait.
#[derive(Debug)]
pub struct GelfLogAdapter<S> {
    logger: GelfLogger<S>,
    max_level: LevelFilter,
}

impl<S: DatagramSink> GelfLogAdapter<S> {
    pub fn new(logger: GelfLogger<S>, max_level: LevelFilter) -> Self {
        Self { logger, max_level }
    }

    pub fn logger(&self) -> &GelfLogger<S> {
        &self.logger
    }

    fn is_own_record(target: &str) -> bool {
        target == OWN_TARGET
            || target
                .strip_prefix(OWN_TARGET)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

fn location_fields(record: &Record<'_>) -> Vec<(&'static str, FieldValue)> {
    let mut fields = vec![("target", FieldValue::from(record.target()))];
    if let Some(module_path) = record.module_path() {
        fields.push(("module_path", FieldValue::from(module_path)));
    }
    if let Some(file) = record.file() {
        fields.push(("file", FieldValue::from(file)));
    }
    if let Some(line) = record.line() {
        fields.push(("line", FieldValue::from(line)));
    }
    fields
}

impl<S: DatagramSink> log::Log for GelfLogAdapter<S> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level && !Self::is_own_record(metadata.target())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        self.logger.log(
            GelfLevel::from(record.level()),
            &message,
            location_fields(record),
        );
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

impl<S: DatagramSink + 'static> GelfLogger<S> {
    /// Install this logger as the global `log` backend.
    ///
    /// Fails when another global logger is already set. The logger lives for
    /// the rest of the process.
    pub fn install(self, max_level: LevelFilter) -> Result<(), SetLoggerError> {
        let adapter: &'static GelfLogAdapter<S> =
            Box::leak(Box::new(GelfLogAdapter::new(self, max_level)));
        log::set_logger(adapter)?;
        log::set_max_level(max_level);
        Ok(())
    }
}
