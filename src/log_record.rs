//! Log record representation for GELF messages.
//!
//! A [`GelfRecord`] captures one log event: the originating host, the
//! message text, its severity, the moment it was created, and any additional
//! fields supplied by the caller. Records are built once per logging call,
//! serialised, and dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

use crate::field_value::FieldValue;
use crate::hostname::local_hostname;
use crate::level::GelfLevel;

/// GELF specification version written in every message.
pub const GELF_VERSION: &str = "1.1";

/// Longest derived `short_message`, in characters.
pub const SHORT_MESSAGE_MAX_CHARS: usize = 250;

/// `short_message` sent when a record carries no text at all.
pub const BLANK_SHORT_MESSAGE: &str = "-";

/// Field names the collector reserves or that collide with standard fields.
const RESERVED_FIELDS: [&str; 7] = [
    "id",
    "version",
    "host",
    "short_message",
    "full_message",
    "timestamp",
    "level",
];

/// Why an additional field was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRejection {
    /// The name is reserved by the collector or shadows a standard field.
    Reserved,
    /// The name is empty or contains characters outside `[A-Za-z0-9_.-]`.
    InvalidName,
}

/// One structured log event.
#[derive(Clone, Debug)]
pub struct GelfRecord {
    host: String,
    short_message: Option<String>,
    full_message: Option<String>,
    timestamp: SystemTime,
    level: GelfLevel,
    additional_fields: BTreeMap<String, FieldValue>,
    rejected_fields: usize,
}

impl GelfRecord {
    /// Create a record originating from `host`, timestamped now.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            short_message: None,
            full_message: None,
            timestamp: SystemTime::now(),
            level: GelfLevel::default(),
            additional_fields: BTreeMap::new(),
            rejected_fields: 0,
        }
    }

    /// Create a record for the local machine's hostname.
    pub fn local() -> Self {
        Self::new(local_hostname())
    }

    /// Create a record from `host` and a context map of additional fields.
    ///
    /// An empty `host` falls back to the local hostname. Context entries with
    /// reserved or malformed names are dropped and counted in
    /// [`rejected_fields`](Self::rejected_fields).
    pub fn with_context<I, K, V>(host: &str, context: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let mut record = if host.trim().is_empty() {
            Self::local()
        } else {
            Self::new(host)
        };
        for (name, value) in context {
            let _ = record.insert_field(name.as_ref(), value);
        }
        record
    }

    pub fn with_level(mut self, level: GelfLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the full message body.
    pub fn with_full_message(mut self, message: impl Into<String>) -> Self {
        self.full_message = Some(message.into());
        self
    }

    /// Set an explicit short message instead of deriving one.
    pub fn with_short_message(mut self, message: impl Into<String>) -> Self {
        self.short_message = Some(message.into());
        self
    }

    /// Attach an additional field, silently dropping it when refused.
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        let _ = self.insert_field(name, value);
        self
    }

    /// Attach an additional field.
    ///
    /// A single leading underscore is accepted and stripped, so `_user` and
    /// `user` address the same field. Inserting an existing name replaces the
    /// previous value.
    pub fn insert_field(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldRejection> {
        match normalise_field_name(name) {
            Ok(key) => {
                self.additional_fields.insert(key.to_owned(), value.into());
                Ok(())
            }
            Err(reason) => {
                debug!("femtogelf: dropping additional field {name:?}: {reason:?}");
                self.rejected_fields += 1;
                Err(reason)
            }
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn level(&self) -> GelfLevel {
        self.level
    }

    pub fn full_message(&self) -> Option<&str> {
        self.full_message.as_deref()
    }

    /// The short message to transmit.
    ///
    /// Returns the explicit short message when it has content, otherwise the
    /// first non-blank line of the full message truncated to
    /// [`SHORT_MESSAGE_MAX_CHARS`]. A record without text yields
    /// [`BLANK_SHORT_MESSAGE`].
    pub fn short_message(&self) -> &str {
        if let Some(short) = self.short_message.as_deref()
            && !short.trim().is_empty()
        {
            return short;
        }
        self.full_message
            .as_deref()
            .and_then(derive_short_message)
            .unwrap_or(BLANK_SHORT_MESSAGE)
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Seconds since the UNIX epoch with a fractional part.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp
            .duration_since(UNIX_EPOCH)
            .map(|dur| dur.as_secs_f64())
            .unwrap_or_default()
    }

    /// Additional fields keyed by name without the wire `_` prefix.
    pub fn additional_fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.additional_fields
    }

    /// Number of fields dropped because their names were refused.
    pub fn rejected_fields(&self) -> usize {
        self.rejected_fields
    }
}

impl fmt::Display for GelfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.host,
            self.level,
            self.short_message()
        )
    }
}

fn normalise_field_name(name: &str) -> Result<&str, FieldRejection> {
    let key = name.strip_prefix('_').unwrap_or(name);
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(FieldRejection::InvalidName);
    }
    if RESERVED_FIELDS.contains(&key) {
        return Err(FieldRejection::Reserved);
    }
    Ok(key)
}

fn derive_short_message(full: &str) -> Option<&str> {
    let line = full
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .find(|line| !line.trim().is_empty())?;
    match line.char_indices().nth(SHORT_MESSAGE_MAX_CHARS) {
        Some((cut, _)) => Some(&line[..cut]),
        None => Some(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("boom", "boom")]
    #[case("first line\nsecond line", "first line")]
    #[case("\n\n  indented\r\nrest", "  indented")]
    #[case("trailing   \n", "trailing   ")]
    #[case("carriage\r", "carriage")]
    fn derives_short_message_from_first_line(#[case] full: &str, #[case] expected: &str) {
        let record = GelfRecord::new("h1").with_full_message(full);
        assert_eq!(record.short_message(), expected);
    }

    #[test]
    fn short_message_is_truncated_on_char_boundary() {
        let full = "é".repeat(SHORT_MESSAGE_MAX_CHARS + 10);
        let record = GelfRecord::new("h1").with_full_message(full);
        let short = record.short_message();
        assert_eq!(short.chars().count(), SHORT_MESSAGE_MAX_CHARS);
    }

    #[test]
    fn explicit_short_message_wins() {
        let record = GelfRecord::new("h1")
            .with_short_message("summary")
            .with_full_message("details\nmore");
        assert_eq!(record.short_message(), "summary");
    }

    #[test]
    fn blank_record_uses_placeholder_short_message() {
        let record = GelfRecord::new("h1")
            .with_short_message("  ")
            .with_full_message("\n \n");
        assert_eq!(record.short_message(), BLANK_SHORT_MESSAGE);
        assert_eq!(GelfRecord::new("h1").short_message(), BLANK_SHORT_MESSAGE);
    }

    #[rstest]
    #[case("id", FieldRejection::Reserved)]
    #[case("_id", FieldRejection::Reserved)]
    #[case("level", FieldRejection::Reserved)]
    #[case("", FieldRejection::InvalidName)]
    #[case("_", FieldRejection::InvalidName)]
    #[case("has space", FieldRejection::InvalidName)]
    #[case("ümlaut", FieldRejection::InvalidName)]
    fn refuses_bad_field_names(#[case] name: &str, #[case] reason: FieldRejection) {
        let mut record = GelfRecord::new("h1");
        assert_eq!(record.insert_field(name, "x"), Err(reason));
        assert!(record.additional_fields().is_empty());
        assert_eq!(record.rejected_fields(), 1);
    }

    #[test]
    fn leading_underscore_is_not_doubled() {
        let record = GelfRecord::new("h1")
            .with_field("_user", "alice")
            .with_field("request.id", 7);
        let keys: Vec<&str> = record.additional_fields().keys().map(String::as_str).collect();
        assert_eq!(keys, ["request.id", "user"]);
    }

    #[test]
    fn empty_host_falls_back_to_local_hostname() {
        let record = GelfRecord::with_context("", [("user", "alice")]);
        assert_eq!(record.host(), local_hostname());
        assert_eq!(
            record.additional_fields().get("user"),
            Some(&FieldValue::from("alice"))
        );
    }
}
