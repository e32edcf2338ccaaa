//! Syslog severities carried in the GELF `level` field.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Severity of a GELF message, numbered as in RFC 5424.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum GelfLevel {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

/// Error returned when a name or number does not denote a severity.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown GELF level: {0}")]
pub struct InvalidLevel(pub String);

impl GelfLevel {
    /// Every severity, most severe first.
    pub const ALL: [GelfLevel; 8] = [
        GelfLevel::Emergency,
        GelfLevel::Alert,
        GelfLevel::Critical,
        GelfLevel::Error,
        GelfLevel::Warning,
        GelfLevel::Notice,
        GelfLevel::Info,
        GelfLevel::Debug,
    ];

    /// Numeric value written to the wire.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GelfLevel::Emergency => "EMERGENCY",
            GelfLevel::Alert => "ALERT",
            GelfLevel::Critical => "CRITICAL",
            GelfLevel::Error => "ERROR",
            GelfLevel::Warning => "WARNING",
            GelfLevel::Notice => "NOTICE",
            GelfLevel::Info => "INFO",
            GelfLevel::Debug => "DEBUG",
        }
    }
}

impl Default for GelfLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl fmt::Display for GelfLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GelfLevel {
    type Err = InvalidLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMERGENCY" | "EMERG" => Ok(Self::Emergency),
            "ALERT" => Ok(Self::Alert),
            "CRITICAL" | "CRIT" => Ok(Self::Critical),
            "ERROR" | "ERR" => Ok(Self::Error),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "NOTICE" => Ok(Self::Notice),
            "INFO" | "INFORMATIONAL" => Ok(Self::Info),
            "DEBUG" => Ok(Self::Debug),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(|n| Self::try_from(n).ok())
                .ok_or_else(|| InvalidLevel(s.to_owned())),
        }
    }
}

impl TryFrom<u8> for GelfLevel {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, InvalidLevel> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| InvalidLevel(value.to_string()))
    }
}

impl From<GelfLevel> for u8 {
    fn from(level: GelfLevel) -> Self {
        level.as_u8()
    }
}

/// `log` has no notion of the syslog levels above `Error`, and folds
/// `Trace` into GELF's most verbose level.
impl From<log::Level> for GelfLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => GelfLevel::Error,
            log::Level::Warn => GelfLevel::Warning,
            log::Level::Info => GelfLevel::Info,
            log::Level::Debug | log::Level::Trace => GelfLevel::Debug,
        }
    }
}

impl Serialize for GelfLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}
