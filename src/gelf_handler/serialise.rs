//! JSON serialisation and zlib compression of GELF records.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::{Compression, write::ZlibEncoder};
use serde::Serialize;

use crate::field_value::FieldValue;
use crate::level::GelfLevel;
use crate::log_record::{GELF_VERSION, GelfRecord};

use super::error::GelfError;

#[derive(Serialize)]
struct SerializableRecord<'a> {
    version: &'static str,
    host: &'a str,
    short_message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_message: Option<&'a str>,
    timestamp: f64,
    level: GelfLevel,
    #[serde(flatten)]
    additional: BTreeMap<String, &'a FieldValue>,
}

impl<'a> From<&'a GelfRecord> for SerializableRecord<'a> {
    fn from(record: &'a GelfRecord) -> Self {
        let additional = record
            .additional_fields()
            .iter()
            .map(|(name, value)| (format!("_{name}"), value))
            .collect();
        Self {
            version: GELF_VERSION,
            host: record.host(),
            short_message: record.short_message(),
            full_message: record.full_message(),
            timestamp: record.timestamp_secs(),
            level: record.level(),
            additional,
        }
    }
}

/// Serialise a record into compact GELF JSON.
///
/// Standard fields come first in a fixed order, followed by the additional
/// fields sorted by name.
pub fn serialise_record(record: &GelfRecord) -> Result<Vec<u8>, GelfError> {
    let serialisable = SerializableRecord::from(record);
    let mut buf = Vec::with_capacity(256);
    serde_json::to_writer(&mut buf, &serialisable).map_err(GelfError::encoding)?;
    Ok(buf)
}

/// Compress `payload` into a zlib stream.
pub fn compress_payload(payload: &[u8], level: Compression) -> Result<Vec<u8>, GelfError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(payload.len() / 2 + 16), level);
    encoder.write_all(payload).map_err(GelfError::encoding)?;
    encoder.finish().map_err(GelfError::encoding)
}
