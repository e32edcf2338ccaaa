//! GELF UDP chunking.
//!
//! Payloads larger than the configured chunk size are split into at most
//! [`MAX_CHUNKS`] datagrams, each prefixed with a 14-byte header:
//!
//! ```text
//! offset  size  field
//! 0       2     magic 0x1e 0x0f
//! 2       8     message id
//! 10      2     sequence number, big-endian
//! 12      2     sequence count, big-endian
//! 14      N     payload slice
//! ```

use super::config::check_max_chunk_size;
use super::error::GelfError;
use super::message_id::{MESSAGE_ID_LEN, MessageId, MessageIdStrategy};

/// Marker opening every chunked datagram.
pub const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];
/// Bytes prepended to each chunk payload.
pub const CHUNK_HEADER_LEN: usize = CHUNK_MAGIC.len() + MESSAGE_ID_LEN + 2 + 2;
/// Protocol ceiling on the number of chunks per message.
pub const MAX_CHUNKS: usize = 128;

/// One chunk of a split message, borrowed from the compressed payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkedEnvelope<'a> {
    pub message_id: MessageId,
    pub sequence_number: u16,
    pub sequence_count: u16,
    pub payload: &'a [u8],
}

impl<'a> ChunkedEnvelope<'a> {
    /// Serialise header and payload into one datagram.
    pub fn encode(&self) -> Vec<u8> {
        let mut datagram = Vec::with_capacity(CHUNK_HEADER_LEN + self.payload.len());
        datagram.extend_from_slice(&CHUNK_MAGIC);
        datagram.extend_from_slice(&self.message_id);
        datagram.extend(self.sequence_number.to_be_bytes());
        datagram.extend(self.sequence_count.to_be_bytes());
        datagram.extend_from_slice(self.payload);
        datagram
    }

    /// Parse a chunked datagram. Returns `None` for unchunked datagrams and
    /// for headers whose sequence fields are inconsistent.
    pub fn decode(datagram: &'a [u8]) -> Option<Self> {
        if !is_chunked(datagram) {
            return None;
        }
        let mut message_id = [0u8; MESSAGE_ID_LEN];
        message_id.copy_from_slice(&datagram[2..10]);
        let sequence_number = u16::from_be_bytes([datagram[10], datagram[11]]);
        let sequence_count = u16::from_be_bytes([datagram[12], datagram[13]]);
        if sequence_count == 0 || sequence_number >= sequence_count {
            return None;
        }
        Some(Self {
            message_id,
            sequence_number,
            sequence_count,
            payload: &datagram[CHUNK_HEADER_LEN..],
        })
    }
}

/// Whether `datagram` starts with a complete chunk header.
pub fn is_chunked(datagram: &[u8]) -> bool {
    datagram.len() >= CHUNK_HEADER_LEN && datagram[..2] == CHUNK_MAGIC
}

/// Number of slices needed for `len` bytes at `max_chunk_size` bytes each.
///
/// `max_chunk_size` must be positive.
pub fn chunk_count(len: usize, max_chunk_size: usize) -> usize {
    len.div_ceil(max_chunk_size)
}

/// Turn a compressed payload into the datagrams to transmit.
///
/// Payloads that fit in one chunk are returned as-is with no header. Larger
/// payloads are split and framed under a single id drawn from `ids`. Nothing
/// is produced when the split would exceed [`MAX_CHUNKS`] or when
/// `max_chunk_size` is outside the range accepted by
/// [`check_max_chunk_size`].
pub fn into_datagrams(
    payload: Vec<u8>,
    max_chunk_size: usize,
    ids: &dyn MessageIdStrategy,
) -> Result<Vec<Vec<u8>>, GelfError> {
    let max_chunk_size = check_max_chunk_size(max_chunk_size)?;
    if payload.len() <= max_chunk_size {
        return Ok(vec![payload]);
    }

    let chunks = chunk_count(payload.len(), max_chunk_size);
    if chunks > MAX_CHUNKS {
        return Err(GelfError::OversizeMessage { chunks });
    }
    let sequence_count =
        u16::try_from(chunks).map_err(|_| GelfError::OversizeMessage { chunks })?;

    let message_id = ids.next_id();
    Ok(payload
        .chunks(max_chunk_size)
        .zip(0u16..)
        .map(|(slice, sequence_number)| {
            ChunkedEnvelope {
                message_id,
                sequence_number,
                sequence_count,
                payload: slice,
            }
            .encode()
        })
        .collect())
}
