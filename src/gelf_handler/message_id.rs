//! Message identifiers shared by the chunks of one GELF message.
//!
//! The collector treats the id as an opaque correlation key, so only its
//! length is fixed by the protocol. The digest used to derive it is a type
//! parameter of [`DigestMessageId`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

/// Length of the id carried in every chunk header.
pub const MESSAGE_ID_LEN: usize = 8;

/// Raw message id bytes.
pub type MessageId = [u8; MESSAGE_ID_LEN];

/// Source of message ids for chunked sends.
pub trait MessageIdStrategy: Send + Sync + fmt::Debug {
    /// Produce the id for the next chunked message.
    fn next_id(&self) -> MessageId;
}

/// Hashes a nanosecond timestamp, a random value, and a per-instance counter
/// and keeps the first eight bytes of the digest.
pub struct DigestMessageId<D = Sha256> {
    counter: AtomicU64,
    _digest: PhantomData<fn() -> D>,
}

impl<D> DigestMessageId<D> {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            _digest: PhantomData,
        }
    }
}

impl<D> Default for DigestMessageId<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for DigestMessageId<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestMessageId")
            .field("digest", &std::any::type_name::<D>())
            .field("issued", &self.counter.load(Ordering::Relaxed))
            .finish()
    }
}

impl<D: Digest> MessageIdStrategy for DigestMessageId<D> {
    fn next_id(&self) -> MessageId {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|dur| dur.as_nanos())
            .unwrap_or_default();
        let salt: u64 = rand::random();
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);

        let mut hasher = D::new();
        hasher.update(nanos.to_be_bytes());
        hasher.update(salt.to_be_bytes());
        hasher.update(sequence.to_be_bytes());
        let digest = hasher.finalize();

        // Digests shorter than the id leave the tail zeroed.
        let mut id = [0u8; MESSAGE_ID_LEN];
        let len = digest.len().min(MESSAGE_ID_LEN);
        id[..len].copy_from_slice(&digest[..len]);
        id
    }
}

/// Always returns the same id. Useful for reproducible output.
#[cfg(any(test, feature = "test-util"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedMessageId(pub MessageId);

#[cfg(any(test, feature = "test-util"))]
impl MessageIdStrategy for FixedMessageId {
    fn next_id(&self) -> MessageId {
        self.0
    }
}
