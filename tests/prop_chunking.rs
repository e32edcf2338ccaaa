//! Property-based tests for GELF chunking.
//!
//! Random payloads and chunk sizes check that splitting either produces a
//! complete, correctly numbered chunk sequence or refuses the message.

use femtogelf::gelf_handler::chunk::{chunk_count, into_datagrams};
use femtogelf::gelf_handler::{
    CHUNK_HEADER_LEN, ChunkedEnvelope, DigestMessageId, GelfError, MAX_CHUNKS,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_chunks_reassemble_or_refuse(
        payload in proptest::collection::vec(any::<u8>(), 1..4096),
        max_chunk_size in 1usize..256,
    ) {
        let ids = DigestMessageId::<sha2::Sha256>::new();
        let expected = chunk_count(payload.len(), max_chunk_size);
        match into_datagrams(payload.clone(), max_chunk_size, &ids) {
            Ok(datagrams) if expected == 1 => {
                prop_assert_eq!(datagrams, vec![payload]);
            }
            Ok(datagrams) => {
                prop_assert!(expected <= MAX_CHUNKS);
                prop_assert_eq!(datagrams.len(), expected);
                let envelopes: Vec<ChunkedEnvelope<'_>> = datagrams
                    .iter()
                    .map(|d| ChunkedEnvelope::decode(d).expect("chunked datagram"))
                    .collect();
                let mut rebuilt = Vec::with_capacity(payload.len());
                for (seq, envelope) in envelopes.iter().enumerate() {
                    prop_assert_eq!(envelope.message_id, envelopes[0].message_id);
                    prop_assert_eq!(usize::from(envelope.sequence_number), seq);
                    prop_assert_eq!(usize::from(envelope.sequence_count), expected);
                    prop_assert!(envelope.payload.len() <= max_chunk_size);
                    rebuilt.extend_from_slice(envelope.payload);
                }
                prop_assert!(datagrams.iter().all(|d| d.len() <= max_chunk_size + CHUNK_HEADER_LEN));
                prop_assert_eq!(rebuilt, payload);
            }
            Err(GelfError::OversizeMessage { chunks }) => {
                prop_assert!(expected > MAX_CHUNKS);
                prop_assert_eq!(chunks, expected);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
