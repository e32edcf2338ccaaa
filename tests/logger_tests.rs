//! End-to-end tests sending through `GelfLogger` to a local UDP receiver.

use std::collections::HashMap;
use std::io::Read;
use std::net::UdpSocket;
use std::time::Duration;

use femtogelf::{ChunkedEnvelope, FieldValue, GelfHandlerBuilder, GelfLevel, NO_CONTEXT};
use flate2::read::ZlibDecoder;
use rstest::{fixture, rstest};
use serde_json::Value;

struct Collector {
    socket: UdpSocket,
}

impl Collector {
    fn port(&self) -> u16 {
        self.socket.local_addr().expect("collector address").port()
    }

    /// Receive datagrams until one complete message is assembled.
    fn next_message(&self) -> Value {
        let mut pending: HashMap<[u8; 8], Vec<Option<Vec<u8>>>> = HashMap::new();
        let mut buf = [0u8; 65_535];
        loop {
            let (len, _) = self.socket.recv_from(&mut buf).expect("receive datagram");
            let datagram = &buf[..len];
            let Some(envelope) = ChunkedEnvelope::decode(datagram) else {
                return inflate(datagram);
            };
            let slots = pending
                .entry(envelope.message_id)
                .or_insert_with(|| vec![None; usize::from(envelope.sequence_count)]);
            slots[usize::from(envelope.sequence_number)] = Some(envelope.payload.to_vec());
            if slots.iter().all(Option::is_some) {
                let payload: Vec<u8> = slots.iter().flatten().flatten().copied().collect();
                return inflate(&payload);
            }
        }
    }
}

fn inflate(bytes: &[u8]) -> Value {
    let mut json = Vec::new();
    ZlibDecoder::new(bytes)
        .read_to_end(&mut json)
        .expect("inflate payload");
    serde_json::from_slice(&json).expect("decode json")
}

#[fixture]
fn collector() -> Collector {
    let socket = UdpSocket::bind(("127.0.0.1", 0)).expect("bind collector");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set read timeout");
    Collector { socket }
}

#[rstest]
fn error_reaches_collector(collector: Collector) {
    let logger = GelfHandlerBuilder::new()
        .with_collector("127.0.0.1", collector.port())
        .with_source_host("web-1".into())
        .build_logger()
        .expect("build logger");

    assert!(logger.error("boom", [("user", "alice")]));
    let doc = collector.next_message();
    assert_eq!(doc["version"], "1.1");
    assert_eq!(doc["host"], "web-1");
    assert_eq!(doc["short_message"], "boom");
    assert_eq!(doc["full_message"], "boom");
    assert_eq!(doc["level"], 3);
    assert_eq!(doc["_user"], "alice");
}

#[rstest]
fn chunked_message_reassembles_at_collector(collector: Collector) {
    let logger = GelfHandlerBuilder::new()
        .with_collector("127.0.0.1", collector.port())
        .with_max_chunk_size(128)
        .with_compression_level(0)
        .build_logger()
        .expect("build logger");

    let body = "stack frame\n".repeat(200);
    assert!(logger.log(
        GelfLevel::Critical,
        &body,
        [("attempt", FieldValue::from(2)), ("retry", FieldValue::from(false))],
    ));
    let doc = collector.next_message();
    assert_eq!(doc["short_message"], "stack frame");
    assert_eq!(doc["full_message"], body.as_str());
    assert_eq!(doc["level"], 2);
    assert_eq!(doc["_attempt"], 2);
    assert_eq!(doc["_retry"], false);
}

#[rstest]
fn oversize_message_is_dropped(collector: Collector) {
    let logger = GelfHandlerBuilder::new()
        .with_collector("127.0.0.1", collector.port())
        .with_max_chunk_size(16)
        .with_compression_level(0)
        .build_logger()
        .expect("build logger");

    assert!(!logger.info(&"x".repeat(16 * 128 + 1), NO_CONTEXT));
    assert_eq!(logger.failed_count(), 1);

    assert!(logger.info("small", NO_CONTEXT));
    // Only the small message arrives: no fragment of the oversize one was sent.
    let doc = collector.next_message();
    assert_eq!(doc["short_message"], "small");
}
