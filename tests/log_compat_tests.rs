//! The `log` crate bridge installed as the process-wide logger.
//!
//! Kept in its own test binary because a global logger can only be set once.

use std::io::Read;

use femtogelf::{GelfLogger, GelfTransport, MemorySink, TransportConfig};
use flate2::read::ZlibDecoder;
use log::LevelFilter;
use serde_json::Value;

fn decode(datagram: &[u8]) -> Value {
    let mut json = Vec::new();
    ZlibDecoder::new(datagram)
        .read_to_end(&mut json)
        .expect("inflate datagram");
    serde_json::from_slice(&json).expect("decode json")
}

#[test]
fn installed_logger_forwards_log_macros() {
    let sink = MemorySink::new();
    let transport =
        GelfTransport::with_sink(TransportConfig::default(), sink.clone()).expect("valid config");
    GelfLogger::new(transport)
        .with_host("svc-1")
        .install(LevelFilter::Info)
        .expect("install global logger");

    log::warn!(target: "app::db", "slow query took {}ms", 250);
    log::debug!(target: "app::db", "below max level");

    let datagrams = sink.datagrams();
    assert_eq!(datagrams.len(), 1);
    let doc = decode(&datagrams[0]);
    assert_eq!(doc["host"], "svc-1");
    assert_eq!(doc["level"], 4);
    assert_eq!(doc["short_message"], "slow query took 250ms");
    assert_eq!(doc["_target"], "app::db");
    assert_eq!(doc["_module_path"], module_path!());
    assert_eq!(doc["_file"], file!());
    assert!(doc["_line"].as_u64().is_some_and(|line| line > 0));

    let second = GelfLogger::new(
        GelfTransport::with_sink(TransportConfig::default(), MemorySink::new())
            .expect("valid config"),
    );
    assert!(second.install(LevelFilter::Info).is_err());
}
