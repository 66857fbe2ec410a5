#![allow(non_snake_case)]

use grayscale_runtime::testing::{ScriptedEngine, ScriptedReply};
use grayscale_sdk::prelude::*;
use grayscale_sdk::{DispatcherLayer, TransportError};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::NamedTempFile;
use test_case::test_case;
use tracing_subscriber::layer::SubscriberExt;

type Received = Arc<Mutex<Vec<(String, LogLevel)>>>;

fn recording_sink(level: LogLevel) -> (Arc<dyn LogSink>, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let target = received.clone();
    let sink = FnSink::new(level, move |message: &str, level: LogLevel| {
        target.lock().push((message.to_string(), level));
    });
    (Arc::new(sink), received)
}

const FLUSH_MARKER: &str = "flush marker";

/// Sink that records deliveries and counts threshold reads (one per dispatched batch)
struct TrackingSink {
    level: LogLevel,
    received: Mutex<Vec<(String, LogLevel)>>,
    threshold_reads: AtomicUsize,
}

impl TrackingSink {
    fn new(level: LogLevel) -> Arc<Self> {
        Arc::new(Self {
            level,
            received: Mutex::new(Vec::new()),
            threshold_reads: AtomicUsize::new(0),
        })
    }

    fn threshold_reads(&self) -> usize {
        self.threshold_reads.load(Ordering::SeqCst)
    }

    fn received(&self) -> Vec<(String, LogLevel)> {
        self.received
            .lock()
            .iter()
            .filter(|(text, _)| text != FLUSH_MARKER)
            .cloned()
            .collect()
    }
}

impl LogSink for TrackingSink {
    fn minimum_level(&self) -> LogLevel {
        self.threshold_reads.fetch_add(1, Ordering::SeqCst);
        self.level
    }

    fn on_log_message(&self, message: &str, level: LogLevel) {
        self.received.lock().push((message.to_string(), level));
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .unwrap();
}

/// Waits until `batches` log batches sent after `reads_before` was taken are dispatched
///
/// Log calls are handled in order, so once a trailing marker batch reads the
/// threshold every earlier batch has finished.
async fn flush_logs(engine: &ScriptedEngine, sink: &TrackingSink, reads_before: usize, batches: usize) {
    engine.emit_logs(&[(FLUSH_MARKER, LogLevel::Error)]).unwrap();
    wait_until(|| sink.threshold_reads() > reads_before + batches).await;
}

#[tokio::test]
async fn GrayscaleSdk___full_session___converts_and_relays_logs() {
    let engine = ScriptedEngine::new().replying(ScriptedReply::result_path("/tmp/out.jpg"));
    let sdk = GrayscaleSdk::new(Arc::new(engine.clone()));
    let (sink, received) = recording_sink(LogLevel::Info);
    let file = NamedTempFile::new().unwrap();

    sdk.set_log_interceptor(Some(sink)).await;
    assert!(sdk.initialize().await.unwrap());
    let result = sdk
        .convert_to_grayscale(&file.path().to_string_lossy())
        .await
        .unwrap();
    engine
        .emit_logs(&[("converted", LogLevel::Info), ("noise", LogLevel::Verbose)])
        .unwrap();
    wait_until(|| !received.lock().is_empty()).await;

    assert_eq!(result, "/tmp/out.jpg");
    assert_eq!(
        *received.lock(),
        vec![("converted".to_string(), LogLevel::Info)]
    );
    assert!(sdk.shutdown().await.unwrap());
}

#[test_case(LogLevel::Verbose, 5 ; "verbose passes everything")]
#[test_case(LogLevel::Debug, 4 ; "debug drops verbose")]
#[test_case(LogLevel::Info, 3 ; "info")]
#[test_case(LogLevel::Warning, 2 ; "warning keeps warning and error")]
#[test_case(LogLevel::Error, 1 ; "error keeps only error")]
#[test_case(LogLevel::None, 0 ; "none silences")]
#[tokio::test]
async fn GrayscaleSdk___worker_logs___filtered_by_sink_threshold(threshold: LogLevel, expected: usize) {
    let engine = ScriptedEngine::new();
    let sdk = GrayscaleSdk::new(Arc::new(engine.clone()));
    let sink = TrackingSink::new(threshold);
    sdk.set_log_interceptor(Some(sink.clone())).await;
    sdk.initialize().await.unwrap();
    let reads_before = sink.threshold_reads();

    engine
        .emit_logs(&[
            ("v", LogLevel::Verbose),
            ("d", LogLevel::Debug),
            ("i", LogLevel::Info),
            ("w", LogLevel::Warning),
            ("e", LogLevel::Error),
        ])
        .unwrap();
    flush_logs(&engine, &sink, reads_before, 1).await;

    assert_eq!(sink.received().len(), expected);
}

#[tokio::test]
async fn GrayscaleSdk___replaced_interceptor___only_new_sink_receives() {
    let engine = ScriptedEngine::new();
    let sdk = GrayscaleSdk::new(Arc::new(engine.clone()));
    let first = TrackingSink::new(LogLevel::Verbose);
    let second = TrackingSink::new(LogLevel::Verbose);
    sdk.initialize().await.unwrap();

    sdk.set_log_interceptor(Some(first.clone())).await;
    sdk.set_log_interceptor(Some(second.clone())).await;
    let reads_before = second.threshold_reads();
    engine.emit_logs(&[("hello", LogLevel::Info)]).unwrap();
    flush_logs(&engine, &second, reads_before, 1).await;

    assert!(first.received.lock().is_empty());
    assert_eq!(second.received(), vec![("hello".to_string(), LogLevel::Info)]);
}

#[tokio::test]
async fn GrayscaleSdk___malformed_log_entries___skipped_without_losing_batch() {
    let engine = ScriptedEngine::new();
    let sdk = GrayscaleSdk::new(Arc::new(engine.clone()));
    let sink = TrackingSink::new(LogLevel::Verbose);
    sdk.set_log_interceptor(Some(sink.clone())).await;
    sdk.initialize().await.unwrap();
    let reads_before = sink.threshold_reads();

    engine
        .emit_call(
            "onLogMessage",
            json!({"logMessages": [
                {"text": "first", "priority": "E"},
                {"text": "bad priority", "priority": "X"},
                {"priority": "I"},
                {"text": "last", "priority": "D"}
            ]}),
        )
        .unwrap();
    flush_logs(&engine, &sink, reads_before, 1).await;

    assert_eq!(
        sink.received(),
        vec![
            ("first".to_string(), LogLevel::Error),
            ("last".to_string(), LogLevel::Debug),
        ]
    );
}

#[tokio::test]
async fn GrayscaleSdk___worker_error_reply___surfaces_structured_error() {
    let engine = ScriptedEngine::new().replying(ScriptedReply::Error(TransportError::new(
        "CONVERSION_FAILED",
        None,
    )));
    let sdk = GrayscaleSdk::new(Arc::new(engine.clone()));
    sdk.initialize().await.unwrap();
    let file = NamedTempFile::new().unwrap();

    let err = sdk
        .convert_to_grayscale(&file.path().to_string_lossy())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::UnknownError.code());
    assert_eq!(err.message, "Unknown error");
    assert_eq!(err.failure_reason(), "Error code: 9001");
}

#[tokio::test]
async fn GrayscaleSdk___engine_start_failure___later_initialize_returns_false() {
    let engine = ScriptedEngine::new().failing_start();
    let sdk = GrayscaleSdk::new(Arc::new(engine.clone()));

    assert!(sdk.initialize().await.is_err());
    assert!(!sdk.initialize().await.unwrap());
    assert_eq!(engine.start_count(), 1);
}

#[tokio::test]
async fn GrayscaleSdk___independent_instances___do_not_share_sinks() {
    let first = GrayscaleSdk::new(Arc::new(ScriptedEngine::new()));
    let second = GrayscaleSdk::new(Arc::new(ScriptedEngine::new()));
    let (sink, _) = recording_sink(LogLevel::Info);

    first.set_log_interceptor(Some(sink)).await;

    assert!(first.dispatcher().has_sink());
    assert!(!second.dispatcher().has_sink());
}

#[tokio::test]
async fn DispatcherLayer___sdk_tracing_events___reach_interceptor() {
    let engine = ScriptedEngine::new();
    let sdk = GrayscaleSdk::new(Arc::new(engine.clone()));
    let (sink, received) = recording_sink(LogLevel::Warning);
    sdk.set_log_interceptor(Some(sink)).await;
    sdk.initialize().await.unwrap();

    let subscriber = tracing_subscriber::registry().with(DispatcherLayer::new(sdk.dispatcher()));
    let _guard = tracing::subscriber::set_default(subscriber);

    engine.emit_call("onUnknownThing", json!({})).unwrap();

    wait_until(|| {
        received.lock().iter().any(|(text, level)| {
            *level == LogLevel::Warning && text.contains("Unrecognized method name: onUnknownThing")
        })
    })
    .await;
}
