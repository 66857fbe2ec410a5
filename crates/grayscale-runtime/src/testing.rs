//! Scripted in-process engine for tests
//!
//! Stands in for the remote worker: answers `convertToGrayscale` with a
//! canned reply, records everything sent on the log channel, and lets a test
//! push worker-originated traffic back to the host.

use crate::error::ChannelError;
use crate::messenger::{Engine, HostEndpoint, Messenger};
use async_trait::async_trait;
use grayscale_core::{ErrorCode, LogLevel, SdkConfig, SdkError, SdkResult};
use grayscale_transport::messages::{LogMessages, WireLogRecord, method};
use grayscale_transport::{
    JsonMethodCodec, MethodCall, MethodCodec, MethodReply, TransportError,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// How the scripted worker answers a conversion request
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Reply with this result value
    Success(serde_json::Value),
    /// Reply with a transport error
    Error(TransportError),
    /// Never reply
    Silent,
}

impl ScriptedReply {
    /// Successful conversion producing `path`
    pub fn result_path(path: &str) -> Self {
        ScriptedReply::Success(serde_json::json!({ "resultPath": path }))
    }
}

struct ScriptState {
    log_channel: String,
    starts: AtomicUsize,
    stops: AtomicUsize,
    image_sends: AtomicUsize,
    fail_start: AtomicBool,
    start_delay: Mutex<Option<Duration>>,
    reply: Mutex<ScriptedReply>,
    log_calls: Mutex<Vec<MethodCall>>,
    endpoint: Mutex<Option<HostEndpoint>>,
}

/// Engine double; clones share state so a test can keep a handle for inspection
#[derive(Clone)]
pub struct ScriptedEngine {
    state: Arc<ScriptState>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::for_config(&SdkConfig::default())
    }

    /// Engine bound to the channel names derived from `config`
    pub fn for_config(config: &SdkConfig) -> Self {
        Self {
            state: Arc::new(ScriptState {
                log_channel: config.log_channel_name(),
                starts: AtomicUsize::new(0),
                stops: AtomicUsize::new(0),
                image_sends: AtomicUsize::new(0),
                fail_start: AtomicBool::new(false),
                start_delay: Mutex::new(None),
                reply: Mutex::new(ScriptedReply::result_path("/tmp/out.jpg")),
                log_calls: Mutex::new(Vec::new()),
                endpoint: Mutex::new(None),
            }),
        }
    }

    pub fn replying(self, reply: ScriptedReply) -> Self {
        self.set_reply(reply);
        self
    }

    pub fn with_start_delay(self, delay: Duration) -> Self {
        *self.state.start_delay.lock() = Some(delay);
        self
    }

    pub fn failing_start(self) -> Self {
        self.state.fail_start.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_reply(&self, reply: ScriptedReply) {
        *self.state.reply.lock() = reply;
    }

    pub fn start_count(&self) -> usize {
        self.state.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.state.stops.load(Ordering::SeqCst)
    }

    /// Number of messages the host sent on the image channel
    pub fn image_send_count(&self) -> usize {
        self.state.image_sends.load(Ordering::SeqCst)
    }

    /// Calls the host sent on the log channel, in order
    pub fn log_calls(&self) -> Vec<MethodCall> {
        self.state.log_calls.lock().clone()
    }

    /// Send an `onLogMessage` batch to the host
    pub fn emit_logs(&self, records: &[(&str, LogLevel)]) -> SdkResult<()> {
        let entries = records
            .iter()
            .map(|(text, level)| serde_json::to_value(WireLogRecord::new(*text, *level)))
            .collect::<Result<Vec<_>, _>>()?;
        let args = serde_json::to_value(LogMessages {
            log_messages: entries,
        })?;
        self.emit_call(method::ON_LOG_MESSAGE, args)
    }

    /// Send an arbitrary call to the host on the log channel
    pub fn emit_call(&self, method: &str, args: serde_json::Value) -> SdkResult<()> {
        let data = JsonMethodCodec::new().encode_call(&MethodCall::new(method, args))?;
        self.emit_raw(data)
    }

    /// Send raw bytes to the host on the log channel
    pub fn emit_raw(&self, data: Vec<u8>) -> SdkResult<()> {
        let endpoint = self
            .state
            .endpoint
            .lock()
            .clone()
            .ok_or_else(|| SdkError::from_code(ErrorCode::MethodChannelNotInitialized))?;
        endpoint.deliver(&self.state.log_channel, data)?;
        Ok(())
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for ScriptedEngine {
    async fn start(&self, endpoint: HostEndpoint) -> SdkResult<Arc<dyn Messenger>> {
        self.state.starts.fetch_add(1, Ordering::SeqCst);

        let delay = *self.state.start_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.state.fail_start.load(Ordering::SeqCst) {
            return Err(SdkError::with_message(
                ErrorCode::UnknownError,
                "scripted engine refused to start",
            ));
        }

        *self.state.endpoint.lock() = Some(endpoint.clone());
        Ok(Arc::new(ScriptedMessenger {
            state: self.state.clone(),
            endpoint,
            codec: JsonMethodCodec::new(),
        }))
    }

    async fn stop(&self) -> SdkResult<()> {
        self.state.stops.fetch_add(1, Ordering::SeqCst);
        self.state.endpoint.lock().take();
        Ok(())
    }
}

struct ScriptedMessenger {
    state: Arc<ScriptState>,
    endpoint: HostEndpoint,
    codec: JsonMethodCodec,
}

#[async_trait]
impl Messenger for ScriptedMessenger {
    async fn send(&self, channel: &str, message: Vec<u8>) -> Result<(), ChannelError> {
        let call = self.codec.decode_call(&message)?;

        if channel == self.state.log_channel {
            self.state.log_calls.lock().push(call);
            return Ok(());
        }

        self.state.image_sends.fetch_add(1, Ordering::SeqCst);
        let script = self.state.reply.lock().clone();
        let reply = match (call.method.as_str(), script) {
            (method::CONVERT_TO_GRAYSCALE, ScriptedReply::Success(result)) => {
                MethodReply::success(result)
            }
            (method::CONVERT_TO_GRAYSCALE, ScriptedReply::Error(error)) => {
                MethodReply::error(error)
            }
            (method::CONVERT_TO_GRAYSCALE, ScriptedReply::Silent) => return Ok(()),
            (other, _) => MethodReply::error(TransportError::new(
                "UNKNOWN_METHOD",
                Some(format!("Unknown method: {other}")),
            )),
        };
        let reply = match call.id {
            Some(id) => reply.with_id(id),
            None => reply,
        };

        let data = self.codec.encode_reply(&reply)?;
        self.endpoint.deliver(channel, data)
    }
}
