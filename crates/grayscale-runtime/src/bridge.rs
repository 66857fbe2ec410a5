//! Request bridge composing the image and log channels

use crate::channel::MethodChannel;
use crate::messenger::{Engine, HostEndpoint};
use crate::shutdown::{ShutdownHandle, ShutdownSignal};
use grayscale_core::{ErrorCode, LifecycleState, LogLevel, SdkConfig, SdkError, SdkResult};
use grayscale_logging::LogDispatcher;
use grayscale_transport::messages::{
    ConvertRequest, ConvertResponse, LogMessages, SetLogInterceptorArgs, SetMinimumLogLevelArgs,
    method,
};
use grayscale_transport::{JsonMethodCodec, MethodCall, MethodCodec, ReplyOutcome};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Channels and pump tasks of one started worker
struct Connection {
    image: Arc<MethodChannel>,
    log: Arc<MethodChannel>,
    shutdown: ShutdownHandle,
    pumps: Mutex<Vec<JoinHandle<()>>>,
}

impl Connection {
    fn close(&self) {
        self.shutdown.trigger();
        self.image.close();
        self.log.close();
    }
}

/// Bridge between the host and the remote worker
///
/// Owns the worker lifecycle and the two channels. Log records arriving from
/// the worker are routed into the shared [`LogDispatcher`] independently of
/// any conversion in flight.
pub struct RequestBridge {
    engine: Arc<dyn Engine>,
    dispatcher: Arc<LogDispatcher>,
    config: SdkConfig,
    codec: Arc<dyn MethodCodec>,
    lifecycle: tokio::sync::Mutex<()>,
    connection: RwLock<Option<Arc<Connection>>>,
    state: AtomicU8,
}

impl RequestBridge {
    pub fn new(engine: Arc<dyn Engine>, dispatcher: Arc<LogDispatcher>) -> Self {
        Self::with_config(engine, dispatcher, SdkConfig::default())
    }

    pub fn with_config(
        engine: Arc<dyn Engine>,
        dispatcher: Arc<LogDispatcher>,
        config: SdkConfig,
    ) -> Self {
        Self {
            engine,
            dispatcher,
            config,
            codec: Arc::new(JsonMethodCodec::new()),
            lifecycle: tokio::sync::Mutex::new(()),
            connection: RwLock::new(None),
            state: AtomicU8::new(LifecycleState::Uninitialized as u8),
        }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<LogDispatcher> {
        &self.dispatcher
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, next: LifecycleState) {
        let current = self.state();
        if !current.can_transition_to(next) {
            tracing::debug!("Unexpected lifecycle transition {} -> {}", current, next);
        }
        self.state.store(next as u8, Ordering::SeqCst);
    }

    fn connection(&self) -> Option<Arc<Connection>> {
        self.connection.read().clone()
    }

    /// Version reported without touching the worker
    pub fn query_version_local(&self) -> String {
        self.config
            .version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }

    /// Start the worker and open both channels
    ///
    /// Concurrent and repeated calls start the worker at most once. Returns
    /// `Ok(true)` once ready, `Ok(false)` after an earlier start failed.
    pub async fn initialize_worker(&self) -> SdkResult<bool> {
        if self.connection.read().is_some() {
            return Ok(true);
        }

        let _lifecycle = self.lifecycle.lock().await;
        match self.state() {
            LifecycleState::Ready => return Ok(true),
            LifecycleState::Failed => {
                tracing::warn!("Worker failed to start earlier; not retrying");
                return Ok(false);
            }
            _ => {}
        }

        self.set_state(LifecycleState::Starting);

        let image_name = self.config.image_channel_name();
        let log_name = self.config.log_channel_name();
        let (endpoint, mut receivers) = HostEndpoint::bind([image_name.clone(), log_name.clone()]);
        let (Some(image_inbound), Some(log_inbound)) =
            (receivers.remove(&image_name), receivers.remove(&log_name))
        else {
            self.set_state(LifecycleState::Failed);
            return Err(SdkError::from_code(ErrorCode::MethodChannelNotInitialized));
        };

        tracing::info!("Starting worker for {}", self.config.identifier);
        let messenger = match self.engine.start(endpoint).await {
            Ok(messenger) => messenger,
            Err(e) => {
                tracing::error!("Worker failed to start: {}", e);
                self.set_state(LifecycleState::Failed);
                return Err(e);
            }
        };

        let image = Arc::new(MethodChannel::new(
            image_name,
            messenger.clone(),
            self.codec.clone(),
        ));
        let log = Arc::new(MethodChannel::new(log_name, messenger, self.codec.clone()));
        let shutdown = ShutdownHandle::new();

        let pumps = vec![
            tokio::spawn(pump_replies(image.clone(), image_inbound, shutdown.signal())),
            tokio::spawn(pump_log_calls(
                self.dispatcher.clone(),
                self.codec.clone(),
                log_inbound,
                shutdown.signal(),
            )),
        ];

        *self.connection.write() = Some(Arc::new(Connection {
            image,
            log,
            shutdown,
            pumps: Mutex::new(pumps),
        }));
        self.set_state(LifecycleState::Ready);
        tracing::info!("Worker ready");

        Ok(true)
    }

    /// Convert the image at `image_path`, returning the path of the result
    pub async fn convert(&self, image_path: &str) -> SdkResult<String> {
        let connection = self
            .connection()
            .ok_or_else(|| SdkError::from_code(ErrorCode::MethodChannelNotInitialized))?;

        if image_path.is_empty() {
            return Err(SdkError::from_code(ErrorCode::ImagePathRequired));
        }
        if !Path::new(image_path).exists() {
            return Err(SdkError::with_message(
                ErrorCode::ImageFileNotFound,
                format!("Image file does not exist at path: {image_path}"),
            ));
        }

        let args = serde_json::to_value(ConvertRequest {
            image_path: image_path.to_string(),
        })?;
        let reply = connection
            .image
            .invoke(
                method::CONVERT_TO_GRAYSCALE,
                args,
                self.config.request_timeout(),
            )
            .await?;

        match reply.into_outcome() {
            ReplyOutcome::Error(error) => {
                tracing::debug!("Conversion failed on worker: {}", error.code);
                Err(error.into())
            }
            ReplyOutcome::Success(result) => serde_json::from_value::<ConvertResponse>(result)
                .map(|response| response.result_path)
                .map_err(|_| SdkError::from_code(ErrorCode::InvalidResponse)),
        }
    }

    /// Tell the worker whether a local interceptor is registered
    pub async fn push_log_interceptor_state(
        &self,
        enabled: bool,
        minimum_log_level: Option<LogLevel>,
    ) -> SdkResult<()> {
        let args = SetLogInterceptorArgs {
            enabled,
            minimum_log_level,
        };
        self.notify_log_channel(
            method::SET_LOG_INTERCEPTOR,
            args,
            ErrorCode::SetLogInterceptorError,
        )
        .await
    }

    /// Tell the worker the minimum level it should forward
    pub async fn push_minimum_log_level(&self, level: LogLevel) -> SdkResult<()> {
        let args = SetMinimumLogLevelArgs {
            minimum_log_level: level,
        };
        self.notify_log_channel(
            method::SET_MINIMUM_LOG_LEVEL,
            args,
            ErrorCode::SetMinimumLogLevelError,
        )
        .await
    }

    async fn notify_log_channel<T: serde::Serialize>(
        &self,
        method: &str,
        args: T,
        failure: ErrorCode,
    ) -> SdkResult<()> {
        let connection = self.connection().ok_or_else(|| {
            SdkError::with_message(
                failure,
                ErrorCode::MethodChannelNotInitialized.default_message(),
            )
        })?;
        let args =
            serde_json::to_value(args).map_err(|e| SdkError::with_message(failure, e.to_string()))?;
        connection
            .log
            .notify(method, args)
            .await
            .map_err(|e| SdkError::with_message(failure, e.to_string()))
    }

    /// Close both channels and stop the worker
    ///
    /// Pending conversions fail with [`ErrorCode::ChannelClosed`]. Returns
    /// `Ok(false)` when there was nothing to stop.
    pub async fn shutdown(&self) -> SdkResult<bool> {
        let _lifecycle = self.lifecycle.lock().await;
        let taken = self.connection.write().take();
        let Some(connection) = taken else {
            return Ok(false);
        };

        self.set_state(LifecycleState::Stopping);
        connection.close();

        let pumps = std::mem::take(&mut *connection.pumps.lock());
        for pump in pumps {
            if let Err(e) = pump.await {
                tracing::warn!("Channel pump ended abnormally: {}", e);
            }
        }

        match self.engine.stop().await {
            Ok(()) => {
                self.set_state(LifecycleState::Stopped);
                tracing::info!("Worker stopped");
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Worker failed to stop: {}", e);
                self.set_state(LifecycleState::Failed);
                Err(e)
            }
        }
    }
}

impl Drop for RequestBridge {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.get_mut().take() {
            connection.close();
        }
    }
}

impl std::fmt::Debug for RequestBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBridge")
            .field("identifier", &self.config.identifier)
            .field("state", &self.state())
            .finish()
    }
}

/// Feed replies arriving on the image channel to their waiting calls
async fn pump_replies(
    channel: Arc<MethodChannel>,
    mut inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    mut shutdown: ShutdownSignal,
) {
    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            frame = inbound.recv() => match frame {
                Some(data) => {
                    channel.handle_reply(&data);
                }
                None => break,
            },
        }
    }
    tracing::debug!(channel = channel.name(), "Reply pump stopped");
}

/// Route calls arriving on the log channel
async fn pump_log_calls(
    dispatcher: Arc<LogDispatcher>,
    codec: Arc<dyn MethodCodec>,
    mut inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    mut shutdown: ShutdownSignal,
) {
    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            frame = inbound.recv() => match frame {
                Some(data) => match codec.decode_call(&data) {
                    Ok(call) => route_log_call(&dispatcher, call),
                    Err(e) => tracing::warn!("Dropping undecodable log channel frame: {}", e),
                },
                None => break,
            },
        }
    }
    tracing::debug!("Log pump stopped");
}

fn route_log_call(dispatcher: &LogDispatcher, call: MethodCall) {
    match call.method.as_str() {
        method::ON_LOG_MESSAGE => match call.args_as::<LogMessages>() {
            Ok(batch) => {
                dispatcher.dispatch_raw(&batch.log_messages);
            }
            Err(e) => tracing::warn!("Malformed onLogMessage arguments: {}", e),
        },
        other => tracing::warn!("Unrecognized method name: {}", other),
    }
}
