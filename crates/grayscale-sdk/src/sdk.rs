//! Async SDK facade

use grayscale_core::{LifecycleState, LogLevel, SdkConfig, SdkResult};
use grayscale_logging::{LogDispatcher, LogSink};
use grayscale_runtime::{Engine, RequestBridge};
use std::sync::Arc;

/// Entry point for host applications
///
/// Construct one per worker and share it by reference or `Arc`. Log records
/// coming back from the worker go to the sink registered with
/// [`set_log_interceptor`](Self::set_log_interceptor).
#[derive(Debug)]
pub struct GrayscaleSdk {
    bridge: RequestBridge,
}

impl GrayscaleSdk {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self::with_config(engine, SdkConfig::default())
    }

    pub fn with_config(engine: Arc<dyn Engine>, config: SdkConfig) -> Self {
        Self::with_dispatcher(engine, Arc::new(LogDispatcher::new()), config)
    }

    /// Build on an existing dispatcher, e.g. one already passed to
    /// [`init_logging`](grayscale_logging::init_logging)
    pub fn with_dispatcher(
        engine: Arc<dyn Engine>,
        dispatcher: Arc<LogDispatcher>,
        config: SdkConfig,
    ) -> Self {
        Self {
            bridge: RequestBridge::with_config(engine, dispatcher, config),
        }
    }

    pub fn version(&self) -> String {
        self.bridge.query_version_local()
    }

    /// Start the worker; safe to call more than once
    pub async fn initialize(&self) -> SdkResult<bool> {
        self.bridge.initialize_worker().await
    }

    /// Convert the image at `image_path` and return the path of the grayscale copy
    pub async fn convert_to_grayscale(&self, image_path: &str) -> SdkResult<String> {
        self.bridge.convert(image_path).await
    }

    /// Ask the worker to forward only records at `level` or more severe
    pub async fn set_minimum_log_level(&self, level: LogLevel) {
        if let Err(e) = self.bridge.push_minimum_log_level(level).await {
            tracing::debug!("Minimum log level not pushed: {}", e);
        }
    }

    /// Register (or with `None`, remove) the sink receiving log records
    ///
    /// The local sink is replaced immediately; telling the worker is best effort.
    pub async fn set_log_interceptor(&self, sink: Option<Arc<dyn LogSink>>) {
        let minimum_level = sink.as_ref().map(|sink| sink.minimum_level());
        self.bridge.dispatcher().set_sink(sink);

        if let Err(e) = self
            .bridge
            .push_log_interceptor_state(minimum_level.is_some(), minimum_level)
            .await
        {
            tracing::debug!("Log interceptor state not pushed: {}", e);
        }
    }

    pub fn dispatcher(&self) -> Arc<LogDispatcher> {
        self.bridge.dispatcher().clone()
    }

    pub fn state(&self) -> LifecycleState {
        self.bridge.state()
    }

    pub fn config(&self) -> &SdkConfig {
        self.bridge.config()
    }

    /// Stop the worker; pending conversions fail with a channel-closed error
    pub async fn shutdown(&self) -> SdkResult<bool> {
        self.bridge.shutdown().await
    }
}
