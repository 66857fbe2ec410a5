//! Blocking and completion-callback surface for hosts without an async runtime

use crate::sdk::GrayscaleSdk;
use grayscale_core::{LifecycleState, LogLevel, SdkConfig, SdkResult};
use grayscale_logging::{LogDispatcher, LogSink};
use grayscale_runtime::{AsyncRuntime, Engine, RuntimeConfig};
use std::sync::Arc;

/// [`GrayscaleSdk`] driven by its own multi-thread runtime
///
/// Blocking methods must not be called from inside an async context. The
/// `*_with` variants return immediately and resolve their completion exactly
/// once on a runtime worker thread.
#[derive(Debug)]
pub struct BlockingGrayscaleSdk {
    sdk: Arc<GrayscaleSdk>,
    runtime: AsyncRuntime,
}

impl BlockingGrayscaleSdk {
    pub fn new(engine: Arc<dyn Engine>) -> SdkResult<Self> {
        Self::with_config(engine, SdkConfig::default())
    }

    pub fn with_config(engine: Arc<dyn Engine>, config: SdkConfig) -> SdkResult<Self> {
        let runtime = AsyncRuntime::new(RuntimeConfig::from_sdk_config(&config))?;
        Ok(Self {
            sdk: Arc::new(GrayscaleSdk::with_config(engine, config)),
            runtime,
        })
    }

    /// The async facade sharing this handle's worker
    pub fn sdk(&self) -> &Arc<GrayscaleSdk> {
        &self.sdk
    }

    pub fn version(&self) -> String {
        self.sdk.version()
    }

    pub fn initialize(&self) -> SdkResult<bool> {
        self.runtime.block_on(self.sdk.initialize())
    }

    pub fn initialize_with<F>(&self, completion: F)
    where
        F: FnOnce(SdkResult<bool>) + Send + 'static,
    {
        let sdk = self.sdk.clone();
        self.runtime.spawn(async move {
            completion(sdk.initialize().await);
        });
    }

    pub fn convert_to_grayscale(&self, image_path: &str) -> SdkResult<String> {
        self.runtime.block_on(self.sdk.convert_to_grayscale(image_path))
    }

    pub fn convert_to_grayscale_with<F>(&self, image_path: impl Into<String>, completion: F)
    where
        F: FnOnce(SdkResult<String>) + Send + 'static,
    {
        let sdk = self.sdk.clone();
        let image_path = image_path.into();
        self.runtime.spawn(async move {
            completion(sdk.convert_to_grayscale(&image_path).await);
        });
    }

    pub fn set_minimum_log_level(&self, level: LogLevel) {
        self.runtime.block_on(self.sdk.set_minimum_log_level(level));
    }

    pub fn set_log_interceptor(&self, sink: Option<Arc<dyn LogSink>>) {
        self.runtime.block_on(self.sdk.set_log_interceptor(sink));
    }

    pub fn dispatcher(&self) -> Arc<LogDispatcher> {
        self.sdk.dispatcher()
    }

    pub fn state(&self) -> LifecycleState {
        self.sdk.state()
    }

    /// Stop the worker, then the runtime
    pub fn shutdown(self) -> SdkResult<bool> {
        let stopped = self.runtime.block_on(self.sdk.shutdown());
        self.runtime.shutdown();
        stopped
    }
}
