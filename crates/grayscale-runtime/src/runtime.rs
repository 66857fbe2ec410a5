//! Tokio runtime for hosts that call the SDK from synchronous code

use grayscale_core::{ErrorCode, SdkConfig, SdkError, SdkResult};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Configuration for the blocking runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of worker threads (None = number of CPU cores)
    pub worker_threads: Option<usize>,
    /// Name prefix for worker threads
    pub thread_name: String,
    /// How long `shutdown` waits for in-flight tasks
    pub shutdown_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "grayscale-sdk-worker".to_string(),
            shutdown_timeout: Duration::from_millis(5000),
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take thread count and shutdown timeout from the SDK configuration
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self {
            worker_threads: config.worker_threads,
            shutdown_timeout: config.shutdown_timeout(),
            ..Self::default()
        }
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Multi-thread Tokio runtime owned by a blocking SDK handle
pub struct AsyncRuntime {
    runtime: Runtime,
    config: RuntimeConfig,
}

impl AsyncRuntime {
    pub fn new(config: RuntimeConfig) -> SdkResult<Self> {
        let mut builder = Builder::new_multi_thread();

        if let Some(threads) = config.worker_threads {
            builder.worker_threads(threads.max(1));
        }

        let runtime = builder
            .thread_name(&config.thread_name)
            .enable_all()
            .build()
            .map_err(|e| {
                SdkError::with_message(
                    ErrorCode::UnknownError,
                    format!("Failed to create runtime: {e}"),
                )
            })?;

        Ok(Self { runtime, config })
    }

    pub fn with_defaults() -> SdkResult<Self> {
        Self::new(RuntimeConfig::default())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Run a future to completion on the calling thread
    ///
    /// Must not be called from inside an async context.
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        self.runtime.block_on(future)
    }

    pub fn spawn<F>(&self, future: F) -> tokio::task::JoinHandle<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(future)
    }

    /// Stop the runtime, waiting up to the configured timeout for tasks
    pub fn shutdown(self) {
        let timeout = self.config.shutdown_timeout;
        tracing::info!("Shutting down SDK runtime with timeout {:?}", timeout);
        self.runtime.shutdown_timeout(timeout);
    }
}

impl std::fmt::Debug for AsyncRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRuntime")
            .field("config", &self.config)
            .finish()
    }
}
