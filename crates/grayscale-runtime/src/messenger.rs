//! Seams between the host and the remote worker

use crate::error::ChannelError;
use async_trait::async_trait;
use grayscale_core::SdkResult;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outbound transport: carries encoded messages from the host to the worker
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver `message` to the worker on the named channel
    ///
    /// Returning `Ok` only means the message was handed over; any reply comes
    /// back later through the [`HostEndpoint`].
    async fn send(&self, channel: &str, message: Vec<u8>) -> Result<(), ChannelError>;
}

/// The remote worker that performs conversions and emits logs
///
/// Implementations wrap whatever actually hosts the worker (an embedded
/// engine, a child process, a test double).
#[async_trait]
pub trait Engine: Send + Sync + 'static {
    /// Start the worker and bind it to `endpoint` for inbound traffic
    async fn start(&self, endpoint: HostEndpoint) -> SdkResult<Arc<dyn Messenger>>;

    /// Stop the worker
    async fn stop(&self) -> SdkResult<()> {
        Ok(())
    }
}

/// Inbound transport: the handle a worker uses to reach the host
///
/// Every channel has its own queue, so traffic on one channel is never
/// held up behind another.
#[derive(Clone)]
pub struct HostEndpoint {
    routes: Arc<HashMap<String, mpsc::UnboundedSender<Vec<u8>>>>,
}

impl HostEndpoint {
    /// Bind the given channel names, returning the endpoint and one receiver per channel
    pub fn bind<I, S>(names: I) -> (Self, HashMap<String, mpsc::UnboundedReceiver<Vec<u8>>>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut routes = HashMap::new();
        let mut receivers = HashMap::new();
        for name in names {
            let name = name.into();
            let (tx, rx) = mpsc::unbounded_channel();
            routes.insert(name.clone(), tx);
            receivers.insert(name, rx);
        }
        (
            Self {
                routes: Arc::new(routes),
            },
            receivers,
        )
    }

    /// Deliver a message from the worker to the host on the named channel
    pub fn deliver(&self, channel: &str, message: Vec<u8>) -> Result<(), ChannelError> {
        let route = self
            .routes
            .get(channel)
            .ok_or_else(|| ChannelError::UnknownChannel(channel.to_string()))?;
        route
            .send(message)
            .map_err(|_| ChannelError::Closed(channel.to_string()))
    }

    /// Names of the bound channels
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for HostEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEndpoint")
            .field("channels", &self.routes.keys().collect::<Vec<_>>())
            .finish()
    }
}
