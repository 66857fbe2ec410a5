//! Named method channel with correlated replies

use crate::error::ChannelError;
use crate::messenger::Messenger;
use dashmap::DashMap;
use grayscale_transport::{MethodCall, MethodCodec, MethodReply};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

/// A named channel bound to one messenger
///
/// Unary calls get a correlation id and a single-use reply slot. The slot is
/// released on every exit path (reply, timeout, close, or the caller dropping
/// the future), and replies for released ids are discarded.
pub struct MethodChannel {
    name: String,
    messenger: Arc<dyn Messenger>,
    codec: Arc<dyn MethodCodec>,
    pending: DashMap<u64, oneshot::Sender<MethodReply>>,
    request_counter: AtomicU64,
    closed: AtomicBool,
}

/// Removes a pending slot when the waiting call finishes or is dropped
struct PendingSlot<'a> {
    pending: &'a DashMap<u64, oneshot::Sender<MethodReply>>,
    id: u64,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}

impl MethodChannel {
    pub fn new(
        name: impl Into<String>,
        messenger: Arc<dyn Messenger>,
        codec: Arc<dyn MethodCodec>,
    ) -> Self {
        Self {
            name: name.into(),
            messenger,
            codec,
            pending: DashMap::new(),
            request_counter: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the next correlation id
    pub fn next_request_id(&self) -> u64 {
        self.request_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of calls still waiting for a reply
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Send a call and wait for exactly one reply
    pub async fn invoke(
        &self,
        method: &str,
        args: serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<MethodReply, ChannelError> {
        let id = self.next_request_id();
        let data = self
            .codec
            .encode_call(&MethodCall::new(method, args).with_id(id))?;

        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        let _slot = PendingSlot {
            pending: &self.pending,
            id,
        };

        // `close` sets the flag before clearing slots, so check after registering
        if self.is_closed() {
            return Err(ChannelError::Closed(self.name.clone()));
        }

        tracing::debug!(channel = %self.name, method, request_id = id, "Sending request");

        let exchange = async {
            self.messenger.send(&self.name, data).await?;
            rx.await
                .map_err(|_| ChannelError::Closed(self.name.clone()))
        };

        match timeout {
            Some(limit) => tokio::time::timeout(limit, exchange).await.map_err(|_| {
                tracing::warn!(channel = %self.name, method, request_id = id, "Request timed out");
                ChannelError::Timeout(limit)
            })?,
            None => exchange.await,
        }
    }

    /// Send a call without waiting for a reply
    pub async fn notify(&self, method: &str, args: serde_json::Value) -> Result<(), ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed(self.name.clone()));
        }
        let data = self.codec.encode_call(&MethodCall::new(method, args))?;
        self.messenger.send(&self.name, data).await
    }

    /// Decode an inbound reply and hand it to its waiting call
    pub fn handle_reply(&self, data: &[u8]) -> bool {
        match self.codec.decode_reply(data) {
            Ok(reply) => self.complete(reply),
            Err(e) => {
                tracing::warn!(channel = %self.name, error = %e, "Dropping undecodable reply");
                false
            }
        }
    }

    /// Hand a reply to its waiting call; `false` if nobody is waiting for it
    pub fn complete(&self, reply: MethodReply) -> bool {
        let Some(id) = reply.id else {
            tracing::warn!(channel = %self.name, "Dropping reply without correlation id");
            return false;
        };
        match self.pending.remove(&id) {
            Some((_, sender)) => sender.send(reply).is_ok(),
            None => {
                tracing::debug!(channel = %self.name, request_id = id, "Discarding stale reply");
                false
            }
        }
    }

    /// Close the channel; waiting calls fail with [`ChannelError::Closed`]
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.pending.clear();
    }
}

impl std::fmt::Debug for MethodChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodChannel")
            .field("name", &self.name)
            .field("pending", &self.pending.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
