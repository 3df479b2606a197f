use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Identifier of one subscription, unique for the lifetime of its channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(crate) u64);

impl ConnectionId {
    /// Raw numeric value of the id
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Channel side of a connection, type-erased so `Connection` carries no signature
pub(crate) trait Disconnect: Send + Sync {
    fn disconnect(&self, id: ConnectionId);
}

/// Owned handle for one active subscription
///
/// The subscription lives exactly as long as this handle. Dropping it, or
/// calling [`Connection::disconnect`], removes the callback from its channel;
/// no broadcast reaching that callback's turn afterwards will invoke it.
#[must_use = "dropping a Connection immediately unsubscribes its callback"]
pub struct Connection {
    id: ConnectionId,
    alive: Arc<AtomicBool>,
    channel: Weak<dyn Disconnect>,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, alive: Arc<AtomicBool>, channel: Weak<dyn Disconnect>) -> Self {
        Self { id, alive, channel }
    }

    /// Id of this subscription within its channel
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Whether the callback is still subscribed
    ///
    /// Turns false after an explicit disconnect, after the channel cleared
    /// all subscribers, or once the channel itself is gone.
    pub fn is_connected(&self) -> bool {
        self.alive.load(Ordering::Acquire) && self.channel.strong_count() > 0
    }

    /// Unsubscribe now instead of at drop
    pub fn disconnect(mut self) {
        self.release();
    }

    fn release(&mut self) {
        // Flag first: an in-flight broadcast checks it before each invocation.
        if self.alive.swap(false, Ordering::AcqRel) {
            if let Some(channel) = self.channel.upgrade() {
                channel.disconnect(self.id);
            }
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}
