use super::connection::{Connection, ConnectionId, Disconnect};
use crate::error::{SensimError, SensimResult};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Compile-time description of what an event carries
///
/// Implemented by uninhabited tag types. `Args<'a>` may borrow, which lets
/// producers lend buffers that are only valid for the duration of a
/// broadcast.
pub trait EventSignature: Send + Sync + 'static {
    /// Payload handed to every callback by reference
    type Args<'a>;

    /// Human readable signature name used in diagnostics
    const NAME: &'static str;
}

/// Shared callback type for a signature
pub type Callback<S> = Arc<dyn for<'a> Fn(&<S as EventSignature>::Args<'a>) + Send + Sync>;

/// Lock-free delivery counters
#[derive(Debug, Default)]
struct AtomicEventMetrics {
    broadcasts: AtomicU64,
    deliveries: AtomicU64,
    callback_failures: AtomicU64,
}

impl AtomicEventMetrics {
    fn snapshot(&self, connections: usize) -> EventMetrics {
        EventMetrics {
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            callback_failures: self.callback_failures.load(Ordering::Relaxed),
            connections,
        }
    }
}

/// Snapshot of channel activity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMetrics {
    pub broadcasts: u64,
    pub deliveries: u64,
    pub callback_failures: u64,
    pub connections: usize,
}

struct Slot<S: EventSignature> {
    id: ConnectionId,
    alive: Arc<AtomicBool>,
    callback: Callback<S>,
}

struct EventInner<S: EventSignature> {
    next_id: AtomicU64,
    slots: RwLock<BTreeMap<ConnectionId, Arc<Slot<S>>>>,
    metrics: AtomicEventMetrics,
    _signature: PhantomData<fn() -> S>,
}

impl<S: EventSignature> Disconnect for EventInner<S> {
    fn disconnect(&self, id: ConnectionId) {
        if self.slots.write().remove(&id).is_some() {
            log::debug!("{}: disconnected {}", S::NAME, id);
        }
    }
}

/// Typed broadcast channel
///
/// Callbacks run synchronously on the broadcasting thread, in subscription
/// order. They must not block: the broadcaster is usually the render loop.
///
/// `Event` is a handle; clones share the same subscriber list.
pub struct Event<S: EventSignature> {
    inner: Arc<EventInner<S>>,
}

impl<S: EventSignature> Event<S> {
    /// Create a channel with no subscribers
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EventInner {
                next_id: AtomicU64::new(1),
                slots: RwLock::new(BTreeMap::new()),
                metrics: AtomicEventMetrics::default(),
                _signature: PhantomData,
            }),
        }
    }

    /// Signature name of this channel
    pub fn name(&self) -> &'static str {
        S::NAME
    }

    /// Subscribe a callback
    ///
    /// The callback stays subscribed until the returned [`Connection`] is
    /// dropped or disconnected.
    pub fn connect<F>(&self, callback: F) -> Connection
    where
        F: for<'a> Fn(&S::Args<'a>) + Send + Sync + 'static,
    {
        self.insert(Arc::new(callback))
    }

    /// Subscribe a callback handed over at runtime
    ///
    /// Fails with [`SensimError::InvalidCallback`] when no callback is given.
    pub fn connect_dyn(&self, callback: Option<Callback<S>>) -> SensimResult<Connection> {
        match callback {
            Some(callback) => Ok(self.insert(callback)),
            None => Err(SensimError::invalid_callback(format!(
                "{} subscription without a callback",
                S::NAME
            ))),
        }
    }

    fn insert(&self, callback: Callback<S>) -> Connection {
        let id = ConnectionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let alive = Arc::new(AtomicBool::new(true));
        self.inner.slots.write().insert(
            id,
            Arc::new(Slot {
                id,
                alive: alive.clone(),
                callback,
            }),
        );
        log::debug!("{}: connected {}", S::NAME, id);

        let inner: Arc<dyn Disconnect> = self.inner.clone();
        let channel: Weak<dyn Disconnect> = Arc::downgrade(&inner);
        Connection::new(id, alive, channel)
    }

    /// Deliver `args` to every current subscriber
    ///
    /// The subscriber list is snapshotted first, so callbacks may connect or
    /// disconnect freely; new subscribers are first reached by the next
    /// broadcast. A subscriber released before its turn is skipped. A
    /// panicking callback is logged and counted, and delivery continues.
    ///
    /// Returns the number of callbacks that completed.
    pub fn broadcast(&self, args: &S::Args<'_>) -> usize {
        self.inner.metrics.broadcasts.fetch_add(1, Ordering::Relaxed);

        let snapshot: Vec<Arc<Slot<S>>> = self.inner.slots.read().values().cloned().collect();
        if snapshot.is_empty() {
            return 0;
        }

        let mut delivered = 0;
        for slot in snapshot {
            if !slot.alive.load(Ordering::Acquire) {
                continue;
            }

            let callback = &slot.callback;
            match panic::catch_unwind(AssertUnwindSafe(|| callback(args))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    self.inner
                        .metrics
                        .callback_failures
                        .fetch_add(1, Ordering::Relaxed);
                    log::error!(
                        "{}: subscriber {} panicked: {}",
                        S::NAME,
                        slot.id,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        self.inner
            .metrics
            .deliveries
            .fetch_add(delivered as u64, Ordering::Relaxed);
        delivered
    }

    /// Number of live subscriptions
    pub fn connection_count(&self) -> usize {
        self.inner.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connection_count() == 0
    }

    /// Drop every subscription; outstanding connections become inert
    pub fn disconnect_all(&self) {
        let removed = std::mem::take(&mut *self.inner.slots.write());
        for slot in removed.values() {
            slot.alive.store(false, Ordering::Release);
        }
        if !removed.is_empty() {
            log::debug!("{}: cleared {} subscribers", S::NAME, removed.len());
        }
    }

    /// Current delivery counters
    pub fn metrics(&self) -> EventMetrics {
        self.inner.metrics.snapshot(self.connection_count())
    }

    /// Whether two handles refer to the same channel
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S: EventSignature> Clone for Event<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: EventSignature> Default for Event<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSignature> fmt::Debug for Event<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("signature", &S::NAME)
            .field("connections", &self.connection_count())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    enum Counter {}

    impl EventSignature for Counter {
        type Args<'a> = u32;
        const NAME: &'static str = "Counter";
    }

    enum Borrowed {}

    impl EventSignature for Borrowed {
        type Args<'a> = &'a [f32];
        const NAME: &'static str = "Borrowed";
    }

    fn recorder() -> (Arc<Mutex<Vec<(usize, u32)>>>, impl Fn(usize) -> Box<dyn Fn(&u32) + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let make = move |tag: usize| -> Box<dyn Fn(&u32) + Send + Sync> {
            let sink = sink.clone();
            Box::new(move |value: &u32| sink.lock().push((tag, *value)))
        };
        (log, make)
    }

    #[test]
    fn test_broadcast_in_subscription_order() {
        let event = Event::<Counter>::new();
        let (log, make) = recorder();

        let _c1 = event.connect(make(1));
        let _c2 = event.connect(make(2));
        let _c3 = event.connect(make(3));

        assert_eq!(event.broadcast(&7), 3);
        assert_eq!(*log.lock(), vec![(1, 7), (2, 7), (3, 7)]);
    }

    #[test]
    fn test_released_connection_is_not_invoked() {
        let event = Event::<Counter>::new();
        let (log, make) = recorder();

        let c1 = event.connect(make(1));
        let c2 = event.connect(make(2));
        let c3 = event.connect(make(3));

        drop(c2);
        assert_eq!(event.connection_count(), 2);

        assert_eq!(event.broadcast(&1), 2);
        assert_eq!(*log.lock(), vec![(1, 1), (3, 1)]);
        assert!(c1.is_connected());
        assert!(c3.is_connected());
    }

    #[test]
    fn test_explicit_disconnect() {
        let event = Event::<Counter>::new();
        let (log, make) = recorder();

        let connection = event.connect(make(1));
        connection.disconnect();

        assert_eq!(event.broadcast(&5), 0);
        assert!(log.lock().is_empty());
        assert!(event.is_empty());
    }

    #[test]
    fn test_broadcast_without_subscribers_is_noop() {
        let event = Event::<Counter>::new();
        assert_eq!(event.broadcast(&1), 0);
        assert_eq!(event.metrics().broadcasts, 1);
        assert_eq!(event.metrics().deliveries, 0);
    }

    #[test]
    fn test_connection_ids_are_unique_and_increasing() {
        let event = Event::<Counter>::new();
        let a = event.connect(|_: &u32| {});
        let b = event.connect(|_: &u32| {});
        let a_id = a.id();
        drop(a);
        let c = event.connect(|_: &u32| {});

        assert!(a_id < b.id());
        assert!(b.id() < c.id());
        assert_ne!(a_id, c.id());
    }

    #[test]
    fn test_panicking_callback_is_isolated() {
        let event = Event::<Counter>::new();
        let (log, make) = recorder();

        let _c1 = event.connect(make(1));
        let _bad = event.connect(|_: &u32| panic!("subscriber failure"));
        let _c3 = event.connect(make(3));

        assert_eq!(event.broadcast(&9), 2);
        assert_eq!(*log.lock(), vec![(1, 9), (3, 9)]);

        let metrics = event.metrics();
        assert_eq!(metrics.callback_failures, 1);
        assert_eq!(metrics.deliveries, 2);
        assert_eq!(metrics.connections, 3);
    }

    #[test]
    fn test_release_during_broadcast_skips_pending_subscriber() {
        let event = Event::<Counter>::new();
        let (log, make) = recorder();

        let victim: Arc<Mutex<Option<Connection>>> = Arc::new(Mutex::new(None));
        let victim_slot = victim.clone();
        let _killer = event.connect(move |_: &u32| {
            victim_slot.lock().take();
        });
        *victim.lock() = Some(event.connect(make(2)));

        assert_eq!(event.broadcast(&3), 1);
        assert!(log.lock().is_empty());
        assert_eq!(event.connection_count(), 1);
    }

    #[test]
    fn test_subscribe_during_broadcast_fires_next_time() {
        let event = Event::<Counter>::new();
        let hits = Arc::new(AtomicU64::new(0));
        let added: Arc<Mutex<Vec<Connection>>> = Arc::new(Mutex::new(Vec::new()));

        let handle = event.clone();
        let hits_outer = hits.clone();
        let added_inner = added.clone();
        let _adder = event.connect(move |_: &u32| {
            let hits = hits_outer.clone();
            let connection = handle.connect(move |_: &u32| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
            added_inner.lock().push(connection);
        });

        event.broadcast(&0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        event.broadcast(&0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(added.lock().len(), 2);
    }

    #[test]
    fn test_self_disconnect_inside_callback() {
        let event = Event::<Counter>::new();
        let own: Arc<Mutex<Option<Connection>>> = Arc::new(Mutex::new(None));
        let own_slot = own.clone();
        let calls = Arc::new(AtomicU64::new(0));
        let calls_inner = calls.clone();

        *own.lock() = Some(event.connect(move |_: &u32| {
            calls_inner.fetch_add(1, Ordering::SeqCst);
            own_slot.lock().take();
        }));

        event.broadcast(&1);
        event.broadcast(&2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(event.is_empty());
    }

    #[test]
    fn test_connect_dyn_rejects_missing_callback() {
        let event = Event::<Counter>::new();
        let err = event.connect_dyn(None).unwrap_err();
        assert!(matches!(err, SensimError::InvalidCallback(_)));

        let callback: Callback<Counter> = Arc::new(|_: &u32| {});
        let connection = event.connect_dyn(Some(callback)).unwrap();
        assert!(connection.is_connected());
    }

    #[test]
    fn test_clones_share_subscribers() {
        let event = Event::<Counter>::new();
        let other = event.clone();
        let _c = other.connect(|_: &u32| {});

        assert!(event.same_channel(&other));
        assert_eq!(event.connection_count(), 1);
        assert!(!event.same_channel(&Event::new()));
    }

    #[test]
    fn test_disconnect_all_makes_connections_inert() {
        let event = Event::<Counter>::new();
        let c1 = event.connect(|_: &u32| {});
        let c2 = event.connect(|_: &u32| {});

        event.disconnect_all();
        assert!(!c1.is_connected());
        assert!(!c2.is_connected());
        assert_eq!(event.broadcast(&1), 0);

        drop(c1);
        drop(c2);
        assert!(event.is_empty());
    }

    #[test]
    fn test_connection_outliving_channel() {
        let event = Event::<Counter>::new();
        let connection = event.connect(|_: &u32| {});
        drop(event);

        assert!(!connection.is_connected());
        drop(connection);
    }

    #[test]
    fn test_borrowed_payload() {
        let event = Event::<Borrowed>::new();
        let sums = Arc::new(Mutex::new(Vec::new()));
        let sink = sums.clone();
        let _c = event.connect(move |scan: &&[f32]| {
            sink.lock().push(scan.iter().sum::<f32>());
        });

        let buffer = vec![1.0_f32, 2.0, 3.5];
        event.broadcast(&buffer.as_slice());
        drop(buffer);

        assert_eq!(*sums.lock(), vec![6.5]);
    }

    #[test]
    fn test_concurrent_broadcast_and_release() {
        let event = Event::<Counter>::new();
        let hits = Arc::new(AtomicU64::new(0));

        let mut connections = Vec::new();
        for _ in 0..16 {
            let hits = hits.clone();
            connections.push(event.connect(move |_: &u32| {
                hits.fetch_add(1, Ordering::Relaxed);
            }));
        }

        let producer = {
            let event = event.clone();
            std::thread::spawn(move || {
                for frame in 0..200 {
                    event.broadcast(&frame);
                }
            })
        };

        for connection in connections.drain(..) {
            drop(connection);
        }
        producer.join().unwrap();

        let before = hits.load(Ordering::Relaxed);
        event.broadcast(&0);
        assert_eq!(hits.load(Ordering::Relaxed), before);
        assert!(event.is_empty());
    }
}
