use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::debug;

/// A consumer of serialized feed events.
///
/// Implementations must be cheap to call from the matching path: `write`
/// hands over one event payload and reports whether the consumer accepted
/// it, `is_writable` reports whether future writes can still succeed.
pub trait EventSink: Send + Sync {
    /// Delivers one serialized event. Returns `false` when the consumer is
    /// gone or cannot accept the payload.
    fn write(&self, payload: &[u8]) -> bool;

    /// Whether this sink can still accept writes.
    fn is_writable(&self) -> bool;
}

/// The set of sinks subscribed to one feed.
///
/// Attaching and broadcasting are mutually exclusive: the lock is held
/// across the whole fan-out of an event, so every sink registered before an
/// emission sees that emission, and no sink is removed mid-write. Sinks that
/// report unwritable or fail a write are evicted during the broadcast.
#[derive(Default)]
pub struct SinkRegistry {
    sinks: Mutex<Vec<Arc<dyn EventSink>>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a sink; it receives every event emitted after this call.
    pub fn attach(&self, sink: Arc<dyn EventSink>) {
        self.sinks.lock().unwrap().push(sink);
    }

    /// Writes `payload` to every live sink, dropping the dead ones.
    pub fn broadcast(&self, payload: &[u8]) {
        let mut sinks = self.sinks.lock().unwrap();
        let before = sinks.len();
        sinks.retain(|sink| sink.is_writable() && sink.write(payload));
        if sinks.len() < before {
            debug!(evicted = before - sinks.len(), "evicted dead feed sinks");
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bridges a feed to a bounded channel, one payload per event.
///
/// The channel doubles as the backpressure policy: a consumer that falls
/// more than the buffer's length behind fails the write and gets evicted
/// from its registry, instead of stalling the matching path.
pub struct ChannelSink {
    tx: mpsc::Sender<Vec<u8>>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Vec<u8>>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn write(&self, payload: &[u8]) -> bool {
        self.tx.try_send(payload.to_vec()).is_ok()
    }

    fn is_writable(&self) -> bool {
        !self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        written: AtomicUsize,
        writable: bool,
    }

    impl CountingSink {
        fn new(writable: bool) -> Self {
            Self {
                written: AtomicUsize::new(0),
                writable,
            }
        }
    }

    impl EventSink for CountingSink {
        fn write(&self, _payload: &[u8]) -> bool {
            self.written.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn is_writable(&self) -> bool {
            self.writable
        }
    }

    #[test]
    fn broadcast_reaches_every_attached_sink() {
        let registry = SinkRegistry::new();
        let a = Arc::new(CountingSink::new(true));
        let b = Arc::new(CountingSink::new(true));
        registry.attach(a.clone());
        registry.attach(b.clone());

        registry.broadcast(b"frame");
        assert_eq!(a.written.load(Ordering::SeqCst), 1);
        assert_eq!(b.written.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unwritable_sinks_are_evicted_on_broadcast() {
        let registry = SinkRegistry::new();
        let live = Arc::new(CountingSink::new(true));
        let dead = Arc::new(CountingSink::new(false));
        registry.attach(live.clone());
        registry.attach(dead.clone());

        registry.broadcast(b"frame");
        assert_eq!(registry.len(), 1);
        assert_eq!(dead.written.load(Ordering::SeqCst), 0);

        registry.broadcast(b"frame");
        assert_eq!(live.written.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn channel_sink_fails_when_full_or_closed() {
        let (tx, mut rx) = mpsc::channel(1);
        let sink = ChannelSink::new(tx);

        assert!(sink.write(b"one"));
        assert!(!sink.write(b"two"), "full channel must reject the write");

        assert_eq!(rx.recv().await.unwrap(), b"one".to_vec());
        assert!(sink.is_writable());

        rx.close();
        assert!(!sink.is_writable());
    }
}
