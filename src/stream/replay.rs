/// Retained-value multicast cell.
///
/// Every stream in the dashboard publishes through a `ReplayCache`: the
/// most recent value is retained, and a consumer attaching after a value
/// has been delivered receives it immediately instead of forcing a
/// refetch. Retention is independent of consumer count: all consumers
/// can detach and a later one still gets the retained value. Only a new
/// publish replaces it.

use std::sync::Arc;
use tokio::sync::watch;

/// The publishing side. Held by the stream engine that owns the value.
pub struct ReplayCache<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for ReplayCache<T> {
    fn clone(&self) -> Self {
        Self { tx: Arc::clone(&self.tx) }
    }
}

impl<T: Clone> ReplayCache<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replaces the retained value atomically and notifies all consumers.
    /// Works with zero consumers attached; the value is simply retained.
    pub fn publish(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Clone of the currently retained value.
    pub fn latest(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Attaches a new consumer. Its `current()` is the retained value
    /// immediately; `changed()` resolves on subsequent publishes.
    pub fn subscribe(&self) -> ReplayStream<T> {
        ReplayStream { rx: self.tx.subscribe() }
    }
}

/// Consumer handle for a replayed stream. Cloning yields an independent
/// consumer with its own notification cursor.
pub struct ReplayStream<T> {
    rx: watch::Receiver<T>,
}

impl<T> Clone for ReplayStream<T> {
    fn clone(&self) -> Self {
        Self { rx: self.rx.clone() }
    }
}

impl<T: Clone> ReplayStream<T> {
    /// Clone of the retained value, delivered without waiting and without
    /// triggering any upstream work.
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Waits for the next publish and returns the value. Returns `None`
    /// once the publishing side has gone away.
    pub async fn changed(&mut self) -> Option<T> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// Non-blocking variant of [`changed`](Self::changed): returns the
    /// latest value if one was published since the last observation.
    pub fn poll_next(&mut self) -> Option<T> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            _ => None,
        }
    }
}

impl<T> From<watch::Receiver<T>> for ReplayStream<T> {
    fn from(rx: watch::Receiver<T>) -> Self {
        Self { rx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_subscriber_receives_retained_value_immediately() {
        let cache = ReplayCache::new(0);
        cache.publish(41);
        cache.publish(42);

        let consumer = cache.subscribe();
        assert_eq!(consumer.current(), 42, "late subscriber sees the latest value");
    }

    #[test]
    fn test_retention_survives_consumer_churn() {
        let cache = ReplayCache::new("initial");

        let first = cache.subscribe();
        cache.publish("delivered");
        drop(first);

        // No consumers attached; value must still be retained.
        let second = cache.subscribe();
        assert_eq!(second.current(), "delivered");
    }

    #[test]
    fn test_publish_with_zero_consumers_is_retained() {
        let cache = ReplayCache::new(0);
        cache.publish(7);
        assert_eq!(cache.latest(), 7);
        assert_eq!(cache.subscribe().current(), 7);
    }

    #[tokio::test]
    async fn test_changed_resolves_on_subsequent_publish() {
        let cache = ReplayCache::new(0);
        let mut consumer = cache.subscribe();

        cache.publish(1);
        assert_eq!(consumer.changed().await, Some(1));

        cache.publish(2);
        cache.publish(3);
        // Intermediate values may coalesce; the latest always wins.
        assert_eq!(consumer.changed().await, Some(3));
    }

    #[tokio::test]
    async fn test_stream_ends_when_publisher_dropped() {
        let cache = ReplayCache::new(0);
        let mut consumer = cache.subscribe();
        drop(cache);
        assert_eq!(consumer.changed().await, None);
    }

    #[test]
    fn test_poll_next_observes_only_new_publishes() {
        let cache = ReplayCache::new(0);
        let mut consumer = cache.subscribe();

        assert_eq!(consumer.poll_next(), None, "nothing published since attach");
        cache.publish(5);
        assert_eq!(consumer.poll_next(), Some(5));
        assert_eq!(consumer.poll_next(), None, "value already observed");
    }

    #[test]
    fn test_cloned_consumer_starts_from_the_original_cursor() {
        let cache = ReplayCache::new(0);
        let mut a = cache.subscribe();
        cache.publish(9);
        assert_eq!(a.poll_next(), Some(9));

        // The clone inherits the original's cursor at clone time and is
        // independent afterwards.
        let mut b = a.clone();
        assert_eq!(b.current(), 9);
        assert_eq!(b.poll_next(), None);

        cache.publish(10);
        assert_eq!(a.poll_next(), Some(10));
        assert_eq!(b.poll_next(), Some(10));
    }
}
