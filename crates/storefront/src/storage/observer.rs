//! Observer registry for storage change notifications.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;

use super::TabId;

/// A change to one storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key that changed.
    pub key: String,
    /// Value before the change (`None` for a new key or a local re-dispatch).
    pub old_value: Option<String>,
    /// Value after the change (`None` when the key was removed).
    pub new_value: Option<String>,
    /// Tab that made the change.
    pub source: TabId,
}

#[derive(Debug)]
struct Observer {
    id: u64,
    tab: TabId,
    key: String,
    tx: mpsc::UnboundedSender<StorageEvent>,
}

#[derive(Debug, Default)]
pub(super) struct ObserverRegistry {
    next_id: AtomicU64,
    observers: Mutex<Vec<Observer>>,
}

impl ObserverRegistry {
    // Registry state stays consistent across a panic (plain Vec push/retain),
    // so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Vec<Observer>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn register(self: &Arc<Self>, tab: TabId, key: &str) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(Observer {
            id,
            tab,
            key: key.to_owned(),
            tx,
        });
        tracing::debug!(tab = %tab, key, observer = id, "Registered storage observer");

        Subscription {
            id,
            key: key.to_owned(),
            rx,
            registry: Arc::downgrade(self),
        }
    }

    fn unregister(&self, id: u64) {
        self.lock().retain(|observer| observer.id != id);
    }

    /// Deliver to observers of `event.key` in tabs other than the source.
    pub(super) fn notify_others(&self, event: &StorageEvent) -> usize {
        self.deliver(event, |observer| observer.tab != event.source)
    }

    /// Deliver to observers of `event.key` in the source tab only.
    pub(super) fn notify_tab(&self, event: &StorageEvent) -> usize {
        self.deliver(event, |observer| observer.tab == event.source)
    }

    fn deliver(&self, event: &StorageEvent, include: impl Fn(&Observer) -> bool) -> usize {
        let mut delivered = 0;
        self.lock().retain(|observer| {
            if observer.key != event.key || !include(observer) {
                return true;
            }
            let open = observer.tx.send(event.clone()).is_ok();
            if open {
                delivered += 1;
            }
            open
        });
        delivered
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Registration of one observer on one key.
///
/// Events queue here until drained with [`try_next`](Self::try_next) or
/// awaited with [`next`](Self::next). Dropping the subscription unregisters
/// the observer.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    key: String,
    rx: mpsc::UnboundedReceiver<StorageEvent>,
    registry: Weak<ObserverRegistry>,
}

impl Subscription {
    /// The observed key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Take the next queued event without waiting.
    pub fn try_next(&mut self) -> Option<StorageEvent> {
        self.rx.try_recv().ok()
    }

    /// Take the most recent queued event, discarding older ones.
    pub fn latest(&mut self) -> Option<StorageEvent> {
        let mut latest = None;
        while let Some(event) = self.try_next() {
            latest = Some(event);
        }
        latest
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once the shared storage has been dropped.
    pub async fn next(&mut self) -> Option<StorageEvent> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
            tracing::debug!(key = %self.key, observer = self.id, "Released storage observer");
        }
    }
}
