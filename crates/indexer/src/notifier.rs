//! Reindex triggers as an explicit subscriber list.
//!
//! Mutating flows (deduction, returns, administrative saves, link changes)
//! call the notifier directly instead of being intercepted; every subscriber
//! sees every notification, and a notification is never silently skipped.

use std::sync::{Arc, RwLock};

use stockyard_core::{Sku, StockId};

/// Receives invalidation events for the stock index.
pub trait ReindexSubscriber: Send + Sync {
    /// Availability of one SKU on one stock changed (quantity or reservation).
    fn item_changed(&self, sku: &Sku, stock_id: StockId);

    /// The source set of a stock changed; every row of the stock is stale.
    fn stock_changed(&self, stock_id: StockId);
}

/// Fan-out point from mutation flows to index maintenance.
#[derive(Default)]
pub struct ReindexNotifier {
    subscribers: RwLock<Vec<Arc<dyn ReindexSubscriber>>>,
}

impl ReindexNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: Arc<dyn ReindexSubscriber>) {
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.push(subscriber);
        }
    }

    pub fn item_changed(&self, sku: &Sku, stock_id: StockId) {
        tracing::debug!(%sku, %stock_id, "reindex: item changed");
        if let Ok(subscribers) = self.subscribers.read() {
            for subscriber in subscribers.iter() {
                subscriber.item_changed(sku, stock_id);
            }
        }
    }

    pub fn stock_changed(&self, stock_id: StockId) {
        tracing::debug!(%stock_id, "reindex: stock changed");
        if let Ok(subscribers) = self.subscribers.read() {
            for subscriber in subscribers.iter() {
                subscriber.stock_changed(stock_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSubscriber {
        seen: Mutex<Vec<String>>,
    }

    impl ReindexSubscriber for RecordingSubscriber {
        fn item_changed(&self, sku: &Sku, stock_id: StockId) {
            self.seen
                .lock()
                .unwrap()
                .push(format!("item:{sku}@{stock_id}"));
        }

        fn stock_changed(&self, stock_id: StockId) {
            self.seen.lock().unwrap().push(format!("stock:{stock_id}"));
        }
    }

    #[test]
    fn every_subscriber_sees_every_notification() {
        let notifier = ReindexNotifier::new();
        let a = Arc::new(RecordingSubscriber::default());
        let b = Arc::new(RecordingSubscriber::default());
        notifier.subscribe(a.clone());
        notifier.subscribe(b.clone());

        notifier.item_changed(&Sku::new("SKU-1").unwrap(), StockId::new(1));
        notifier.stock_changed(StockId::new(1));

        for subscriber in [&a, &b] {
            let seen = subscriber.seen.lock().unwrap();
            assert_eq!(seen.as_slice(), ["item:SKU-1@1", "stock:1"]);
        }
    }
}
