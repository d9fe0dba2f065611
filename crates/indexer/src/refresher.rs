//! Recompute-on-invalidate subscriber.

use std::sync::Arc;

use stockyard_core::{Qty, Sku, StockId};

use crate::index::{IndexEntry, StockIndex};
use crate::notifier::ReindexSubscriber;

/// The availability computation the refresher reads from. Implemented by the
/// salability engine; the indirection keeps this crate free of the sales
/// crate's dependencies.
pub trait SalabilityView: Send + Sync {
    fn quantity_and_salability(&self, sku: &Sku, stock_id: StockId) -> (Option<Qty>, bool);
}

/// Keeps the index rows in step with availability.
///
/// Item-level changes are recomputed eagerly; stock-level changes (link set
/// edits) drop the stock's rows, which are rebuilt on the next targeted
/// notification or by a full reindex sweep.
pub struct IndexRefresher {
    index: Arc<dyn StockIndex>,
    view: Arc<dyn SalabilityView>,
}

impl IndexRefresher {
    pub fn new(index: Arc<dyn StockIndex>, view: Arc<dyn SalabilityView>) -> Self {
        Self { index, view }
    }

    /// Rebuild rows for a known set of SKUs (full reindex sweep).
    pub fn refresh_all(&self, stock_id: StockId, skus: &[Sku]) {
        for sku in skus {
            self.item_changed(sku, stock_id);
        }
    }
}

impl ReindexSubscriber for IndexRefresher {
    fn item_changed(&self, sku: &Sku, stock_id: StockId) {
        let (quantity, is_salable) = self.view.quantity_and_salability(sku, stock_id);
        tracing::debug!(%sku, %stock_id, ?quantity, is_salable, "index row recomputed");
        self.index.upsert(IndexEntry {
            sku: sku.clone(),
            stock_id,
            quantity,
            is_salable,
        });
    }

    fn stock_changed(&self, stock_id: StockId) {
        self.index.invalidate(stock_id);
    }
}
