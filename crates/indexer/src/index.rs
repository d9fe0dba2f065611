//! The stock index: one row per (sku, stock).

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use stockyard_core::{Qty, Sku, StockId};

/// Materialized row consumed by catalog queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub sku: Sku,
    pub stock_id: StockId,
    /// `None` when the SKU is not sold on the stock.
    pub quantity: Option<Qty>,
    pub is_salable: bool,
}

/// Read/write surface of the index table.
pub trait StockIndex: Send + Sync {
    fn get(&self, sku: &Sku, stock_id: StockId) -> Option<IndexEntry>;
    fn upsert(&self, entry: IndexEntry);

    /// Drop one row; it is recomputed before next read.
    fn invalidate_item(&self, sku: &Sku, stock_id: StockId);

    /// Drop every row of a stock (link-set changes touch all of them).
    fn invalidate(&self, stock_id: StockId);

    /// The catalog join surface: SKUs currently salable on a stock, sorted.
    fn salable_skus(&self, stock_id: StockId) -> Vec<Sku>;
}

#[derive(Debug, Default)]
pub struct InMemoryStockIndex {
    rows: RwLock<HashMap<(Sku, StockId), IndexEntry>>,
}

impl InMemoryStockIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StockIndex for InMemoryStockIndex {
    fn get(&self, sku: &Sku, stock_id: StockId) -> Option<IndexEntry> {
        self.rows.read().ok()?.get(&(sku.clone(), stock_id)).cloned()
    }

    fn upsert(&self, entry: IndexEntry) {
        if let Ok(mut rows) = self.rows.write() {
            rows.insert((entry.sku.clone(), entry.stock_id), entry);
        }
    }

    fn invalidate_item(&self, sku: &Sku, stock_id: StockId) {
        if let Ok(mut rows) = self.rows.write() {
            rows.remove(&(sku.clone(), stock_id));
        }
    }

    fn invalidate(&self, stock_id: StockId) {
        if let Ok(mut rows) = self.rows.write() {
            rows.retain(|(_, sid), _| *sid != stock_id);
        }
    }

    fn salable_skus(&self, stock_id: StockId) -> Vec<Sku> {
        match self.rows.read() {
            Ok(rows) => {
                let mut skus: Vec<Sku> = rows
                    .values()
                    .filter(|e| e.stock_id == stock_id && e.is_salable)
                    .map(|e| e.sku.clone())
                    .collect();
                skus.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                skus
            }
            Err(_) => Vec::new(),
        }
    }
}
