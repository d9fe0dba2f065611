//! Stock item configuration and its resolution chain.
//!
//! Configuration resolves per (sku, stock) through a fallback chain:
//! source-item-level override, then stock-level override, then the global
//! default. Each layer is a partial record merged field-wise, so an item
//! override may set only `backorders` and inherit the rest.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use stockyard_core::{DomainError, DomainResult, Qty, Sku, StockId};

/// Fully resolved configuration for one (sku, stock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItemConfiguration {
    /// When false, the SKU is always salable and deduction skips it entirely.
    pub manage_stock: bool,
    /// Threshold below which (inclusive) the SKU stops being salable.
    pub min_qty: Qty,
    /// Allow selling into negative availability.
    pub backorders: bool,
    /// When true, a source item flagged out-of-stock is excluded from the
    /// salable-quantity determination (its quantity still shows in the
    /// reported total).
    pub use_source_status: bool,
}

impl Default for StockItemConfiguration {
    fn default() -> Self {
        Self {
            manage_stock: true,
            min_qty: 0.0,
            backorders: false,
            use_source_status: true,
        }
    }
}

/// One layer of the fallback chain; unset fields inherit from the layer below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialStockItemConfiguration {
    pub manage_stock: Option<bool>,
    pub min_qty: Option<Qty>,
    pub backorders: Option<bool>,
    pub use_source_status: Option<bool>,
}

impl PartialStockItemConfiguration {
    pub fn manage_stock(mut self, value: bool) -> Self {
        self.manage_stock = Some(value);
        self
    }

    pub fn min_qty(mut self, value: Qty) -> Self {
        self.min_qty = Some(value);
        self
    }

    pub fn backorders(mut self, value: bool) -> Self {
        self.backorders = Some(value);
        self
    }

    pub fn use_source_status(mut self, value: bool) -> Self {
        self.use_source_status = Some(value);
        self
    }

    fn apply_to(&self, base: &mut StockItemConfiguration) {
        if let Some(v) = self.manage_stock {
            base.manage_stock = v;
        }
        if let Some(v) = self.min_qty {
            base.min_qty = v;
        }
        if let Some(v) = self.backorders {
            base.backorders = v;
        }
        if let Some(v) = self.use_source_status {
            base.use_source_status = v;
        }
    }
}

/// Read-only configuration lookup used by salability and deduction.
///
/// `None` means the SKU is not configured for (assigned to) the stock at all,
/// which callers treat as "item not applicable" and skip.
pub trait GetStockItemConfiguration: Send + Sync {
    fn get(&self, sku: &Sku, stock_id: StockId) -> Option<StockItemConfiguration>;

    fn require(&self, sku: &Sku, stock_id: StockId) -> DomainResult<StockItemConfiguration> {
        self.get(sku, stock_id)
            .ok_or_else(|| DomainError::configuration_not_found(sku.as_str(), stock_id.value()))
    }
}

/// In-memory configuration store with the three-layer chain.
#[derive(Debug, Default)]
pub struct StockItemConfigurationProvider {
    global: StockItemConfiguration,
    stock_overrides: RwLock<HashMap<StockId, PartialStockItemConfiguration>>,
    item_overrides: RwLock<HashMap<(Sku, StockId), PartialStockItemConfiguration>>,
    assigned: RwLock<HashSet<(Sku, StockId)>>,
}

impl StockItemConfigurationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(global: StockItemConfiguration) -> Self {
        Self {
            global,
            ..Self::default()
        }
    }

    /// Register a SKU as sold on a stock with inherited configuration.
    pub fn assign(&self, sku: Sku, stock_id: StockId) {
        if let Ok(mut assigned) = self.assigned.write() {
            assigned.insert((sku, stock_id));
        }
    }

    pub fn set_stock_override(&self, stock_id: StockId, layer: PartialStockItemConfiguration) {
        if let Ok(mut overrides) = self.stock_overrides.write() {
            overrides.insert(stock_id, layer);
        }
    }

    /// Item-level override; also assigns the SKU to the stock.
    pub fn set_item_override(
        &self,
        sku: Sku,
        stock_id: StockId,
        layer: PartialStockItemConfiguration,
    ) {
        self.assign(sku.clone(), stock_id);
        if let Ok(mut overrides) = self.item_overrides.write() {
            overrides.insert((sku, stock_id), layer);
        }
    }
}

impl GetStockItemConfiguration for StockItemConfigurationProvider {
    fn get(&self, sku: &Sku, stock_id: StockId) -> Option<StockItemConfiguration> {
        let assigned = self.assigned.read().ok()?;
        if !assigned.contains(&(sku.clone(), stock_id)) {
            return None;
        }

        // Walk the chain bottom-up: global default, stock layer, item layer.
        let mut resolved = self.global.clone();
        if let Ok(overrides) = self.stock_overrides.read() {
            if let Some(layer) = overrides.get(&stock_id) {
                layer.apply_to(&mut resolved);
            }
        }
        if let Ok(overrides) = self.item_overrides.read() {
            if let Some(layer) = overrides.get(&(sku.clone(), stock_id)) {
                layer.apply_to(&mut resolved);
            }
        }
        Some(resolved)
    }
}
