//! Source item: quantity of one SKU at one source.

use serde::{Deserialize, Serialize};

use stockyard_core::{DomainError, DomainResult, Qty, Sku, SourceCode};

/// Explicit in-stock/out-of-stock flag, independent of quantity.
///
/// An operator can flag a source item out of stock while quantity is still
/// positive (damaged goods, recall); whether that flag overrides quantity-based
/// salability is governed by `StockItemConfiguration::use_source_status`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceItemStatus {
    InStock,
    OutOfStock,
}

/// Entity: SourceItem, identified by (source_code, sku).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    source_code: SourceCode,
    sku: Sku,
    quantity: Qty,
    status: SourceItemStatus,
}

impl SourceItem {
    pub fn new(source_code: SourceCode, sku: Sku, quantity: Qty) -> Self {
        Self {
            source_code,
            sku,
            quantity,
            status: SourceItemStatus::InStock,
        }
    }

    pub fn with_status(mut self, status: SourceItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn source_code(&self) -> &SourceCode {
        &self.source_code
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn quantity(&self) -> Qty {
        self.quantity
    }

    pub fn status(&self) -> SourceItemStatus {
        self.status
    }

    pub fn is_in_stock(&self) -> bool {
        self.status == SourceItemStatus::InStock
    }

    pub fn set_status(&mut self, status: SourceItemStatus) {
        self.status = status;
    }

    /// Administrative overwrite of the physical count (stocktake, import).
    pub fn set_quantity(&mut self, quantity: Qty) {
        self.quantity = quantity;
    }

    /// Deduct `qty` from the physical count.
    ///
    /// Precondition: `quantity - qty >= 0`. Violations fail the deduction, the
    /// count is never clamped.
    pub fn deduct(&mut self, qty: Qty) -> DomainResult<()> {
        if self.quantity - qty < 0.0 {
            return Err(DomainError::insufficient_quantity(
                self.source_code.as_str(),
                self.sku.as_str(),
                qty,
                self.quantity,
            ));
        }
        self.quantity -= qty;
        Ok(())
    }

    /// Return `qty` to the physical count (replenishment, putaway).
    pub fn replenish(&mut self, qty: Qty) -> DomainResult<()> {
        if qty < 0.0 {
            return Err(DomainError::validation(
                "replenish quantity cannot be negative",
            ));
        }
        self.quantity += qty;
        Ok(())
    }
}
