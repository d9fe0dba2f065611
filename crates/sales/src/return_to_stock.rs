//! Return-to-stock: give promised quantity back on cancellation/credit memo.
//!
//! The inverse of deduction at the reservation level only: a positive delta is
//! appended for the stock serving the website, and no source item is touched
//! (physical putaway is a separate, administrative flow).

use std::sync::Arc;

use stockyard_catalog::{GetStockItemConfiguration, StockResolver};
use stockyard_core::{DomainError, DomainResult, Qty, Sku};
use stockyard_indexer::ReindexNotifier;
use stockyard_reservations::{ReservationLedger, ReservationMetadata, ReservationToAppend};

use crate::event::SalesEvent;

pub struct ReturnToStockService {
    resolver: Arc<dyn StockResolver>,
    configuration: Arc<dyn GetStockItemConfiguration>,
    ledger: Arc<dyn ReservationLedger>,
    notifier: Arc<ReindexNotifier>,
}

impl ReturnToStockService {
    pub fn new(
        resolver: Arc<dyn StockResolver>,
        configuration: Arc<dyn GetStockItemConfiguration>,
        ledger: Arc<dyn ReservationLedger>,
        notifier: Arc<ReindexNotifier>,
    ) -> Self {
        Self {
            resolver,
            configuration,
            ledger,
            notifier,
        }
    }

    /// Append positive reservations for the given items on the stock serving
    /// `website_code`. Unconfigured or unmanaged SKUs are skipped.
    pub fn execute(
        &self,
        website_code: &str,
        sales_event: &SalesEvent,
        items: &[(Sku, Qty)],
    ) -> DomainResult<()> {
        let stock_id = self.resolver.resolve_website(website_code)?;

        let mut reservations = Vec::new();
        for (sku, qty) in items {
            if *qty < 0.0 {
                return Err(DomainError::validation(
                    "return-to-stock quantity cannot be negative",
                ));
            }
            let Some(config) = self.configuration.get(sku, stock_id) else {
                tracing::debug!(%sku, %stock_id, "skipping unconfigured sku on return");
                continue;
            };
            if !config.manage_stock {
                continue;
            }
            reservations.push(ReservationToAppend::new(
                sku.clone(),
                stock_id,
                *qty,
                ReservationMetadata::new(
                    sales_event.event_type.as_str(),
                    sales_event.object_id.clone(),
                ),
            ));
        }

        self.ledger
            .append(&reservations)
            .map_err(|e| DomainError::conflict(e.to_string()))?;
        for r in &reservations {
            self.notifier.item_changed(&r.sku, stock_id);
        }
        Ok(())
    }
}
