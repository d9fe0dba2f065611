//! Source deduction: move quantity from a source into sold state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stockyard_catalog::{
    DeductionLine, GetStockItemConfiguration, SourceItem, SourceItemRepository, StockResolver,
};
use stockyard_core::{DomainError, DomainResult, Qty, SalesChannel, Sku, SourceCode};
use stockyard_indexer::ReindexNotifier;
use stockyard_reservations::{
    BatchDisposition, ReservationLedger, ReservationMetadata, ReservationToAppend,
};

use crate::event::SalesEvent;

/// One requested line: take `qty` of `sku`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemToDeduct {
    pub sku: Sku,
    pub qty: Qty,
}

impl ItemToDeduct {
    pub fn new(sku: Sku, qty: Qty) -> Self {
        Self { sku, qty }
    }
}

/// A deduction request for one sales event against one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDeductionRequest {
    pub source_code: SourceCode,
    pub sales_channel: SalesChannel,
    pub sales_event: SalesEvent,
    pub items: Vec<ItemToDeduct>,
}

/// Deducts physical quantity from one source and appends the matching
/// reservations for a single sales event (typically a shipment).
///
/// All-or-nothing: if any item fails its precondition the whole batch is
/// aborted, quantities are untouched and nothing is appended. Items whose SKU
/// is unconfigured or unmanaged on the stock are skipped, not failed. An
/// event whose reservations were all applied before is a complete no-op,
/// physical quantity included, so redelivery is safe end to end.
pub struct SourceDeductionService {
    resolver: Arc<dyn StockResolver>,
    configuration: Arc<dyn GetStockItemConfiguration>,
    source_items: Arc<dyn SourceItemRepository>,
    ledger: Arc<dyn ReservationLedger>,
    notifier: Arc<ReindexNotifier>,
}

impl SourceDeductionService {
    pub fn new(
        resolver: Arc<dyn StockResolver>,
        configuration: Arc<dyn GetStockItemConfiguration>,
        source_items: Arc<dyn SourceItemRepository>,
        ledger: Arc<dyn ReservationLedger>,
        notifier: Arc<ReindexNotifier>,
    ) -> Self {
        Self {
            resolver,
            configuration,
            source_items,
            ledger,
            notifier,
        }
    }

    pub fn execute(&self, request: &SourceDeductionRequest) -> DomainResult<()> {
        let stock_id = self.resolver.resolve(&request.sales_channel)?;

        let mut staged: Vec<(ItemToDeduct, SourceItem)> = Vec::new();
        for item in &request.items {
            let Some(config) = self.configuration.get(&item.sku, stock_id) else {
                // Product not assigned to the stock; nothing to deduct.
                tracing::debug!(sku = %item.sku, %stock_id, "skipping unconfigured sku");
                continue;
            };
            if !config.manage_stock {
                tracing::debug!(sku = %item.sku, %stock_id, "skipping unmanaged sku");
                continue;
            }

            let Some(source_item) = self.source_items.get(&request.source_code, &item.sku) else {
                // SKU not stocked at this source.
                continue;
            };
            staged.push((item.clone(), source_item));
        }

        let metadata = ReservationMetadata::new(
            request.sales_event.event_type.as_str(),
            request.sales_event.object_id.clone(),
        )
        .with_channel(request.sales_channel.clone());
        let reservations: Vec<ReservationToAppend> = staged
            .iter()
            .map(|(item, _)| {
                ReservationToAppend::new(item.sku.clone(), stock_id, -item.qty, metadata.clone())
            })
            .collect();

        // Replay gate: the quantity commit and the reservation append must
        // move together. A redelivered event skips both; a batch mixing
        // applied and unapplied keys is rejected before any quantity moves.
        match self
            .ledger
            .disposition(&reservations)
            .map_err(|e| DomainError::conflict(e.to_string()))?
        {
            BatchDisposition::Replayed => {
                tracing::debug!(
                    event = request.sales_event.event_type.as_str(),
                    object_id = %request.sales_event.object_id,
                    "sales event already applied; deduction skipped"
                );
                return Ok(());
            }
            BatchDisposition::New => {}
        }

        let mut lines: Vec<DeductionLine> = Vec::with_capacity(staged.len());
        for (item, source_item) in &staged {
            // Early precondition against the read snapshot. The commit below
            // re-checks under the repository's write lock; this check exists
            // to fail fast before anything is committed.
            if source_item.quantity() - item.qty < 0.0 {
                return Err(DomainError::insufficient_quantity(
                    request.source_code.as_str(),
                    item.sku.as_str(),
                    item.qty,
                    source_item.quantity(),
                ));
            }
            lines.push(DeductionLine {
                source_code: request.source_code.clone(),
                sku: item.sku.clone(),
                qty: item.qty,
            });
        }

        // Commit point: all staged quantity updates or none.
        self.source_items.apply_deductions(&lines)?;
        self.ledger
            .append(&reservations)
            .map_err(|e| DomainError::conflict(e.to_string()))?;

        tracing::debug!(
            source = %request.source_code,
            %stock_id,
            event = request.sales_event.event_type.as_str(),
            lines = staged.len(),
            "source deduction committed"
        );
        for (item, _) in &staged {
            self.notifier.item_changed(&item.sku, stock_id);
        }
        Ok(())
    }
}
