//! Salability: available quantity and purchasability of a SKU on a stock.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stockyard_catalog::{
    GetStockItemConfiguration, SourceItemRepository, SourceRepository, StockSourceLinkRepository,
};
use stockyard_core::{Qty, Sku, StockId};
use stockyard_indexer::SalabilityView;
use stockyard_reservations::ReservationLedger;

/// Result of the availability computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSalability {
    /// `None` when the SKU is not sold on the stock at all.
    pub quantity: Option<Qty>,
    pub is_salable: bool,
}

impl ProductSalability {
    fn not_sold() -> Self {
        Self {
            quantity: None,
            is_salable: false,
        }
    }
}

/// Computes `quantity = Σ source item quantity (linked, enabled sources)
/// + Σ reservation deltas` and applies the configuration rules on top.
///
/// Read-only and idempotent; results are cached by the indexer, never here.
pub struct SalabilityEngine {
    configuration: Arc<dyn GetStockItemConfiguration>,
    links: Arc<dyn StockSourceLinkRepository>,
    sources: Arc<dyn SourceRepository>,
    source_items: Arc<dyn SourceItemRepository>,
    ledger: Arc<dyn ReservationLedger>,
}

impl SalabilityEngine {
    pub fn new(
        configuration: Arc<dyn GetStockItemConfiguration>,
        links: Arc<dyn StockSourceLinkRepository>,
        sources: Arc<dyn SourceRepository>,
        source_items: Arc<dyn SourceItemRepository>,
        ledger: Arc<dyn ReservationLedger>,
    ) -> Self {
        Self {
            configuration,
            links,
            sources,
            source_items,
            ledger,
        }
    }

    pub fn compute(&self, sku: &Sku, stock_id: StockId) -> ProductSalability {
        // Source item rows at enabled sources linked to the stock.
        let mut rows = Vec::new();
        for link in self.links.links_for_stock(stock_id) {
            let enabled = self
                .sources
                .get(&link.source_code)
                .map(|s| s.is_enabled())
                .unwrap_or(false);
            if !enabled {
                continue;
            }
            if let Some(item) = self.source_items.get(&link.source_code, sku) {
                rows.push(item);
            }
        }

        if rows.is_empty() {
            // Product not sold on this stock.
            return ProductSalability::not_sold();
        }

        let reservation_balance = self.ledger.balance(sku, stock_id);
        let physical: Qty = rows.iter().map(|r| r.quantity()).sum();
        let quantity = physical + reservation_balance;

        let config = self.configuration.get(sku, stock_id).unwrap_or_default();

        if !config.manage_stock {
            // Non-managed items are always salable; quantity is still the
            // computed value (may be zero or negative).
            return ProductSalability {
                quantity: Some(quantity),
                is_salable: true,
            };
        }

        // The salable determination may exclude sources flagged out of stock;
        // the displayed quantity never does.
        let salable_physical: Qty = if config.use_source_status {
            rows.iter()
                .filter(|r| r.is_in_stock())
                .map(|r| r.quantity())
                .sum()
        } else {
            physical
        };
        let salable_qty = salable_physical + reservation_balance;

        let is_salable = salable_qty > config.min_qty || config.backorders;
        ProductSalability {
            quantity: Some(quantity),
            is_salable,
        }
    }
}

impl SalabilityView for SalabilityEngine {
    fn quantity_and_salability(&self, sku: &Sku, stock_id: StockId) -> (Option<Qty>, bool) {
        let salability = self.compute(sku, stock_id);
        (salability.quantity, salability.is_salable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockyard_catalog::{
        InMemorySourceItemRepository, InMemorySourceRepository, InMemoryStockSourceLinkRepository,
        PartialStockItemConfiguration, Source, SourceItem, SourceItemStatus,
        StockItemConfigurationProvider, StockSourceLink,
    };
    use stockyard_core::SourceCode;
    use stockyard_reservations::{
        InMemoryReservationLedger, ReservationMetadata, ReservationToAppend,
    };

    struct Fixture {
        sources: Arc<InMemorySourceRepository>,
        links: Arc<InMemoryStockSourceLinkRepository>,
        source_items: Arc<InMemorySourceItemRepository>,
        configuration: Arc<StockItemConfigurationProvider>,
        ledger: Arc<InMemoryReservationLedger>,
        engine: SalabilityEngine,
    }

    fn fixture() -> Fixture {
        let sources = Arc::new(InMemorySourceRepository::new());
        let links = Arc::new(InMemoryStockSourceLinkRepository::new());
        let source_items = Arc::new(InMemorySourceItemRepository::new());
        let configuration = Arc::new(StockItemConfigurationProvider::new());
        let ledger = Arc::new(InMemoryReservationLedger::new());
        let engine = SalabilityEngine::new(
            configuration.clone(),
            links.clone(),
            sources.clone(),
            source_items.clone(),
            ledger.clone(),
        );
        Fixture {
            sources,
            links,
            source_items,
            configuration,
            ledger,
            engine,
        }
    }

    fn sku(s: &str) -> Sku {
        Sku::new(s).unwrap()
    }

    fn code(s: &str) -> SourceCode {
        SourceCode::new(s).unwrap()
    }

    fn stock() -> StockId {
        StockId::new(1)
    }

    impl Fixture {
        fn add_source_with_qty(&self, source: &str, priority: u32, qty: Qty) {
            self.sources.save(Source::new(code(source), source)).unwrap();
            self.links
                .save(StockSourceLink::new(stock(), code(source), priority))
                .unwrap();
            self.source_items
                .save(SourceItem::new(code(source), sku("SKU-1"), qty))
                .unwrap();
            self.configuration.assign(sku("SKU-1"), stock());
        }

        fn reserve(&self, qty: Qty, object: &str) {
            self.ledger
                .append(&[ReservationToAppend::new(
                    sku("SKU-1"),
                    stock(),
                    qty,
                    ReservationMetadata::new("order_placed", object),
                )])
                .unwrap();
        }
    }

    #[test]
    fn sku_without_source_items_is_not_sold_on_the_stock() {
        let f = fixture();
        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert_eq!(result.quantity, None);
        assert!(!result.is_salable);
    }

    #[test]
    fn positive_quantity_above_min_qty_is_salable() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 8.5);
        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert_eq!(result.quantity, Some(8.5));
        assert!(result.is_salable);
    }

    #[test]
    fn zero_quantity_is_not_salable() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 0.0);
        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert_eq!(result.quantity, Some(0.0));
        assert!(!result.is_salable);
    }

    #[test]
    fn reservations_reduce_availability() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 10.0);
        f.reserve(-4.0, "o-1");
        f.reserve(-6.0, "o-2");

        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert_eq!(result.quantity, Some(0.0));
        assert!(!result.is_salable);
    }

    #[test]
    fn quantities_sum_across_linked_sources() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 3.0);
        f.add_source_with_qty("eu-2", 2, 4.0);

        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert_eq!(result.quantity, Some(7.0));
    }

    #[test]
    fn disabled_sources_do_not_contribute() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 3.0);
        f.add_source_with_qty("eu-2", 2, 4.0);
        let mut eu2 = f.sources.get(&code("eu-2")).unwrap();
        eu2.set_enabled(false);
        f.sources.save(eu2).unwrap();

        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert_eq!(result.quantity, Some(3.0));
    }

    #[test]
    fn unmanaged_items_are_always_salable_even_negative() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 2.0);
        f.reserve(-5.0, "o-1");
        f.configuration.set_item_override(
            sku("SKU-1"),
            stock(),
            PartialStockItemConfiguration::default().manage_stock(false),
        );

        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert_eq!(result.quantity, Some(-3.0));
        assert!(result.is_salable);
    }

    #[test]
    fn min_qty_threshold_gates_salability() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 5.0);
        f.configuration.set_item_override(
            sku("SKU-1"),
            stock(),
            PartialStockItemConfiguration::default().min_qty(5.0),
        );

        // quantity == min_qty is not salable; the threshold is strict.
        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert!(!result.is_salable);

        f.source_items
            .save(SourceItem::new(code("eu-1"), sku("SKU-1"), 5.5))
            .unwrap();
        assert!(f.engine.compute(&sku("SKU-1"), stock()).is_salable);
    }

    #[test]
    fn backorders_allow_selling_past_zero() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 1.0);
        f.reserve(-3.0, "o-1");
        f.configuration.set_item_override(
            sku("SKU-1"),
            stock(),
            PartialStockItemConfiguration::default().backorders(true),
        );

        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert_eq!(result.quantity, Some(-2.0));
        assert!(result.is_salable);
    }

    #[test]
    fn out_of_stock_source_is_excluded_from_salability_but_not_quantity() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 6.0);
        f.source_items
            .save(
                SourceItem::new(code("eu-1"), sku("SKU-1"), 6.0)
                    .with_status(SourceItemStatus::OutOfStock),
            )
            .unwrap();

        let result = f.engine.compute(&sku("SKU-1"), stock());
        // Displayed quantity keeps the flagged source's units.
        assert_eq!(result.quantity, Some(6.0));
        // Salable determination does not.
        assert!(!result.is_salable);
    }

    #[test]
    fn status_override_is_ignored_when_the_flag_is_off() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 6.0);
        f.source_items
            .save(
                SourceItem::new(code("eu-1"), sku("SKU-1"), 6.0)
                    .with_status(SourceItemStatus::OutOfStock),
            )
            .unwrap();
        f.configuration.set_item_override(
            sku("SKU-1"),
            stock(),
            PartialStockItemConfiguration::default().use_source_status(false),
        );

        let result = f.engine.compute(&sku("SKU-1"), stock());
        assert!(result.is_salable);
    }

    #[test]
    fn salability_view_mirrors_compute() {
        let f = fixture();
        f.add_source_with_qty("eu-1", 1, 8.5);
        let (qty, salable) = f.engine.quantity_and_salability(&sku("SKU-1"), stock());
        assert_eq!(qty, Some(8.5));
        assert!(salable);
    }
}
