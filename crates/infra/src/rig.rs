//! The assembled inventory subsystem.

use std::sync::Arc;

use stockyard_catalog::{
    GetStockItemConfiguration, InMemorySourceItemRepository, InMemorySourceRepository,
    InMemoryStockResolver, InMemoryStockSourceLinkRepository, PartialStockItemConfiguration,
    Source, SourceItem, SourceItemRepository, SourceRepository, StockItemConfigurationProvider,
    StockResolver, StockSourceLink, StockSourceLinkRepository,
};
use stockyard_core::{DomainResult, Qty, SalesChannel, Sku, SourceCode, StockId};
use stockyard_indexer::{
    IndexRefresher, InMemoryStockIndex, ReindexNotifier, SalabilityView, StockIndex,
};
use stockyard_reservations::{InMemoryReservationLedger, ReservationLedger};
use stockyard_sales::{ReturnToStockService, SalabilityEngine, SalesEvent, SourceDeductionService};
use stockyard_selection::{
    DistanceAlgorithm, DistanceProvider, GeonameTable, PriorityAlgorithm, SourceSelectionService,
};

/// Everything wired together over the in-memory implementations.
///
/// The composition the original deployment assembled through dependency
/// injection; tests and single-process embedders get it ready-made.
pub struct InventoryRig {
    pub sources: Arc<InMemorySourceRepository>,
    pub links: Arc<InMemoryStockSourceLinkRepository>,
    pub source_items: Arc<InMemorySourceItemRepository>,
    pub resolver: Arc<InMemoryStockResolver>,
    pub configuration: Arc<StockItemConfigurationProvider>,
    pub ledger: Arc<InMemoryReservationLedger>,
    pub salability: Arc<SalabilityEngine>,
    pub deduction: SourceDeductionService,
    pub return_to_stock: ReturnToStockService,
    pub selection: SourceSelectionService,
    pub index: Arc<InMemoryStockIndex>,
    pub notifier: Arc<ReindexNotifier>,
}

impl InventoryRig {
    /// Build the rig with an offline (geoname-backed) distance provider.
    pub fn new(geonames: Arc<GeonameTable>) -> Self {
        let sources = Arc::new(InMemorySourceRepository::new());
        let links = Arc::new(InMemoryStockSourceLinkRepository::new());
        let source_items = Arc::new(InMemorySourceItemRepository::new());
        let resolver = Arc::new(InMemoryStockResolver::new());
        let configuration = Arc::new(StockItemConfigurationProvider::new());
        let ledger = Arc::new(InMemoryReservationLedger::new());
        let notifier = Arc::new(ReindexNotifier::new());
        let index = Arc::new(InMemoryStockIndex::new());

        let salability = Arc::new(SalabilityEngine::new(
            configuration.clone() as Arc<dyn GetStockItemConfiguration>,
            links.clone() as Arc<dyn StockSourceLinkRepository>,
            sources.clone() as Arc<dyn SourceRepository>,
            source_items.clone() as Arc<dyn SourceItemRepository>,
            ledger.clone() as Arc<dyn ReservationLedger>,
        ));

        // Index rows follow availability: subscribe the refresher before any
        // mutation flow can fire a notification.
        let refresher = IndexRefresher::new(
            index.clone() as Arc<dyn StockIndex>,
            salability.clone() as Arc<dyn SalabilityView>,
        );
        notifier.subscribe(Arc::new(refresher));

        let deduction = SourceDeductionService::new(
            resolver.clone() as Arc<dyn StockResolver>,
            configuration.clone() as Arc<dyn GetStockItemConfiguration>,
            source_items.clone() as Arc<dyn SourceItemRepository>,
            ledger.clone() as Arc<dyn ReservationLedger>,
            notifier.clone(),
        );
        let return_to_stock = ReturnToStockService::new(
            resolver.clone() as Arc<dyn StockResolver>,
            configuration.clone() as Arc<dyn GetStockItemConfiguration>,
            ledger.clone() as Arc<dyn ReservationLedger>,
            notifier.clone(),
        );

        let provider = DistanceProvider::offline(geonames);
        let selection = SourceSelectionService::new()
            .register(
                SourceSelectionService::PRIORITY,
                Arc::new(PriorityAlgorithm::new(
                    sources.clone() as Arc<dyn SourceRepository>,
                    links.clone() as Arc<dyn StockSourceLinkRepository>,
                    source_items.clone() as Arc<dyn SourceItemRepository>,
                )),
            )
            .register(
                SourceSelectionService::DISTANCE,
                Arc::new(DistanceAlgorithm::new(
                    sources.clone() as Arc<dyn SourceRepository>,
                    links.clone() as Arc<dyn StockSourceLinkRepository>,
                    source_items.clone() as Arc<dyn SourceItemRepository>,
                    provider,
                )),
            );

        tracing::debug!("inventory rig assembled");
        Self {
            sources,
            links,
            source_items,
            resolver,
            configuration,
            ledger,
            salability,
            deduction,
            return_to_stock,
            selection,
            index,
            notifier,
        }
    }

    // Seeding helpers shared by the integration tests and embedders.

    pub fn add_source(&self, source: Source) -> DomainResult<()> {
        self.sources.save(source)
    }

    /// Link a source to a stock and invalidate the stock's index rows, as any
    /// link-set mutation must.
    pub fn link_source(
        &self,
        stock_id: StockId,
        source_code: SourceCode,
        priority: u32,
    ) -> DomainResult<()> {
        self.links
            .save(StockSourceLink::new(stock_id, source_code, priority))?;
        self.notifier.stock_changed(stock_id);
        Ok(())
    }

    pub fn assign_channel(&self, channel: SalesChannel, stock_id: StockId) -> DomainResult<()> {
        self.resolver.assign(channel, stock_id)
    }

    /// Administrative source-item save: persists the row, registers the SKU on
    /// the stocks it is sellable through and triggers reindexing.
    pub fn save_source_item(&self, item: SourceItem, stock_id: StockId) -> DomainResult<()> {
        let sku = item.sku().clone();
        self.source_items.save(item)?;
        self.configuration.assign(sku.clone(), stock_id);
        self.notifier.item_changed(&sku, stock_id);
        Ok(())
    }

    pub fn set_item_configuration(
        &self,
        sku: Sku,
        stock_id: StockId,
        layer: PartialStockItemConfiguration,
    ) {
        self.configuration.set_item_override(sku.clone(), stock_id, layer);
        self.notifier.item_changed(&sku, stock_id);
    }

    pub fn reservation_balance(&self, sku: &Sku, stock_id: StockId) -> Qty {
        self.ledger.balance(sku, stock_id)
    }

    /// Support-flow stock correction with no originating sales document. Each
    /// call mints its own adjustment event, so repeated corrections all land.
    pub fn adjust_reservations(
        &self,
        website_code: &str,
        items: &[(Sku, Qty)],
    ) -> DomainResult<()> {
        self.return_to_stock
            .execute(website_code, &SalesEvent::manual_adjustment(), items)
    }
}
