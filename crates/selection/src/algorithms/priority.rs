//! Priority-based source selection.

use std::sync::Arc;

use stockyard_catalog::{
    Source, SourceItemRepository, SourceRepository, StockSourceLinkRepository,
};
use stockyard_core::{DomainResult, StockId};

use crate::request::InventoryRequest;
use crate::result::SourceSelectionResult;
use crate::service::SourceSelectionAlgorithm;

use super::allocate;

/// Walks the stock's enabled sources in ascending priority rank.
pub struct PriorityAlgorithm {
    sources: Arc<dyn SourceRepository>,
    links: Arc<dyn StockSourceLinkRepository>,
    source_items: Arc<dyn SourceItemRepository>,
}

impl PriorityAlgorithm {
    pub fn new(
        sources: Arc<dyn SourceRepository>,
        links: Arc<dyn StockSourceLinkRepository>,
        source_items: Arc<dyn SourceItemRepository>,
    ) -> Self {
        Self {
            sources,
            links,
            source_items,
        }
    }

    /// Enabled sources of the stock, priority order. Shared with the distance
    /// algorithm, whose re-ranking starts from this order.
    pub(crate) fn ordered_sources(&self, stock_id: StockId) -> Vec<Source> {
        self.links
            .links_for_stock(stock_id)
            .iter()
            .filter_map(|link| self.sources.get(&link.source_code))
            .filter(|source| source.is_enabled())
            .collect()
    }
}

impl SourceSelectionAlgorithm for PriorityAlgorithm {
    fn execute(&self, request: &InventoryRequest) -> DomainResult<SourceSelectionResult> {
        let ordered = self.ordered_sources(request.stock_id);
        Ok(allocate(&self.source_items, &ordered, &request.items))
    }
}
