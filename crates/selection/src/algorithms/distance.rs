//! Distance-based source selection.

use std::sync::Arc;

use stockyard_catalog::{
    Source, SourceItemRepository, SourceRepository, StockSourceLinkRepository,
};
use stockyard_core::{DomainError, DomainResult};

use crate::distance::{DistanceProvider, GeocodeCache, great_circle_distance_m};
use crate::request::InventoryRequest;
use crate::result::SourceSelectionResult;
use crate::service::SourceSelectionAlgorithm;

use super::allocate;
use super::priority::PriorityAlgorithm;

/// Same walk as the priority algorithm, but the source order is re-ranked per
/// request by great-circle distance to the destination, nearest first.
///
/// Ties preserve priority order: the walk starts from the priority-ordered
/// list and the distance sort is stable over whole-meter distances.
pub struct DistanceAlgorithm {
    priority: PriorityAlgorithm,
    source_items: Arc<dyn SourceItemRepository>,
    provider: DistanceProvider,
}

impl DistanceAlgorithm {
    pub fn new(
        sources: Arc<dyn SourceRepository>,
        links: Arc<dyn StockSourceLinkRepository>,
        source_items: Arc<dyn SourceItemRepository>,
        provider: DistanceProvider,
    ) -> Self {
        Self {
            priority: PriorityAlgorithm::new(sources, links, source_items.clone()),
            source_items,
            provider,
        }
    }

    fn rank_by_distance(
        &self,
        cache: &mut GeocodeCache,
        destination: stockyard_catalog::LatLng,
        sources: Vec<Source>,
    ) -> DomainResult<Vec<Source>> {
        let mut ranked: Vec<(u64, Source)> = Vec::with_capacity(sources.len());
        for source in sources {
            let latlng = self.provider.source_latlng(cache, &source)?;
            let meters = great_circle_distance_m(destination, latlng).round() as u64;
            tracing::debug!(source = %source.source_code(), meters, "ranked source by distance");
            ranked.push((meters, source));
        }
        // Stable: equal whole-meter distances keep the priority order.
        ranked.sort_by_key(|(meters, _)| *meters);
        Ok(ranked.into_iter().map(|(_, source)| source).collect())
    }
}

impl SourceSelectionAlgorithm for DistanceAlgorithm {
    fn execute(&self, request: &InventoryRequest) -> DomainResult<SourceSelectionResult> {
        let destination_address = request.destination.as_ref().ok_or_else(|| {
            DomainError::validation("distance-based selection requires a destination address")
        })?;

        // The cache lives exactly as long as this run.
        let mut cache = GeocodeCache::new();
        let destination = self
            .provider
            .resolve_address(&mut cache, destination_address)?;

        let ordered = self.priority.ordered_sources(request.stock_id);
        let ranked = self.rank_by_distance(&mut cache, destination, ordered)?;
        Ok(allocate(&self.source_items, &ranked, &request.items))
    }
}
