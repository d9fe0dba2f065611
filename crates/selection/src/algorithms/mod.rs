//! Built-in selection algorithms.

mod distance;
mod priority;

pub use distance::DistanceAlgorithm;
pub use priority::PriorityAlgorithm;

use std::sync::Arc;

use stockyard_catalog::{Source, SourceItemRepository};
use stockyard_core::Qty;

use crate::request::ItemRequest;
use crate::result::{SourceSelectionItem, SourceSelectionResult, UnsatisfiedItem};

/// The shared allocation walk: for each requested line, take
/// `min(remaining, available)` from each source in the given order until the
/// line is covered or the sources run out. Never invents quantity; leftovers
/// are reported unsatisfied.
pub(crate) fn allocate(
    source_items: &Arc<dyn SourceItemRepository>,
    ordered_sources: &[Source],
    items: &[ItemRequest],
) -> SourceSelectionResult {
    let mut lines = Vec::new();
    let mut unsatisfied = Vec::new();

    for item in items {
        let mut remaining: Qty = item.qty;
        for source in ordered_sources {
            if remaining <= 0.0 {
                break;
            }
            let Some(source_item) = source_items.get(source.source_code(), &item.sku) else {
                continue;
            };
            if !source_item.is_in_stock() {
                continue;
            }
            let available = source_item.quantity();
            if available <= 0.0 {
                continue;
            }

            let take = remaining.min(available);
            lines.push(SourceSelectionItem {
                source_code: source.source_code().clone(),
                sku: item.sku.clone(),
                qty_to_deduct: take,
                qty_available: available,
            });
            remaining -= take;
        }

        if remaining > 0.0 {
            unsatisfied.push(UnsatisfiedItem {
                sku: item.sku.clone(),
                remaining,
            });
        }
    }

    let shippable = unsatisfied.is_empty();
    SourceSelectionResult {
        items: lines,
        unsatisfied,
        shippable,
    }
}
