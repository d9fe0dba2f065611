//! Repositories for sources, stock-source links and source items.
//!
//! Traits are the seams; the in-memory implementations back tests and
//! single-process deployments. Source item deduction is commit-point of the
//! whole subsystem: `apply_deductions` re-validates and applies a batch under
//! one write lock, which is the row-transactional check-then-set keeping two
//! concurrent deductions from both passing a stale precondition.

use std::collections::HashMap;
use std::sync::RwLock;

use stockyard_core::{DomainError, DomainResult, Qty, Sku, SourceCode, StockId};

use crate::source::Source;
use crate::source_item::SourceItem;
use crate::stock::StockSourceLink;

/// Catalog of sources.
pub trait SourceRepository: Send + Sync {
    fn get(&self, source_code: &SourceCode) -> Option<Source>;
    fn save(&self, source: Source) -> DomainResult<()>;
    fn list_enabled(&self) -> Vec<Source>;
}

/// Stock-source links, ordered by priority for allocation.
pub trait StockSourceLinkRepository: Send + Sync {
    /// Links for a stock, ascending priority rank (the allocation walk order).
    fn links_for_stock(&self, stock_id: StockId) -> Vec<StockSourceLink>;
    fn save(&self, link: StockSourceLink) -> DomainResult<()>;
}

/// One staged deduction: take `qty` of `sku` at `source_code`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionLine {
    pub source_code: SourceCode,
    pub sku: Sku,
    pub qty: Qty,
}

/// Per-location quantity rows.
pub trait SourceItemRepository: Send + Sync {
    fn get(&self, source_code: &SourceCode, sku: &Sku) -> Option<SourceItem>;
    fn save(&self, item: SourceItem) -> DomainResult<()>;

    /// Apply a batch of deductions atomically: either every line commits or
    /// none does. Preconditions are re-checked against current state, not the
    /// caller's earlier reads.
    fn apply_deductions(&self, lines: &[DeductionLine]) -> DomainResult<()>;
}

#[derive(Debug, Default)]
pub struct InMemorySourceRepository {
    sources: RwLock<HashMap<SourceCode, Source>>,
}

impl InMemorySourceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceRepository for InMemorySourceRepository {
    fn get(&self, source_code: &SourceCode) -> Option<Source> {
        self.sources.read().ok()?.get(source_code).cloned()
    }

    fn save(&self, source: Source) -> DomainResult<()> {
        let mut sources = self
            .sources
            .write()
            .map_err(|_| DomainError::conflict("source repository lock poisoned"))?;
        sources.insert(source.source_code().clone(), source);
        Ok(())
    }

    fn list_enabled(&self) -> Vec<Source> {
        match self.sources.read() {
            Ok(sources) => {
                let mut enabled: Vec<Source> =
                    sources.values().filter(|s| s.is_enabled()).cloned().collect();
                enabled.sort_by(|a, b| a.source_code().as_str().cmp(b.source_code().as_str()));
                enabled
            }
            Err(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStockSourceLinkRepository {
    links: RwLock<Vec<StockSourceLink>>,
}

impl InMemoryStockSourceLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StockSourceLinkRepository for InMemoryStockSourceLinkRepository {
    fn links_for_stock(&self, stock_id: StockId) -> Vec<StockSourceLink> {
        match self.links.read() {
            Ok(links) => {
                let mut for_stock: Vec<StockSourceLink> = links
                    .iter()
                    .filter(|l| l.stock_id == stock_id)
                    .cloned()
                    .collect();
                for_stock.sort_by_key(|l| l.priority);
                for_stock
            }
            Err(_) => Vec::new(),
        }
    }

    fn save(&self, link: StockSourceLink) -> DomainResult<()> {
        let mut links = self
            .links
            .write()
            .map_err(|_| DomainError::conflict("link repository lock poisoned"))?;
        // One link per (stock, source); saving again updates the priority.
        links.retain(|l| !(l.stock_id == link.stock_id && l.source_code == link.source_code));
        links.push(link);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemorySourceItemRepository {
    items: RwLock<HashMap<(SourceCode, Sku), SourceItem>>,
}

impl InMemorySourceItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceItemRepository for InMemorySourceItemRepository {
    fn get(&self, source_code: &SourceCode, sku: &Sku) -> Option<SourceItem> {
        self.items
            .read()
            .ok()?
            .get(&(source_code.clone(), sku.clone()))
            .cloned()
    }

    fn save(&self, item: SourceItem) -> DomainResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| DomainError::conflict("source item repository lock poisoned"))?;
        items.insert((item.source_code().clone(), item.sku().clone()), item);
        Ok(())
    }

    fn apply_deductions(&self, lines: &[DeductionLine]) -> DomainResult<()> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut items = self
            .items
            .write()
            .map_err(|_| DomainError::conflict("source item repository lock poisoned"))?;

        // Validate the whole batch first. Totals are accumulated per row so
        // two lines hitting the same (source, sku) cannot each pass against
        // the undeducted quantity.
        let mut staged: HashMap<(SourceCode, Sku), Qty> = HashMap::new();
        for line in lines {
            let key = (line.source_code.clone(), line.sku.clone());
            let item = items.get(&key).ok_or_else(|| {
                DomainError::not_found(format!(
                    "source item for sku '{}' at source '{}'",
                    line.sku, line.source_code
                ))
            })?;
            let total = staged.entry(key).or_insert(0.0);
            *total += line.qty;
            if item.quantity() - *total < 0.0 {
                return Err(DomainError::insufficient_quantity(
                    line.source_code.as_str(),
                    line.sku.as_str(),
                    *total,
                    item.quantity(),
                ));
            }
        }

        // All preconditions hold under the lock; commit.
        for (key, qty) in staged {
            if let Some(item) = items.get_mut(&key) {
                item.deduct(qty)?;
            }
        }
        Ok(())
    }
}
