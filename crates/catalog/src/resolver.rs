//! Sales channel → stock resolution.

use std::collections::HashMap;
use std::sync::RwLock;

use stockyard_core::{DomainError, DomainResult, SalesChannel, StockId};

/// Resolve the stock serving a sales channel. Exactly one stock per channel.
pub trait StockResolver: Send + Sync {
    fn resolve(&self, channel: &SalesChannel) -> DomainResult<StockId>;

    /// Convenience for the website-scoped flows (returns, legacy callers that
    /// only know the website code).
    fn resolve_website(&self, website_code: &str) -> DomainResult<StockId> {
        self.resolve(&SalesChannel::website(website_code))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStockResolver {
    assignments: RwLock<HashMap<SalesChannel, StockId>>,
}

impl InMemoryStockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point a channel at a stock. Re-assigning moves the channel; a channel
    /// is never served by two stocks.
    pub fn assign(&self, channel: SalesChannel, stock_id: StockId) -> DomainResult<()> {
        let mut assignments = self
            .assignments
            .write()
            .map_err(|_| DomainError::conflict("stock resolver lock poisoned"))?;
        assignments.insert(channel, stock_id);
        Ok(())
    }
}

impl StockResolver for InMemoryStockResolver {
    fn resolve(&self, channel: &SalesChannel) -> DomainResult<StockId> {
        let assignments = self
            .assignments
            .read()
            .map_err(|_| DomainError::conflict("stock resolver lock poisoned"))?;
        assignments
            .get(channel)
            .copied()
            .ok_or_else(|| DomainError::not_found(format!("no stock assigned to channel {channel}")))
    }
}
