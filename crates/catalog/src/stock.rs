//! Stock: a named aggregation of sources serving sales channels.

use serde::{Deserialize, Serialize};

use stockyard_core::{SourceCode, StockId};

/// Entity: Stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    stock_id: StockId,
    name: String,
}

impl Stock {
    pub fn new(stock_id: StockId, name: impl Into<String>) -> Self {
        Self {
            stock_id,
            name: name.into(),
        }
    }

    pub fn stock_id(&self) -> StockId {
        self.stock_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Link between a stock and a source, carrying the allocation priority rank.
///
/// Priority is a total order over the sources of one stock: ascending rank is
/// walked first by the priority selection algorithm and breaks ties in the
/// distance-based one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSourceLink {
    pub stock_id: StockId,
    pub source_code: SourceCode,
    pub priority: u32,
}

impl StockSourceLink {
    pub fn new(stock_id: StockId, source_code: SourceCode, priority: u32) -> Self {
        Self {
            stock_id,
            source_code,
            priority,
        }
    }
}
