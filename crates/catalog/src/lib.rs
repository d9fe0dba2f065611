//! `stockyard-catalog` — sources, stocks, source items and their wiring.
//!
//! The inventory catalog: where quantity physically lives (sources), how it is
//! aggregated for sale (stocks and stock-source links), per-location quantity
//! rows (source items), the sales-channel → stock resolver and the stock item
//! configuration chain.

pub mod configuration;
pub mod repository;
pub mod resolver;
pub mod source;
pub mod source_item;
pub mod stock;

pub use configuration::{
    GetStockItemConfiguration, PartialStockItemConfiguration, StockItemConfiguration,
    StockItemConfigurationProvider,
};
pub use repository::{
    DeductionLine, InMemorySourceItemRepository, InMemorySourceRepository,
    InMemoryStockSourceLinkRepository, SourceItemRepository, SourceRepository,
    StockSourceLinkRepository,
};
pub use resolver::{InMemoryStockResolver, StockResolver};
pub use source::{LatLng, Source, SourceAddress};
pub use source_item::{SourceItem, SourceItemStatus};
pub use stock::{Stock, StockSourceLink};
