//! `stockyard-indexer` — materialized quantity/salability index.
//!
//! Catalog listing and search never recompute availability; they read a
//! materialized index row per (sku, stock). Mutations to source items, links
//! or reservations invalidate the affected rows through an explicit subscriber
//! list, and a refresher subscriber recomputes them from the salability view.

pub mod index;
pub mod notifier;
pub mod refresher;

pub use index::{IndexEntry, InMemoryStockIndex, StockIndex};
pub use notifier::{ReindexNotifier, ReindexSubscriber};
pub use refresher::{IndexRefresher, SalabilityView};
