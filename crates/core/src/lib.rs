//! `stockyard-core` — inventory domain foundation.
//!
//! Identifiers, quantities, sales channels and the domain error model shared
//! by every other crate in the workspace. This crate contains **pure domain**
//! primitives (no infrastructure concerns).

pub mod channel;
pub mod error;
pub mod id;

pub use channel::{SalesChannel, SalesChannelType};
pub use error::{DomainError, DomainResult};
pub use id::{SourceCode, Sku, StockId};

/// Signed decimal quantity.
///
/// Quantities are decimals in this domain: fractional units (e.g. 1.5 kg of a
/// weight-sold SKU) are legal, and ledger balances and availability figures may
/// go negative (backorders, oversell awaiting reconciliation).
pub type Qty = f64;
