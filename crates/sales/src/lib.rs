//! `stockyard-sales` — the sales-side inventory flows.
//!
//! Salability computation (is this SKU purchasable on this stock, and how much
//! of it), source deduction for sales events (shipments) and the
//! return-to-stock flow for cancellations and credit memos.

pub mod deduction;
pub mod event;
pub mod return_to_stock;
pub mod salability;

pub use deduction::{ItemToDeduct, SourceDeductionRequest, SourceDeductionService};
pub use event::{SalesEvent, SalesEventType};
pub use return_to_stock::ReturnToStockService;
pub use salability::{ProductSalability, SalabilityEngine};
