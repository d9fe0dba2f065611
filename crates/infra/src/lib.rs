//! `stockyard-infra` — composition of the inventory subsystem.
//!
//! Wires the in-memory repositories, the ledger, the salability engine, the
//! deduction and selection services and the index maintenance into one rig,
//! and hosts the cross-crate integration and concurrency tests.

pub mod rig;


pub use rig::InventoryRig;
