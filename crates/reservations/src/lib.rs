//! `stockyard-reservations` — the reservation ledger.
//!
//! An append-only log of signed quantity deltas keyed by (sku, stock). The
//! folded sum per key is "quantity currently promised away"; individual
//! records are immutable once appended and corrections are offsetting appends.

pub mod ledger;

pub use ledger::{
    BatchDisposition, IdempotencyKey, InMemoryReservationLedger, LedgerError, Reservation,
    ReservationLedger, ReservationMetadata, ReservationToAppend,
};
