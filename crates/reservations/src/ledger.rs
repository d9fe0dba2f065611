//! Append-only reservation ledger.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockyard_core::{Qty, SalesChannel, Sku, StockId};

/// Traceability tag of a reservation: which sales event produced it, through
/// which channel. `event_type` + `object_id` + sku form the idempotency key
/// that makes externally-driven redelivery safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationMetadata {
    pub event_type: String,
    pub object_id: String,
    pub channel: Option<SalesChannel>,
}

impl ReservationMetadata {
    pub fn new(event_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            object_id: object_id.into(),
            channel: None,
        }
    }

    pub fn with_channel(mut self, channel: SalesChannel) -> Self {
        self.channel = Some(channel);
        self
    }
}

/// An appended ledger record. Immutable; never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub sku: Sku,
    pub stock_id: StockId,
    /// Negative = promised away from availability, positive = returned.
    pub quantity: Qty,
    pub metadata: ReservationMetadata,
    pub appended_at: DateTime<Utc>,
}

/// A record to append. The ledger stamps `appended_at` on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationToAppend {
    pub sku: Sku,
    pub stock_id: StockId,
    pub quantity: Qty,
    pub metadata: ReservationMetadata,
}

impl ReservationToAppend {
    pub fn new(sku: Sku, stock_id: StockId, quantity: Qty, metadata: ReservationMetadata) -> Self {
        Self {
            sku,
            stock_id,
            quantity,
            metadata,
        }
    }

    /// Idempotency key tying the record to its originating sales event.
    pub fn idempotency_key(&self) -> IdempotencyKey {
        IdempotencyKey {
            event_type: self.metadata.event_type.clone(),
            object_id: self.metadata.object_id.clone(),
            sku: self.sku.clone(),
        }
    }
}

/// Replay-protection identity of a reservation: the originating event plus
/// the SKU it covers. Compared field-wise, so an object id containing a
/// separator character cannot collide with a different triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey {
    event_type: String,
    object_id: String,
    sku: Sku,
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.event_type, self.object_id, self.sku)
    }
}

/// How a batch relates to the ledger's applied keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDisposition {
    /// No key in the batch was applied before.
    New,
    /// Every key was applied before; appending again is a no-op.
    Replayed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A batch mixed already-applied and new idempotency keys. Two different
    /// events appear to share an object id; refusing is safer than guessing.
    #[error("reservation batch partially applied before (duplicate key '{0}')")]
    DuplicateKey(String),

    #[error("reservation ledger lock poisoned")]
    LockPoisoned,
}

/// The reservation ledger.
///
/// Append never validates the resulting balance; negative balances are legal
/// and expected (oversell/backorder states reconciled by deduction logic
/// elsewhere). Appends are commutative: the folded balance is the same under
/// any interleaving.
pub trait ReservationLedger: Send + Sync {
    /// Append a batch. A batch whose keys were all applied before is a no-op
    /// (safe redelivery); a partially-seen batch is rejected.
    fn append(&self, reservations: &[ReservationToAppend]) -> Result<(), LedgerError>;

    /// Classify a batch against the applied keys without appending. Callers
    /// with side effects outside the ledger gate on this before committing
    /// them, so a redelivered event skips the whole operation rather than
    /// just the append.
    fn disposition(
        &self,
        reservations: &[ReservationToAppend],
    ) -> Result<BatchDisposition, LedgerError>;

    /// Fold all deltas for (sku, stock).
    fn balance(&self, sku: &Sku, stock_id: StockId) -> Qty;

    /// Audit listing of the raw records, in append order.
    fn entries(&self, sku: &Sku, stock_id: StockId) -> Vec<Reservation>;
}

#[derive(Debug, Default)]
struct LedgerInner {
    entries: HashMap<(Sku, StockId), Vec<Reservation>>,
    applied_keys: HashSet<IdempotencyKey>,
}

impl LedgerInner {
    fn classify(
        &self,
        reservations: &[ReservationToAppend],
    ) -> Result<BatchDisposition, LedgerError> {
        let seen = reservations
            .iter()
            .filter(|r| self.applied_keys.contains(&r.idempotency_key()))
            .count();
        if seen == 0 {
            Ok(BatchDisposition::New)
        } else if seen == reservations.len() {
            Ok(BatchDisposition::Replayed)
        } else {
            let dup = reservations
                .iter()
                .find(|r| self.applied_keys.contains(&r.idempotency_key()))
                .map(|r| r.idempotency_key().to_string())
                .unwrap_or_default();
            Err(LedgerError::DuplicateKey(dup))
        }
    }
}

/// In-memory ledger. Append takes the write lock once per batch; balance and
/// entries take the read lock, so folds are consistent under concurrent
/// appends.
#[derive(Debug, Default)]
pub struct InMemoryReservationLedger {
    inner: RwLock<LedgerInner>,
}

impl InMemoryReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReservationLedger for InMemoryReservationLedger {
    fn append(&self, reservations: &[ReservationToAppend]) -> Result<(), LedgerError> {
        if reservations.is_empty() {
            return Ok(());
        }

        let mut inner = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;

        if inner.classify(reservations)? == BatchDisposition::Replayed {
            // Full redelivery of an already-applied batch.
            return Ok(());
        }

        let appended_at = Utc::now();
        for r in reservations {
            inner.applied_keys.insert(r.idempotency_key());
            inner
                .entries
                .entry((r.sku.clone(), r.stock_id))
                .or_default()
                .push(Reservation {
                    sku: r.sku.clone(),
                    stock_id: r.stock_id,
                    quantity: r.quantity,
                    metadata: r.metadata.clone(),
                    appended_at,
                });
        }
        Ok(())
    }

    fn disposition(
        &self,
        reservations: &[ReservationToAppend],
    ) -> Result<BatchDisposition, LedgerError> {
        if reservations.is_empty() {
            return Ok(BatchDisposition::New);
        }
        let inner = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        inner.classify(reservations)
    }

    fn balance(&self, sku: &Sku, stock_id: StockId) -> Qty {
        match self.inner.read() {
            Ok(inner) => inner
                .entries
                .get(&(sku.clone(), stock_id))
                .map(|rs| rs.iter().map(|r| r.quantity).sum())
                .unwrap_or(0.0),
            Err(_) => 0.0,
        }
    }

    fn entries(&self, sku: &Sku, stock_id: StockId) -> Vec<Reservation> {
        match self.inner.read() {
            Ok(inner) => inner
                .entries
                .get(&(sku.clone(), stock_id))
                .cloned()
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sku(s: &str) -> Sku {
        Sku::new(s).unwrap()
    }

    fn stock() -> StockId {
        StockId::new(1)
    }

    fn record(event: &str, object: &str, qty: Qty) -> ReservationToAppend {
        ReservationToAppend::new(
            sku("SKU-1"),
            stock(),
            qty,
            ReservationMetadata::new(event, object),
        )
    }

    #[test]
    fn balance_starts_at_zero() {
        let ledger = InMemoryReservationLedger::new();
        assert_eq!(ledger.balance(&sku("SKU-1"), stock()), 0.0);
    }

    #[test]
    fn balance_folds_signed_deltas() {
        let ledger = InMemoryReservationLedger::new();
        ledger.append(&[record("order_placed", "o-1", -3.0)]).unwrap();
        ledger.append(&[record("order_canceled", "o-1", 3.0)]).unwrap();
        ledger.append(&[record("order_placed", "o-2", -1.5)]).unwrap();

        assert_eq!(ledger.balance(&sku("SKU-1"), stock()), -1.5);
        assert_eq!(ledger.entries(&sku("SKU-1"), stock()).len(), 3);
    }

    #[test]
    fn negative_balances_are_legal() {
        let ledger = InMemoryReservationLedger::new();
        ledger.append(&[record("order_placed", "o-1", -100.0)]).unwrap();
        assert_eq!(ledger.balance(&sku("SKU-1"), stock()), -100.0);
    }

    #[test]
    fn balances_are_keyed_by_sku_and_stock() {
        let ledger = InMemoryReservationLedger::new();
        ledger.append(&[record("order_placed", "o-1", -2.0)]).unwrap();

        assert_eq!(ledger.balance(&sku("SKU-2"), stock()), 0.0);
        assert_eq!(ledger.balance(&sku("SKU-1"), StockId::new(9)), 0.0);
    }

    #[test]
    fn full_batch_redelivery_is_a_noop() {
        let ledger = InMemoryReservationLedger::new();
        let batch = vec![record("shipment_created", "s-1", -4.0)];

        ledger.append(&batch).unwrap();
        ledger.append(&batch).unwrap();

        assert_eq!(ledger.balance(&sku("SKU-1"), stock()), -4.0);
        assert_eq!(ledger.entries(&sku("SKU-1"), stock()).len(), 1);
    }

    #[test]
    fn partially_seen_batch_is_a_duplicate_key_conflict() {
        let ledger = InMemoryReservationLedger::new();
        ledger.append(&[record("shipment_created", "s-1", -4.0)]).unwrap();

        let mixed = vec![
            record("shipment_created", "s-1", -4.0),
            ReservationToAppend::new(
                sku("SKU-2"),
                stock(),
                -1.0,
                ReservationMetadata::new("shipment_created", "s-1"),
            ),
        ];
        let err = ledger.append(&mixed).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateKey(_)));

        // Nothing from the rejected batch landed.
        assert_eq!(ledger.balance(&sku("SKU-2"), stock()), 0.0);
    }

    #[test]
    fn object_id_with_separator_does_not_collide_with_another_triple() {
        // (event, "a:b", "c") and (event, "a", "b:c") join to the same string
        // but are distinct events; both must land.
        let ledger = InMemoryReservationLedger::new();
        let first = ReservationToAppend::new(
            sku("c"),
            stock(),
            -1.0,
            ReservationMetadata::new("order_placed", "a:b"),
        );
        let second = ReservationToAppend::new(
            sku("b:c"),
            stock(),
            -2.0,
            ReservationMetadata::new("order_placed", "a"),
        );

        ledger.append(&[first]).unwrap();
        ledger.append(&[second]).unwrap();

        assert_eq!(ledger.balance(&sku("c"), stock()), -1.0);
        assert_eq!(ledger.balance(&sku("b:c"), stock()), -2.0);
    }

    #[test]
    fn disposition_classifies_new_replayed_and_mixed_batches() {
        let ledger = InMemoryReservationLedger::new();
        let batch = vec![record("shipment_created", "s-1", -4.0)];

        assert_eq!(
            ledger.disposition(&batch).unwrap(),
            BatchDisposition::New
        );
        ledger.append(&batch).unwrap();
        assert_eq!(
            ledger.disposition(&batch).unwrap(),
            BatchDisposition::Replayed
        );

        let mixed = vec![
            record("shipment_created", "s-1", -4.0),
            ReservationToAppend::new(
                sku("SKU-2"),
                stock(),
                -1.0,
                ReservationMetadata::new("shipment_created", "s-1"),
            ),
        ];
        assert!(matches!(
            ledger.disposition(&mixed).unwrap_err(),
            LedgerError::DuplicateKey(_)
        ));
    }

    #[test]
    fn corrections_are_offsetting_appends_not_deletes() {
        let ledger = InMemoryReservationLedger::new();
        ledger.append(&[record("order_placed", "o-1", -5.0)]).unwrap();
        ledger.append(&[record("creditmemo_created", "cm-1", 5.0)]).unwrap();

        assert_eq!(ledger.balance(&sku("SKU-1"), stock()), 0.0);
        // Both records remain for audit.
        assert_eq!(ledger.entries(&sku("SKU-1"), stock()).len(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the folded balance equals the sum of all deltas no matter
        /// how the appends were ordered (commutativity).
        #[test]
        fn balance_is_order_independent(
            deltas in prop::collection::vec(-1000i64..1000i64, 1..20),
            seed in any::<u64>(),
        ) {
            let forward = InMemoryReservationLedger::new();
            for (i, d) in deltas.iter().enumerate() {
                forward
                    .append(&[record("order_placed", &format!("o-{i}"), *d as Qty)])
                    .unwrap();
            }

            // Deterministic shuffle of the same records.
            let mut shuffled: Vec<(usize, i64)> = deltas.iter().copied().enumerate().collect();
            let mut state = seed;
            for i in (1..shuffled.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state % (i as u64 + 1)) as usize;
                shuffled.swap(i, j);
            }
            let backward = InMemoryReservationLedger::new();
            for (i, d) in &shuffled {
                backward
                    .append(&[record("order_placed", &format!("o-{i}"), *d as Qty)])
                    .unwrap();
            }

            let expected: Qty = deltas.iter().map(|d| *d as Qty).sum();
            prop_assert_eq!(forward.balance(&sku("SKU-1"), stock()), expected);
            prop_assert_eq!(backward.balance(&sku("SKU-1"), stock()), expected);
        }
    }
}
