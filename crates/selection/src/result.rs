//! Selection result types. Ephemeral output, advisory only.

use serde::{Deserialize, Serialize};

use stockyard_core::{Qty, Sku, SourceCode};

/// One allocation line: deduct `qty_to_deduct` of `sku` at `source_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSelectionItem {
    pub source_code: SourceCode,
    pub sku: Sku,
    pub qty_to_deduct: Qty,
    /// Quantity the source had at selection time; informational (stale by the
    /// time deduction runs, which re-validates).
    pub qty_available: Qty,
}

/// A requested quantity the algorithm could not cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsatisfiedItem {
    pub sku: Sku,
    pub remaining: Qty,
}

/// Ordered allocation lines plus the satisfaction verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSelectionResult {
    pub items: Vec<SourceSelectionItem>,
    pub unsatisfied: Vec<UnsatisfiedItem>,
    /// True iff every requested quantity was fully covered.
    pub shippable: bool,
}

impl SourceSelectionResult {
    pub fn lines_for_sku(&self, sku: &Sku) -> Vec<&SourceSelectionItem> {
        self.items.iter().filter(|i| &i.sku == sku).collect()
    }
}
