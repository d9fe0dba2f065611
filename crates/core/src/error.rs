//! Domain error model.

use thiserror::Error;

use crate::Qty;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. The variants
/// mirror the propagation policy of the inventory subsystem: quantity
/// insufficiency and external-service failures always abort the batch,
/// configuration misses are skippable by callers that can treat an item as
/// "not applicable".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, unknown algorithm code).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A deduction could not be satisfied. The whole batch is aborted and no
    /// quantity or reservation is written.
    #[error(
        "not all of the requested products are available in the requested quantity \
         (source '{source_code}', sku '{sku}': requested {requested}, available {available})"
    )]
    InsufficientQuantity {
        source_code: String,
        sku: String,
        requested: Qty,
        available: Qty,
    },

    /// No stock item configuration exists for the SKU on the given stock.
    #[error("no stock item configuration for sku '{sku}' on stock {stock_id}")]
    ConfigurationNotFound { sku: String, stock_id: u32 },

    /// Geocoding/geoname lookup exhausted all fallbacks for an address.
    #[error("unknown geoname for {0}")]
    UnresolvableAddress(String),

    /// The geocoding endpoint was unreachable or returned a malformed/non-OK
    /// response. Never silently defaulted; always surfaced to the caller.
    #[error("external service failure: {0}")]
    ExternalService(String),

    /// A requested resource was not found (domain-level).
    #[error("not found: {0}")]
    NotFound(String),

    /// A conflict occurred (e.g. concurrent conflicting update, duplicate key).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_quantity(
        source_code: impl Into<String>,
        sku: impl Into<String>,
        requested: Qty,
        available: Qty,
    ) -> Self {
        Self::InsufficientQuantity {
            source_code: source_code.into(),
            sku: sku.into(),
            requested,
            available,
        }
    }

    pub fn configuration_not_found(sku: impl Into<String>, stock_id: u32) -> Self {
        Self::ConfigurationNotFound {
            sku: sku.into(),
            stock_id,
        }
    }

    pub fn unresolvable_address(address: impl Into<String>) -> Self {
        Self::UnresolvableAddress(address.into())
    }

    pub fn external_service(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
