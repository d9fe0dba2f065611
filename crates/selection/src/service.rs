//! Algorithm registry and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use stockyard_core::{DomainError, DomainResult};

use crate::request::InventoryRequest;
use crate::result::SourceSelectionResult;

/// A source selection algorithm. Stateless across calls; anything per-run
/// (like the geocode cache) lives inside one `execute`.
pub trait SourceSelectionAlgorithm: Send + Sync {
    fn execute(&self, request: &InventoryRequest) -> DomainResult<SourceSelectionResult>;
}

/// Dispatches a request to the algorithm registered under a code.
pub struct SourceSelectionService {
    algorithms: HashMap<String, Arc<dyn SourceSelectionAlgorithm>>,
}

impl SourceSelectionService {
    pub const PRIORITY: &'static str = "priority";
    pub const DISTANCE: &'static str = "distance";

    pub fn new() -> Self {
        Self {
            algorithms: HashMap::new(),
        }
    }

    /// The algorithm used when the caller expresses no preference.
    pub fn default_algorithm_code() -> &'static str {
        Self::PRIORITY
    }

    pub fn register(
        mut self,
        code: impl Into<String>,
        algorithm: Arc<dyn SourceSelectionAlgorithm>,
    ) -> Self {
        self.algorithms.insert(code.into(), algorithm);
        self
    }

    pub fn execute(
        &self,
        request: &InventoryRequest,
        algorithm_code: &str,
    ) -> DomainResult<SourceSelectionResult> {
        let algorithm = self.algorithms.get(algorithm_code).ok_or_else(|| {
            DomainError::validation(format!("unknown source selection algorithm '{algorithm_code}'"))
        })?;
        tracing::debug!(
            algorithm = algorithm_code,
            stock_id = %request.stock_id,
            items = request.items.len(),
            "running source selection"
        );
        algorithm.execute(request)
    }
}

impl Default for SourceSelectionService {
    fn default() -> Self {
        Self::new()
    }
}
