//! Sales event vocabulary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened on the sales side to move quantity around.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesEventType {
    OrderPlaced,
    OrderCanceled,
    ShipmentCreated,
    CreditmemoCreated,
    ManualAdjustment,
}

impl SalesEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            SalesEventType::OrderPlaced => "order_placed",
            SalesEventType::OrderCanceled => "order_canceled",
            SalesEventType::ShipmentCreated => "shipment_created",
            SalesEventType::CreditmemoCreated => "creditmemo_created",
            SalesEventType::ManualAdjustment => "manual_adjustment",
        }
    }
}

/// A concrete sales event: type plus the id of the originating document
/// (order increment id, shipment id, ...). The pair tags every reservation the
/// event produces and anchors idempotent redelivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesEvent {
    pub event_type: SalesEventType,
    pub object_id: String,
}

impl SalesEvent {
    pub fn new(event_type: SalesEventType, object_id: impl Into<String>) -> Self {
        Self {
            event_type,
            object_id: object_id.into(),
        }
    }

    /// Manual adjustments have no originating document; mint an opaque id so
    /// each adjustment stays individually traceable and replayable.
    pub fn manual_adjustment() -> Self {
        Self::new(SalesEventType::ManualAdjustment, Uuid::now_v7().to_string())
    }
}
