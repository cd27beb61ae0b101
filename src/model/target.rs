use crate::model::{CardDefinition, Coordinate, OrderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The generated destination of an accepted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTarget {
    pub coordinate: Coordinate,
    pub label: String,
    pub order_id: OrderId,
}

/// One event from the location stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// A fix stamped with the current time.
    pub fn now(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            timestamp: Utc::now(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// A card rolled on delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub card: CardDefinition,
    /// `false` only when the draw pool includes owned cards and one of those was drawn.
    pub newly_unlocked: bool,
}

/// Result of a completed delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReceipt {
    pub target: DeliveryTarget,
    pub reward: Option<Reward>,
}

impl DeliveryReceipt {
    /// Whether this delivery added a card to the collection.
    pub fn obtained_new_card(&self) -> bool {
        self.reward.as_ref().is_some_and(|r| r.newly_unlocked)
    }
}
