//! Error types for the delivery coordinator.

use crate::framework::FrameworkError;
use crate::model::OrderId;
use crate::order_queue::QueueError;
use crate::tracker::TrackerError;
use thiserror::Error;

/// Errors returned by [`CourierClient`](crate::clients::CourierClient) operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CourierError {
    #[error("Order queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Delivery tracker error: {0}")]
    Tracker(#[from] TrackerError),

    /// A target is armed but the courier is outside the geofence.
    /// `distance_m` is `None` until a position has been seen since arming.
    #[error("Not within delivery range (distance: {distance_m:?} m)")]
    NotDeliverable { distance_m: Option<f64> },

    /// Arming failed after the order was taken, and putting it back failed too.
    /// The order is lost from the queue.
    #[error("Accept of {order_id} failed and the order could not be restored: {reason}")]
    PartialAcceptFailure { order_id: OrderId, reason: String },

    #[error("Actor communication error: {0}")]
    Framework(#[from] FrameworkError),
}
