//! Error types for the order queue.

use thiserror::Error;

/// Errors that can occur when taking orders from the queue.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The queue holds no orders.
    #[error("Order queue is empty")]
    Empty,

    /// The index does not address an order in the queue.
    #[error("Order index {index} out of range (queue length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
