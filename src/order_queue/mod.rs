//! # Order Queue
//!
//! Ordered list of pending orders. Insertion order is listing order: the first
//! order in is the first one offered.
//!
//! Taking an order is destructive, so an accepted order can never be handed out
//! twice. The only way back in is [`OrderQueue::restore_at`], which the coordinator
//! uses to roll back an accept whose second phase failed.

pub mod error;

pub use error::*;

use crate::model::Order;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct OrderQueue {
    orders: Vec<Order>,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with `initial`.
    pub fn seed(&mut self, initial: Vec<Order>) {
        debug!(count = initial.len(), "Seeding order queue");
        self.orders = initial;
    }

    /// Adds `orders` to the end of the queue.
    pub fn append(&mut self, orders: Vec<Order>) {
        debug!(count = orders.len(), "Appending orders");
        self.orders.extend(orders);
    }

    /// Removes and returns the order at `index`.
    ///
    /// # Errors
    /// - [`QueueError::Empty`] if the queue holds no orders.
    /// - [`QueueError::IndexOutOfRange`] if `index >= len`.
    pub fn take_at(&mut self, index: usize) -> Result<Order, QueueError> {
        let len = self.orders.len();
        if len == 0 {
            return Err(QueueError::Empty);
        }
        if index >= len {
            return Err(QueueError::IndexOutOfRange { index, len });
        }
        Ok(self.orders.remove(index))
    }

    /// Puts a previously taken order back at `index`.
    pub fn restore_at(&mut self, index: usize, order: Order) -> Result<(), QueueError> {
        let len = self.orders.len();
        if index > len {
            return Err(QueueError::IndexOutOfRange { index, len });
        }
        self.orders.insert(index, order);
        Ok(())
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
