//! Represents a pending courier order.
//!
//! Orders are created when the queue is seeded or refreshed and are destroyed
//! when accepted. The id is opaque to callers.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub label: String,
}

impl Order {
    /// Creates a new Order instance.
    pub fn new(id: impl Into<OrderId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Sequential `order_<n>` id source, shared by clones.
#[derive(Debug, Clone)]
pub struct OrderIdGenerator {
    counter: Arc<AtomicU64>,
}

impl Default for OrderIdGenerator {
    fn default() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl OrderIdGenerator {
    pub fn next_id(&self) -> OrderId {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        OrderId(format!("order_{id}"))
    }

    /// Builds fresh orders for the given labels.
    pub fn orders<I, S>(&self, labels: I) -> Vec<Order>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels
            .into_iter()
            .map(|label| Order::new(self.next_id(), label))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_is_sequential_across_clones() {
        let ids = OrderIdGenerator::default();
        let other = ids.clone();
        assert_eq!(ids.next_id(), OrderId::from("order_1"));
        assert_eq!(other.next_id(), OrderId::from("order_2"));

        let orders = ids.orders(["Pizza", "Flowers"]);
        assert_eq!(orders[0], Order::new("order_3", "Pizza"));
        assert_eq!(orders[1].id.to_string(), "order_4");
    }
}
