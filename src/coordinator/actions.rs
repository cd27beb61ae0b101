//! Messages understood by the coordinator actor.

use super::CourierStatus;
use crate::model::{CardId, CollectionEntry, DeliveryReceipt, DeliveryTarget, LocationFix, Order};
use std::collections::BTreeSet;

/// Request/response operations.
#[derive(Debug, Clone)]
pub enum CourierAction {
    ListOrders,
    SeedOrders(Vec<Order>),
    AppendOrders(Vec<Order>),
    /// Appends fresh orders built from labels, with generated ids.
    RefreshOrders(Vec<String>),
    AcceptOrder { index: usize },
    IsDeliverable,
    Deliver,
    CancelDelivery,
    Status,
    Collection,
    CollectionView,
    /// Waits until queued collection writes are stored.
    Flush,
}

/// Results, one variant per action family.
///
/// The order-list actions all answer with [`CourierActionResult::Orders`], the
/// queue contents after the change.
#[derive(Debug, Clone)]
pub enum CourierActionResult {
    Orders(Vec<Order>),
    Accepted(DeliveryTarget),
    Deliverable(bool),
    Delivered(DeliveryReceipt),
    Cancelled(DeliveryTarget),
    Status(CourierStatus),
    Collection(BTreeSet<CardId>),
    CollectionView(Vec<CollectionEntry>),
    Flushed,
}

/// Fire-and-forget inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CourierEvent {
    Position(LocationFix),
}
