//! # Courier Client
//!
//! The API the UI layer talks to. It wraps a `ResourceClient<DeliveryCoordinator>`
//! and exposes one typed method per operation. The reward catalog is immutable,
//! so the client keeps its own handle and answers [`CourierClient::catalog`]
//! without a round trip to the actor.

use crate::catalog::RewardCatalog;
use crate::coordinator::{
    CourierAction, CourierActionResult, CourierError, CourierEvent, CourierStatus,
    DeliveryCoordinator,
};
use crate::framework::ResourceClient;
use crate::model::{CardId, CollectionEntry, DeliveryReceipt, DeliveryTarget, LocationFix, Order};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct CourierClient {
    inner: ResourceClient<DeliveryCoordinator>,
    catalog: RewardCatalog,
}

impl CourierClient {
    pub fn new(inner: ResourceClient<DeliveryCoordinator>, catalog: RewardCatalog) -> Self {
        Self { inner, catalog }
    }

    /// Pending orders in listing order.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, CourierError> {
        match self.inner.perform_action(CourierAction::ListOrders).await? {
            CourierActionResult::Orders(orders) => Ok(orders),
            _ => unreachable!("ListOrders action must return Orders result"),
        }
    }

    /// Replaces the pending orders.
    #[instrument(skip(self, orders), fields(count = orders.len()))]
    pub async fn seed_orders(&self, orders: Vec<Order>) -> Result<Vec<Order>, CourierError> {
        match self.inner.perform_action(CourierAction::SeedOrders(orders)).await? {
            CourierActionResult::Orders(orders) => Ok(orders),
            _ => unreachable!("SeedOrders action must return Orders result"),
        }
    }

    #[instrument(skip(self, orders), fields(count = orders.len()))]
    pub async fn append_orders(&self, orders: Vec<Order>) -> Result<Vec<Order>, CourierError> {
        match self.inner.perform_action(CourierAction::AppendOrders(orders)).await? {
            CourierActionResult::Orders(orders) => Ok(orders),
            _ => unreachable!("AppendOrders action must return Orders result"),
        }
    }

    /// Appends new orders for `labels`; the coordinator assigns their ids.
    #[instrument(skip(self))]
    pub async fn refresh_orders(&self, labels: Vec<String>) -> Result<Vec<Order>, CourierError> {
        match self.inner.perform_action(CourierAction::RefreshOrders(labels)).await? {
            CourierActionResult::Orders(orders) => Ok(orders),
            _ => unreachable!("RefreshOrders action must return Orders result"),
        }
    }

    /// Accepts the order at `index` and returns the generated target.
    ///
    /// # Errors
    /// - [`CourierError::Queue`] if there is no order at `index`.
    /// - [`CourierError::Tracker`] if no position is known yet or a delivery is
    ///   already active. The order stays in the queue in both cases.
    #[instrument(skip(self))]
    pub async fn accept_order(&self, index: usize) -> Result<DeliveryTarget, CourierError> {
        match self
            .inner
            .perform_action(CourierAction::AcceptOrder { index })
            .await?
        {
            CourierActionResult::Accepted(target) => {
                debug!(order_id = %target.order_id, target = %target.coordinate, "Accepted");
                Ok(target)
            }
            _ => unreachable!("AcceptOrder action must return Accepted result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn is_deliverable(&self) -> Result<bool, CourierError> {
        match self.inner.perform_action(CourierAction::IsDeliverable).await? {
            CourierActionResult::Deliverable(deliverable) => Ok(deliverable),
            _ => unreachable!("IsDeliverable action must return Deliverable result"),
        }
    }

    /// Completes the active delivery and reports any card it earned.
    #[instrument(skip(self))]
    pub async fn deliver(&self) -> Result<DeliveryReceipt, CourierError> {
        match self.inner.perform_action(CourierAction::Deliver).await? {
            CourierActionResult::Delivered(receipt) => Ok(receipt),
            _ => unreachable!("Deliver action must return Delivered result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel_delivery(&self) -> Result<DeliveryTarget, CourierError> {
        match self.inner.perform_action(CourierAction::CancelDelivery).await? {
            CourierActionResult::Cancelled(target) => Ok(target),
            _ => unreachable!("CancelDelivery action must return Cancelled result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<CourierStatus, CourierError> {
        match self.inner.perform_action(CourierAction::Status).await? {
            CourierActionResult::Status(status) => Ok(status),
            _ => unreachable!("Status action must return Status result"),
        }
    }

    /// Owned copy of the unlocked card ids.
    #[instrument(skip(self))]
    pub async fn get_collection(&self) -> Result<BTreeSet<CardId>, CourierError> {
        match self.inner.perform_action(CourierAction::Collection).await? {
            CourierActionResult::Collection(ids) => Ok(ids),
            _ => unreachable!("Collection action must return Collection result"),
        }
    }

    /// Every catalog card with its ownership flag, in catalog order.
    #[instrument(skip(self))]
    pub async fn collection_view(&self) -> Result<Vec<CollectionEntry>, CourierError> {
        match self.inner.perform_action(CourierAction::CollectionView).await? {
            CourierActionResult::CollectionView(entries) => Ok(entries),
            _ => unreachable!("CollectionView action must return CollectionView result"),
        }
    }

    /// Waits until every unlock so far has been written to storage.
    #[instrument(skip(self))]
    pub async fn flush(&self) -> Result<(), CourierError> {
        match self.inner.perform_action(CourierAction::Flush).await? {
            CourierActionResult::Flushed => Ok(()),
            _ => unreachable!("Flush action must return Flushed result"),
        }
    }

    /// Queues a position fix. Returns once it is enqueued, not once it is applied;
    /// any later action from this client observes it.
    pub async fn report_position(&self, fix: LocationFix) -> Result<(), CourierError> {
        self.inner.notify(CourierEvent::Position(fix)).await?;
        Ok(())
    }

    pub fn catalog(&self) -> &RewardCatalog {
        &self.catalog
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}
