//! [`ActorEntity`] implementation for the delivery coordinator.
//!
//! The coordinator owns the order queue, the tracker and the collection. All of
//! them are plain structs: the actor task is their only owner, so every operation
//! below runs to completion before the next message is looked at.

use super::{CourierAction, CourierActionResult, CourierError, CourierEvent};
use crate::catalog::RewardCatalog;
use crate::collection::CollectionStore;
use crate::framework::ActorEntity;
use crate::model::{
    CollectionEntry, Coordinate, DeliveryReceipt, DeliveryTarget, LocationFix, Order,
    OrderIdGenerator, Reward,
};
use crate::order_queue::OrderQueue;
use crate::reward::RewardPolicy;
use crate::tracker::{
    DeliveryTracker, TrackerError, TrackerPhase, TrackerState, DEFAULT_BBOX_DEGREES,
    DEFAULT_RADIUS_METERS,
};
use async_trait::async_trait;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, warn};

/// Shared, read-only dependencies injected into the coordinator at `run`.
#[derive(Debug, Clone)]
pub struct CourierContext {
    pub catalog: RewardCatalog,
    pub policy: RewardPolicy,
}

/// Point-in-time view of the coordinator for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierStatus {
    pub tracker: TrackerState,
    pub position: Option<LocationFix>,
    pub pending_orders: usize,
    pub unlocked_cards: usize,
}

impl CourierStatus {
    pub fn phase(&self) -> TrackerPhase {
        self.tracker.phase()
    }
}

#[derive(Debug)]
pub struct DeliveryCoordinator {
    queue: OrderQueue,
    tracker: DeliveryTracker,
    collection: CollectionStore,
    ids: OrderIdGenerator,
    rng: StdRng,
    last_fix: Option<LocationFix>,
    radius_meters: f64,
    bbox_degrees: f64,
}

impl DeliveryCoordinator {
    pub fn new(collection: CollectionStore, rng: StdRng) -> Self {
        Self {
            queue: OrderQueue::new(),
            tracker: DeliveryTracker::new(),
            collection,
            ids: OrderIdGenerator::default(),
            rng,
            last_fix: None,
            radius_meters: DEFAULT_RADIUS_METERS,
            bbox_degrees: DEFAULT_BBOX_DEGREES,
        }
    }

    /// Overrides the geofence radius and the half-width of the target square.
    ///
    /// The values are checked on accept, which fails with
    /// [`TrackerError::InvalidGeometry`] if they are unusable.
    pub fn with_geofence(mut self, radius_meters: f64, bbox_degrees: f64) -> Self {
        self.radius_meters = radius_meters;
        self.bbox_degrees = bbox_degrees;
        self
    }

    /// Initial orders, built from labels with generated ids.
    pub fn with_order_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let orders = self.ids.orders(labels);
        self.queue.seed(orders);
        self
    }

    pub fn orders(&self) -> &[Order] {
        self.queue.orders()
    }

    pub fn tracker(&self) -> &DeliveryTracker {
        &self.tracker
    }

    pub fn collection(&self) -> &CollectionStore {
        &self.collection
    }

    pub fn last_position(&self) -> Option<Coordinate> {
        self.last_fix.map(|fix| fix.coordinate())
    }

    /// Records the fix as the current position and feeds it to the tracker.
    pub fn apply_fix(&mut self, fix: LocationFix) -> TrackerPhase {
        self.last_fix = Some(fix);
        self.tracker.on_position_update(fix.coordinate())
    }

    /// Takes the order at `index` and arms a target for it around the last known
    /// position.
    ///
    /// If arming fails the order goes back to `index` and the arming error is
    /// returned, so a failed accept leaves the queue as it was.
    pub fn accept_order(&mut self, index: usize) -> Result<DeliveryTarget, CourierError> {
        let order = self.queue.take_at(index)?;
        let origin = self.last_position();

        match self.tracker.accept(
            origin,
            self.radius_meters,
            self.bbox_degrees,
            &order,
            &mut self.rng,
        ) {
            Ok(target) => {
                if let Some(origin) = origin {
                    self.tracker.on_position_update(origin);
                }
                info!(order_id = %order.id, label = %order.label, "Order accepted");
                Ok(target)
            }
            Err(arm_error) => {
                let order_id = order.id.clone();
                match self.queue.restore_at(index, order) {
                    Ok(()) => {
                        warn!(order_id = %order_id, error = %arm_error, "Accept rolled back");
                        Err(arm_error.into())
                    }
                    Err(restore_error) => Err(CourierError::PartialAcceptFailure {
                        order_id,
                        reason: format!("{arm_error}; restore failed: {restore_error}"),
                    }),
                }
            }
        }
    }

    /// Completes the active delivery and rolls for a reward.
    pub fn deliver(&mut self, ctx: &CourierContext) -> Result<DeliveryReceipt, CourierError> {
        match self.tracker.state() {
            TrackerState::Idle => return Err(TrackerError::NoActiveTarget.into()),
            TrackerState::Armed { distance_meters, .. } => {
                return Err(CourierError::NotDeliverable {
                    distance_m: *distance_meters,
                })
            }
            TrackerState::InRange { .. } => {}
        }

        let target = self.tracker.complete()?;
        let owned = self.collection.snapshot();
        let reward = ctx
            .policy
            .roll(&mut self.rng, &ctx.catalog, &owned)
            .map(|card| {
                let newly_unlocked = self.collection.unlock(&card.id);
                Reward {
                    card,
                    newly_unlocked,
                }
            });

        match &reward {
            Some(r) => info!(
                order_id = %target.order_id,
                card_id = %r.card.id,
                newly_unlocked = r.newly_unlocked,
                "Delivered with reward"
            ),
            None => info!(order_id = %target.order_id, "Delivered"),
        }
        Ok(DeliveryReceipt { target, reward })
    }

    pub fn cancel_delivery(&mut self) -> Result<DeliveryTarget, CourierError> {
        Ok(self.tracker.cancel()?)
    }

    pub fn refresh_orders(&mut self, labels: Vec<String>) -> Vec<Order> {
        let orders = self.ids.orders(labels);
        self.queue.append(orders);
        self.queue.orders().to_vec()
    }

    pub fn status(&self) -> CourierStatus {
        CourierStatus {
            tracker: self.tracker.state().clone(),
            position: self.last_fix,
            pending_orders: self.queue.len(),
            unlocked_cards: self.collection.len(),
        }
    }

    /// The catalog in order, each card marked with whether it is owned.
    pub fn collection_view(&self, catalog: &RewardCatalog) -> Vec<CollectionEntry> {
        catalog
            .all()
            .iter()
            .map(|card| CollectionEntry {
                owned: self.collection.is_unlocked(&card.id),
                card: card.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ActorEntity for DeliveryCoordinator {
    type Action = CourierAction;
    type ActionResult = CourierActionResult;
    type Event = CourierEvent;
    type Context = CourierContext;
    type Error = CourierError;

    async fn on_start(&mut self, ctx: &CourierContext) {
        info!(
            pending_orders = self.queue.len(),
            unlocked_cards = self.collection.len(),
            namespace = self.collection.namespace(),
            catalog_cards = ctx.catalog.len(),
            "Coordinator ready"
        );
    }

    async fn on_stop(&mut self, _ctx: &CourierContext) {
        self.collection.flush().await;
    }

    async fn handle_action(
        &mut self,
        action: CourierAction,
        ctx: &CourierContext,
    ) -> Result<CourierActionResult, CourierError> {
        match action {
            CourierAction::ListOrders => Ok(CourierActionResult::Orders(self.queue.orders().to_vec())),
            CourierAction::SeedOrders(orders) => {
                self.queue.seed(orders);
                Ok(CourierActionResult::Orders(self.queue.orders().to_vec()))
            }
            CourierAction::AppendOrders(orders) => {
                self.queue.append(orders);
                Ok(CourierActionResult::Orders(self.queue.orders().to_vec()))
            }
            CourierAction::RefreshOrders(labels) => {
                Ok(CourierActionResult::Orders(self.refresh_orders(labels)))
            }
            CourierAction::AcceptOrder { index } => {
                self.accept_order(index).map(CourierActionResult::Accepted)
            }
            CourierAction::IsDeliverable => {
                Ok(CourierActionResult::Deliverable(self.tracker.is_deliverable()))
            }
            CourierAction::Deliver => self.deliver(ctx).map(CourierActionResult::Delivered),
            CourierAction::CancelDelivery => {
                self.cancel_delivery().map(CourierActionResult::Cancelled)
            }
            CourierAction::Status => Ok(CourierActionResult::Status(self.status())),
            CourierAction::Collection => {
                Ok(CourierActionResult::Collection(self.collection.snapshot()))
            }
            CourierAction::CollectionView => {
                Ok(CourierActionResult::CollectionView(self.collection_view(&ctx.catalog)))
            }
            CourierAction::Flush => {
                self.collection.flush().await;
                Ok(CourierActionResult::Flushed)
            }
        }
    }

    async fn handle_event(&mut self, event: CourierEvent, _ctx: &CourierContext) {
        match event {
            CourierEvent::Position(fix) => {
                self.apply_fix(fix);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardId;
    use crate::order_queue::QueueError;
    use crate::reward::DrawPool;
    use crate::storage::MemoryStore;
    use rand::SeedableRng;
    use std::sync::Arc;

    const ORIGIN: (f64, f64) = (55.751244, 37.618423);

    fn coordinator() -> DeliveryCoordinator {
        let (collection, writer) = CollectionStore::load(Arc::new(MemoryStore::new()), "test");
        tokio::spawn(writer.run());
        DeliveryCoordinator::new(collection, StdRng::seed_from_u64(11))
            .with_order_labels(["Pizza", "Flowers", "Documents"])
    }

    fn context(drop_probability: f64) -> CourierContext {
        CourierContext {
            catalog: RewardCatalog::builtin(),
            policy: RewardPolicy::new(drop_probability, DrawPool::Unowned),
        }
    }

    fn labels(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.label.as_str()).collect()
    }

    #[tokio::test]
    async fn test_accept_without_position_restores_order() {
        let mut c = coordinator();
        let err = c.accept_order(1).unwrap_err();
        assert_eq!(err, CourierError::Tracker(TrackerError::NoOrigin));
        assert_eq!(labels(c.orders()), ["Pizza", "Flowers", "Documents"]);
        assert_eq!(c.tracker().phase(), TrackerPhase::Idle);
    }

    #[tokio::test]
    async fn test_accept_with_invalid_geometry_restores_order() {
        let mut c = coordinator().with_geofence(20.0, f64::NAN);
        c.apply_fix(LocationFix::now(ORIGIN.0, ORIGIN.1));
        assert_eq!(
            c.accept_order(0).unwrap_err(),
            CourierError::Tracker(TrackerError::InvalidGeometry)
        );
        assert_eq!(labels(c.orders()), ["Pizza", "Flowers", "Documents"]);

        let mut c = c.with_geofence(0.0, 0.01);
        assert_eq!(
            c.accept_order(0).unwrap_err(),
            CourierError::Tracker(TrackerError::InvalidGeometry)
        );

        let mut c = c.with_geofence(20.0, 0.01);
        assert_eq!(c.accept_order(0).unwrap().label, "Pizza");
    }

    #[tokio::test]
    async fn test_accept_while_active_restores_order() {
        let mut c = coordinator();
        c.apply_fix(LocationFix::now(ORIGIN.0, ORIGIN.1));
        let first = c.accept_order(0).unwrap();
        assert_eq!(first.label, "Pizza");

        let err = c.accept_order(0).unwrap_err();
        assert_eq!(err, CourierError::Tracker(TrackerError::AlreadyActive));
        assert_eq!(labels(c.orders()), ["Flowers", "Documents"]);
        assert_eq!(c.tracker().active_target(), Some(&first));
    }

    #[tokio::test]
    async fn test_accepted_orders_are_never_returned_again() {
        let mut c = coordinator();
        c.apply_fix(LocationFix::now(ORIGIN.0, ORIGIN.1));

        let a = c.accept_order(0).unwrap();
        c.cancel_delivery().unwrap();
        let b = c.accept_order(0).unwrap();
        c.cancel_delivery().unwrap();
        let d = c.accept_order(0).unwrap();
        c.cancel_delivery().unwrap();

        assert_eq!([a.label, b.label, d.label], ["Pizza", "Flowers", "Documents"]);
        assert_eq!(c.accept_order(0).unwrap_err(), CourierError::Queue(QueueError::Empty));
    }

    #[tokio::test]
    async fn test_accept_feeds_origin_to_tracker() {
        let mut c = coordinator();
        c.apply_fix(LocationFix::now(ORIGIN.0, ORIGIN.1));
        c.accept_order(0).unwrap();

        let status = c.status();
        assert_ne!(status.phase(), TrackerPhase::Idle);
        assert!(status.tracker.distance_meters().is_some());
        assert_eq!(status.pending_orders, 2);
    }

    #[tokio::test]
    async fn test_zero_bbox_is_immediately_deliverable() {
        let (collection, writer) = CollectionStore::load(Arc::new(MemoryStore::new()), "test");
        tokio::spawn(writer.run());
        let mut c = DeliveryCoordinator::new(collection, StdRng::seed_from_u64(1))
            .with_geofence(20.0, 0.0)
            .with_order_labels(["Pizza"]);
        c.apply_fix(LocationFix::now(ORIGIN.0, ORIGIN.1));
        c.accept_order(0).unwrap();
        assert!(c.tracker().is_deliverable());
    }

    #[tokio::test]
    async fn test_deliver_requires_range() {
        let mut c = coordinator();
        let ctx = context(1.0);
        assert_eq!(
            c.deliver(&ctx).unwrap_err(),
            CourierError::Tracker(TrackerError::NoActiveTarget)
        );

        c.apply_fix(LocationFix::now(ORIGIN.0, ORIGIN.1));
        let target = c.accept_order(0).unwrap();
        match c.deliver(&ctx).unwrap_err() {
            CourierError::NotDeliverable { distance_m } => assert!(distance_m.unwrap() > 20.0),
            other => panic!("unexpected error: {other:?}"),
        }

        c.apply_fix(LocationFix::now(target.coordinate.lat, target.coordinate.lng));
        let receipt = c.deliver(&ctx).unwrap();
        assert_eq!(receipt.target, target);
        assert!(receipt.obtained_new_card());
        assert_eq!(c.tracker().phase(), TrackerPhase::Idle);
    }

    #[tokio::test]
    async fn test_deliveries_fill_the_collection_then_stop_dropping() {
        let mut c = coordinator().with_geofence(20.0, 0.0);
        c.refresh_orders(vec!["Cake".into()]);
        let ctx = context(1.0);
        c.apply_fix(LocationFix::now(ORIGIN.0, ORIGIN.1));

        let mut unlocked = Vec::new();
        for _ in 0..4 {
            c.accept_order(0).unwrap();
            let receipt = c.deliver(&ctx).unwrap();
            if let Some(reward) = receipt.reward {
                assert!(reward.newly_unlocked);
                unlocked.push(reward.card.id);
            }
        }

        assert_eq!(unlocked.len(), 3);
        let view = c.collection_view(&ctx.catalog);
        assert!(view.iter().all(|entry| entry.owned));
        assert!(c.collection().is_unlocked(&CardId::from("gold")));
    }

    #[tokio::test]
    async fn test_zero_probability_never_unlocks() {
        let mut c = coordinator().with_geofence(20.0, 0.0);
        let ctx = context(0.0);
        c.apply_fix(LocationFix::now(ORIGIN.0, ORIGIN.1));
        for _ in 0..3 {
            c.accept_order(0).unwrap();
            assert!(c.deliver(&ctx).unwrap().reward.is_none());
        }
        assert!(c.collection().is_empty());
    }
}
