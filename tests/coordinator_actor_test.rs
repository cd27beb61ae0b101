use courier_sim::catalog::RewardCatalog;
use courier_sim::collection::CollectionStore;
use courier_sim::coordinator::{self, CourierContext, CourierError, DeliveryCoordinator};
use courier_sim::model::{CardId, LocationFix, Order};
use courier_sim::order_queue::QueueError;
use courier_sim::reward::{DrawPool, RewardPolicy};
use courier_sim::storage::{KeyValueStore, MemoryStore};
use courier_sim::tracker::{TrackerError, TrackerPhase};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::sync::Arc;

const NAMESPACE: &str = "collected_cards";

/// Real coordinator actor over an in-memory store.
fn spawn_coordinator(
    store: Arc<MemoryStore>,
    policy: RewardPolicy,
    bbox_degrees: f64,
) -> (
    courier_sim::clients::CourierClient,
    tokio::task::JoinHandle<DeliveryCoordinator>,
) {
    let (collection, writer) = CollectionStore::load(store, NAMESPACE);
    tokio::spawn(writer.run());

    let entity = DeliveryCoordinator::new(collection, StdRng::seed_from_u64(2024))
        .with_geofence(20.0, bbox_degrees);
    let catalog = RewardCatalog::builtin();
    let (actor, client) = coordinator::new(entity, catalog.clone(), 16);
    let handle = tokio::spawn(actor.run(CourierContext { catalog, policy }));
    (client, handle)
}

/// Pattern 2: Real actor, no mocks.
/// Walks through seed → accept → approach → deliver and checks every step.
#[tokio::test]
async fn test_delivery_lifecycle_through_actor() {
    let store = Arc::new(MemoryStore::new());
    let (client, handle) = spawn_coordinator(
        store.clone(),
        RewardPolicy::new(1.0, DrawPool::Unowned),
        0.01,
    );

    client
        .seed_orders(vec![Order::new("a", "Pizza"), Order::new("b", "Flowers")])
        .await
        .unwrap();

    // No position yet: accept fails and the queue is untouched.
    assert_eq!(
        client.accept_order(0).await.unwrap_err(),
        CourierError::Tracker(TrackerError::NoOrigin)
    );
    assert_eq!(client.list_orders().await.unwrap().len(), 2);

    client
        .report_position(LocationFix::now(55.751244, 37.618423))
        .await
        .unwrap();
    let target = client.accept_order(0).await.unwrap();
    assert_eq!(target.label, "Pizza");
    assert_eq!(target.order_id.to_string(), "a");
    assert_eq!(client.list_orders().await.unwrap(), vec![Order::new("b", "Flowers")]);

    // Only one delivery at a time; the rejected order stays queued.
    assert_eq!(
        client.accept_order(0).await.unwrap_err(),
        CourierError::Tracker(TrackerError::AlreadyActive)
    );
    assert_eq!(client.list_orders().await.unwrap().len(), 1);

    // Walk onto the target.
    client
        .report_position(LocationFix::now(target.coordinate.lat, target.coordinate.lng))
        .await
        .unwrap();
    assert!(client.is_deliverable().await.unwrap());
    assert_eq!(client.status().await.unwrap().phase(), TrackerPhase::InRange);

    let receipt = client.deliver().await.unwrap();
    assert_eq!(receipt.target, target);
    let reward = receipt.reward.expect("drop probability is 1");
    assert!(reward.newly_unlocked);

    assert!(!client.is_deliverable().await.unwrap());
    assert_eq!(
        client.deliver().await.unwrap_err(),
        CourierError::Tracker(TrackerError::NoActiveTarget)
    );

    let collection = client.get_collection().await.unwrap();
    assert_eq!(collection, BTreeSet::from([reward.card.id.clone()]));

    client.flush().await.unwrap();
    assert_eq!(
        store.read_set(NAMESPACE).unwrap().unwrap(),
        BTreeSet::from([reward.card.id.0.clone()])
    );

    drop(client);
    let coordinator = handle.await.unwrap();
    assert_eq!(coordinator.orders().len(), 1);
}

#[tokio::test]
async fn test_out_of_range_delivery_is_rejected() {
    let (client, _handle) = spawn_coordinator(
        Arc::new(MemoryStore::new()),
        RewardPolicy::default(),
        0.01,
    );
    client.refresh_orders(vec!["Cake".to_string()]).await.unwrap();
    client
        .report_position(LocationFix::now(48.8566, 2.3522))
        .await
        .unwrap();
    let target = client.accept_order(0).await.unwrap();

    // One degree of latitude north is about 111 km away.
    client
        .report_position(LocationFix::now(target.coordinate.lat + 1.0, target.coordinate.lng))
        .await
        .unwrap();
    match client.deliver().await.unwrap_err() {
        CourierError::NotDeliverable { distance_m } => {
            assert!(distance_m.unwrap() > 100_000.0)
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Cancelling frees the tracker without touching the queue.
    assert_eq!(client.cancel_delivery().await.unwrap(), target);
    assert_eq!(
        client.cancel_delivery().await.unwrap_err(),
        CourierError::Tracker(TrackerError::NoActiveTarget)
    );
    assert_eq!(
        client.accept_order(0).await.unwrap_err(),
        CourierError::Queue(QueueError::Empty)
    );
}

#[tokio::test]
async fn test_collection_persists_across_restarts() {
    let store = Arc::new(MemoryStore::new());
    let policy = RewardPolicy::new(1.0, DrawPool::Unowned);

    // First session: deliver until every card is owned.
    let (client, handle) = spawn_coordinator(store.clone(), policy, 0.0);
    client
        .refresh_orders(vec!["One".into(), "Two".into(), "Three".into()])
        .await
        .unwrap();
    client.report_position(LocationFix::now(55.0, 37.0)).await.unwrap();
    for _ in 0..3 {
        client.accept_order(0).await.unwrap();
        assert!(client.deliver().await.unwrap().obtained_new_card());
    }
    drop(client);
    handle.await.unwrap();

    // Second session over the same store sees the full collection.
    let (client, _handle) = spawn_coordinator(store, policy, 0.0);
    let view = client.collection_view().await.unwrap();
    assert_eq!(view.len(), 3);
    assert!(view.iter().all(|entry| entry.owned));
    assert!(client.get_collection().await.unwrap().contains(&CardId::from("wood")));

    // With every card owned, a successful roll has nothing left to give.
    client.refresh_orders(vec!["Four".into()]).await.unwrap();
    client.report_position(LocationFix::now(55.0, 37.0)).await.unwrap();
    client.accept_order(0).await.unwrap();
    assert!(client.deliver().await.unwrap().reward.is_none());
}

#[tokio::test]
async fn test_invalid_geometry_does_not_stop_the_actor() {
    let (client, _handle) = spawn_coordinator(
        Arc::new(MemoryStore::new()),
        RewardPolicy::default(),
        f64::NAN,
    );
    client.refresh_orders(vec!["Cake".to_string()]).await.unwrap();
    client.report_position(LocationFix::now(55.0, 37.0)).await.unwrap();

    assert_eq!(
        client.accept_order(0).await.unwrap_err(),
        CourierError::Tracker(TrackerError::InvalidGeometry)
    );
    // Still answering, and the order is back in the queue.
    assert_eq!(client.list_orders().await.unwrap().len(), 1);
    assert_eq!(client.status().await.unwrap().phase(), TrackerPhase::Idle);
}
