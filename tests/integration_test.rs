use courier_sim::clients::CourierClient;
use courier_sim::config::{load_config_from_str, CourierConfig};
use courier_sim::lifecycle::CourierSystem;
use courier_sim::model::{Coordinate, LocationFix};
use courier_sim::storage::{JsonFileStore, KeyValueStore};
use std::collections::BTreeSet;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Fixes travel through the subscription task, so poll until the coordinator has seen one.
async fn wait_for_position(client: &CourierClient, expected: Coordinate) {
    for _ in 0..200 {
        let status = client.status().await.unwrap();
        if status.position.map(|fix| fix.coordinate()) == Some(expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("position {expected} never reached the coordinator");
}

fn config_with_store(dir: &TempDir) -> CourierConfig {
    let path = dir.path().join("cards.json");
    let toml = format!(
        r#"
orders = ["Pizza", "Flowers", "Documents"]

[delivery]
bbox_degrees = 0.002

[reward]
drop_probability = 1.0
seed = 7

[storage]
path = "{}"
"#,
        path.display()
    );
    load_config_from_str(&toml).unwrap()
}

/// Full end-to-end test: location stream → subscription → coordinator → JSON file.
#[tokio::test]
async fn test_full_courier_system_integration() {
    let dir = TempDir::new().unwrap();
    let config = config_with_store(&dir);
    let (fixes, location) = mpsc::channel(16);
    let system = CourierSystem::from_config(&config, Some(location)).unwrap();
    let client = system.client.clone();

    let orders = client.list_orders().await.unwrap();
    let labels: Vec<_> = orders.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["Pizza", "Flowers", "Documents"]);

    let start = Coordinate::new(55.751244, 37.618423);
    fixes.send(LocationFix::now(start.lat, start.lng)).await.unwrap();
    wait_for_position(&client, start).await;

    let target = client.accept_order(1).await.unwrap();
    assert_eq!(target.label, "Flowers");
    assert!((target.coordinate.lat - start.lat).abs() <= 0.002 + 1e-9);
    assert!((target.coordinate.lng - start.lng).abs() <= 0.002 + 1e-9);

    fixes
        .send(LocationFix::now(target.coordinate.lat, target.coordinate.lng))
        .await
        .unwrap();
    wait_for_position(&client, target.coordinate).await;
    assert!(client.is_deliverable().await.unwrap());

    let receipt = client.deliver().await.unwrap();
    let card = receipt.reward.expect("drop probability is 1").card;
    assert!(client.catalog().by_id(&card.id).is_some());

    drop(client);
    system.shutdown().await.unwrap();

    // Shutdown flushed the unlock to disk.
    let store = JsonFileStore::new(dir.path().join("cards.json"));
    let saved = store.read_set("collected_cards").unwrap().unwrap();
    assert_eq!(saved, BTreeSet::from([card.id.0.clone()]));

    // A restarted system starts from the saved collection.
    let system = CourierSystem::from_config(&config, None).unwrap();
    let collection = system.client.get_collection().await.unwrap();
    assert!(collection.contains(&card.id));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_silent_location_stream_blocks_accept_only() {
    let mut config = CourierConfig::default();
    config.orders = vec!["Pizza".to_string()];
    let (_fixes, location) = mpsc::channel::<LocationFix>(1);
    let system = CourierSystem::from_config(&config, Some(location)).unwrap();

    let err = system.client.accept_order(0).await.unwrap_err();
    assert_eq!(err.to_string(), "Delivery tracker error: Current position is unknown");
    assert_eq!(system.client.list_orders().await.unwrap().len(), 1);
    assert!(!system.client.is_deliverable().await.unwrap());
    assert_eq!(system.client.collection_view().await.unwrap().len(), 3);

    system.shutdown().await.unwrap();
}
