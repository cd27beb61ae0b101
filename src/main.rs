//! # Courier Simulator Demo
//!
//! Runs one or more simulated deliveries end to end:
//! 1.  Starting the [`CourierSystem`] with a location stream.
//! 2.  Reporting a starting position and accepting the first order.
//! 3.  Walking towards the drop-off in small steps until it is deliverable.
//! 4.  Delivering and printing the reward and the collection.
//!
//! Pass a TOML config path as the first argument to override the defaults.

use courier_sim::config::{load_config, CourierConfig};
use courier_sim::coordinator::CourierError;
use courier_sim::lifecycle::{setup_tracing, CourierSystem};
use courier_sim::model::{Coordinate, LocationFix};
use courier_sim::tracker::TrackerError;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, info_span, warn, Instrument};

const START: Coordinate = Coordinate::new(55.751244, 37.618423);
const WALK_STEPS: u32 = 20;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let mut config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path)).map_err(|e| e.to_string())?,
        None => CourierConfig::default(),
    };
    if config.orders.is_empty() {
        config.orders = vec![
            "Pizza for apartment 12".to_string(),
            "Flowers to the theatre".to_string(),
            "Documents for the bank".to_string(),
        ];
    }
    let deliveries = config.orders.len();

    let (fixes, location) = mpsc::channel(64);
    let system = CourierSystem::from_config(&config, Some(location)).map_err(|e| e.to_string())?;
    let client = system.client.clone();

    let mut position = START;
    fixes
        .send(LocationFix::now(position.lat, position.lng))
        .await
        .map_err(|e| e.to_string())?;

    for round in 1..=deliveries {
        let span = info_span!("delivery", round);
        let result: Result<(), String> = async {
            // The subscription forwards asynchronously; wait until the origin is known.
            let target = loop {
                match client.accept_order(0).await {
                    Ok(target) => break target,
                    Err(CourierError::Tracker(TrackerError::NoOrigin)) => {
                        tokio::time::sleep(Duration::from_millis(10)).await
                    }
                    Err(e) => return Err(e.to_string()),
                }
            };
            info!(
                label = %target.label,
                distance_m = position.distance_to(&target.coordinate),
                "Heading to drop-off"
            );

            let d_lat = (target.coordinate.lat - position.lat) / f64::from(WALK_STEPS);
            let d_lng = (target.coordinate.lng - position.lng) / f64::from(WALK_STEPS);
            for _ in 0..WALK_STEPS {
                position = position.offset(d_lat, d_lng);
                fixes
                    .send(LocationFix::now(position.lat, position.lng))
                    .await
                    .map_err(|e| e.to_string())?;
            }

            while !client.is_deliverable().await.map_err(|e| e.to_string())? {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }

            let receipt = client.deliver().await.map_err(|e| e.to_string())?;
            match &receipt.reward {
                Some(reward) if reward.newly_unlocked => {
                    info!(card = %reward.card.title, "New card unlocked!")
                }
                Some(reward) => info!(card = %reward.card.title, "Card already owned"),
                None => info!("No card this time"),
            }
            Ok(())
        }
        .instrument(span)
        .await;

        if let Err(e) = result {
            warn!(error = %e, "Delivery aborted");
            break;
        }
    }

    for entry in client.collection_view().await.map_err(|e| e.to_string())? {
        let mark = if entry.owned { "owned" } else { "locked" };
        info!(id = %entry.card.id, title = %entry.card.title, "{mark}");
    }

    drop(client);
    drop(fixes);
    system.shutdown().await.map_err(|e| e.to_string())?;
    Ok(())
}
