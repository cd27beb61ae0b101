use crate::catalog::CatalogError;
use crate::clients::CourierClient;
use crate::collection::CollectionStore;
use crate::config::{validate_config, ConfigError, CourierConfig};
use crate::coordinator::{self, CourierContext, DeliveryCoordinator};
use crate::location::LocationSubscription;
use crate::model::LocationFix;
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Task failed: {0}")]
    TaskFailed(String),
}

/// The runtime container for the courier core.
///
/// `CourierSystem` is responsible for:
/// - **Dependency Wiring**: building the catalog, the collection store and the
///   coordinator from configuration, and injecting the shared context
/// - **Lifecycle Management**: spawning the coordinator, the persistence writer
///   and the location subscription, and tearing them down in order
///
/// # Example
///
/// ```ignore
/// let (fixes, location) = tokio::sync::mpsc::channel(16);
/// let system = CourierSystem::start(&config, Arc::new(MemoryStore::new()), Some(location))?;
///
/// fixes.send(LocationFix::now(55.75, 37.61)).await?;
/// let target = system.client.accept_order(0).await?;
///
/// system.shutdown().await?;
/// ```
pub struct CourierSystem {
    /// Client for the coordinator. Clone it freely, but drop the clones before
    /// calling [`CourierSystem::shutdown`]: the coordinator runs until the last
    /// client is gone.
    pub client: CourierClient,

    subscription: Option<LocationSubscription>,
    coordinator: JoinHandle<DeliveryCoordinator>,
    writer: JoinHandle<()>,
}

impl CourierSystem {
    /// Validates `config`, then spawns the coordinator over `store` and, when a
    /// location stream is given, the subscription feeding it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        config: &CourierConfig,
        store: Arc<dyn KeyValueStore>,
        location: Option<mpsc::Receiver<LocationFix>>,
    ) -> Result<Self, SystemError> {
        validate_config(config)?;
        let catalog = config.catalog.build()?;

        let (collection, writer) = CollectionStore::load(store, config.storage.namespace.clone());
        let rng = match config.reward.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let entity = DeliveryCoordinator::new(collection, rng)
            .with_geofence(config.delivery.radius_meters, config.delivery.bbox_degrees)
            .with_order_labels(config.orders.iter().cloned());

        let (actor, client) = coordinator::new(entity, catalog.clone(), config.delivery.mailbox_size);
        let context = CourierContext {
            catalog,
            policy: config.reward.policy(),
        };

        let writer = tokio::spawn(writer.run());
        let coordinator = tokio::spawn(actor.run(context));
        let subscription = location.map(|fixes| LocationSubscription::start(fixes, client.clone()));

        info!(
            radius_meters = config.delivery.radius_meters,
            drop_probability = config.reward.drop_probability,
            draw = ?config.reward.draw,
            "Courier system started"
        );

        Ok(Self {
            client,
            subscription,
            coordinator,
            writer,
        })
    }

    /// Like [`CourierSystem::start`], choosing the store from `config.storage`:
    /// a [`JsonFileStore`] when a path is set, a [`MemoryStore`] otherwise.
    pub fn from_config(
        config: &CourierConfig,
        location: Option<mpsc::Receiver<LocationFix>>,
    ) -> Result<Self, SystemError> {
        let store: Arc<dyn KeyValueStore> = match &config.storage.path {
            Some(path) => Arc::new(JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        Self::start(config, store, location)
    }

    /// Gracefully shuts down the system.
    ///
    /// 1. Stops the location subscription, so no fix arrives after this point
    /// 2. Drops the client, which closes the coordinator's mailbox
    /// 3. Waits for the coordinator, which flushes the collection on stop
    /// 4. Waits for the persistence writer to drain
    pub async fn shutdown(mut self) -> Result<(), SystemError> {
        info!("Shutting down courier system...");

        if let Some(subscription) = self.subscription.take() {
            subscription.stop().await;
        }

        drop(self.client);

        let coordinator = self.coordinator.await.map_err(|e| {
            error!("Coordinator task failed: {:?}", e);
            SystemError::TaskFailed(format!("coordinator: {e}"))
        })?;
        let status = coordinator.status();
        // The writer stops once the collection's handle is gone.
        drop(coordinator);

        self.writer.await.map_err(|e| {
            error!("Persist writer task failed: {:?}", e);
            SystemError::TaskFailed(format!("persist writer: {e}"))
        })?;

        info!(
            pending_orders = status.pending_orders,
            unlocked_cards = status.unlocked_cards,
            "Courier system shutdown complete."
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut config = CourierConfig::default();
        config.reward.drop_probability = 2.0;
        let result = CourierSystem::start(&config, Arc::new(MemoryStore::new()), None);
        assert!(matches!(result, Err(SystemError::Config(ConfigError::ValidationError(_)))));
    }

    #[tokio::test]
    async fn test_start_and_shutdown_without_location() {
        let mut config = CourierConfig::default();
        config.orders = vec!["Pizza".to_string()];
        let system = CourierSystem::from_config(&config, None).unwrap();

        let orders = system.client.list_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id.to_string(), "order_1");

        system.shutdown().await.unwrap();
    }
}
