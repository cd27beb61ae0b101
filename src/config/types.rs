use crate::catalog::{CatalogError, RewardCatalog};
use crate::collection::DEFAULT_NAMESPACE;
use crate::model::CardDefinition;
use crate::reward::{DrawPool, RewardPolicy, DEFAULT_DROP_PROBABILITY};
use crate::tracker::{DEFAULT_BBOX_DEGREES, DEFAULT_RADIUS_METERS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub reward: RewardConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Labels of the orders available at startup.
    #[serde(default)]
    pub orders: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_radius")]
    pub radius_meters: f64,
    /// Half-width of the square the target is drawn from. 0.01° is roughly 1 km.
    #[serde(default = "default_bbox")]
    pub bbox_degrees: f64,
    #[serde(default = "default_mailbox")]
    pub mailbox_size: usize,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_METERS
}

fn default_bbox() -> f64 {
    DEFAULT_BBOX_DEGREES
}

fn default_mailbox() -> usize {
    32
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            radius_meters: default_radius(),
            bbox_degrees: default_bbox(),
            mailbox_size: default_mailbox(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default = "default_drop_probability")]
    pub drop_probability: f64,
    #[serde(default)]
    pub draw: DrawPool,
    /// Fixed RNG seed for reproducible runs. Seeded from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_drop_probability() -> f64 {
    DEFAULT_DROP_PROBABILITY
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            drop_probability: default_drop_probability(),
            draw: DrawPool::default(),
            seed: None,
        }
    }
}

impl RewardConfig {
    pub fn policy(&self) -> RewardPolicy {
        RewardPolicy::new(self.drop_probability, self.draw)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the collection. Kept in memory only when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            namespace: default_namespace(),
        }
    }
}

/// Card list override. The built-in bikes are used when `cards` is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub cards: Vec<CardDefinition>,
}

impl CatalogConfig {
    pub fn build(&self) -> Result<RewardCatalog, CatalogError> {
        if self.cards.is_empty() {
            Ok(RewardCatalog::builtin())
        } else {
            RewardCatalog::new(self.cards.clone())
        }
    }
}
