//! Drop roll for delivery rewards.
//!
//! Earlier versions of the game disagreed on both the drop chance (15%, 25%, 40%)
//! and on whether owned cards stay in the draw. Both are configuration here. The
//! default is a 25% chance, drawing uniformly among cards the player does not own
//! yet, so a successful roll always adds something new until the set is complete.

use crate::catalog::RewardCatalog;
use crate::model::{CardDefinition, CardId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_DROP_PROBABILITY: f64 = 0.25;

/// Which cards a successful roll may pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPool {
    /// Only cards not yet in the collection. Nothing drops once all are owned.
    #[default]
    Unowned,
    /// Any catalog card; duplicates are possible and unlock nothing.
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardPolicy {
    pub drop_probability: f64,
    pub draw: DrawPool,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            drop_probability: DEFAULT_DROP_PROBABILITY,
            draw: DrawPool::default(),
        }
    }
}

impl RewardPolicy {
    pub fn new(drop_probability: f64, draw: DrawPool) -> Self {
        Self {
            drop_probability,
            draw,
        }
    }

    /// Draws `u` in `[0, 1)` and, if `u < drop_probability`, picks a card from the pool.
    /// A NaN probability never drops.
    pub fn roll<R: Rng>(
        &self,
        rng: &mut R,
        catalog: &RewardCatalog,
        owned: &BTreeSet<CardId>,
    ) -> Option<CardDefinition> {
        let u: f64 = rng.gen();
        if self.drop_probability.is_nan() || u >= self.drop_probability {
            return None;
        }

        let pool: Vec<&CardDefinition> = match self.draw {
            DrawPool::Unowned => catalog
                .all()
                .iter()
                .filter(|card| !owned.contains(&card.id))
                .collect(),
            DrawPool::Any => catalog.all().iter().collect(),
        };
        pool.choose(rng).map(|card| (*card).clone())
    }
}
