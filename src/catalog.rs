//! # Reward Catalog
//!
//! The fixed list of collectible cards. Built once at startup and shared by
//! `Arc` with everything that needs it; there is no way to mutate it afterwards.

use crate::model::{CardDefinition, CardId};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog has no cards")]
    Empty,

    #[error("Duplicate card id in catalog: {0}")]
    DuplicateId(CardId),
}

/// Immutable, ordered card catalog. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct RewardCatalog {
    cards: Arc<[CardDefinition]>,
}

impl RewardCatalog {
    /// Builds a catalog, keeping the given order.
    ///
    /// # Errors
    /// - [`CatalogError::Empty`] if `cards` is empty.
    /// - [`CatalogError::DuplicateId`] if two cards share an id.
    pub fn new(cards: Vec<CardDefinition>) -> Result<Self, CatalogError> {
        if cards.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !seen.insert(&card.id) {
                return Err(CatalogError::DuplicateId(card.id.clone()));
            }
        }
        Ok(Self {
            cards: cards.into(),
        })
    }

    /// The bikes shipped with the game.
    pub fn builtin() -> Self {
        Self {
            cards: vec![
                CardDefinition::new(
                    "icy",
                    "Icy Bike",
                    "A bike forged from eternal ice. They say the spirits of winter rode it...",
                    "drawable/icy_bike",
                ),
                CardDefinition::new(
                    "gold",
                    "Golden Bike",
                    "A legendary bike covered in gold leaf. Found in an ancient temple...",
                    "drawable/gold_bike",
                ),
                CardDefinition::new(
                    "wood",
                    "Wooden Bike",
                    "Simple but reliable, built entirely from oak.",
                    "drawable/wood_bike",
                ),
            ]
            .into(),
        }
    }

    /// All cards in catalog order.
    pub fn all(&self) -> &[CardDefinition] {
        &self.cards
    }

    pub fn by_id(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.iter().find(|card| &card.id == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
