//! Collectible card definitions.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier of a collectible card, as persisted in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to the card artwork; resolved by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub title: String,
    pub lore: String,
    pub image: ImageRef,
}

impl CardDefinition {
    pub fn new(
        id: impl Into<CardId>,
        title: impl Into<String>,
        lore: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            lore: lore.into(),
            image: ImageRef(image.into()),
        }
    }
}

/// A catalog card together with whether the player owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionEntry {
    pub card: CardDefinition,
    pub owned: bool,
}
