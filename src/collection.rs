//! # Collection Store
//!
//! The set of card ids the player has unlocked. It only ever grows.
//!
//! The in-memory set is the source of truth for the session. Every change is
//! made on a copy which then replaces the current set and is queued for
//! persistence, so nothing outside this type ever aliases the live set.

use crate::model::CardId;
use crate::storage::{create_persist_system, KeyValueStore, PersistHandle, PersistWriter};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info};

pub const DEFAULT_NAMESPACE: &str = "collected_cards";

#[derive(Debug)]
pub struct CollectionStore {
    namespace: String,
    unlocked: BTreeSet<CardId>,
    persist: PersistHandle,
}

impl CollectionStore {
    /// Reads the record under `namespace` and returns the store together with the
    /// writer task that must be spawned to apply its writes.
    ///
    /// A failed read is logged and starts an empty collection.
    pub fn load(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> (Self, PersistWriter) {
        let namespace = namespace.into();
        let unlocked: BTreeSet<CardId> = match store.read_set(&namespace) {
            Ok(Some(ids)) => ids.into_iter().map(CardId).collect(),
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                error!(namespace = %namespace, error = %e, "Failed to read collection, starting empty");
                BTreeSet::new()
            }
        };
        info!(namespace = %namespace, count = unlocked.len(), "Collection loaded");

        let (persist, writer) = create_persist_system(store);
        (
            Self {
                namespace,
                unlocked,
                persist,
            },
            writer,
        )
    }

    pub fn is_unlocked(&self, id: &CardId) -> bool {
        self.unlocked.contains(id)
    }

    /// Adds `id` to the collection. Returns `true` if it was not there before.
    pub fn unlock(&mut self, id: &CardId) -> bool {
        if self.unlocked.contains(id) {
            return false;
        }

        let mut next = self.unlocked.clone();
        next.insert(id.clone());
        self.persist.write(
            self.namespace.clone(),
            next.iter().map(|card| card.0.clone()).collect(),
        );
        self.unlocked = next;

        info!(card_id = %id, total = self.unlocked.len(), "Card unlocked");
        true
    }

    /// Owned copy of the unlocked ids.
    pub fn snapshot(&self) -> BTreeSet<CardId> {
        self.unlocked.clone()
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Waits until every write queued so far has reached the store.
    pub async fn flush(&self) {
        self.persist.flush().await;
    }
}
