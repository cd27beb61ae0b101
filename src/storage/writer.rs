//! Background persistence task.
//!
//! The coordinator hands each new collection snapshot to a [`PersistHandle`] and
//! moves on. [`PersistWriter`] applies writes in order on its own task. Storage
//! failures are logged and dropped: the in-memory collection stays authoritative
//! for the running session.

use super::KeyValueStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

#[derive(Debug)]
pub enum PersistCommand {
    Write { key: String, ids: BTreeSet<String> },
    Flush { ack: oneshot::Sender<()> },
}

/// Cheap, cloneable sender side of the writer.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    sender: mpsc::UnboundedSender<PersistCommand>,
}

impl PersistHandle {
    /// Queues a full replacement of the set under `key`.
    pub fn write(&self, key: impl Into<String>, ids: BTreeSet<String>) {
        let key = key.into();
        if self
            .sender
            .send(PersistCommand::Write { key, ids })
            .is_err()
        {
            error!("Persist writer is gone, dropping write");
        }
    }

    /// Resolves once every write queued before this call has been applied.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(PersistCommand::Flush { ack }).is_err() {
            return;
        }
        let _ = done.await;
    }
}

pub struct PersistWriter {
    store: Arc<dyn KeyValueStore>,
    receiver: mpsc::UnboundedReceiver<PersistCommand>,
}

impl PersistWriter {
    /// Runs until every [`PersistHandle`] has been dropped, then returns.
    pub async fn run(mut self) {
        info!("Persist writer started");
        let mut written = 0usize;

        while let Some(command) = self.receiver.recv().await {
            match command {
                PersistCommand::Write { key, ids } => {
                    match self.store.write_set(&key, &ids) {
                        Ok(()) => {
                            written += 1;
                            debug!(key = %key, count = ids.len(), "Collection persisted");
                        }
                        Err(e) => error!(key = %key, error = %e, "Failed to persist collection"),
                    }
                }
                PersistCommand::Flush { ack } => {
                    let _ = ack.send(());
                }
            }
        }

        info!(written, "Persist writer stopped");
    }
}

pub fn create_persist_system(store: Arc<dyn KeyValueStore>) -> (PersistHandle, PersistWriter) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (PersistHandle { sender }, PersistWriter { store, receiver })
}
