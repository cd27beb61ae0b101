//! # Location Subscription
//!
//! Bridges the platform location stream to the coordinator. Fixes are forwarded
//! one at a time in arrival order as fire-and-forget events. The subscription
//! ends when the stream closes, when the coordinator goes away, or when
//! [`LocationSubscription::stop`] is called.
//!
//! The stream may never emit. That is not an error: the coordinator simply has
//! no origin, and accepting an order fails with `NoOrigin` until a fix arrives.

use crate::clients::CourierClient;
use crate::model::LocationFix;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct LocationSubscription {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl LocationSubscription {
    /// Spawns the forwarding task.
    pub fn start(mut fixes: mpsc::Receiver<LocationFix>, client: CourierClient) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            info!("Location subscription started");
            let mut forwarded: u64 = 0;
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => {
                        debug!("Stop requested");
                        break;
                    }
                    fix = fixes.recv() => match fix {
                        Some(fix) => {
                            if let Err(e) = client.report_position(fix).await {
                                warn!(error = %e, "Coordinator unavailable, dropping subscription");
                                break;
                            }
                            forwarded += 1;
                        }
                        None => {
                            debug!("Location stream closed");
                            break;
                        }
                    },
                }
            }
            info!(forwarded, "Location subscription stopped");
            forwarded
        });

        Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stops forwarding and waits for the task to exit. Returns the number of
    /// fixes forwarded. No fix is forwarded after this returns.
    pub async fn stop(mut self) -> u64 {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or_else(|e| {
                warn!(error = %e, "Location task failed");
                0
            }),
            None => 0,
        }
    }

    /// `true` once the forwarding task has exited for any reason.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for LocationSubscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
