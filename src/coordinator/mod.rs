//! Delivery orchestration: accept, track, deliver, reward.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::*;
pub use error::*;

use crate::catalog::RewardCatalog;
use crate::clients::CourierClient;
use crate::framework::ResourceActor;

/// Creates the coordinator actor and its client.
///
/// The actor does nothing until `run` is awaited with a [`CourierContext`].
pub fn new(
    coordinator: DeliveryCoordinator,
    catalog: RewardCatalog,
    mailbox_size: usize,
) -> (ResourceActor<DeliveryCoordinator>, CourierClient) {
    let (actor, generic_client) = ResourceActor::new(coordinator, mailbox_size);
    let client = CourierClient::new(generic_client, catalog);
    (actor, client)
}
