//! # Courier Simulator Core
//!
//! > **Accept an order, walk to the drop-off, deliver, maybe win a bike.**
//!
//! This crate is the delivery lifecycle and reward subsystem of a courier game. It
//! accepts orders from a queue, generates a drop-off point near the courier,
//! geofences the courier's position against it, completes the delivery and rolls
//! for a collectible card that is persisted across runs.
//!
//! Map rendering, permission prompts and the platform location source live
//! outside this crate: it consumes a stream of [`LocationFix`](model::LocationFix)
//! values and a [`KeyValueStore`](storage::KeyValueStore).
//!
//! ## 🏗️ Design
//!
//! ### One owner for all delivery state
//! The order queue, the tracker and the collection are plain structs owned by a
//! single [`DeliveryCoordinator`](coordinator::DeliveryCoordinator), which runs
//! inside a generic [`ResourceActor`](framework::ResourceActor). Every request and
//! every position update is a message, applied one at a time, so there are no
//! locks around domain state.
//!
//! ### Actions and events
//! Requests such as `accept_order` or `deliver` are **actions**: the caller awaits
//! a typed result. Location fixes are **events**: fire-and-forget, applied in
//! arrival order ahead of any later action from the same client.
//!
//! ### Immutable shared data
//! The [`RewardCatalog`](catalog::RewardCatalog) is built once and shared by `Arc`.
//! It is injected into the actor at `run` together with the
//! [`RewardPolicy`](reward::RewardPolicy), instead of living in a global.
//!
//! ### Persistence off the hot path
//! Unlocking a card updates the in-memory set and queues the new set for a
//! background [`PersistWriter`](storage::PersistWriter). Storage failures are
//! logged, never surfaced to the player.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! `ResourceActor<T>`, `ResourceClient<T>` and the [`mock`](framework::mock) helpers
//! for testing clients without an actor.
//!
//! ### 2. The Domain ([`model`], [`order_queue`], [`tracker`], [`catalog`], [`reward`], [`collection`])
//! Pure, synchronous components. Each one is usable and tested on its own.
//!
//! ### 3. The Orchestrator ([`coordinator`], [`lifecycle`])
//! The coordinator entity ties the domain together; [`CourierSystem`](lifecycle::CourierSystem)
//! builds everything from [`config`] and shuts it down in order.
//!
//! ### 4. The Interface ([`clients`], [`location`])
//! [`CourierClient`](clients::CourierClient) is the API the UI calls.
//! [`LocationSubscription`](location::LocationSubscription) feeds it positions.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Simulated walk to the drop-off, with info logs
//! RUST_LOG=info cargo run
//!
//! # Same, with a config file
//! RUST_LOG=info cargo run -- courier.toml
//! ```

pub mod catalog;
pub mod clients;
pub mod collection;
pub mod config;
pub mod coordinator;
pub mod framework;
pub mod lifecycle;
pub mod location;
pub mod model;
pub mod order_queue;
pub mod reward;
pub mod storage;
pub mod tracker;
