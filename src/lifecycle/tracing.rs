//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! the `RUST_LOG` environment variable.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup, shutdown and the number of processed messages
//! - **Actions**: every coordinator action at `debug`, failures at `warn`
//! - **Deliveries**: accepted orders, armed targets, completions and rewards at `info`
//! - **Persistence**: loaded and unlocked cards at `info`, storage failures at `error`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle and deliveries only
//! RUST_LOG=info cargo run
//!
//! # Every action and position update, with payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the tracker
//! RUST_LOG=courier_sim::tracker=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a full delivery reads:
//!
//! ```text
//! INFO Actor started entity_type="DeliveryCoordinator"
//! INFO Target armed order_id=order_1 origin=(55.751244, 37.618423) target=(55.754911, 37.612040) radius_meters=20.0
//! INFO Order accepted order_id=order_1 label=Pizza
//! INFO Target completed order_id=order_1
//! INFO Card unlocked card_id=gold total=1
//! INFO Delivered with reward order_id=order_1 card_id=gold newly_unlocked=true
//! ```
//!
//! Client methods are `#[instrument]`ed, so their arguments appear as span
//! fields (e.g. `accept_order{index=0}`).
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - we use entity_type instead
        .compact() // Compact format shows spans inline (e.g., "accept_order{index=0}")
        .init();
}
