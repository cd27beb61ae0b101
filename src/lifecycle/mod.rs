//! Runtime orchestration and lifecycle management.
//!
//! - [`CourierSystem`] builds and wires the coordinator, the persistence writer and
//!   the location subscription, and shuts them down in order
//! - [`setup_tracing`] initializes logging

pub mod courier_system;
pub mod tracing;

pub use courier_system::*;
pub use self::tracing::*;
