//! Generic single-state actor framework.
//!
//! This module provides the building blocks for serializing every mutation of a
//! piece of state through one Tokio task.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait the actor-owned state implements
//! - [`ResourceActor`] - Generic actor that owns the state and runs the loop
//! - [`ResourceClient`] - Typed, cloneable client for sending actions and events
//! - [`FrameworkError`] - Transport errors
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use self::core::*;
