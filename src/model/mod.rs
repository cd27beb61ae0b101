//! Pure data structures shared by the queue, tracker, catalog and coordinator.

pub mod card;
pub mod coordinate;
pub mod order;
pub mod target;

pub use card::*;
pub use coordinate::*;
pub use order::*;
pub use target::*;
