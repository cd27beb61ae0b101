//! Error types for the delivery tracker.

use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// No position is known yet, so no target can be generated around it.
    #[error("Current position is unknown")]
    NoOrigin,

    /// The operation needs an armed target but the tracker is idle.
    #[error("No active delivery target")]
    NoActiveTarget,

    /// A target is already armed; at most one delivery runs at a time.
    #[error("A delivery is already in progress")]
    AlreadyActive,

    /// The radius is not a positive finite number, or the target square
    /// half-width is negative or not finite.
    #[error("Delivery radius or target area is invalid")]
    InvalidGeometry,
}
