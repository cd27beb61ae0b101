//! # Delivery Tracker
//!
//! Owns at most one active [`DeliveryTarget`] and decides, from position updates,
//! whether the courier is close enough to deliver.
//!
//! ## States
//!
//! ```text
//!            accept()                 distance <= radius
//!   Idle ─────────────▶ Armed ◀─────────────────────────▶ InRange
//!    ▲                    │        distance > radius         │
//!    └────────────────────┴──── complete() / cancel() ◀──────┘
//! ```
//!
//! A target exists iff the state is not `Idle`; the enum makes any other
//! combination unrepresentable.
//!
//! ## Target generation
//!
//! The target is the origin plus independent uniform offsets in `[-bbox, +bbox]` on
//! latitude and longitude. That is uniform over a square, not a disk: corners are
//! up to √2 further away than the edges' midpoints. Longitude degrees also shrink
//! with latitude, so the square is narrower on the ground than it is tall.
//!
//! Near a pole or the antimeridian the square can spill over. The generated point
//! is normalized: latitude is clamped to `[-90, 90]` and longitude wrapped into
//! `[-180, 180)`, so targets there bunch up against the pole.

pub mod error;
pub mod geofence;

pub use error::*;
pub use geofence::*;

use crate::model::{Coordinate, DeliveryTarget, Order};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Coarse tracker state, for assertions and UI toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackerPhase {
    Idle,
    Armed,
    InRange,
}

/// Full tracker state.
///
/// `distance_meters` is the distance computed on the most recent position update;
/// `None` until one has arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TrackerState {
    Idle,
    Armed {
        target: DeliveryTarget,
        radius_meters: f64,
        distance_meters: Option<f64>,
    },
    InRange {
        target: DeliveryTarget,
        radius_meters: f64,
        distance_meters: f64,
    },
}

impl TrackerState {
    pub fn phase(&self) -> TrackerPhase {
        match self {
            TrackerState::Idle => TrackerPhase::Idle,
            TrackerState::Armed { .. } => TrackerPhase::Armed,
            TrackerState::InRange { .. } => TrackerPhase::InRange,
        }
    }

    pub fn target(&self) -> Option<&DeliveryTarget> {
        match self {
            TrackerState::Idle => None,
            TrackerState::Armed { target, .. } | TrackerState::InRange { target, .. } => Some(target),
        }
    }

    pub fn distance_meters(&self) -> Option<f64> {
        match self {
            TrackerState::Idle => None,
            TrackerState::Armed { distance_meters, .. } => *distance_meters,
            TrackerState::InRange { distance_meters, .. } => Some(*distance_meters),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryTracker {
    state: TrackerState,
}

impl Default for DeliveryTracker {
    fn default() -> Self {
        Self {
            state: TrackerState::Idle,
        }
    }
}

impl DeliveryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a target for `order` somewhere in the square of half-width `bbox_degrees`
    /// around `origin`.
    ///
    /// # Errors
    /// - [`TrackerError::NoOrigin`] if `origin` is unknown.
    /// - [`TrackerError::AlreadyActive`] if a target is already armed.
    /// - [`TrackerError::InvalidGeometry`] if `radius_meters` is not positive and
    ///   finite, or `bbox_degrees` is negative or not finite.
    pub fn accept<R: Rng>(
        &mut self,
        origin: Option<Coordinate>,
        radius_meters: f64,
        bbox_degrees: f64,
        order: &Order,
        rng: &mut R,
    ) -> Result<DeliveryTarget, TrackerError> {
        if !matches!(self.state, TrackerState::Idle) {
            return Err(TrackerError::AlreadyActive);
        }
        if !valid_geometry(radius_meters, bbox_degrees) {
            return Err(TrackerError::InvalidGeometry);
        }
        let origin = origin.ok_or(TrackerError::NoOrigin)?;

        let coordinate = origin
            .offset(
                rng.gen_range(-bbox_degrees..=bbox_degrees),
                rng.gen_range(-bbox_degrees..=bbox_degrees),
            )
            .normalized();
        let target = DeliveryTarget {
            coordinate,
            label: order.label.clone(),
            order_id: order.id.clone(),
        };

        info!(order_id = %order.id, %origin, target = %coordinate, radius_meters, "Target armed");
        self.state = TrackerState::Armed {
            target: target.clone(),
            radius_meters,
            distance_meters: None,
        };
        Ok(target)
    }

    /// Recomputes the distance to the active target and moves between `Armed` and
    /// `InRange`. Does nothing while `Idle`.
    pub fn on_position_update(&mut self, position: Coordinate) -> TrackerPhase {
        let state = std::mem::replace(&mut self.state, TrackerState::Idle);
        self.state = match state {
            TrackerState::Idle => TrackerState::Idle,
            TrackerState::Armed { target, radius_meters, .. }
            | TrackerState::InRange { target, radius_meters, .. } => {
                let distance_meters = position.distance_to(&target.coordinate);
                if within_radius(distance_meters, radius_meters) {
                    TrackerState::InRange { target, radius_meters, distance_meters }
                } else {
                    TrackerState::Armed {
                        target,
                        radius_meters,
                        distance_meters: Some(distance_meters),
                    }
                }
            }
        };

        let phase = self.state.phase();
        debug!(?phase, distance_meters = ?self.state.distance_meters(), "Position applied");
        phase
    }

    pub fn is_deliverable(&self) -> bool {
        matches!(self.state, TrackerState::InRange { .. })
    }

    /// Finishes the active delivery and returns its target.
    ///
    /// # Errors
    /// [`TrackerError::NoActiveTarget`] while `Idle`.
    pub fn complete(&mut self) -> Result<DeliveryTarget, TrackerError> {
        let target = self.clear()?;
        info!(order_id = %target.order_id, "Target completed");
        Ok(target)
    }

    /// Drops the active target without delivering it.
    pub fn cancel(&mut self) -> Result<DeliveryTarget, TrackerError> {
        let target = self.clear()?;
        info!(order_id = %target.order_id, "Target cancelled");
        Ok(target)
    }

    pub fn phase(&self) -> TrackerPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn active_target(&self) -> Option<&DeliveryTarget> {
        self.state.target()
    }

    fn clear(&mut self) -> Result<DeliveryTarget, TrackerError> {
        match std::mem::replace(&mut self.state, TrackerState::Idle) {
            TrackerState::Idle => Err(TrackerError::NoActiveTarget),
            TrackerState::Armed { target, .. } | TrackerState::InRange { target, .. } => Ok(target),
        }
    }
}

fn valid_geometry(radius_meters: f64, bbox_degrees: f64) -> bool {
    radius_meters.is_finite() && radius_meters > 0.0 && bbox_degrees.is_finite() && bbox_degrees >= 0.0
}
