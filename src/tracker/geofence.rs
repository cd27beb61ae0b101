//! Radius check used to decide whether a courier may hand over an order.

/// Default delivery radius in meters.
pub const DEFAULT_RADIUS_METERS: f64 = 20.0;

/// Default half-width of the target square in degrees (about 1 km).
pub const DEFAULT_BBOX_DEGREES: f64 = 0.01;

/// Inclusive: a courier exactly on the boundary is in range.
pub fn within_radius(distance_meters: f64, radius_meters: f64) -> bool {
    distance_meters <= radius_meters
}
