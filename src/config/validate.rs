use super::{types::CourierConfig, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Geofence radius is positive and finite
/// - Target square half-width is non-negative and finite
/// - Drop probability lies in [0, 1]
/// - Storage namespace is not empty
/// - Mailbox size is not 0
pub fn validate_config(config: &CourierConfig) -> Result<(), ConfigError> {
    let delivery = &config.delivery;
    if !(delivery.radius_meters.is_finite() && delivery.radius_meters > 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "delivery.radius_meters must be positive, got {}",
            delivery.radius_meters
        )));
    }
    if !(delivery.bbox_degrees.is_finite() && delivery.bbox_degrees >= 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "delivery.bbox_degrees must be non-negative, got {}",
            delivery.bbox_degrees
        )));
    }
    if delivery.mailbox_size == 0 {
        return Err(ConfigError::ValidationError(
            "delivery.mailbox_size cannot be 0".to_string(),
        ));
    }

    let p = config.reward.drop_probability;
    if !(0.0..=1.0).contains(&p) {
        return Err(ConfigError::ValidationError(format!(
            "reward.drop_probability must be within [0, 1], got {p}"
        )));
    }

    if config.storage.namespace.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.namespace cannot be empty".to_string(),
        ));
    }

    config
        .catalog
        .build()
        .map_err(|e| ConfigError::ValidationError(format!("catalog: {e}")))?;

    Ok(())
}
