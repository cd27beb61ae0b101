use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::CourierConfig, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// Nested keys are separated by a double underscore, since the keys themselves
/// contain single ones: `COURIER_DELIVERY__RADIUS_METERS=35`.
pub fn load_config(path: &Path) -> Result<CourierConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: CourierConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("COURIER_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<CourierConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::DrawPool;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.delivery.radius_meters, 20.0);
        assert_eq!(config.delivery.bbox_degrees, 0.01);
        assert_eq!(config.reward.drop_probability, 0.25);
        assert_eq!(config.reward.draw, DrawPool::Unowned);
        assert_eq!(config.storage.namespace, "collected_cards");
        assert!(config.storage.path.is_none());
        assert_eq!(config.catalog.build().unwrap().len(), 3);
    }

    #[test]
    fn test_load_config_from_str_with_cards() {
        let toml = r#"
orders = ["Pizza", "Flowers"]

[reward]
drop_probability = 1.0
draw = "any"
seed = 42

[[catalog.cards]]
id = "carbon"
title = "Carbon Bike"
lore = "Light as a feather."
image = "drawable/carbon_bike"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.orders, ["Pizza", "Flowers"]);
        assert_eq!(config.reward.draw, DrawPool::Any);
        assert_eq!(config.reward.seed, Some(42));

        let catalog = config.catalog.build().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.all()[0].title, "Carbon Bike");
    }

    #[test]
    fn test_unknown_draw_pool_is_a_parse_error() {
        let result = load_config_from_str("[reward]\ndraw = \"rare\"\n");
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/courier.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[delivery]
radius_meters = 35.0

[storage]
path = "/tmp/courier/cards.json"
namespace = "player_one"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.delivery.radius_meters, 35.0);
        assert_eq!(config.delivery.mailbox_size, 32);
        assert_eq!(config.storage.namespace, "player_one");
        assert!(config.storage.path.is_some());
    }
}
