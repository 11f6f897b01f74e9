//! Shared domain logic for postcode-localized pricing.
//!
//! Holds the fixed fulfillment points, great-circle distance, the surcharge
//! tiers, price parsing and display formatting, and environment-driven
//! configuration for both the proxy server and the localizer client.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod postcode;
pub mod pricing;

use thiserror::Error;

pub use app_config::{AppConfig, LocalizerConfig};
pub use config::{
    load_app_config, load_app_config_from_env, load_localizer_config,
    load_localizer_config_from_env,
};
pub use geo::{
    haversine_km, nearest_fulfillment_point, Coordinates, FulfillmentPoint, NearestPoint,
    FULFILLMENT_POINTS,
};
pub use postcode::{is_valid_postcode, sanitize_postcode_input, POSTCODE_LEN};
pub use pricing::{
    adjusted_price, format_price, parse_base_price, round_distance_km, surcharge_for_distance,
    PRICE_MASK,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
