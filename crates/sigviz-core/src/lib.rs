//! Shared types, geodesy and configuration for the signal coverage toolkit.

pub mod app_config;
pub mod bands;
pub mod config;
pub mod geo;
pub mod records;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use bands::{load_band_catalog, BandCatalog, BandEntry};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_m, EARTH_RADIUS_M};
pub use records::{BandId, LocationPoint, SignalBounds, SignalSample};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read band catalog {path}: {source}")]
    BandsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse band catalog: {0}")]
    BandsFileParse(#[from] serde_yaml::Error),

    #[error("band catalog validation failed: {0}")]
    Validation(String),
}
