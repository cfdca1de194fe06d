use std::path::PathBuf;

use crate::records::SignalBounds;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Directory scanned for `.csv` drive-test logs.
    pub data_dir: PathBuf,
    /// Directory the report and map artifacts are written into.
    pub output_dir: PathBuf,
    /// Optional YAML band catalog. `None` selects the built-in catalog.
    pub bands_path: Option<PathBuf>,
    /// Radius in meters within which a valid sample covers a location point.
    pub coverage_radius_m: f64,
    pub signal_bounds: SignalBounds,
    /// Upper bound on sample markers drawn per map.
    pub max_map_points: usize,
    /// Upper bound on "confirmed no signal" markers drawn per map.
    pub max_gap_points: usize,
}
