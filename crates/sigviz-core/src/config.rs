use crate::app_config::{AppConfig, Environment};
use crate::records::SignalBounds;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does not load `.env` files first.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values are rejected.
#[allow(clippy::similar_names)]
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, format!("'{raw}' is not a finite number")))
        }
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SIGVIZ_ENV", "development"));
    let log_level = or_default("SIGVIZ_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("SIGVIZ_DATA_DIR", "./signal_data"));
    let output_dir = PathBuf::from(or_default("SIGVIZ_OUTPUT_DIR", "./output"));
    let bands_path = lookup("SIGVIZ_BANDS_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let coverage_radius_m = parse_f64("SIGVIZ_COVERAGE_RADIUS_M", "10")?;
    if coverage_radius_m <= 0.0 {
        return Err(invalid(
            "SIGVIZ_COVERAGE_RADIUS_M",
            format!("radius must be positive, got {coverage_radius_m}"),
        ));
    }

    let floor_dbm = parse_f64("SIGVIZ_SIGNAL_FLOOR_DBM", "-150")?;
    let ceiling_dbm = parse_f64("SIGVIZ_SIGNAL_CEILING_DBM", "0")?;
    if ceiling_dbm <= floor_dbm {
        return Err(invalid(
            "SIGVIZ_SIGNAL_CEILING_DBM",
            format!("ceiling {ceiling_dbm} must be above floor {floor_dbm}"),
        ));
    }

    let max_map_points = parse_usize("SIGVIZ_MAX_MAP_POINTS", "50000")?;
    let max_gap_points = parse_usize("SIGVIZ_MAX_GAP_POINTS", "30000")?;

    Ok(AppConfig {
        env,
        log_level,
        data_dir,
        output_dir,
        bands_path,
        coverage_radius_m,
        signal_bounds: SignalBounds {
            floor_dbm,
            ceiling_dbm,
        },
        max_map_points,
        max_gap_points,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
