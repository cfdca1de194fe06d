use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn assert_invalid(map: &HashMap<&str, &str>, expected_var: &str) {
    let result = build_app_config(lookup_from_map(map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_dir, PathBuf::from("./signal_data"));
    assert_eq!(cfg.output_dir, PathBuf::from("./output"));
    assert!(cfg.bands_path.is_none());
    assert!((cfg.coverage_radius_m - 10.0).abs() < f64::EPSILON);
    assert!((cfg.signal_bounds.floor_dbm - -150.0).abs() < f64::EPSILON);
    assert!(cfg.signal_bounds.ceiling_dbm.abs() < f64::EPSILON);
    assert_eq!(cfg.max_map_points, 50_000);
    assert_eq!(cfg.max_gap_points, 30_000);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("SIGVIZ_ENV", "production");
    map.insert("SIGVIZ_LOG_LEVEL", "debug");
    map.insert("SIGVIZ_DATA_DIR", "/data/logs");
    map.insert("SIGVIZ_OUTPUT_DIR", "/data/out");
    map.insert("SIGVIZ_BANDS_PATH", "/etc/sigviz/bands.yaml");
    map.insert("SIGVIZ_COVERAGE_RADIUS_M", "25.5");
    map.insert("SIGVIZ_SIGNAL_FLOOR_DBM", "-140");
    map.insert("SIGVIZ_SIGNAL_CEILING_DBM", "-40");
    map.insert("SIGVIZ_MAX_MAP_POINTS", "1000");
    map.insert("SIGVIZ_MAX_GAP_POINTS", "200");

    let cfg = build_app_config(lookup_from_map(&map)).expect("overrides should be valid");
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.data_dir, PathBuf::from("/data/logs"));
    assert_eq!(cfg.output_dir, PathBuf::from("/data/out"));
    assert_eq!(
        cfg.bands_path.as_deref(),
        Some(std::path::Path::new("/etc/sigviz/bands.yaml"))
    );
    assert!((cfg.coverage_radius_m - 25.5).abs() < f64::EPSILON);
    assert!((cfg.signal_bounds.floor_dbm - -140.0).abs() < f64::EPSILON);
    assert!((cfg.signal_bounds.ceiling_dbm - -40.0).abs() < f64::EPSILON);
    assert_eq!(cfg.max_map_points, 1000);
    assert_eq!(cfg.max_gap_points, 200);
}

#[test]
fn build_app_config_blank_bands_path_is_none() {
    let mut map = HashMap::new();
    map.insert("SIGVIZ_BANDS_PATH", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.bands_path.is_none());
}

#[test]
fn build_app_config_rejects_non_numeric_radius() {
    let mut map = HashMap::new();
    map.insert("SIGVIZ_COVERAGE_RADIUS_M", "ten");
    assert_invalid(&map, "SIGVIZ_COVERAGE_RADIUS_M");
}

#[test]
fn build_app_config_rejects_zero_radius() {
    let mut map = HashMap::new();
    map.insert("SIGVIZ_COVERAGE_RADIUS_M", "0");
    assert_invalid(&map, "SIGVIZ_COVERAGE_RADIUS_M");
}

#[test]
fn build_app_config_rejects_nan_floor() {
    let mut map = HashMap::new();
    map.insert("SIGVIZ_SIGNAL_FLOOR_DBM", "NaN");
    assert_invalid(&map, "SIGVIZ_SIGNAL_FLOOR_DBM");
}

#[test]
fn build_app_config_rejects_ceiling_below_floor() {
    let mut map = HashMap::new();
    map.insert("SIGVIZ_SIGNAL_FLOOR_DBM", "-40");
    map.insert("SIGVIZ_SIGNAL_CEILING_DBM", "-140");
    assert_invalid(&map, "SIGVIZ_SIGNAL_CEILING_DBM");
}

#[test]
fn build_app_config_rejects_negative_point_cap() {
    let mut map = HashMap::new();
    map.insert("SIGVIZ_MAX_MAP_POINTS", "-5");
    assert_invalid(&map, "SIGVIZ_MAX_MAP_POINTS");
}

#[test]
fn build_app_config_rejects_invalid_gap_cap() {
    let mut map = HashMap::new();
    map.insert("SIGVIZ_MAX_GAP_POINTS", "lots");
    assert_invalid(&map, "SIGVIZ_MAX_GAP_POINTS");
}
