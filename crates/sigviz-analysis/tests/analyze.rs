//! Integration tests for `analyze` over hand-built datasets.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sigviz_analysis::{analyze, partition_samples, AnalysisConfig};
use sigviz_core::{BandCatalog, BandId, LocationPoint, SignalBounds, SignalSample, EARTH_RADIUS_M};
use sigviz_ingest::Dataset;

const BASE_LAT: f64 = 12.9716;
const BASE_LON: f64 = 77.5946;

fn at(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 2)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
        + Duration::seconds(secs)
}

/// Latitude `meters` north of the base point.
fn lat_north(meters: f64) -> f64 {
    BASE_LAT + (meters / EARTH_RADIUS_M).to_degrees()
}

fn location(secs: i64, lat: f64) -> LocationPoint {
    LocationPoint {
        timestamp: at(secs),
        latitude: lat,
        longitude: BASE_LON,
    }
}

fn sample(secs: i64, lat: f64, band: BandId, dbm: f64) -> SignalSample {
    SignalSample {
        timestamp: at(secs),
        latitude: lat,
        longitude: BASE_LON,
        band,
        network_type: Some("LTE".to_string()),
        signal_dbm: dbm,
    }
}

#[test]
fn ten_points_one_gap_is_ten_percent() {
    // Points spaced 100 m apart; every point but the last gets a sample 3 m away.
    let mut dataset = Dataset::default();
    for i in 0..10 {
        let lat = lat_north(100.0 * f64::from(i));
        dataset.locations.push(location(i64::from(i), lat));
        if i < 9 {
            let near = lat_north(100.0 * f64::from(i) + 3.0);
            dataset
                .samples
                .push(sample(i64::from(i), near, BandId::Numbered(40), -95.0));
        }
    }

    let report = analyze(&dataset, &AnalysisConfig::default(), &BandCatalog::builtin());
    assert_eq!(report.coverage.total_points, 10);
    assert_eq!(report.coverage.covered, 9);
    assert_eq!(report.coverage.no_signal, 1);
    assert!((report.coverage.gap_percent - 10.0).abs() < f64::EPSILON);
    assert_eq!(report.coverage.gap_indices().collect::<Vec<_>>(), vec![9]);
}

#[test]
fn out_of_range_samples_do_not_provide_coverage() {
    let mut dataset = Dataset::default();
    dataset.locations.push(location(0, BASE_LAT));
    dataset
        .samples
        .push(sample(0, BASE_LAT, BandId::Unknown, -160.0));
    dataset
        .samples
        .push(sample(1, lat_north(2.0), BandId::Unknown, 5.0));

    let report = analyze(&dataset, &AnalysisConfig::default(), &BandCatalog::builtin());
    assert_eq!(report.coverage.no_signal, 1);
    assert_eq!(report.samples.below_floor, 1);
    assert_eq!(report.samples.above_ceiling, 1);
    assert_eq!(report.samples.valid, 0);
    assert_eq!(report.coverage.placeholder_samples, 1);
    assert_eq!(report.coverage.placeholder_confirmed, 1);
    assert!(report.statistics.is_none());
    assert!(report.bands.is_empty());
}

#[test]
fn placeholder_near_valid_sample_is_not_confirmed() {
    let mut dataset = Dataset::default();
    dataset.locations.push(location(0, BASE_LAT));
    dataset
        .samples
        .push(sample(0, BASE_LAT, BandId::Unknown, -150.0));
    dataset
        .samples
        .push(sample(1, lat_north(4.0), BandId::Numbered(3), -101.0));

    let report = analyze(&dataset, &AnalysisConfig::default(), &BandCatalog::builtin());
    assert_eq!(report.coverage.placeholder_samples, 1);
    assert_eq!(report.coverage.placeholder_confirmed, 0);
    assert_eq!(report.coverage.covered, 1);
}

#[test]
fn statistics_use_only_valid_samples() {
    let mut dataset = Dataset::default();
    for (i, dbm) in [-90.0, -93.0, -131.0, -60.0, -999.0, 0.0].into_iter().enumerate() {
        let secs = i64::try_from(i).unwrap();
        dataset
            .samples
            .push(sample(secs, BASE_LAT, BandId::Numbered(40), dbm));
    }

    let report = analyze(&dataset, &AnalysisConfig::default(), &BandCatalog::builtin());
    let stats = report.statistics.unwrap();
    assert!((stats.mean - -93.5).abs() < 1e-9, "got {}", stats.mean);
    assert!((stats.median - -91.5).abs() < 1e-9, "got {}", stats.median);
    assert!((stats.min - -131.0).abs() < f64::EPSILON);
    assert!((stats.max - -60.0).abs() < f64::EPSILON);
    assert_eq!(report.samples.invalid(), 2);
    assert_eq!(report.quality.total(), 4);
}

#[test]
fn custom_radius_changes_classification() {
    let mut dataset = Dataset::default();
    dataset.locations.push(location(0, BASE_LAT));
    dataset
        .samples
        .push(sample(0, lat_north(25.0), BandId::Numbered(3), -80.0));

    let default = analyze(&dataset, &AnalysisConfig::default(), &BandCatalog::builtin());
    assert_eq!(default.coverage.no_signal, 1);

    let wide = AnalysisConfig {
        radius_m: 30.0,
        bounds: SignalBounds::default(),
    };
    let wide = analyze(&dataset, &wide, &BandCatalog::builtin());
    assert_eq!(wide.coverage.covered, 1);
}

#[test]
fn shares_sum_to_hundred_for_random_band_mixes() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut bands: Vec<BandId> = (1..=40).map(BandId::Numbered).collect();
    bands.push(BandId::Unknown);

    for _ in 0..50 {
        let n = rng.random_range(1..500);
        let samples: Vec<SignalSample> = (0..n)
            .map(|i| {
                let band = bands[rng.random_range(0..bands.len())];
                sample(i, BASE_LAT, band, -100.0)
            })
            .collect();
        let dataset = Dataset {
            samples,
            ..Dataset::default()
        };

        let report = analyze(&dataset, &AnalysisConfig::default(), &BandCatalog::builtin());
        #[allow(clippy::cast_possible_truncation)]
        let hundredths: i64 = report
            .bands
            .iter()
            .map(|b| (b.share_percent * 100.0).round() as i64)
            .sum();
        assert_eq!(hundredths, 10_000, "n = {n}");
        for band in &report.bands {
            #[allow(clippy::cast_precision_loss)]
            let exact = band.sample_count as f64 * 100.0 / report.samples.valid as f64;
            assert!(
                (band.share_percent - exact).abs() <= 0.01 + 1e-9,
                "n = {n}, exact {exact}, got {}",
                band.share_percent
            );
        }
        let counted: usize = report.bands.iter().map(|b| b.sample_count).sum();
        assert_eq!(counted, report.samples.valid);
    }
}

#[test]
fn partition_respects_custom_bounds() {
    let samples = vec![
        sample(0, BASE_LAT, BandId::Unknown, -130.0),
        sample(1, BASE_LAT, BandId::Unknown, -120.0),
        sample(2, BASE_LAT, BandId::Unknown, -40.0),
    ];
    let bounds = SignalBounds {
        floor_dbm: -125.0,
        ceiling_dbm: -40.0,
    };
    let (valid, counts) = partition_samples(&samples, &bounds);
    assert_eq!(valid.len(), 1);
    assert_eq!(counts.below_floor, 1);
    assert_eq!(counts.above_ceiling, 1);
    assert!((counts.valid_percent - 33.33).abs() < 1e-9);
}

#[test]
fn report_serializes_to_json() {
    let mut dataset = Dataset::default();
    dataset.locations.push(location(0, BASE_LAT));
    dataset
        .samples
        .push(sample(0, BASE_LAT, BandId::Numbered(40), -88.0));

    let report = analyze(&dataset, &AnalysisConfig::default(), &BandCatalog::builtin());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["bands"][0]["band"], "Band 40");
    assert_eq!(json["coverage"]["covered"], 1);
    assert!(json["coverage"].get("classifications").is_none());
}
