//! End-to-end analysis of an ingested dataset.

use serde::Serialize;
use sigviz_core::{BandCatalog, SignalBounds, SignalSample};
use sigviz_ingest::{Dataset, FileSummary, IngestStats};

use crate::bands::{summarize_bands, summarize_network_types, BandSummary, NetworkTypeShare};
use crate::coverage::{classify_coverage, CoverageSummary, SampleIndex};
use crate::percent;
use crate::stats::{QualityBreakdown, SignalStatistics};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisConfig {
    pub radius_m: f64,
    pub bounds: SignalBounds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            radius_m: 10.0,
            bounds: SignalBounds::default(),
        }
    }
}

/// How the ingested samples split against the plausible signal window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleCounts {
    pub total: usize,
    pub valid: usize,
    /// At or below the floor: the device's "no signal" placeholder.
    pub below_floor: usize,
    /// At or above the ceiling.
    pub above_ceiling: usize,
    pub valid_percent: f64,
}

impl SampleCounts {
    #[must_use]
    pub fn invalid(&self) -> usize {
        self.total - self.valid
    }
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub settings: AnalysisConfig,
    pub ingest: IngestStats,
    pub files: Vec<FileSummary>,
    pub total_duration_secs: i64,
    pub total_distance_m: f64,
    pub samples: SampleCounts,
    pub coverage: CoverageSummary,
    pub bands: Vec<BandSummary>,
    pub network_types: Vec<NetworkTypeShare>,
    /// `None` when no valid sample was ingested.
    pub statistics: Option<SignalStatistics>,
    pub quality: QualityBreakdown,
}

/// Split samples into those inside `bounds` and counts of the rest.
#[must_use]
pub fn partition_samples<'a>(
    samples: &'a [SignalSample],
    bounds: &SignalBounds,
) -> (Vec<&'a SignalSample>, SampleCounts) {
    let mut counts = SampleCounts {
        total: samples.len(),
        ..SampleCounts::default()
    };
    let mut valid = Vec::with_capacity(samples.len());

    for sample in samples {
        if bounds.contains(sample.signal_dbm) {
            valid.push(sample);
        } else if sample.signal_dbm <= bounds.floor_dbm {
            counts.below_floor += 1;
        } else {
            counts.above_ceiling += 1;
        }
    }

    counts.valid = valid.len();
    counts.valid_percent = percent(counts.valid, counts.total);
    (valid, counts)
}

/// Run coverage, band and statistics analysis over `dataset`.
#[must_use]
pub fn analyze(
    dataset: &Dataset,
    config: &AnalysisConfig,
    catalog: &BandCatalog,
) -> AnalysisReport {
    let (valid, samples) = partition_samples(&dataset.samples, &config.bounds);

    if samples.invalid() > 0 {
        tracing::info!(
            below_floor = samples.below_floor,
            above_ceiling = samples.above_ceiling,
            "excluded out-of-range signal readings"
        );
    }

    let index = SampleIndex::new(valid.iter().map(|s| (s.latitude, s.longitude)));
    let mut coverage = classify_coverage(&dataset.locations, &index, config.radius_m);

    let placeholders = dataset
        .samples
        .iter()
        .filter(|s| s.signal_dbm <= config.bounds.floor_dbm);
    for placeholder in placeholders {
        coverage.placeholder_samples += 1;
        if !index.has_sample_within(placeholder.latitude, placeholder.longitude, config.radius_m) {
            coverage.placeholder_confirmed += 1;
        }
    }

    let values: Vec<f64> = valid.iter().map(|s| s.signal_dbm).collect();
    let statistics = SignalStatistics::compute(&values);
    if statistics.is_none() {
        tracing::warn!("no valid signal samples; statistics unavailable");
    }

    let report = AnalysisReport {
        settings: *config,
        ingest: dataset.stats.clone(),
        files: dataset.files.clone(),
        total_duration_secs: dataset.total_duration_secs(),
        total_distance_m: dataset.total_distance_m(),
        samples,
        bands: summarize_bands(&valid, catalog),
        network_types: summarize_network_types(&valid),
        statistics,
        quality: QualityBreakdown::from_values(&values),
        coverage,
    };

    tracing::info!(
        points = report.coverage.total_points,
        no_signal = report.coverage.no_signal,
        gap_percent = report.coverage.gap_percent,
        valid_samples = report.samples.valid,
        bands = report.bands.len(),
        "analysis complete"
    );

    report
}
