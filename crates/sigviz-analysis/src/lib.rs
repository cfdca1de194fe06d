//! Coverage, band distribution and signal statistics for ingested drive-test logs.
//!
//! Every stage is a pure function over an ingested [`sigviz_ingest::Dataset`];
//! [`pipeline::analyze`] runs them in order and assembles an [`AnalysisReport`].

pub mod bands;
pub mod coverage;
pub mod pipeline;
pub mod stats;

pub use bands::{summarize_bands, summarize_network_types, BandSummary, NetworkTypeShare};
pub use coverage::{classify_coverage, CoverageClassification, CoverageSummary, SampleIndex};
pub use pipeline::{analyze, partition_samples, AnalysisConfig, AnalysisReport, SampleCounts};
pub use stats::{QualityBreakdown, QualityTier, SignalStatistics};

/// Rounds to two decimal places, the precision used for every reported percentage.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a percentage rounded to two decimals; `0.0` when `whole` is zero.
#[must_use]
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    // Counts come from in-memory collections and stay far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let ratio = part as f64 / whole as f64;
    round2(ratio * 100.0)
}
