//! Descriptive statistics and quality tiers over valid signal strengths.

use serde::Serialize;

use crate::percent;

/// Samples at or above this strength are rated good.
pub const GOOD_THRESHOLD_DBM: f64 = -90.0;
/// Samples at or above this strength (and below good) are rated fair.
pub const FAIR_THRESHOLD_DBM: f64 = -105.0;

/// `describe()`-style summary of valid signal strengths, in dBm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl SignalStatistics {
    /// Compute statistics over `values`. Returns `None` when `values` is empty.
    ///
    /// Callers are expected to pass only finite, in-bounds readings.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let std_dev = (sorted.len() > 1).then(|| {
            let sum_sq: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (n - 1.0)).sqrt()
        });

        Some(Self {
            count: sorted.len(),
            mean,
            std_dev,
            min: sorted[0],
            p25: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.5),
            p75: percentile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Linear-interpolation percentile over an ascending, non-empty slice.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - rank.floor();
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QualityTier {
    Good,
    Fair,
    Poor,
}

impl QualityTier {
    #[must_use]
    pub fn classify(dbm: f64) -> Self {
        if dbm >= GOOD_THRESHOLD_DBM {
            QualityTier::Good
        } else if dbm >= FAIR_THRESHOLD_DBM {
            QualityTier::Fair
        } else {
            QualityTier::Poor
        }
    }

    /// Marker color on the quality map.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            QualityTier::Good => "green",
            QualityTier::Fair => "orange",
            QualityTier::Poor => "red",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QualityTier::Good => "Good (>= -90 dBm)",
            QualityTier::Fair => "Fair (-105 to -90 dBm)",
            QualityTier::Poor => "Poor (< -105 dBm)",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityBreakdown {
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

impl QualityBreakdown {
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let mut breakdown = Self::default();
        for &dbm in values {
            match QualityTier::classify(dbm) {
                QualityTier::Good => breakdown.good += 1,
                QualityTier::Fair => breakdown.fair += 1,
                QualityTier::Poor => breakdown.poor += 1,
            }
        }
        breakdown
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.good + self.fair + self.poor
    }

    #[must_use]
    pub fn count(&self, tier: QualityTier) -> usize {
        match tier {
            QualityTier::Good => self.good,
            QualityTier::Fair => self.fair,
            QualityTier::Poor => self.poor,
        }
    }

    #[must_use]
    pub fn share_percent(&self, tier: QualityTier) -> f64 {
        percent(self.count(tier), self.total())
    }
}
