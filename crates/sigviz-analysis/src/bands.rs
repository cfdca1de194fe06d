//! Band and network-type distribution over valid samples.

use std::collections::BTreeMap;

use serde::Serialize;
use sigviz_core::{BandCatalog, BandId, SignalSample};

/// One row of the band distribution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSummary {
    pub band: BandId,
    pub frequency_label: String,
    pub sample_count: usize,
    pub share_percent: f64,
    pub role_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkTypeShare {
    /// `None` when the log did not record a network type.
    pub network_type: Option<String>,
    pub sample_count: usize,
    pub share_percent: f64,
}

impl NetworkTypeShare {
    #[must_use]
    pub fn label(&self) -> &str {
        self.network_type.as_deref().unwrap_or("Unknown")
    }
}

/// 100.00% expressed in hundredths of a percent.
const FULL_SHARE: u64 = 10_000;

/// Counts occurrences of each key and ranks them by share.
///
/// Shares are apportioned in hundredths of a percent by largest remainder:
/// each share is within 0.01 of its exact value and the shares sum to
/// exactly 100.00. Leftover hundredths go to the largest remainders, ties to
/// the smaller key.
///
/// Ranking is share descending, then key ascending. `BTreeMap` iteration plus
/// stable sorts gives the key tie-break for free.
#[allow(clippy::cast_precision_loss)]
fn ranked_shares<K: Ord>(keys: impl Iterator<Item = K>) -> Vec<(K, usize, f64)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    let mut total = 0u64;
    for key in keys {
        *counts.entry(key).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return Vec::new();
    }

    // (key, count, hundredths, remainder)
    let mut rows: Vec<(K, usize, u64, u64)> = counts
        .into_iter()
        .map(|(key, count)| {
            let scaled = count as u64 * FULL_SHARE;
            (key, count, scaled / total, scaled % total)
        })
        .collect();

    let assigned: u64 = rows.iter().map(|row| row.2).sum();
    let mut leftover = FULL_SHARE - assigned;
    let mut by_remainder: Vec<usize> = (0..rows.len()).collect();
    by_remainder.sort_by(|&a, &b| rows[b].3.cmp(&rows[a].3));
    for i in by_remainder {
        if leftover == 0 || rows[i].3 == 0 {
            break;
        }
        rows[i].2 += 1;
        leftover -= 1;
    }

    rows.sort_by(|a, b| b.2.cmp(&a.2));
    rows.into_iter()
        .map(|(key, count, hundredths, _)| (key, count, hundredths as f64 / 100.0))
        .collect()
}

/// Group valid samples by band and compute each band's share.
///
/// Numbered bands order before [`BandId::Unknown`], so on equal shares the
/// unknown group is listed last. Shares sum to exactly 100.00.
#[must_use]
pub fn summarize_bands(samples: &[&SignalSample], catalog: &BandCatalog) -> Vec<BandSummary> {
    ranked_shares(samples.iter().map(|s| s.band))
        .into_iter()
        .map(|(band, sample_count, share_percent)| BandSummary {
            band,
            frequency_label: catalog.frequency_label(band),
            sample_count,
            share_percent,
            role_label: catalog.role_label(band),
        })
        .collect()
}

/// Group valid samples by network type (`LTE`, `NR`, ...).
///
/// Missing types rank after every named type on equal shares.
#[must_use]
pub fn summarize_network_types(samples: &[&SignalSample]) -> Vec<NetworkTypeShare> {
    // (is_missing, name) so that `None` sorts last.
    let keys = samples.iter().map(|s| match &s.network_type {
        Some(name) => (false, name.clone()),
        None => (true, String::new()),
    });

    ranked_shares(keys)
        .into_iter()
        .map(|((missing, name), sample_count, share_percent)| NetworkTypeShare {
            network_type: (!missing).then_some(name),
            sample_count,
            share_percent,
        })
        .collect()
}
