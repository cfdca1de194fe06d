//! Log row and dataset types.
//!
//! ## Observed shape of the field logger's CSV exports
//!
//! ### Header
//! One header row. Column order varies between app versions, so rows are
//! matched by name. Extra columns (cell id, PCI, RSRQ, ...) are ignored.
//!
//! ### `Time`
//! Usually `2024-03-02 14:05:11` in device-local time; older exports use
//! epoch milliseconds. See [`crate::parse::parse_timestamp`].
//!
//! ### `Latitude` / `Longitude`
//! Decimal degrees. Before the first GPS fix the logger writes `0` for both.
//!
//! ### `SignalStrength_dBm`
//! Empty when the modem reported nothing. `-999` (or anything at or below
//! -150) is the modem's "no service" placeholder and `2147483647` shows up
//! when the radio is off; both survive ingest and are filtered during analysis.
//!
//! ### `Band` / `NetworkType`
//! Band is an integer, `-1` when unknown. Network type is free text (`LTE`,
//! `NR`, `HSPA`, ...), sometimes empty.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sigviz_core::{LocationPoint, SignalSample};

/// One CSV row as read, before any validation.
///
/// Every field is optional text so that a single bad cell becomes a counted
/// malformed row instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLogRow {
    #[serde(rename = "Time", default)]
    pub time: Option<String>,

    #[serde(rename = "Latitude", default)]
    pub latitude: Option<String>,

    #[serde(rename = "Longitude", default)]
    pub longitude: Option<String>,

    #[serde(rename = "SignalStrength_dBm", default)]
    pub signal_dbm: Option<String>,

    #[serde(rename = "NetworkType", default)]
    pub network_type: Option<String>,

    #[serde(rename = "Band", default)]
    pub band: Option<String>,
}

/// Columns a log file must carry to be ingested.
pub(crate) const REQUIRED_COLUMNS: &[&str] = &["Time", "Latitude", "Longitude"];

/// Counters accumulated across one ingest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub files_read: usize,
    pub files_failed: usize,
    pub rows_read: usize,
    pub malformed_rows: usize,
    pub rows_without_signal: usize,
    pub duplicate_locations: usize,
    pub duplicate_samples: usize,
}

/// Per-file trip summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub malformed: usize,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
    pub duration_secs: i64,
    pub distance_m: f64,
}

/// Deduplicated output of one ingest run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub locations: Vec<LocationPoint>,
    pub samples: Vec<SignalSample>,
    pub files: Vec<FileSummary>,
    pub stats: IngestStats,
}

impl Dataset {
    /// Total trip duration across all files, in seconds.
    #[must_use]
    pub fn total_duration_secs(&self) -> i64 {
        self.files.iter().map(|f| f.duration_secs).sum()
    }

    /// Total travelled distance across all files, in meters.
    #[must_use]
    pub fn total_distance_m(&self) -> f64 {
        self.files.iter().map(|f| f.distance_m).sum()
    }
}
