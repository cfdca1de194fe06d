//! Normalization from [`RawLogRow`] to core record types.

use sigviz_core::{BandId, LocationPoint, SignalSample};
use thiserror::Error;

use crate::parse::{parse_coordinate, parse_signal, parse_text, parse_timestamp};
use crate::types::RawLogRow;

/// Why a row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("missing or unparseable timestamp")]
    Timestamp,

    #[error("missing, zero or out-of-range latitude")]
    Latitude,

    #[error("missing, zero or out-of-range longitude")]
    Longitude,

    #[error("non-numeric signal strength '{0}'")]
    Signal(String),
}

/// A row that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub location: LocationPoint,
    /// `None` when the row carried no signal reading.
    pub sample: Option<SignalSample>,
}

/// Normalizes one raw log row.
///
/// # Errors
///
/// Returns [`RowRejection`] naming the first field that failed validation.
pub fn normalize_row(row: &RawLogRow) -> Result<NormalizedRow, RowRejection> {
    let timestamp = row
        .time
        .as_deref()
        .and_then(parse_timestamp)
        .ok_or(RowRejection::Timestamp)?;

    let latitude = row
        .latitude
        .as_deref()
        .and_then(|raw| parse_coordinate(raw, 90.0))
        .ok_or(RowRejection::Latitude)?;

    let longitude = row
        .longitude
        .as_deref()
        .and_then(|raw| parse_coordinate(raw, 180.0))
        .ok_or(RowRejection::Longitude)?;

    let signal_dbm = match row.signal_dbm.as_deref() {
        None => None,
        Some(raw) => parse_signal(raw).map_err(|_| RowRejection::Signal(raw.trim().to_string()))?,
    };

    let sample = signal_dbm.map(|signal_dbm| SignalSample {
        timestamp,
        latitude,
        longitude,
        band: row.band.as_deref().map_or(BandId::Unknown, BandId::parse),
        network_type: parse_text(row.network_type.as_deref()),
        signal_dbm,
    });

    Ok(NormalizedRow {
        location: LocationPoint {
            timestamp,
            latitude,
            longitude,
        },
        sample,
    })
}
