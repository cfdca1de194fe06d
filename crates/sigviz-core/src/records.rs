use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

/// Frequency band a sample was measured on.
///
/// Ordering puts numbered bands first in ascending order and `Unknown` last,
/// which is the tie-break order used when ranking band shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BandId {
    Numbered(u16),
    Unknown,
}

impl BandId {
    /// Parse a raw band cell.
    ///
    /// Accepts `40`, `B40`, `b40` and `Band 40`. Empty cells, `-1` (the
    /// logger's "no band" marker), zero and anything unparseable map to
    /// [`BandId::Unknown`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        let digits = lower
            .strip_prefix("band")
            .or_else(|| lower.strip_prefix('b'))
            .unwrap_or(&lower)
            .trim();

        // Some exports write integer columns as floats ("40.0").
        let digits = digits.strip_suffix(".0").unwrap_or(digits);

        match digits.parse::<u16>() {
            Ok(n) if n > 0 => BandId::Numbered(n),
            _ => BandId::Unknown,
        }
    }

    #[must_use]
    pub fn number(self) -> Option<u16> {
        match self {
            BandId::Numbered(n) => Some(n),
            BandId::Unknown => None,
        }
    }
}

impl std::fmt::Display for BandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BandId::Numbered(n) => write!(f, "Band {n}"),
            BandId::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for BandId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A position fix taken from one log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
}

/// A signal-strength reading taken from one log row.
///
/// Readings are kept whatever their value; whether a reading is usable is
/// decided later against [`SignalBounds`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSample {
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub band: BandId,
    /// Radio access type as logged, e.g. `"LTE"` or `"NR"`.
    pub network_type: Option<String>,
    pub signal_dbm: f64,
}

/// Plausible signal-strength window. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalBounds {
    pub floor_dbm: f64,
    pub ceiling_dbm: f64,
}

impl Default for SignalBounds {
    fn default() -> Self {
        Self {
            floor_dbm: -150.0,
            ceiling_dbm: 0.0,
        }
    }
}

impl SignalBounds {
    #[must_use]
    pub fn contains(&self, dbm: f64) -> bool {
        dbm.is_finite() && dbm > self.floor_dbm && dbm < self.ceiling_dbm
    }
}
