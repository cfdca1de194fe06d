use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::records::BandId;
use crate::ConfigError;

const UNLISTED_FREQUENCY: &str = "unknown";
const UNLISTED_ROLE: &str = "Unclassified";
const UNLISTED_COLOR: &str = "black";
const UNKNOWN_BAND_COLOR: &str = "gray";

/// Descriptive metadata for one numbered band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandEntry {
    pub band: u16,
    /// Human-readable carrier frequency, e.g. `"2300 MHz"`.
    pub frequency: String,
    /// What the band does in the network, e.g. `"Low-band coverage"`.
    pub role: String,
    /// CSS color used for this band's map markers.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCatalog {
    pub bands: Vec<BandEntry>,
}

impl Default for BandCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BandCatalog {
    /// Catalog of the bands commonly seen in the field logs.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |band: u16, frequency: &str, role: &str, color: &str| BandEntry {
            band,
            frequency: frequency.to_string(),
            role: role.to_string(),
            color: color.to_string(),
        };

        Self {
            bands: vec![
                entry(1, "2100 MHz", "Mid-band capacity", "blue"),
                entry(3, "1800 MHz", "Primary LTE layer", "purple"),
                entry(5, "850 MHz", "Low-band coverage", "orange"),
                entry(8, "900 MHz", "Low-band coverage", "darkgreen"),
                entry(40, "2300 MHz (TDD)", "High-capacity TDD layer", "cadetblue"),
            ],
        }
    }

    #[must_use]
    pub fn get(&self, band: BandId) -> Option<&BandEntry> {
        let number = band.number()?;
        self.bands.iter().find(|entry| entry.band == number)
    }

    #[must_use]
    pub fn frequency_label(&self, band: BandId) -> String {
        match band {
            BandId::Unknown => "n/a".to_string(),
            BandId::Numbered(_) => self
                .get(band)
                .map_or_else(|| UNLISTED_FREQUENCY.to_string(), |e| e.frequency.clone()),
        }
    }

    #[must_use]
    pub fn role_label(&self, band: BandId) -> String {
        match band {
            BandId::Unknown => "Unidentified band".to_string(),
            BandId::Numbered(_) => self
                .get(band)
                .map_or_else(|| UNLISTED_ROLE.to_string(), |e| e.role.clone()),
        }
    }

    #[must_use]
    pub fn color(&self, band: BandId) -> &str {
        match band {
            BandId::Unknown => UNKNOWN_BAND_COLOR,
            BandId::Numbered(_) => self.get(band).map_or(UNLISTED_COLOR, |e| e.color.as_str()),
        }
    }
}

/// Load and validate a band catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_band_catalog(path: &Path) -> Result<BandCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BandsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: BandCatalog = serde_yaml::from_str(&content)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &BandCatalog) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in &catalog.bands {
        if entry.band == 0 {
            return Err(ConfigError::Validation(
                "band number must be greater than zero".to_string(),
            ));
        }

        if entry.frequency.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "band {} has an empty frequency label",
                entry.band
            )));
        }

        if entry.color.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "band {} has an empty marker color",
                entry.band
            )));
        }

        if !seen.insert(entry.band) {
            return Err(ConfigError::Validation(format!(
                "duplicate band number: {}",
                entry.band
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "bands_test.rs"]
mod tests;
