//! Directory scan, per-file CSV reading and deduplication.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use sigviz_core::{BandId, LocationPoint, SignalSample};

use crate::error::IngestError;
use crate::normalize::normalize_row;
use crate::trip::summarize_track;
use crate::types::{Dataset, FileSummary, IngestStats, RawLogRow, REQUIRED_COLUMNS};

type LocationKey = (NaiveDateTime, u64, u64);
type SampleKey = (NaiveDateTime, u64, u64, BandId, Option<String>, u64);

fn location_key(p: &LocationPoint) -> LocationKey {
    (p.timestamp, p.latitude.to_bits(), p.longitude.to_bits())
}

fn sample_key(s: &SignalSample) -> SampleKey {
    (
        s.timestamp,
        s.latitude.to_bits(),
        s.longitude.to_bits(),
        s.band,
        s.network_type.clone(),
        s.signal_dbm.to_bits(),
    )
}

/// Rows parsed out of one file, before cross-file deduplication.
struct FileRows {
    summary: FileSummary,
    locations: Vec<LocationPoint>,
    samples: Vec<SignalSample>,
    rows_without_signal: usize,
}

/// List the `.csv` log files directly inside `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`IngestError::SourceDirMissing`], [`IngestError::NotADirectory`] or
/// [`IngestError::SourceDirUnreadable`] when `dir` cannot be scanned.
pub fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let display = dir.display().to_string();

    let metadata = std::fs::metadata(dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::SourceDirMissing {
                path: display.clone(),
            }
        } else {
            IngestError::SourceDirUnreadable {
                path: display.clone(),
                source: e,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(IngestError::NotADirectory { path: display });
    }

    let unreadable = |e: std::io::Error| IngestError::SourceDirUnreadable {
        path: display.clone(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Ingest every log file in `dir` into a deduplicated [`Dataset`].
///
/// Files are processed in path order and the first occurrence of a duplicate
/// record survives, so repeated runs over an unchanged directory produce
/// identical output.
///
/// # Errors
///
/// Fails only when the directory itself is missing or unreadable. Files that
/// cannot be read or lack required columns are logged, counted in
/// [`IngestStats::files_failed`] and skipped; malformed rows are counted in
/// [`IngestStats::malformed_rows`].
pub fn ingest_dir(dir: &Path) -> Result<Dataset, IngestError> {
    let files = list_log_files(dir)?;

    if files.is_empty() {
        tracing::warn!(dir = %dir.display(), "no .csv log files found");
    }

    let mut stats = IngestStats::default();
    let mut dataset = Dataset::default();
    let mut seen_locations: HashSet<LocationKey> = HashSet::new();
    let mut seen_samples: HashSet<SampleKey> = HashSet::new();

    for path in &files {
        let rows = match read_log_file(path) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping unreadable log file");
                stats.files_failed += 1;
                continue;
            }
        };

        stats.files_read += 1;
        stats.rows_read += rows.summary.rows;
        stats.malformed_rows += rows.summary.malformed;
        stats.rows_without_signal += rows.rows_without_signal;

        for location in rows.locations {
            if seen_locations.insert(location_key(&location)) {
                dataset.locations.push(location);
            } else {
                stats.duplicate_locations += 1;
            }
        }

        for sample in rows.samples {
            if seen_samples.insert(sample_key(&sample)) {
                dataset.samples.push(sample);
            } else {
                stats.duplicate_samples += 1;
            }
        }

        tracing::debug!(
            file = %path.display(),
            rows = rows.summary.rows,
            malformed = rows.summary.malformed,
            "log file ingested"
        );
        dataset.files.push(rows.summary);
    }

    tracing::info!(
        files = stats.files_read,
        failed_files = stats.files_failed,
        rows = stats.rows_read,
        malformed = stats.malformed_rows,
        locations = dataset.locations.len(),
        samples = dataset.samples.len(),
        "ingest complete"
    );

    dataset.stats = stats;
    Ok(dataset)
}

fn read_log_file(path: &Path) -> Result<FileRows, IngestError> {
    let file_error = |e: csv::Error| IngestError::FileRead {
        path: path.display().to_string(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(file_error)?;

    let headers = reader.headers().map_err(file_error)?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            path: path.display().to_string(),
            columns: missing.join(", "),
        });
    }

    let mut rows = 0usize;
    let mut malformed = 0usize;
    let mut rows_without_signal = 0usize;
    let mut locations = Vec::new();
    let mut samples = Vec::new();
    let mut track = Vec::new();

    for (idx, record) in reader.deserialize::<RawLogRow>().enumerate() {
        rows += 1;
        // Header is line 1.
        let line = idx + 2;

        let raw = match record {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(file = %path.display(), line, error = %e, "malformed row");
                malformed += 1;
                continue;
            }
        };

        match normalize_row(&raw) {
            Ok(normalized) => {
                let loc = &normalized.location;
                track.push((loc.timestamp, loc.latitude, loc.longitude));
                match normalized.sample {
                    Some(sample) => samples.push(sample),
                    None => rows_without_signal += 1,
                }
                locations.push(normalized.location);
            }
            Err(reason) => {
                tracing::debug!(file = %path.display(), line, %reason, "malformed row");
                malformed += 1;
            }
        }
    }

    let trip = summarize_track(&mut track);

    Ok(FileRows {
        summary: FileSummary {
            path: path.to_path_buf(),
            rows,
            malformed,
            first_timestamp: trip.first_timestamp,
            last_timestamp: trip.last_timestamp,
            duration_secs: trip.duration_secs,
            distance_m: trip.distance_m,
        },
        locations,
        samples,
        rows_without_signal,
    })
}
