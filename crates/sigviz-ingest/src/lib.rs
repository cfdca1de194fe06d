//! Drive-test log ingestion.
//!
//! Reads every `.csv` log in a source directory, normalizes rows into
//! [`sigviz_core::LocationPoint`] and [`sigviz_core::SignalSample`] records,
//! drops exact duplicates, and summarizes each file's trip. Malformed rows and
//! unreadable files are counted and skipped; only a missing or unreadable
//! source directory aborts ingestion.

pub mod error;
pub mod normalize;
pub mod parse;
pub mod reader;
pub mod trip;
pub mod types;

pub use error::IngestError;
pub use normalize::{normalize_row, NormalizedRow, RowRejection};
pub use reader::{ingest_dir, list_log_files};
pub use trip::{summarize_track, TrackSummary};
pub use types::{Dataset, FileSummary, IngestStats, RawLogRow};
