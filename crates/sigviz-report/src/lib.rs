//! Markdown report and interactive map output for an analysis run.

pub mod error;
pub mod map;
pub mod markdown;
pub mod writer;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sigviz_analysis::{partition_samples, AnalysisReport};
use sigviz_core::{BandCatalog, LocationPoint};
use sigviz_ingest::Dataset;

pub use error::RenderError;
pub use map::{downsample, escape_html, render_map, MapLimits, MapMode};
pub use markdown::{escape_table_cell, format_duration, render_markdown};
pub use writer::{write_artifacts, Artifact};

pub const REPORT_FILE: &str = "network_report.md";

/// Every file a run may produce. Any of these not produced by a run is
/// removed from the output directory when that run's set is written.
pub const ARTIFACT_FILES: [&str; 3] = [
    REPORT_FILE,
    "network_quality_map.html",
    "network_bands_map.html",
];

/// Inputs shared by every artifact of one run.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub data_dir: &'a Path,
    pub generated_at: DateTime<Utc>,
    pub limits: MapLimits,
}

/// Render the report and every map that has something to show.
///
/// `report` must come from analyzing `dataset`; the maps look up gap points
/// by index into `dataset.locations`.
///
/// # Errors
///
/// Returns [`RenderError`] if any artifact fails to render.
pub fn render_artifacts(
    report: &AnalysisReport,
    dataset: &Dataset,
    catalog: &BandCatalog,
    ctx: &RenderContext<'_>,
) -> Result<Vec<Artifact>, RenderError> {
    let mut artifacts = vec![Artifact {
        file_name: REPORT_FILE.to_string(),
        contents: render_markdown(report, ctx.data_dir, ctx.generated_at)?,
    }];

    let (valid, _) = partition_samples(&dataset.samples, &report.settings.bounds);
    let gaps: Vec<&LocationPoint> = report
        .coverage
        .gap_indices()
        .filter_map(|i| dataset.locations.get(i))
        .collect();

    for mode in [MapMode::Quality, MapMode::Bands] {
        if let Some(html) = render_map(mode, &valid, &gaps, catalog, ctx.limits)? {
            artifacts.push(Artifact {
                file_name: mode.file_name().to_string(),
                contents: html,
            });
        }
    }

    Ok(artifacts)
}

/// Render every artifact and write the set into `out_dir` atomically.
///
/// # Errors
///
/// Returns [`RenderError`] if rendering or writing fails; in that case no
/// artifact in `out_dir` is replaced. On success, maps left by an earlier
/// run that this run had nothing to plot for are removed.
pub fn write_report_set(
    out_dir: &Path,
    report: &AnalysisReport,
    dataset: &Dataset,
    catalog: &BandCatalog,
    ctx: &RenderContext<'_>,
) -> Result<Vec<PathBuf>, RenderError> {
    let artifacts = render_artifacts(report, dataset, catalog, ctx)?;
    let retired: Vec<&str> = ARTIFACT_FILES
        .into_iter()
        .filter(|name| !artifacts.iter().any(|a| a.file_name == *name))
        .collect();
    let written = write_artifacts(out_dir, &artifacts, &retired)?;
    tracing::info!(
        out_dir = %out_dir.display(),
        files = written.len(),
        "report written"
    );
    Ok(written)
}
