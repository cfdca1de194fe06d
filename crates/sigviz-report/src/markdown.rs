//! Markdown rendering of an analysis run.

use std::fmt::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use sigviz_analysis::{AnalysisReport, QualityTier};

use crate::error::RenderError;

/// Formats a duration in seconds as `1h 02m 03s`.
#[must_use]
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Render the human-readable report for one run.
///
/// # Errors
///
/// Returns [`RenderError::Format`] if writing into the buffer fails.
pub fn render_markdown(
    report: &AnalysisReport,
    data_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<String, RenderError> {
    let mut out = String::new();

    writeln!(out, "# Network Coverage Report")?;
    writeln!(out)?;
    writeln!(out, "**Generated**: {}", generated_at.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(out, "**Data directory**: `{}`", data_dir.display())?;
    writeln!(
        out,
        "**Coverage radius**: {} m",
        report.settings.radius_m
    )?;
    writeln!(out)?;
    writeln!(out, "---")?;

    write_ingest(&mut out, report)?;
    write_coverage(&mut out, report)?;
    write_bands(&mut out, report)?;
    write_network_types(&mut out, report)?;
    write_statistics(&mut out, report)?;
    write_trips(&mut out, report)?;

    Ok(out)
}

fn write_ingest(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    let stats = &report.ingest;
    let samples = &report.samples;

    writeln!(out)?;
    writeln!(out, "## Data")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|--------|-------|")?;
    writeln!(out, "| Files read | {} |", stats.files_read)?;
    writeln!(out, "| Files skipped | {} |", stats.files_failed)?;
    writeln!(out, "| Rows read | {} |", stats.rows_read)?;
    writeln!(out, "| Malformed rows | {} |", stats.malformed_rows)?;
    writeln!(out, "| Rows without a signal reading | {} |", stats.rows_without_signal)?;
    writeln!(out, "| Duplicate points dropped | {} |", stats.duplicate_locations)?;
    writeln!(out, "| Duplicate samples dropped | {} |", stats.duplicate_samples)?;
    writeln!(out, "| Signal samples | {} |", samples.total)?;
    writeln!(
        out,
        "| Valid samples | {} ({:.2}%) |",
        samples.valid, samples.valid_percent
    )?;
    writeln!(out, "| Placeholder readings (at or below floor) | {} |", samples.below_floor)?;
    writeln!(out, "| Readings at or above ceiling | {} |", samples.above_ceiling)?;
    Ok(())
}

fn write_coverage(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    let coverage = &report.coverage;

    writeln!(out)?;
    writeln!(out, "## Coverage")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|--------|-------|")?;
    writeln!(out, "| Location points | {} |", coverage.total_points)?;
    writeln!(out, "| Covered | {} |", coverage.covered)?;
    writeln!(out, "| Confirmed no signal | {} |", coverage.no_signal)?;
    writeln!(out, "| Coverage gap | {:.2}% |", coverage.gap_percent)?;
    writeln!(
        out,
        "| Placeholder readings confirmed as dead zones | {} of {} |",
        coverage.placeholder_confirmed, coverage.placeholder_samples
    )?;
    Ok(())
}

/// Escape `|` so free text from logs and catalogs stays inside one table cell.
#[must_use]
pub fn escape_table_cell(raw: &str) -> String {
    raw.replace('|', "\\|")
}

fn write_bands(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "## Band Distribution")?;
    writeln!(out)?;

    if report.bands.is_empty() {
        writeln!(out, "No valid signal samples.")?;
        return Ok(());
    }

    writeln!(out, "| Band | Frequency | Share | Samples | Role |")?;
    writeln!(out, "|------|-----------|-------|---------|------|")?;
    for band in &report.bands {
        writeln!(
            out,
            "| {} | {} | {:.2}% | {} | {} |",
            band.band,
            escape_table_cell(&band.frequency_label),
            band.share_percent,
            band.sample_count,
            escape_table_cell(&band.role_label)
        )?;
    }
    Ok(())
}

fn write_network_types(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    if report.network_types.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "## Network Types")?;
    writeln!(out)?;
    writeln!(out, "| Type | Share | Samples |")?;
    writeln!(out, "|------|-------|---------|")?;
    for share in &report.network_types {
        writeln!(
            out,
            "| {} | {:.2}% | {} |",
            escape_table_cell(share.label()),
            share.share_percent,
            share.sample_count
        )?;
    }
    Ok(())
}

fn write_statistics(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "## Signal Strength (dBm)")?;
    writeln!(out)?;

    let Some(stats) = &report.statistics else {
        writeln!(out, "No valid signal samples.")?;
        return Ok(());
    };

    writeln!(out, "| Statistic | Value |")?;
    writeln!(out, "|-----------|-------|")?;
    writeln!(out, "| Count | {} |", stats.count)?;
    writeln!(out, "| Mean | {:.2} |", stats.mean)?;
    match stats.std_dev {
        Some(std_dev) => writeln!(out, "| Std dev | {std_dev:.2} |")?,
        None => writeln!(out, "| Std dev | n/a |")?,
    }
    writeln!(out, "| Min | {:.2} |", stats.min)?;
    writeln!(out, "| 25% | {:.2} |", stats.p25)?;
    writeln!(out, "| Median | {:.2} |", stats.median)?;
    writeln!(out, "| 75% | {:.2} |", stats.p75)?;
    writeln!(out, "| Max | {:.2} |", stats.max)?;

    writeln!(out)?;
    writeln!(out, "### Quality")?;
    writeln!(out)?;
    writeln!(out, "| Tier | Samples | Share |")?;
    writeln!(out, "|------|---------|-------|")?;
    for tier in [QualityTier::Good, QualityTier::Fair, QualityTier::Poor] {
        writeln!(
            out,
            "| {} | {} | {:.2}% |",
            tier.label(),
            report.quality.count(tier),
            report.quality.share_percent(tier)
        )?;
    }
    Ok(())
}

fn write_trips(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "## Trips")?;
    writeln!(out)?;
    writeln!(
        out,
        "**Total duration**: {}",
        format_duration(report.total_duration_secs)
    )?;
    writeln!(
        out,
        "**Total distance**: {:.2} km",
        report.total_distance_m / 1000.0
    )?;

    if report.files.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "| File | Rows | Malformed | Start | Duration | Distance (km) |")?;
    writeln!(out, "|------|------|-----------|-------|----------|---------------|")?;
    for file in &report.files {
        let name = file
            .path
            .file_name()
            .map_or_else(
                || file.path.display().to_string(),
                |n| n.to_string_lossy().into_owned(),
            );
        let start = file.first_timestamp.map_or_else(
            || "-".to_string(),
            |ts| ts.format("%Y-%m-%d %H:%M").to_string(),
        );
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {:.2} |",
            escape_table_cell(&name),
            file.rows,
            file.malformed,
            start,
            format_duration(file.duration_secs),
            file.distance_m / 1000.0
        )?;
    }
    Ok(())
}
