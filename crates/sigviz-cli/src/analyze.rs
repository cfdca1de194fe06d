//! Shared pipeline wiring plus the `analyze` and `bands` handlers.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sigviz_analysis::{analyze, AnalysisConfig, AnalysisReport};
use sigviz_core::{load_band_catalog, AppConfig, BandCatalog};
use sigviz_ingest::{ingest_dir, Dataset};
use sigviz_report::{escape_table_cell, format_duration};

/// Everything produced by one ingest + analysis pass.
pub(crate) struct PipelineRun {
    pub(crate) dataset: Dataset,
    pub(crate) catalog: BandCatalog,
    pub(crate) report: AnalysisReport,
}

/// The configured catalog file, or the built-in catalog when none is set.
pub(crate) fn load_catalog(config: &AppConfig) -> anyhow::Result<BandCatalog> {
    match &config.bands_path {
        Some(path) => load_band_catalog(path)
            .with_context(|| format!("loading band catalog {}", path.display())),
        None => Ok(BandCatalog::builtin()),
    }
}

pub(crate) fn analysis_config(config: &AppConfig, radius_override: Option<f64>) -> AnalysisConfig {
    AnalysisConfig {
        radius_m: radius_override.unwrap_or(config.coverage_radius_m),
        bounds: config.signal_bounds,
    }
}

/// Ingest `data_dir` and run the full analysis over it.
pub(crate) fn run_pipeline(
    config: &AppConfig,
    data_dir: &Path,
    radius_override: Option<f64>,
) -> anyhow::Result<PipelineRun> {
    let catalog = load_catalog(config)?;
    let dataset = ingest_dir(data_dir)
        .with_context(|| format!("ingesting logs from {}", data_dir.display()))?;
    let report = analyze(&dataset, &analysis_config(config, radius_override), &catalog);

    Ok(PipelineRun {
        dataset,
        catalog,
        report,
    })
}

/// Run the pipeline and print a summary (or the full report as JSON).
pub(crate) fn run_analyze(
    config: &AppConfig,
    data_dir: Option<PathBuf>,
    radius_override: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
    let run = run_pipeline(config, &data_dir, radius_override)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&run.report)?);
        return Ok(());
    }

    let report = &run.report;
    println!("{:<34}VALUE", "METRIC");
    let rows = [
        ("files read", report.ingest.files_read.to_string()),
        ("files skipped", report.ingest.files_failed.to_string()),
        ("malformed rows", report.ingest.malformed_rows.to_string()),
        ("location points", report.coverage.total_points.to_string()),
        ("covered", report.coverage.covered.to_string()),
        ("confirmed no signal", report.coverage.no_signal.to_string()),
        ("coverage gap", format!("{:.2}%", report.coverage.gap_percent)),
        ("valid samples", report.samples.valid.to_string()),
        ("out-of-range samples", report.samples.invalid().to_string()),
        ("total duration", format_duration(report.total_duration_secs)),
        (
            "total distance",
            format!("{:.2} km", report.total_distance_m / 1000.0),
        ),
    ];
    for (label, value) in rows {
        println!("{label:<34}{value}");
    }

    match &report.statistics {
        Some(stats) => println!(
            "\nsignal dBm: mean {:.2}, median {:.2}, min {:.2}, max {:.2} ({} samples)",
            stats.mean, stats.median, stats.min, stats.max, stats.count
        ),
        None => println!("\nno valid signal samples"),
    }

    Ok(())
}

/// Print the band distribution table.
pub(crate) fn run_bands(config: &AppConfig, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
    let run = run_pipeline(config, &data_dir, None)?;

    if run.report.bands.is_empty() {
        println!(
            "no valid signal samples found in {}",
            data_dir.display()
        );
        return Ok(());
    }

    println!("| Band | Frequency | Share | Samples | Role |");
    println!("|------|-----------|-------|---------|------|");
    for band in &run.report.bands {
        println!(
            "| {} | {} | {:.2}% | {} | {} |",
            band.band,
            escape_table_cell(&band.frequency_label),
            band.share_percent,
            band.sample_count,
            escape_table_cell(&band.role_label)
        );
    }

    Ok(())
}
