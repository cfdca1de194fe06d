//! `report` handler: full pipeline plus artifact output.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use sigviz_core::AppConfig;
use sigviz_report::{write_report_set, MapLimits, RenderContext};

use crate::analyze::run_pipeline;

pub(crate) fn run_report(
    config: &AppConfig,
    data_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    radius_override: Option<f64>,
) -> anyhow::Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
    let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());

    let run = run_pipeline(config, &data_dir, radius_override)?;

    let ctx = RenderContext {
        data_dir: &data_dir,
        generated_at: Utc::now(),
        limits: MapLimits {
            max_points: config.max_map_points,
            max_gap_points: config.max_gap_points,
        },
    };
    let written = write_report_set(&out_dir, &run.report, &run.dataset, &run.catalog, &ctx)
        .with_context(|| format!("writing report to {}", out_dir.display()))?;

    for path in &written {
        println!("wrote {}", path.display());
    }
    println!(
        "coverage gap {:.2}% across {} location points",
        run.report.coverage.gap_percent, run.report.coverage.total_points
    );

    Ok(())
}
