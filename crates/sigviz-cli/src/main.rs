mod analyze;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sigviz-cli")]
#[command(about = "Coverage and band analysis for cellular drive-test logs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingest and analyze the logs, printing a summary
    Analyze {
        /// Directory of `.csv` logs (defaults to `SIGVIZ_DATA_DIR`)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Coverage radius in meters (defaults to `SIGVIZ_COVERAGE_RADIUS_M`)
        #[arg(long, value_parser = parse_radius)]
        radius_m: Option<f64>,
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the band distribution as a markdown table
    Bands {
        /// Directory of `.csv` logs (defaults to `SIGVIZ_DATA_DIR`)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Write the markdown report and both HTML maps
    Report {
        /// Directory of `.csv` logs (defaults to `SIGVIZ_DATA_DIR`)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Output directory (defaults to `SIGVIZ_OUTPUT_DIR`)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Coverage radius in meters (defaults to `SIGVIZ_COVERAGE_RADIUS_M`)
        #[arg(long, value_parser = parse_radius)]
        radius_m: Option<f64>,
    },
}

fn parse_radius(raw: &str) -> Result<f64, String> {
    let radius: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(format!("radius must be a positive number of meters, got {raw}"))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = sigviz_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        env = %config.env,
        data_dir = %config.data_dir.display(),
        "configuration loaded"
    );

    match cli.command {
        Some(Commands::Analyze {
            data_dir,
            radius_m,
            json,
        }) => analyze::run_analyze(&config, data_dir, radius_m, json)?,
        Some(Commands::Bands { data_dir }) => analyze::run_bands(&config, data_dir)?,
        Some(Commands::Report {
            data_dir,
            out_dir,
            radius_m,
        }) => report::run_report(&config, data_dir, out_dir, radius_m)?,
        None => println!("no command given; try `sigviz-cli report` or `sigviz-cli --help`"),
    }

    Ok(())
}
