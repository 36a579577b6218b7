use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use speedcore::analysis::ScoringMethod;
use workflow::config::AnalyzerConfig;
use workflow::runner::Runner;

mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Speed skydiving track analyzer")]
struct Args {
    /// A FlySight track file or a directory tree of them
    path: PathBuf,
    /// Drop-zone elevation MSL in meters
    #[arg(long, default_value_t = 0.0, conflicts_with = "dz_ft")]
    dz_meters: f64,
    /// Drop-zone elevation MSL in feet
    #[arg(long, default_value_t = 0.0)]
    dz_ft: f64,
    /// Load rule constants and elevation from YAML
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Scoring formula
    #[arg(long, value_enum, default_value_t = MethodArg::Isc)]
    method: MethodArg,
    /// Write the aggregate table as CSV
    #[arg(long)]
    report_csv: Option<PathBuf>,
    /// Write the full run report as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    /// Maximum trailing mean of vertical speed
    MeanVelocity,
    /// ISC altitude-drop formula
    Isc,
}

impl From<MethodArg> for ScoringMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::MeanVelocity => ScoringMethod::MeanVelocity,
            MethodArg::Isc => ScoringMethod::IscAltitudeDrop,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.rules {
        AnalyzerConfig::load(path)?
    } else {
        AnalyzerConfig::default()
    };
    config.apply_cli(args.dz_meters, args.dz_ft);

    let runner = Runner::new(config);
    let outcome = runner.execute(&args.path, args.method.into())?;
    report::print_summary(&outcome);

    if let Some(path) = &args.report_csv {
        match &outcome.aggregate {
            Some(aggregate) => report::write_csv(aggregate, path)?,
            None => log::warn!("nothing to aggregate; skipping {}", path.display()),
        }
    }
    if let Some(path) = &args.json {
        report::write_json(&outcome, path)?;
    }

    Ok(())
}
