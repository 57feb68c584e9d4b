use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod scenario;

use config::load_settings;
use scenario::{run_scenario, Scenario};

/// Drives dismissable presentations through scripted lifecycles and prints a JSON report.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "presentation_sim.toml")]
    config: PathBuf,
    /// Scenarios to run; all of them when omitted or given `all`.
    #[arg(long, value_enum)]
    scenario: Vec<Scenario>,
    /// Overrides the configured `animated` flag.
    #[arg(long)]
    animated: Option<bool>,
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(animated) = args.animated {
        settings.animated = animated;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let scenarios = Scenario::resolve(&args.scenario);
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let report = run_scenario(scenario, &settings)
            .await
            .with_context(|| format!("scenario {scenario:?} failed"))?;
        info!(?scenario, finish_cause = ?report.finish_cause, "scenario complete");
        reports.push(report);
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    println!("{json}");

    Ok(())
}
