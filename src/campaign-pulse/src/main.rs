//! Campaign Pulse: rule-based campaign and ad performance analysis.
//!
//! Serves the analysis API, or analyzes a JSON export from the command line.

use campaign_api::ApiServer;
use campaign_core::config::AppConfig;
use campaign_core::types::EntityInput;
use campaign_reporting::breakdown::BreakdownRequest;
use campaign_reporting::{analyze_breakdown, build_ads_report, build_portfolio};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "campaign-pulse")]
#[command(about = "Campaign and ad performance scoring and recommendations")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, short, global = true, env = "CAMPAIGN_PULSE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API and metrics exporter
    Serve {
        /// HTTP port (overrides config)
        #[arg(long, env = "CAMPAIGN_PULSE__API__HTTP_PORT")]
        http_port: Option<u16>,

        /// Metrics port (overrides config)
        #[arg(long, env = "CAMPAIGN_PULSE__METRICS__PORT")]
        metrics_port: Option<u16>,
    },
    /// Analyze a JSON file and print the report to stdout
    Analyze {
        /// Input file: an entity array, or a breakdown request for `--kind breakdown`
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = ReportKind::Campaigns)]
        kind: ReportKind,

        /// Recommendation cap (overrides config)
        #[arg(long)]
        top: Option<usize>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportKind {
    Campaigns,
    Ads,
    Breakdown,
}

fn analyze(
    config: &AppConfig,
    input: &Path,
    kind: ReportKind,
    top: Option<usize>,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input)?;

    let output = match kind {
        ReportKind::Campaigns => {
            let entities: Vec<EntityInput> = serde_json::from_str(&raw)?;
            let top_n = top.unwrap_or(config.report.top_recommendations);
            serde_json::to_string_pretty(&build_portfolio(&entities, &config.scoring, top_n)?)?
        }
        ReportKind::Ads => {
            let entities: Vec<EntityInput> = serde_json::from_str(&raw)?;
            serde_json::to_string_pretty(&build_ads_report(&entities, &config.scoring)?)?
        }
        ReportKind::Breakdown => {
            let request: BreakdownRequest = serde_json::from_str(&raw)?;
            serde_json::to_string_pretty(&analyze_breakdown(&request))?
        }
    };

    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `analyze` output stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_pulse=info,campaign_api=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Non-positive thresholds are a deployment error; refuse to start.
    config.scoring.validate()?;

    match cli.command {
        Command::Analyze { input, kind, top } => analyze(&config, &input, kind, top),
        Command::Serve {
            http_port,
            metrics_port,
        } => {
            if let Some(port) = http_port {
                config.api.http_port = port;
            }
            if let Some(port) = metrics_port {
                config.metrics.port = port;
            }

            info!(
                node_id = %config.node_id,
                http_port = config.api.http_port,
                target_cpa = config.scoring.target_cpa,
                target_roas = config.scoring.target_roas,
                "Configuration loaded"
            );

            let api_server = ApiServer::new(config);

            if let Err(e) = api_server.start_metrics() {
                error!(error = %e, "Failed to start metrics exporter");
            }

            info!("Campaign Pulse is ready to serve traffic");
            api_server.start_http().await
        }
    }
}
