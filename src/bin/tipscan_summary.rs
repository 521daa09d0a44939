//! tipscan-summary - print the current day's public summary as JSON.
//!
//! Usage: `tipscan-summary [config.yaml]`
//!
//! Reads the configured ledger and writes the public summary, per-worker
//! shares and goal progress to stdout.

use serde::Serialize;
use tracing::info;

use tipscan::config::Config;
use tipscan::utils::bootstrap::init_tracing;
use tipscan::{GoalProgress, PublicSummary, TeamShare, TipScan};

#[derive(Serialize)]
struct Report {
    summary: PublicSummary,
    team: Vec<TeamShare>,
    goal: GoalProgress,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref())?;
    let tipscan = TipScan::from_config(&config).await?;
    let aggregator = tipscan.aggregator();

    let report = Report {
        summary: aggregator.public_summary().await?,
        team: aggregator.team_shares().await?,
        goal: aggregator.goal_progress(config.daily_goal).await?,
    };

    info!(
        tips = report.summary.tip_count,
        total = report.summary.grand_total,
        "Summary computed"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
