//! qold: command-line entry point for the QoL index service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use qol_scoring::{LocationSource, ScoreReport, StaticLocations};
use qol_service::{init_logging, AuditSubmission, QolService, ServiceConfig};
use qol_store_memory::MemoryStore;
use qol_transfer::SimulatedTransfer;
use qol_types::{Clock, SystemClock, WalletAddress};

#[derive(Parser)]
#[command(name = "qold", about = "Quality-of-Life index service")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "QOL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "QOL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "QOL_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print each location's overall score and category breakdown.
    Scores {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Submit one audit, verify it N times, and print the resulting balances.
    Simulate {
        /// Number of distinct verifiers.
        #[arg(long, default_value_t = 3)]
        verifiers: u32,

        /// Rating given by the submitter (1-5).
        #[arg(long, default_value_t = 4)]
        rating: u8,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    config.validate()?;
    Ok(config)
}

fn print_scores(locations: &StaticLocations, json: bool) -> anyhow::Result<()> {
    let reports: Vec<ScoreReport> = locations
        .locations()
        .iter()
        .map(ScoreReport::for_location)
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for report in reports {
        println!("{}", headline(&report));
        for c in &report.categories {
            let score = c
                .score
                .map_or_else(|| "-".to_string(), |s| s.to_string());
            println!(
                "  {:<28} {:>3}%  score {:>3}  ({} metrics)",
                c.name,
                (c.weight * 100.0).round(),
                score,
                c.metric_count
            );
        }
    }
    Ok(())
}

fn headline(report: &ScoreReport) -> String {
    format!(
        "{} ({}): {} / 100 [{}]",
        report.location_name, report.location_id, report.overall, report.band
    )
}

async fn simulate(config: &ServiceConfig, verifiers: u32, rating: u8) -> anyhow::Result<()> {
    let locations = StaticLocations::mohali();
    let Some(location) = locations.locations().into_iter().next() else {
        bail!("no locations available to audit");
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = QolService::new(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(SimulatedTransfer::new(clock.clone())),
        locations,
        clock,
    );

    let submitter = WalletAddress::parse("simulated-submitter")?;
    let submission = AuditSubmission::new(
        location.id.clone(),
        "mobility-infrastructure",
        "road-conditions",
        rating,
        "simulated-photo.jpg",
    );
    let audit = service.submit_audit(&submitter, submission).await?.audit;
    tracing::info!(audit = %audit.id, "simulated audit submitted");

    for i in 1..=verifiers {
        let verifier = WalletAddress::parse(format!("simulated-verifier-{i}"))?;
        match service
            .verify_audit(&verifier, &audit.id, location.coordinates)
            .await
        {
            Ok(receipt) => tracing::info!(
                verifier = %verifier,
                number = receipt.outcome.verification_number,
                amount = %receipt.award.reward.amount,
                "verification accepted"
            ),
            Err(e) => tracing::warn!(verifier = %verifier, "verification rejected: {e}"),
        }
    }

    let audit = service.audit(&audit.id)?;
    println!(
        "audit {}: {} verification(s), verified: {}",
        audit.id, audit.verification_count, audit.is_verified
    );
    println!("{}", serde_json::to_string_pretty(&service.leaderboard(None)?)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format()?, &config.log_level)?;

    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    match cli.command {
        Command::Scores { json } => print_scores(&StaticLocations::mohali(), json)?,
        Command::Simulate { verifiers, rating } => simulate(&config, verifiers, rating).await?,
        Command::Config => print!("{}", config.to_toml_string()?),
    }

    Ok(())
}
