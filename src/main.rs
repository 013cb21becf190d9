// Profile harvest CLI
//
// Drives a full harvest run against a listing address and writes the
// resulting CSV next to the working directory.

use anyhow::{Context, Result, bail};
use log::info;
use std::sync::Arc;

use profile_harvest::{
    HarvestConfig, HarvestEvent, HarvestEventBus, HarvestPhase, LogProgress, export_filename,
};

struct CliArgs {
    start_url: String,
    headed: bool,
    output: Option<String>,
}

fn parse_args() -> Result<CliArgs> {
    let mut start_url = None;
    let mut headed = false;
    let mut output = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--headed" => headed = true,
            "--output" | "-o" => {
                output = Some(
                    args.next()
                        .context("--output requires a file path argument")?,
                );
            }
            "--help" | "-h" => {
                println!("Usage: profile-harvest [--headed] [--output FILE] START_URL");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("Unknown flag: {other}"),
            other => {
                if start_url.replace(other.to_string()).is_some() {
                    bail!("Multiple start URLs given");
                }
            }
        }
    }

    Ok(CliArgs {
        start_url: start_url.context("Missing START_URL argument (see --help)")?,
        headed,
        output,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;

    let bus = Arc::new(HarvestEventBus::new(256));
    let mut events = bus.subscribe();
    let event_logger = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                HarvestEvent::SingleFieldScraped { key, value, .. } => {
                    info!("Contact field: {key} = {value}");
                }
                HarvestEvent::ProfileScraped { summary, .. } => {
                    info!("Profile scraped: {}", summary.full_name);
                }
                HarvestEvent::AllProfilesScraped { profiles, .. } => {
                    info!("Run published {} profiles", profiles.len());
                }
                HarvestEvent::Shutdown { reason, .. } => {
                    info!("Event bus shut down: {reason:?}");
                    break;
                }
            }
        }
    });

    let config = HarvestConfig::builder()
        .start_url(&args.start_url)
        .headless(!args.headed)
        .build()?
        .with_event_bus(Arc::clone(&bus));

    let session = profile_harvest::run_harvest(config, &LogProgress).await?;

    if session.phase() == HarvestPhase::Errored {
        log::warn!("Run stopped on an error; exporting partial results");
    }

    match session.export() {
        Ok(csv) => {
            let path = args.output.unwrap_or_else(export_filename);
            std::fs::write(&path, csv)
                .with_context(|| format!("Failed to write CSV to {path}"))?;
            info!(
                "Wrote {} records ({} VIP) to {path}",
                session.total_scraped(),
                session.vip_scraped()
            );
        }
        Err(e) => log::warn!("Nothing exported: {e}"),
    }

    let _ = event_logger.await;
    Ok(())
}
