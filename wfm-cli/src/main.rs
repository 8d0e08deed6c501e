//! warframe.market standing calculator
//!
//! Prices every item the selected vendors sell and prints, per vendor, how
//! much standing each platinum of resale value costs.

mod cli;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wfm_services::{BatchRun, Scraper, ScraperConfig};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())))
        .init();

    let mut config = ScraperConfig::from_env().context("Invalid configuration")?;
    cli.apply(&mut config);
    info!(
        "Using {} with {:?} between requests",
        config.api_base, config.rate_limit
    );

    let mut scraper = Scraper::from_config(&config)?;
    scraper.load_vendors().context("Failed to load vendors")?;

    let vendor_names: Vec<String> = if cli.vendors.is_empty() {
        scraper.vendors().map(|v| v.name.clone()).collect()
    } else {
        cli.vendors.clone()
    };

    for name in &vendor_names {
        if scraper.vendor(name).is_none() {
            bail!("Unknown vendor: {}", name);
        }
    }

    for name in &vendor_names {
        println!("Fetching items for: {}", name);
        let run = scraper.update_vendor_stats(name)?;
        if !drain(run).await {
            warn!("Interrupted, skipping remaining vendors");
            break;
        }
    }

    for name in &vendor_names {
        if let Some(vendor) = scraper.vendor(name) {
            println!("\n{}:", vendor.name);
            println!("{}", vendor);
        }
    }

    Ok(())
}

/// Print outcomes as they arrive; returns false if interrupted by Ctrl-C
async fn drain(mut run: BatchRun) -> bool {
    let total = run.total();
    let mut done = 0usize;
    let mut interrupted = false;
    let mut listening = true;

    loop {
        tokio::select! {
            outcome = run.recv() => {
                let Some(outcome) = outcome else { break };
                done += 1;
                match &outcome.result {
                    Ok(_) => println!("[{}/{}] Fetched {}", done, total, outcome.item_name),
                    Err(e) => println!("[{}/{}] Failed to fetch {}: {}", done, total, outcome.item_name, e),
                }
            }
            signal = tokio::signal::ctrl_c(), if listening => {
                listening = false;
                match signal {
                    Ok(()) => {
                        interrupted = true;
                        run.cancel();
                    }
                    Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
                }
            }
        }
    }

    !interrupted
}
