//! Command line arguments

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use wfm_services::ScraperConfig;

/// Price vendor items on warframe.market and rank them by standing per platinum
#[derive(Parser, Debug)]
#[command(name = "wfm-standing", version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Only price this vendor (repeatable); all vendors when omitted
    #[arg(long = "vendor", value_name = "NAME")]
    pub vendors: Vec<String>,

    /// Directory of vendor catalogs instead of the bundled ones
    #[arg(long, value_name = "DIR")]
    pub vendor_dir: Option<PathBuf>,

    /// Milliseconds between market requests
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub rate_limit_ms: Option<u64>,
}

impl Cli {
    /// Apply flag overrides on top of the environment configuration
    pub fn apply(&self, config: &mut ScraperConfig) {
        if let Some(dir) = &self.vendor_dir {
            config.vendor_dir = Some(dir.clone());
        }
        if let Some(ms) = self.rate_limit_ms {
            config.rate_limit = Duration::from_millis(ms);
        }
    }

    /// Default log filter when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "info,wfm_cli=debug,wfm_services=debug,wfm_market=debug"
        } else {
            "info"
        }
    }
}
