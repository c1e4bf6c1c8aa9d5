pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use arpsweep_common::config::{Config, DEFAULT_TIMEOUT};
use clap::Parser;

#[derive(Parser)]
#[command(name = "arpsweep")]
#[command(about = "Finds the hosts on every locally attached IPv4 subnet using ARP.")]
pub struct CommandLine {
    /// Seconds each interface keeps listening for replies
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Log per-interface failures and every reply
    #[arg(short, long)]
    pub verbose: bool,

    /// OUI database in CSV form; the bundled one is used when missing
    #[arg(long, value_name = "PATH")]
    pub oui_db: Option<PathBuf>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            timeout: Duration::from_secs(self.timeout),
            verbose: self.verbose,
            oui_db: self.oui_db.clone(),
        }
    }
}
