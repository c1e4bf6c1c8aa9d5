use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use arpsweep_common::config::Config;
use arpsweep_common::network::device::DeviceInfo;
use arpsweep_core::scanner::Scanner;
use arpsweep_core::vendors::OuiDatabase;
use tracing::info;

pub async fn scan(cfg: &Config) -> anyhow::Result<Vec<DeviceInfo>> {
    let vendors = OuiDatabase::load(cfg.oui_db.as_deref()).context("preparing vendor lookup")?;
    let scanner = Scanner::system(Arc::new(vendors));

    let start_time = Instant::now();
    let devices = scanner.scan(cfg.timeout).await?;
    info!(
        "{} hosts answered in {:.2}s",
        devices.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(devices)
}
