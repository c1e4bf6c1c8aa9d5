mod commands;
mod terminal;

use commands::{CommandLine, scan};
use terminal::{logging, print};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = commands.to_config();

    logging::init(cfg.verbose);
    if !is_root::is_root() {
        warn!("not running as root, opening capture sessions will likely fail");
    }

    let devices = scan::scan(&cfg).await?;
    print::devices(&devices)?;
    Ok(())
}
