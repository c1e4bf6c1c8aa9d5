use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Config {
    /// Time budget of every interface task, measured from its start.
    pub timeout: Duration,
    /// Raises log verbosity so per-interface failures and replies are reported.
    pub verbose: bool,
    /// OUI database in CSV form. Falls back to the bundled dataset when unset
    /// or missing on disk.
    pub oui_db: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
            oui_db: None,
        }
    }
}
