use std::path::Path;

use arpsweep_common::error::ScanError;
use arpsweep_common::vendors::VendorLookup;
use mac_oui::Oui;
use pnet::util::MacAddr;
use tracing::{debug, warn};

/// Offline **Organizationally unique identifier** database.
///
/// Loaded once at startup and shared read-only by every interface task.
pub struct OuiDatabase {
    db: Oui,
}

impl OuiDatabase {
    /// Loads the CSV database at `path`, or the bundled dataset when `path`
    /// is unset or missing on disk.
    pub fn load(path: Option<&Path>) -> Result<Self, ScanError> {
        let db = match path {
            Some(p) if p.exists() => {
                debug!("loading OUI database from {}", p.display());
                Oui::from_csv_file(p).map_err(|e| ScanError::VendorDatabase(e.to_string()))?
            }
            Some(p) => {
                warn!("{} not found, using bundled OUI database", p.display());
                Self::bundled()?
            }
            None => Self::bundled()?,
        };
        Ok(Self { db })
    }

    fn bundled() -> Result<Oui, ScanError> {
        Oui::default().map_err(|e| ScanError::VendorDatabase(e.to_string()))
    }
}

impl VendorLookup for OuiDatabase {
    fn lookup(&self, mac: MacAddr) -> Option<String> {
        match self.db.lookup_by_mac(&mac.to_string()) {
            Ok(Some(entry)) => Some(entry.company_name.clone()),
            _ => None,
        }
    }
}
