use arpsweep_common::error::{Result, ScanError};
use arpsweep_common::system::InterfaceSource;
use pnet::datalink::{self, NetworkInterface};

/// Enumerates the interfaces the operating system reports.
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>> {
        let interfaces = datalink::interfaces();
        if interfaces.is_empty() {
            return Err(ScanError::NoInterfaces(
                "the operating system reported no interfaces".to_string(),
            ));
        }
        Ok(interfaces)
    }
}
