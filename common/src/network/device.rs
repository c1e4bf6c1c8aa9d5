use std::fmt;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// A host that answered an ARP probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceInfo {
    pub address: Ipv4Addr,
    pub hardware_address: MacAddr,
    /// Organization owning the hardware address prefix, empty if unknown.
    pub vendor: String,
}

impl DeviceInfo {
    pub fn new(address: Ipv4Addr, hardware_address: MacAddr) -> Self {
        Self {
            address,
            hardware_address,
            vendor: String::new(),
        }
    }

    pub fn with_vendor(mut self, vendor: Option<String>) -> Self {
        self.vendor = vendor.unwrap_or_default();
        self
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.address, self.hardware_address, self.vendor
        )
    }
}
