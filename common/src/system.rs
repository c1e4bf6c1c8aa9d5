use pnet::datalink::NetworkInterface;

use crate::error::Result;

/// Source of the host's network interfaces.
///
/// Implementations return a snapshot; the scanner never mutates it.
pub trait InterfaceSource: Send + Sync {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>>;
}
