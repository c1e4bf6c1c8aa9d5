use pnet::util::MacAddr;

/// Resolves the organization owning a hardware address prefix.
pub trait VendorLookup: Send + Sync {
    fn lookup(&self, mac: MacAddr) -> Option<String>;
}
