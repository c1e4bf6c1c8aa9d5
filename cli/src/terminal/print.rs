use std::io::{self, Write};

use arpsweep_common::network::device::DeviceInfo;

/// Writes one tab-separated line per device to stdout.
pub fn devices(devices: &[DeviceInfo]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for device in devices {
        writeln!(out, "{device}")?;
    }
    out.flush()
}
