//! Target enumeration for a single interface.
//!
//! The probed range starts at the network address and advances once per
//! increment of the mask until the mask saturates, so a `/24` yields
//! `.0` through `.254` and a `/32` yields nothing.

use std::fmt;
use std::iter::FusedIterator;
use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;

use crate::error::{Result, ScanError};
use crate::network::interface::NetworkInterfaceExtension;

/// Why an address/mask pair cannot be enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnetRejection {
    NoIpv4Address,
    Loopback(Ipv4Addr),
    /// The two leading mask bytes are not both `0xff`.
    TooLarge(Ipv4Addr),
}

impl fmt::Display for SubnetRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubnetRejection::NoIpv4Address => write!(f, "no usable IPv4 network found"),
            SubnetRejection::Loopback(addr) => write!(f, "skipping loopback address {addr}"),
            SubnetRejection::TooLarge(mask) => {
                write!(f, "mask {mask} means network is too large")
            }
        }
    }
}

/// One address to probe, paired with the broadcast boundary of its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTarget {
    pub addr: Ipv4Addr,
    pub broadcast: Ipv4Addr,
}

/// An admissible interface address and its mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanNetwork {
    addr: Ipv4Addr,
    mask: Ipv4Addr,
}

impl ScanNetwork {
    pub fn new(addr: Ipv4Addr, mask: Ipv4Addr) -> std::result::Result<Self, SubnetRejection> {
        if addr.octets()[0] == 127 {
            return Err(SubnetRejection::Loopback(addr));
        }
        let [m0, m1, _, _] = mask.octets();
        if m0 != 0xff || m1 != 0xff {
            return Err(SubnetRejection::TooLarge(mask));
        }
        Ok(Self { addr, mask })
    }

    /// Address bound to the interface, used as the probe's sender address.
    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn mask(&self) -> Ipv4Addr {
        self.mask
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & u32::from(self.mask))
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network()) | !u32::from(self.mask))
    }

    /// Lazily yields every target. Calling it again restarts from the network address.
    pub fn targets(&self) -> Targets {
        Targets {
            next: u32::from(self.network()),
            remaining: !u32::from(self.mask),
            broadcast: self.broadcast(),
        }
    }
}

impl fmt::Display for ScanNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

/// Iterator returned by [`ScanNetwork::targets`].
#[derive(Debug, Clone)]
pub struct Targets {
    next: u32,
    remaining: u32,
    broadcast: Ipv4Addr,
}

impl Iterator for Targets {
    type Item = ScanTarget;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let addr = Ipv4Addr::from(self.next);
        self.next = self.next.wrapping_add(1);
        self.remaining -= 1;
        Some(ScanTarget {
            addr,
            broadcast: self.broadcast,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Targets {}

impl FusedIterator for Targets {}

/// Picks the first IPv4 network bound to `intf` that can be enumerated.
///
/// When none qualifies, the reason reported is the one of the first IPv4
/// candidate.
pub fn select_network(intf: &NetworkInterface) -> Result<ScanNetwork> {
    let mut first_rejection: Option<SubnetRejection> = None;

    for net in intf.get_ipv4_nets() {
        match ScanNetwork::new(net.ip(), net.mask()) {
            Ok(network) => return Ok(network),
            Err(reason) => {
                first_rejection.get_or_insert(reason);
            }
        }
    }

    Err(ScanError::InvalidSubnet {
        interface: intf.name.clone(),
        reason: first_rejection.unwrap_or(SubnetRejection::NoIpv4Address),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
