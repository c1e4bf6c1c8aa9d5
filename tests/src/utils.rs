//! In-memory stand-ins for the host's interfaces, the wire and the OUI database.

use std::collections::{HashMap, HashSet};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::thread;
use std::time::Duration;

use arpsweep_common::error::ScanError;
use arpsweep_common::system::InterfaceSource;
use arpsweep_common::vendors::VendorLookup;
use arpsweep_core::network::channel::{CaptureHandle, CaptureOptions, FrameWriter, Transport};
use arpsweep_protocols::{ARP_LEN, ETH_HDR_LEN};
use pnet::datalink::{MacAddr, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket, MutableEthernetPacket};
use tokio::sync::mpsc::{self, UnboundedSender};

pub fn ni(name: &str, index: u32, mac: Option<MacAddr>, ips: &[IpNetwork], flags: u32) -> NetworkInterface {
    NetworkInterface {
        name: name.into(),
        description: "".into(),
        index,
        mac,
        ips: ips.to_vec(),
        flags,
    }
}

pub fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> IpNetwork {
    IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p).unwrap())
}

pub fn v6(s: &str, p: u8) -> IpNetwork {
    IpNetwork::V6(Ipv6Network::new(s.parse::<Ipv6Addr>().unwrap(), p).unwrap())
}

/// A host on a mocked link that answers ARP requests for `ip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peer {
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
}

impl Peer {
    pub fn new(ip: Ipv4Addr, mac: MacAddr) -> Self {
        Self { ip, mac }
    }
}

pub struct StaticInterfaces(pub Vec<NetworkInterface>);

impl InterfaceSource for StaticInterfaces {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>, ScanError> {
        Ok(self.0.clone())
    }
}

pub struct BrokenInterfaces;

impl InterfaceSource for BrokenInterfaces {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>, ScanError> {
        Err(ScanError::NoInterfaces("netlink socket refused".to_string()))
    }
}

/// Vendor lookup keyed on the first three bytes of the hardware address.
#[derive(Default)]
pub struct StaticVendors(HashMap<[u8; 3], String>);

impl StaticVendors {
    pub fn with(mut self, oui: [u8; 3], organization: &str) -> Self {
        self.0.insert(oui, organization.to_string());
        self
    }
}

impl VendorLookup for StaticVendors {
    fn lookup(&self, mac: MacAddr) -> Option<String> {
        self.0.get(&[mac.0, mac.1, mac.2]).cloned()
    }
}

/// Mocked link layer. Every interface gets its own wire: written frames are
/// echoed back like a promiscuous capture would, and requests for a known peer
/// are answered immediately.
#[derive(Default)]
pub struct MockLan {
    peers: HashMap<String, Vec<Peer>>,
    unavailable: HashSet<String>,
    fail_after: HashMap<String, usize>,
    write_delay: HashMap<String, Duration>,
}

impl MockLan {
    pub fn peer(mut self, interface: &str, peer: Peer) -> Self {
        self.peers.entry(interface.to_string()).or_default().push(peer);
        self
    }

    /// Opening a capture session on `interface` fails.
    pub fn unavailable(mut self, interface: &str) -> Self {
        self.unavailable.insert(interface.to_string());
        self
    }

    /// Writes on `interface` fail once `frames` frames went out.
    pub fn fail_after(mut self, interface: &str, frames: usize) -> Self {
        self.fail_after.insert(interface.to_string(), frames);
        self
    }

    /// Every write on `interface` blocks for `delay` first.
    pub fn slow(mut self, interface: &str, delay: Duration) -> Self {
        self.write_delay.insert(interface.to_string(), delay);
        self
    }
}

impl Transport for MockLan {
    fn open(&self, intf: &NetworkInterface, _opts: &CaptureOptions) -> Result<CaptureHandle, ScanError> {
        if self.unavailable.contains(&intf.name) {
            return Err(ScanError::TransportUnavailable {
                interface: intf.name.clone(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "mock capture refused"),
            });
        }

        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let wire = MockWire {
            frames: frames_tx,
            peers: self.peers.get(&intf.name).cloned().unwrap_or_default(),
            fail_after: self.fail_after.get(&intf.name).copied(),
            delay: self.write_delay.get(&intf.name).copied(),
            written: 0,
        };
        Ok(CaptureHandle::new(Box::new(wire), frames_rx))
    }
}

struct MockWire {
    frames: UnboundedSender<Vec<u8>>,
    peers: Vec<Peer>,
    fail_after: Option<usize>,
    delay: Option<Duration>,
    written: usize,
}

impl FrameWriter for MockWire {
    fn write(&mut self, frame: &[u8]) -> io::Result<()> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if let Some(limit) = self.fail_after
            && self.written >= limit
        {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock link down"));
        }
        self.written += 1;

        let _ = self.frames.send(frame.to_vec());

        let Some(eth) = EthernetPacket::new(frame) else {
            return Ok(());
        };
        let Some(request) = ArpPacket::new(eth.payload()) else {
            return Ok(());
        };
        if request.get_operation() != ArpOperations::Request {
            return Ok(());
        }

        let target = request.get_target_proto_addr();
        for peer in self.peers.iter().filter(|p| p.ip == target) {
            let reply = arp_reply(
                *peer,
                request.get_sender_hw_addr(),
                request.get_sender_proto_addr(),
            );
            let _ = self.frames.send(reply);
        }
        Ok(())
    }
}

/// Builds the is-at answer `peer` sends back to a requester.
pub fn arp_reply(peer: Peer, requester_mac: MacAddr, requester_ip: Ipv4Addr) -> Vec<u8> {
    let mut buffer = vec![0u8; ETH_HDR_LEN + ARP_LEN];

    {
        let mut eth = MutableEthernetPacket::new(&mut buffer).unwrap();
        eth.set_destination(requester_mac);
        eth.set_source(peer.mac);
        eth.set_ethertype(EtherTypes::Arp);
    }

    let mut arp = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..]).unwrap();
    arp.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp.set_protocol_type(EtherTypes::Ipv4);
    arp.set_hw_addr_len(6);
    arp.set_proto_addr_len(4);
    arp.set_operation(ArpOperations::Reply);
    arp.set_sender_hw_addr(peer.mac);
    arp.set_sender_proto_addr(peer.ip);
    arp.set_target_hw_addr(requester_mac);
    arp.set_target_proto_addr(requester_ip);

    buffer
}
