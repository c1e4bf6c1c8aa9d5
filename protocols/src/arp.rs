use std::net::Ipv4Addr;

use arpsweep_common::error::ScanError;
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::util::MacAddr;

use crate::{ARP_LEN, ETH_HDR_LEN, MIN_ETH_FRAME_NO_FCS, ethernet};

const HW_ADDR_LEN: u8 = 6;
const PROTO_ADDR_LEN: u8 = 4;

/// Sender fields of an accepted ARP reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    pub sender_ip: Ipv4Addr,
    pub sender_mac: MacAddr,
}

/// Builds a broadcast who-has frame for `dst_addr`, padded to the Ethernet minimum.
pub fn create_request(
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
) -> Result<Vec<u8>, ScanError> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    ethernet::make_header(&mut buffer, src_mac, MacAddr::broadcast(), EtherTypes::Arp)?;
    let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .ok_or(ScanError::MalformedFrame("buffer too small for ARP payload"))?;
    arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_packet.set_protocol_type(EtherTypes::Ipv4);
    arp_packet.set_hw_addr_len(HW_ADDR_LEN);
    arp_packet.set_proto_addr_len(PROTO_ADDR_LEN);
    arp_packet.set_operation(ArpOperations::Request);
    arp_packet.set_sender_hw_addr(src_mac);
    arp_packet.set_target_hw_addr(MacAddr::zero());
    arp_packet.set_sender_proto_addr(src_addr);
    arp_packet.set_target_proto_addr(dst_addr);
    Ok(Vec::from(buffer))
}

/// Returns the sender of `frame` if it is an Ethernet/IPv4 ARP reply that did
/// not originate from `own_mac`.
///
/// Anything else on the wire, truncated frames included, is simply not relevant.
pub fn classify_reply(frame: &[u8], own_mac: MacAddr) -> Option<ArpReply> {
    let eth_frame = EthernetPacket::new(frame)?;
    if eth_frame.get_ethertype() != EtherTypes::Arp {
        return None;
    }

    let arp_packet = ArpPacket::new(eth_frame.payload())?;
    let is_ethernet_ipv4 = arp_packet.get_hardware_type() == ArpHardwareTypes::Ethernet
        && arp_packet.get_protocol_type() == EtherTypes::Ipv4
        && arp_packet.get_hw_addr_len() == HW_ADDR_LEN
        && arp_packet.get_proto_addr_len() == PROTO_ADDR_LEN;
    if !is_ethernet_ipv4 || arp_packet.get_operation() != ArpOperations::Reply {
        return None;
    }

    let sender_mac = arp_packet.get_sender_hw_addr();
    if sender_mac == own_mac {
        return None;
    }

    Some(ArpReply {
        sender_ip: arp_packet.get_sender_proto_addr(),
        sender_mac,
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
