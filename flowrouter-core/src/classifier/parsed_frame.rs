use crate::classifier::{ByEtherType, ByIpProtocol, Classifier, EtherType, Ipv4Class};
use flowrouter_packets::{ArpFrame, EthernetFrame, IcmpPacket, Ipv4Packet, MacAddr};
use std::convert::TryFrom;

/// The innermost layer the router understood, tagged by protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramePayload {
    Arp(ArpFrame),
    Icmp(IcmpPacket),
    Ipv4(Ipv4Packet),
    Unsupported(u16),
}

/// A packet-in frame promoted as far as its headers allow. Every layer that is present must
/// parse; a frame that claims to be ARP or IPv4 but is cut short is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub src_mac: MacAddr,
    pub dst_mac: MacAddr,
    pub payload: FramePayload,
}

impl ParsedFrame {
    pub fn parse(data: Vec<u8>) -> Result<ParsedFrame, &'static str> {
        let frame = EthernetFrame::from_buffer(data)?;
        let src_mac = frame.src_mac();
        let dst_mac = frame.dest_mac();

        let payload = match ByEtherType::new().classify(&frame) {
            EtherType::Arp => FramePayload::Arp(ArpFrame::try_from(frame)?),
            EtherType::Ipv4 => {
                let packet = Ipv4Packet::try_from(frame)?;
                match ByIpProtocol::new().classify(&packet) {
                    Ipv4Class::Icmp => FramePayload::Icmp(IcmpPacket::try_from(packet)?),
                    Ipv4Class::Forward => FramePayload::Ipv4(packet),
                }
            }
            EtherType::Unsupported(ether_type) => FramePayload::Unsupported(ether_type),
        };

        Ok(ParsedFrame {
            src_mac,
            dst_mac,
            payload,
        })
    }
}
