//! Canned packet-in events for the built-in topologies. Hosts are 10.0.N.100 with MAC
//! 00:00:00:00:00:0N and reach the router through gateway 10.0.N.1.
use flowrouter_core::config::{S1_DPID, S2_DPID, TRUNK_PORT};
use flowrouter_core::{Dpid, PacketIn, Topology};
use flowrouter_packets::{
    ArpFrame, ArpOp, EthernetFrame, IcmpPacket, IpProtocol, Ipv4Packet, MacAddr,
};
use std::net::Ipv4Addr;

pub struct Step {
    pub dpid: Dpid,
    pub description: &'static str,
    pub packet_in: PacketIn,
}

/// What hosts believe the gateway's link address is before they have asked
const GATEWAY_MAC: MacAddr = MacAddr {
    bytes: [0x40, 0x10, 0x40, 0x10, 0x40, 0x10],
};

fn host_ip(n: u8) -> Ipv4Addr {
    Ipv4Addr::new(10, 0, n, 100)
}

fn host_mac(n: u8) -> MacAddr {
    MacAddr::new([0, 0, 0, 0, 0, n])
}

fn step(dpid: Dpid, in_port: u16, description: &'static str, data: Vec<u8>) -> Step {
    Step {
        dpid,
        description,
        packet_in: PacketIn {
            in_port,
            buffer_id: None,
            data,
        },
    }
}

fn arp_for_gateway(host: u8) -> Vec<u8> {
    let mut arp = ArpFrame::ethernet_ipv4(ArpOp::Request);
    arp.set_sender_hardware_addr(host_mac(host));
    arp.set_sender_protocol_addr(host_ip(host));
    arp.set_target_protocol_addr(Ipv4Addr::new(10, 0, host, 1));
    arp.ethernet_mut().set_src_mac(host_mac(host));
    arp.ethernet_mut().set_dest_mac(MacAddr::BROADCAST);
    arp.frame().into_bytes()
}

fn frame(src: MacAddr, dest: MacAddr, packet: Ipv4Packet) -> Vec<u8> {
    let mut frame = EthernetFrame::encap_ipv4(packet);
    frame.set_src_mac(src);
    frame.set_dest_mac(dest);
    frame.into_bytes()
}

fn ping(host: u8, dest: Ipv4Addr, sequence: u16) -> Vec<u8> {
    let identifier = 0x0100 + u16::from(host);
    let echo = IcmpPacket::echo_request(host_ip(host), dest, identifier, sequence, b"flowrouter");
    frame(host_mac(host), GATEWAY_MAC, echo.packet())
}

/// Bytes after the IP header are opaque to the router, so they need not be a valid UDP header
fn datagram(src_mac: MacAddr, src: Ipv4Addr, dest: Ipv4Addr) -> Vec<u8> {
    let packet = Ipv4Packet::with_payload(src, dest, IpProtocol::UDP, &[0; 16]);
    frame(src_mac, GATEWAY_MAC, packet)
}

pub fn steps(topology: Topology) -> Vec<Step> {
    match topology {
        Topology::SingleSwitch => vec![
            step(S1_DPID, 1, "h1 resolves its gateway", arp_for_gateway(1)),
            step(S1_DPID, 1, "h1 pings h2", ping(1, host_ip(2), 1)),
            step(
                S1_DPID,
                2,
                "h2 pings an address nobody routes",
                ping(2, Ipv4Addr::new(10, 0, 9, 50), 1),
            ),
            step(
                S1_DPID,
                1,
                "h1 sends a datagram to h3",
                datagram(host_mac(1), host_ip(1), host_ip(3)),
            ),
            step(
                S1_DPID,
                3,
                "h3 sends a datagram off the network",
                datagram(host_mac(3), host_ip(3), Ipv4Addr::new(192, 168, 1, 1)),
            ),
            step(S1_DPID, 2, "a runt frame arrives", vec![0; 10]),
        ],
        Topology::DualSwitch => vec![
            step(S1_DPID, 1, "h1 resolves its gateway", arp_for_gateway(1)),
            step(S2_DPID, 2, "h4 resolves its gateway", arp_for_gateway(4)),
            step(S1_DPID, 1, "h1 pings h4 across the trunk", ping(1, host_ip(4), 1)),
            step(
                S1_DPID,
                2,
                "h2 sends a datagram to h3 through s1",
                datagram(host_mac(2), host_ip(2), host_ip(3)),
            ),
            step(
                S2_DPID,
                TRUNK_PORT,
                "the datagram reaches s2 over the trunk",
                datagram(GATEWAY_MAC, host_ip(2), host_ip(3)),
            ),
        ],
    }
}
