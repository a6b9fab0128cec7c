use crate::classifier::{FramePayload, ParsedFrame};
use crate::config::RouterConfig;
use crate::connection::{PacketIn, SwitchConnection};
use crate::error::RouterError;
use crate::route::RouteTable;
use crate::state::AddressTable;
use flowrouter_packets::IcmpType;
use std::net::Ipv4Addr;
use tracing::{debug, trace, warn};

/// The decision engine bound to one switch connection.
///
/// A router owns everything it mutates, so the event loop that feeds it packet-in events is the
/// only synchronization it needs. Dropping the router drops what it learned about the switch.
pub struct Router<C: SwitchConnection> {
    pub(crate) connection: C,
    pub(crate) config: RouterConfig,
    pub(crate) address_table: AddressTable,
}

impl<C: SwitchConnection> Router<C> {
    pub fn new(connection: C, config: RouterConfig) -> Self {
        Router {
            connection,
            config,
            address_table: AddressTable::new(),
        }
    }

    pub fn address_table(&self) -> &AddressTable {
        &self.address_table
    }

    pub fn routes(&self) -> &RouteTable {
        &self.config.routes
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    pub fn is_router_interface(&self, ip: Ipv4Addr) -> bool {
        self.config.interfaces.contains_key(&ip)
    }

    /// Decide what to do with a frame the switch had no rule for.
    ///
    /// Exactly one handler runs per event. IPv4 traffic, answered or forwarded, is followed by a
    /// rule installation; ARP never is. Frames that fail to parse are logged and dropped without
    /// touching the switch.
    pub fn handle_packet_in(&mut self, packet_in: PacketIn) -> Result<(), RouterError> {
        let PacketIn {
            in_port,
            buffer_id,
            data,
        } = packet_in;

        let frame = match ParsedFrame::parse(data) {
            Ok(frame) => frame,
            Err(reason) => {
                warn!(in_port, reason, "Ignoring incomplete packet");
                return Ok(());
            }
        };

        match frame.payload {
            FramePayload::Arp(arp) => self.handle_arp(&arp, in_port, frame.src_mac, frame.dst_mac),
            FramePayload::Icmp(icmp) => {
                match icmp.icmp_type() {
                    IcmpType::EchoRequest => {
                        self.handle_icmp_echo(&icmp, frame.src_mac, frame.dst_mac, in_port)?
                    }
                    other => debug!(in_port, icmp_type = ?other, "Not answering ICMP message"),
                }
                // The installed rule outputs to the port the packet came in on, not the port a
                // route would pick
                self.install_timed_rule(in_port, in_port, buffer_id)
            }
            FramePayload::Ipv4(packet) => {
                self.forward_ipv4(&packet, frame.src_mac, frame.dst_mac, in_port)?;
                self.install_timed_rule(in_port, in_port, buffer_id)
            }
            FramePayload::Unsupported(ether_type) => {
                trace!(in_port, ether_type, "Ignoring unsupported ether type");
                Ok(())
            }
        }
    }
}
