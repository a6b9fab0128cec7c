use crate::connection::{PacketOut, SwitchConnection};
use crate::error::RouterError;
use crate::router::Router;
use flowrouter_packets::{EthernetFrame, Ipv4Packet, MacAddr};
use tracing::debug;

impl<C: SwitchConnection> Router<C> {
    /// Send a routed IPv4 packet on towards its next hop.
    ///
    /// The packet is re-framed rather than modified in place: the new frame claims to come from
    /// whatever address the sender used for its gateway and is addressed to the route's gateway
    /// MAC. The IP header is left alone, TTL included. Packets with no matching route are dropped
    /// silently.
    pub fn forward_ipv4(
        &mut self,
        packet: &Ipv4Packet,
        src_mac: MacAddr,
        dst_mac: MacAddr,
        in_port: u16,
    ) -> Result<(), RouterError> {
        let dest = packet.dest_addr();
        let (out_port, gateway_mac) = match self.config.routes.lookup(dest) {
            Some(route) => (route.port, route.gateway_mac),
            None => {
                debug!(in_port, %dest, "No route, dropping packet");
                return Ok(());
            }
        };

        let mut frame = EthernetFrame::encap_ipv4(packet.clone());
        frame.set_src_mac(dst_mac);
        frame.set_dest_mac(gateway_mac);
        self.connection.send_packet_out(PacketOut {
            data: frame.into_bytes(),
            out_port,
        })?;

        debug!(
            in_port,
            out_port,
            from = %src_mac,
            next_hop = %gateway_mac,
            %dest,
            "Packet forwarded"
        );
        Ok(())
    }
}
