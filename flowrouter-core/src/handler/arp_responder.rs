use crate::connection::{PacketOut, SwitchConnection};
use crate::error::RouterError;
use crate::router::Router;
use flowrouter_packets::{ArpFrame, ArpOp, MacAddr, IPV4_ETHER_TYPE};
use tracing::debug;

impl<C: SwitchConnection> Router<C> {
    /// Answer ARP requests on behalf of the router and learn from replies.
    ///
    /// A request is answered with the router's own MAC, straight back out of the port it came in
    /// on. Unless proxy ARP is turned off this happens whatever address was asked for, so hosts
    /// hand every off-link packet to the router. Replies only teach the address table which port
    /// their sender sits behind.
    pub fn handle_arp(
        &mut self,
        arp: &ArpFrame,
        in_port: u16,
        src_mac: MacAddr,
        dst_mac: MacAddr,
    ) -> Result<(), RouterError> {
        match arp.op() {
            Ok(ArpOp::Request) => self.answer_arp_request(arp, in_port, src_mac, dst_mac),
            Ok(ArpOp::Reply) => {
                let previous = self.address_table.learn(src_mac, in_port);
                debug!(in_port, mac = %src_mac, ?previous, "ARP reply received");
                Ok(())
            }
            Err(opcode) => {
                debug!(in_port, opcode, "Ignoring ARP with unknown opcode");
                Ok(())
            }
        }
    }

    fn answer_arp_request(
        &mut self,
        request: &ArpFrame,
        in_port: u16,
        src_mac: MacAddr,
        dst_mac: MacAddr,
    ) -> Result<(), RouterError> {
        let (sender_mac, sender_ip, target_ip) = match (
            request.sender_mac_addr(),
            request.sender_ipv4_addr(),
            request.target_ipv4_addr(),
        ) {
            (Some(mac), Some(sender), Some(target))
                if request.protocol_type() == IPV4_ETHER_TYPE =>
            {
                (mac, sender, target)
            }
            _ => {
                debug!(in_port, "Ignoring ARP request that is not Ethernet/IPv4");
                return Ok(());
            }
        };

        if !self.config.proxy_arp && !self.is_router_interface(target_ip) {
            debug!(in_port, %target_ip, "Not answering ARP for a foreign address");
            return Ok(());
        }

        let mut reply = ArpFrame::ethernet_ipv4(ArpOp::Reply);
        reply.set_hardware_type(request.hardware_type());
        reply.set_sender_hardware_addr(self.config.router_mac);
        reply.set_sender_protocol_addr(target_ip);
        reply.set_target_hardware_addr(sender_mac);
        reply.set_target_protocol_addr(sender_ip);
        // Link addresses are the request's, swapped. A broadcast request therefore gets a reply
        // sourced from the broadcast address.
        reply.ethernet_mut().set_dest_mac(src_mac);
        reply.ethernet_mut().set_src_mac(dst_mac);

        self.connection.send_packet_out(PacketOut {
            data: reply.frame().into_bytes(),
            out_port: in_port,
        })?;
        debug!(in_port, %target_ip, asked_by = %sender_ip, "ARP reply sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RouterConfig;
    use crate::error::{ConnectionError, RouterError};
    use crate::router::Router;
    use crate::utils::test::packet_generators::*;
    use crate::utils::test::recording_connection::RecordingConnection;
    use flowrouter_packets::{ArpFrame, ArpOp, EthernetFrame, MacAddr};
    use std::convert::TryFrom;
    use std::net::Ipv4Addr;

    const GATEWAY_1: Ipv4Addr = Ipv4Addr::new(10, 0, 1, 1);

    fn router(config: RouterConfig) -> Router<RecordingConnection> {
        Router::new(RecordingConnection::new(), config)
    }

    fn arp(data: Vec<u8>) -> ArpFrame {
        ArpFrame::try_from(EthernetFrame::from_buffer(data).unwrap()).unwrap()
    }

    fn handle(router: &mut Router<RecordingConnection>, data: Vec<u8>, in_port: u16) {
        let frame = arp(data);
        let (src, dst) = (frame.ethernet().src_mac(), frame.ethernet().dest_mac());
        router.handle_arp(&frame, in_port, src, dst).unwrap();
    }

    #[test]
    fn request_for_gateway_is_answered() {
        let mut router = router(RouterConfig::single_switch());
        handle(&mut router, arp_request(H1_MAC, H1_IP, GATEWAY_1), 1);

        let outs = router.connection().packet_outs();
        assert_eq!(outs.len(), 1);
        assert_eq!(outs[0].out_port, 1);

        let reply = arp(outs[0].data.clone());
        assert_eq!(reply.op(), Ok(ArpOp::Reply));
        assert_eq!(reply.hardware_type(), 1);
        assert_eq!(reply.sender_mac_addr(), Some(router.config().router_mac));
        assert_eq!(reply.sender_ipv4_addr(), Some(GATEWAY_1));
        assert_eq!(reply.target_mac_addr(), Some(H1_MAC));
        assert_eq!(reply.target_ipv4_addr(), Some(H1_IP));
        assert_eq!(reply.ethernet().dest_mac(), H1_MAC);
        assert_eq!(reply.ethernet().src_mac(), MacAddr::BROADCAST);
    }

    #[test]
    fn proxy_arp_answers_any_address() {
        let mut router = router(RouterConfig::single_switch());
        let stranger = Ipv4Addr::new(172, 16, 0, 9);
        handle(&mut router, arp_request(H2_MAC, H2_IP, stranger), 2);

        let outs = router.connection().packet_outs();
        assert_eq!(outs.len(), 1);
        let reply = arp(outs[0].data.clone());
        assert_eq!(reply.sender_ipv4_addr(), Some(stranger));
        assert_eq!(reply.sender_mac_addr(), Some(router.config().router_mac));
    }

    #[test]
    fn without_proxy_arp_only_interfaces_are_answered() {
        let mut router = router(RouterConfig::single_switch().proxy_arp(false));
        handle(
            &mut router,
            arp_request(H2_MAC, H2_IP, Ipv4Addr::new(172, 16, 0, 9)),
            2,
        );
        assert!(router.connection().commands.is_empty());

        handle(&mut router, arp_request(H2_MAC, H2_IP, Ipv4Addr::new(10, 0, 2, 1)), 2);
        assert_eq!(router.connection().packet_outs().len(), 1);
    }

    #[test]
    fn reply_is_learned_not_answered() {
        let mut router = router(RouterConfig::single_switch());
        handle(&mut router, arp_reply(H2_MAC, H2_IP, SWITCH_MAC, GATEWAY_1), 2);

        assert!(router.connection().commands.is_empty());
        assert_eq!(router.address_table().get(&H2_MAC), Some(2));

        handle(&mut router, arp_reply(H2_MAC, H2_IP, SWITCH_MAC, GATEWAY_1), 3);
        assert_eq!(router.address_table().get(&H2_MAC), Some(3));
        assert_eq!(router.address_table().len(), 1);
    }

    #[test]
    fn unknown_opcode_is_ignored() {
        let mut router = router(RouterConfig::single_switch());
        let mut frame = arp(arp_request(H1_MAC, H1_IP, GATEWAY_1));
        frame.set_opcode(3);
        let (src, dst) = (frame.ethernet().src_mac(), frame.ethernet().dest_mac());

        router.handle_arp(&frame, 1, src, dst).unwrap();
        assert!(router.connection().commands.is_empty());
        assert!(router.address_table().is_empty());
    }

    #[test]
    fn non_ethernet_request_is_ignored() {
        let mut router = router(RouterConfig::single_switch());
        let mut request = ArpFrame::new(8, 4);
        request.set_opcode(ArpOp::Request as u16);

        router
            .handle_arp(&request, 1, H1_MAC, MacAddr::BROADCAST)
            .unwrap();
        assert!(router.connection().commands.is_empty());
    }

    #[test]
    fn failed_reply_is_reported() {
        let mut router = Router::new(
            RecordingConnection::failing(ConnectionError::Closed),
            RouterConfig::single_switch(),
        );
        let frame = arp(arp_request(H1_MAC, H1_IP, GATEWAY_1));
        assert_eq!(
            router.handle_arp(&frame, 1, H1_MAC, MacAddr::BROADCAST),
            Err(RouterError::Connection(ConnectionError::Closed))
        );
    }
}
