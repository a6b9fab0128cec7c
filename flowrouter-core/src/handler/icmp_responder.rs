use crate::connection::{PacketOut, SwitchConnection};
use crate::error::RouterError;
use crate::router::Router;
use flowrouter_packets::{EthernetFrame, IcmpPacket, MacAddr, UnreachableCode};
use tracing::debug;

impl<C: SwitchConnection> Router<C> {
    /// Answer an echo request as if the router were its destination.
    ///
    /// When a route covers the destination the sender gets an echo reply with the request's
    /// identifier, the sequence number plus one and no echo data. Otherwise it gets a network
    /// unreachable message quoting the whole request. Either way the reply leaves through the
    /// port the request arrived on, with the link addresses swapped.
    pub fn handle_icmp_echo(
        &mut self,
        request: &IcmpPacket,
        src_mac: MacAddr,
        dst_mac: MacAddr,
        in_port: u16,
    ) -> Result<(), RouterError> {
        let ip = request.ipv4();
        let (src, dest) = (ip.src_addr(), ip.dest_addr());

        let reply = match self.config.routes.lookup(dest) {
            Some(route) => {
                debug!(in_port, %src, %dest, network = %route.network, "ICMP echo reply sent");
                IcmpPacket::echo_reply(
                    dest,
                    src,
                    request.identifier(),
                    request.sequence().wrapping_add(1),
                    &[],
                )
            }
            None => {
                debug!(in_port, %src, %dest, "ICMP destination unreachable sent");
                IcmpPacket::dest_unreachable(dest, src, UnreachableCode::Network, ip)
            }
        };

        let mut frame = EthernetFrame::encap_ipv4(reply.packet());
        frame.set_src_mac(dst_mac);
        frame.set_dest_mac(src_mac);
        self.connection.send_packet_out(PacketOut {
            data: frame.into_bytes(),
            out_port: in_port,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RouterConfig;
    use crate::router::Router;
    use crate::utils::test::packet_generators::*;
    use crate::utils::test::recording_connection::RecordingConnection;
    use flowrouter_packets::{
        EthernetFrame, IcmpPacket, IcmpType, Ipv4Packet, DEFAULT_TTL, MAX_ICMP_BODY_LEN,
        MAX_IPV4_PACKET_LEN,
    };
    use std::convert::TryFrom;
    use std::net::Ipv4Addr;

    fn request(data: Vec<u8>) -> IcmpPacket {
        let packet = Ipv4Packet::try_from(EthernetFrame::from_buffer(data).unwrap()).unwrap();
        IcmpPacket::try_from(packet).unwrap()
    }

    fn sent_reply(router: &Router<RecordingConnection>) -> (EthernetFrame, IcmpPacket, u16) {
        let outs = router.connection().packet_outs();
        assert_eq!(outs.len(), 1);
        let frame = EthernetFrame::from_buffer(outs[0].data.clone()).unwrap();
        let icmp = request(outs[0].data.clone());
        (frame, icmp, outs[0].out_port)
    }

    #[test]
    fn routed_destination_gets_echo_reply() {
        let mut router = Router::new(RecordingConnection::new(), RouterConfig::single_switch());
        let echo = request(echo_request(H2_MAC, SWITCH_MAC, H2_IP, H1_IP, 0x77, 9));

        router
            .handle_icmp_echo(&echo, H2_MAC, SWITCH_MAC, 2)
            .unwrap();

        let (frame, reply, out_port) = sent_reply(&router);
        assert_eq!(out_port, 2);
        assert_eq!(frame.dest_mac(), H2_MAC);
        assert_eq!(frame.src_mac(), SWITCH_MAC);

        assert_eq!(reply.icmp_type(), IcmpType::EchoReply);
        assert_eq!(reply.code(), 0);
        assert_eq!(reply.identifier(), 0x77);
        assert_eq!(reply.sequence(), 10);
        assert!(reply.body().is_empty());
        assert!(reply.validate_checksum());

        let ip = reply.ipv4();
        assert_eq!(ip.src_addr(), H1_IP);
        assert_eq!(ip.dest_addr(), H2_IP);
        assert_eq!(ip.ttl(), DEFAULT_TTL);
        assert!(ip.validate_checksum());
    }

    #[test]
    fn sequence_number_wraps() {
        let mut router = Router::new(RecordingConnection::new(), RouterConfig::single_switch());
        let echo = request(echo_request(H1_MAC, SWITCH_MAC, H1_IP, H2_IP, 1, u16::MAX));

        router
            .handle_icmp_echo(&echo, H1_MAC, SWITCH_MAC, 1)
            .unwrap();
        let (_, reply, _) = sent_reply(&router);
        assert_eq!(reply.sequence(), 0);
    }

    #[test]
    fn unrouted_destination_gets_unreachable() {
        let mut router = Router::new(RecordingConnection::new(), RouterConfig::single_switch());
        let lost = Ipv4Addr::new(10, 0, 9, 50);
        let echo = request(echo_request(H2_MAC, SWITCH_MAC, H2_IP, lost, 1, 1));

        router
            .handle_icmp_echo(&echo, H2_MAC, SWITCH_MAC, 2)
            .unwrap();

        let (frame, reply, out_port) = sent_reply(&router);
        assert_eq!(out_port, 2);
        assert_eq!(frame.dest_mac(), H2_MAC);
        assert_eq!(reply.icmp_type(), IcmpType::DestUnreachable);
        assert_eq!(reply.code(), 0);
        assert_eq!(reply.ipv4().src_addr(), lost);
        assert_eq!(reply.ipv4().dest_addr(), H2_IP);
        assert!(reply.validate_checksum());

        assert_eq!(reply.rest_of_header(), [0; 4]);
        assert_eq!(&reply.body()[..], echo.ipv4().bytes());
    }

    #[test]
    fn largest_unrouted_request_still_fits() {
        let mut router = Router::new(RecordingConnection::new(), RouterConfig::single_switch());
        let lost = Ipv4Addr::new(10, 0, 9, 50);
        let data = vec![0xab; MAX_ICMP_BODY_LEN];
        let big = IcmpPacket::echo_request(H2_IP, lost, 1, 1, &data);
        assert_eq!(big.ipv4().total_len(), u16::MAX);
        let echo = request(ethernet(H2_MAC, SWITCH_MAC, big.packet()));

        router
            .handle_icmp_echo(&echo, H2_MAC, SWITCH_MAC, 2)
            .unwrap();

        let (_, reply, out_port) = sent_reply(&router);
        assert_eq!(out_port, 2);
        assert_eq!(reply.icmp_type(), IcmpType::DestUnreachable);
        assert_eq!(reply.ipv4().total_len(), u16::MAX);
        assert_eq!(reply.ipv4().bytes().len(), MAX_IPV4_PACKET_LEN);
        assert_eq!(&reply.body()[..], &echo.ipv4().bytes()[..MAX_ICMP_BODY_LEN]);
        assert!(reply.validate_checksum());
    }

    #[test]
    fn router_mac_is_not_used_for_replies() {
        let config = RouterConfig::single_switch().router_mac(flowrouter_packets::MacAddr::new([
            0x02, 0, 0, 0, 0, 0xaa,
        ]));
        let mut router = Router::new(RecordingConnection::new(), config);
        let echo = request(echo_request(H1_MAC, SWITCH_MAC, H1_IP, H3_IP, 1, 1));

        router
            .handle_icmp_echo(&echo, H1_MAC, SWITCH_MAC, 1)
            .unwrap();
        let (frame, _, _) = sent_reply(&router);
        assert_eq!(frame.src_mac(), SWITCH_MAC);
    }
}
