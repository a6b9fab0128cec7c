use crate::classifier::Classifier;
use flowrouter_packets::{IpProtocol, Ipv4Packet};

/// Splits IPv4 traffic into the part the router answers itself and the part it forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4Class {
    Icmp,
    Forward,
}

#[derive(Default)]
pub struct ByIpProtocol {}

impl ByIpProtocol {
    pub fn new() -> Self {
        ByIpProtocol {}
    }
}

impl Classifier for ByIpProtocol {
    type Packet = Ipv4Packet;
    type Class = Ipv4Class;

    fn classify(&self, packet: &Self::Packet) -> Self::Class {
        match packet.protocol() {
            IpProtocol::ICMP => Ipv4Class::Icmp,
            _ => Ipv4Class::Forward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn packet(protocol: IpProtocol) -> Ipv4Packet {
        Ipv4Packet::with_payload(
            Ipv4Addr::new(10, 0, 1, 100),
            Ipv4Addr::new(10, 0, 2, 100),
            protocol,
            &[0; 8],
        )
    }

    #[test]
    fn icmp_is_answered_locally() {
        assert_eq!(
            ByIpProtocol::new().classify(&packet(IpProtocol::ICMP)),
            Ipv4Class::Icmp
        );
    }

    #[test]
    fn everything_else_is_forwarded() {
        let classifier = ByIpProtocol::new();
        assert_eq!(classifier.classify(&packet(IpProtocol::TCP)), Ipv4Class::Forward);
        assert_eq!(classifier.classify(&packet(IpProtocol::UDP)), Ipv4Class::Forward);
        assert_eq!(
            classifier.classify(&packet(IpProtocol::Unknown(47))),
            Ipv4Class::Forward
        );
    }
}
