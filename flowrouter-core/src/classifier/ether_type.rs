use crate::classifier::Classifier;
use flowrouter_packets::{EthernetFrame, ARP_ETHER_TYPE, IPV4_ETHER_TYPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    Arp,
    Ipv4,
    Unsupported(u16),
}

#[derive(Default)]
pub struct ByEtherType {}

impl ByEtherType {
    pub fn new() -> Self {
        ByEtherType {}
    }
}

impl Classifier for ByEtherType {
    type Packet = EthernetFrame;
    type Class = EtherType;

    fn classify(&self, frame: &Self::Packet) -> Self::Class {
        match frame.ether_type() {
            IPV4_ETHER_TYPE => EtherType::Ipv4,
            ARP_ETHER_TYPE => EtherType::Arp,
            other => EtherType::Unsupported(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_type(ether_type: u16) -> EthernetFrame {
        let mut frame = EthernetFrame::empty();
        frame.set_ether_type(ether_type);
        frame
    }

    #[test]
    fn classifies_known_types() {
        let classifier = ByEtherType::new();
        assert_eq!(classifier.classify(&frame_with_type(0x0800)), EtherType::Ipv4);
        assert_eq!(classifier.classify(&frame_with_type(0x0806)), EtherType::Arp);
    }

    #[test]
    fn ipv6_is_unsupported() {
        let classifier = ByEtherType::new();
        assert_eq!(
            classifier.classify(&frame_with_type(0x86DD)),
            EtherType::Unsupported(0x86DD)
        );
    }
}
