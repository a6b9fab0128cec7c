//! # What are they for?
//!
//! Classifiers look at a packet by reference and decide which group it belongs to, without
//! modifying it. The router uses them to decide how far a raw packet-in frame should be promoted
//! (Ethernet, then ARP or IPv4, then ICMP) before it is handed to a handler.
mod ether_type;
pub use self::ether_type::*;

mod ip_protocol;
pub use self::ip_protocol::*;

mod parsed_frame;
pub use self::parsed_frame::*;

/// Determines the kind of packet we have. Classifier::Class is consumed by whoever dispatches
/// the packet down the appropriate path.
pub trait Classifier {
    type Packet;
    type Class: Sized;

    fn classify(&self, packet: &Self::Packet) -> Self::Class;
}
