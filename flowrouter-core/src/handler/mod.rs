//! Each handler is one decision the router can take for a packet-in event. They all extend
//! `Router` so they share its connection and tables, and none of them is reached except through
//! `Router::handle_packet_in` or the tests below.
mod arp_responder;
mod forwarder;
mod icmp_responder;
mod rule_installer;
