use crate::{
    internet_checksum, IpProtocol, Ipv4Packet, Packet, IPV4_HEADER_LEN, MAX_IPV4_PACKET_LEN,
};
use std::borrow::Cow;
use std::convert::{TryFrom, TryInto};
use std::net::Ipv4Addr;

/// Type, code, checksum and the 4 type-specific bytes that follow
pub const ICMP_HEADER_LEN: usize = 8;

/// Most data an ICMP message can carry inside an IPv4 packet without options
pub const MAX_ICMP_BODY_LEN: usize = MAX_IPV4_PACKET_LEN - IPV4_HEADER_LEN - ICMP_HEADER_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpType {
    EchoReply,
    DestUnreachable,
    EchoRequest,
    Other(u8),
}

impl From<u8> for IcmpType {
    fn from(icmp_type: u8) -> Self {
        match icmp_type {
            0 => IcmpType::EchoReply,
            3 => IcmpType::DestUnreachable,
            8 => IcmpType::EchoRequest,
            other => IcmpType::Other(other),
        }
    }
}

impl From<IcmpType> for u8 {
    fn from(icmp_type: IcmpType) -> Self {
        match icmp_type {
            IcmpType::EchoReply => 0,
            IcmpType::DestUnreachable => 3,
            IcmpType::EchoRequest => 8,
            IcmpType::Other(other) => other,
        }
    }
}

/// Codes carried by a destination unreachable message (RFC 792)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableCode {
    Network = 0,
    Host = 1,
    Protocol = 2,
    Port = 3,
}

///
/// Ipv4Packet wrapper with getters for the ICMP message it carries, described in RFC 792
/// https://tools.ietf.org/html/rfc792
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IcmpPacket {
    packet: Ipv4Packet,
}

impl Packet for IcmpPacket {}

impl IcmpPacket {
    /// An echo request with a valid ICMP and IP checksum
    pub fn echo_request(
        src: Ipv4Addr,
        dest: Ipv4Addr,
        identifier: u16,
        sequence: u16,
        data: &[u8],
    ) -> IcmpPacket {
        IcmpPacket::build(
            src,
            dest,
            IcmpType::EchoRequest,
            0,
            echo_rest_of_header(identifier, sequence),
            data,
        )
    }

    /// An echo reply with a valid ICMP and IP checksum
    pub fn echo_reply(
        src: Ipv4Addr,
        dest: Ipv4Addr,
        identifier: u16,
        sequence: u16,
        data: &[u8],
    ) -> IcmpPacket {
        IcmpPacket::build(
            src,
            dest,
            IcmpType::EchoReply,
            0,
            echo_rest_of_header(identifier, sequence),
            data,
        )
    }

    /// A destination unreachable message quoting `original` after the 4 unused bytes. The quote is
    /// the whole original packet unless that would push the message past the IPv4 size limit, in
    /// which case its tail is dropped.
    pub fn dest_unreachable(
        src: Ipv4Addr,
        dest: Ipv4Addr,
        code: UnreachableCode,
        original: &Ipv4Packet,
    ) -> IcmpPacket {
        IcmpPacket::build(
            src,
            dest,
            IcmpType::DestUnreachable,
            code as u8,
            [0; 4],
            original.bytes(),
        )
    }

    fn build(
        src: Ipv4Addr,
        dest: Ipv4Addr,
        icmp_type: IcmpType,
        code: u8,
        rest_of_header: [u8; 4],
        body: &[u8],
    ) -> IcmpPacket {
        let body = &body[..body.len().min(MAX_ICMP_BODY_LEN)];
        let mut message = Vec::with_capacity(ICMP_HEADER_LEN + body.len());
        message.push(icmp_type.into());
        message.push(code);
        message.extend(&[0, 0]);
        message.extend(&rest_of_header);
        message.extend(body);
        let checksum = internet_checksum(&message);
        message[2..4].copy_from_slice(&checksum.to_be_bytes());

        IcmpPacket {
            packet: Ipv4Packet::with_payload(src, dest, IpProtocol::ICMP, &message),
        }
    }

    pub fn icmp_type(&self) -> IcmpType {
        IcmpType::from(self.message()[0])
    }

    pub fn code(&self) -> u8 {
        self.message()[1]
    }

    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes(self.message()[2..4].try_into().unwrap())
    }

    /// Echo identifier. Only meaningful for echo requests and replies.
    pub fn identifier(&self) -> u16 {
        u16::from_be_bytes(self.message()[4..6].try_into().unwrap())
    }

    /// Echo sequence number. Only meaningful for echo requests and replies.
    pub fn sequence(&self) -> u16 {
        u16::from_be_bytes(self.message()[6..8].try_into().unwrap())
    }

    /// The 4 type-specific header bytes: identifier and sequence for echo, unused for
    /// destination unreachable
    pub fn rest_of_header(&self) -> [u8; 4] {
        let message = self.message();
        [message[4], message[5], message[6], message[7]]
    }

    /// Everything after the 8 byte ICMP header
    pub fn body(&self) -> Cow<[u8]> {
        Cow::from(&self.message()[ICMP_HEADER_LEN..])
    }

    pub fn validate_checksum(&self) -> bool {
        internet_checksum(self.message()) == 0
    }

    pub fn ipv4(&self) -> &Ipv4Packet {
        &self.packet
    }

    // Move ownership of the IP packet back to the caller
    pub fn packet(self) -> Ipv4Packet {
        self.packet
    }

    fn message(&self) -> &[u8] {
        &self.packet.data[self.packet.payload_offset..]
    }
}

fn echo_rest_of_header(identifier: u16, sequence: u16) -> [u8; 4] {
    let id = identifier.to_be_bytes();
    let seq = sequence.to_be_bytes();
    [id[0], id[1], seq[0], seq[1]]
}

impl TryFrom<Ipv4Packet> for IcmpPacket {
    type Error = &'static str;

    fn try_from(packet: Ipv4Packet) -> Result<Self, Self::Error> {
        if packet.protocol() != IpProtocol::ICMP {
            return Err("Packet protocol is not ICMP");
        }
        if packet.payload().len() < ICMP_HEADER_LEN {
            return Err("Packet payload is too short for an ICMP header");
        }
        Ok(IcmpPacket { packet })
    }
}
