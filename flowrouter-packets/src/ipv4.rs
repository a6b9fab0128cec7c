use crate::*;
use std::borrow::Cow;
use std::convert::{TryFrom, TryInto};
use std::net::Ipv4Addr;

/// Length of an IPv4 header without options
pub const IPV4_HEADER_LEN: usize = 20;

/// TTL given to packets generated by this crate's constructors
pub const DEFAULT_TTL: u8 = 64;

/// Largest value the total length field can hold
pub const MAX_IPV4_PACKET_LEN: usize = u16::MAX as usize;

#[derive(Clone, Debug)]
pub struct Ipv4Packet {
    pub data: PacketData,
    pub layer2_offset: Option<usize>,
    pub layer3_offset: usize,
    pub payload_offset: usize,
}

impl Packet for Ipv4Packet {}

impl Ipv4Packet {
    fn new(
        mut data: PacketData,
        layer2_offset: Option<usize>,
        layer3_offset: usize,
    ) -> Result<Ipv4Packet, &'static str> {
        if data.len() < layer3_offset + IPV4_HEADER_LEN {
            return Err("Data is too short to be an IPv4 Packet");
        }

        // Check version number
        let version: u8 = (data[layer3_offset] & 0xF0) >> 4;
        if version != 4 {
            return Err("Packet has incorrect version, is not Ipv4Packet");
        }

        // This is the header length in 32bit words
        let ihl = (data[layer3_offset] & 0x0F) as usize;
        if ihl < 5 {
            return Err("Packet has an IHL shorter than the minimum header");
        }

        // TotalLen is the 3rd and 4th byte of the IP Header
        let total_len = u16::from_be_bytes(
            data[layer3_offset + 2..=layer3_offset + 3]
                .try_into()
                .unwrap(),
        ) as usize;
        if total_len < ihl * 4 || data.len() < total_len + layer3_offset {
            return Err("Packet has invalid total length field");
        }
        // Switches pad short frames up to the Ethernet minimum
        data.truncate(total_len + layer3_offset);

        Ok(Ipv4Packet {
            data,
            layer2_offset,
            layer3_offset,
            payload_offset: layer3_offset + (ihl * 4),
        })
    }

    /// Returns a standalone packet with a 20 byte header: version 4, IHL 5, a total length of
    /// 20 and the default TTL. Everything else is zero.
    pub fn empty() -> Ipv4Packet {
        let mut data = vec![0; IPV4_HEADER_LEN];
        data[0] = 0x45;
        data[2..4].copy_from_slice(&(IPV4_HEADER_LEN as u16).to_be_bytes());
        data[8] = DEFAULT_TTL;
        Ipv4Packet {
            data,
            layer2_offset: None,
            layer3_offset: 0,
            payload_offset: IPV4_HEADER_LEN,
        }
    }

    /// Builds a new standalone packet carrying `payload`, with a valid header checksum
    pub fn with_payload(
        src: Ipv4Addr,
        dest: Ipv4Addr,
        protocol: IpProtocol,
        payload: &[u8],
    ) -> Ipv4Packet {
        let mut packet = Ipv4Packet::empty();
        packet.set_src_addr(src);
        packet.set_dest_addr(dest);
        packet.set_protocol(protocol);
        packet.set_payload(payload);
        packet.set_checksum();
        packet
    }

    pub fn src_addr(&self) -> Ipv4Addr {
        let data: [u8; 4] = self.data[self.layer3_offset + 12..self.layer3_offset + 16]
            .try_into()
            .unwrap();
        Ipv4Addr::from(data)
    }

    pub fn set_src_addr(&mut self, addr: Ipv4Addr) {
        self.data[self.layer3_offset + 12..self.layer3_offset + 16].copy_from_slice(&addr.octets());
    }

    pub fn dest_addr(&self) -> Ipv4Addr {
        let data: [u8; 4] = self.data[self.layer3_offset + 16..self.layer3_offset + 20]
            .try_into()
            .unwrap();
        Ipv4Addr::from(data)
    }

    pub fn set_dest_addr(&mut self, addr: Ipv4Addr) {
        self.data[self.layer3_offset + 16..self.layer3_offset + 20].copy_from_slice(&addr.octets());
    }

    pub fn ihl(&self) -> u8 {
        self.data[self.layer3_offset] & 0x0F
    }

    pub fn payload(&self) -> Cow<[u8]> {
        Cow::from(&self.data[self.payload_offset..])
    }

    /// Replaces the payload and updates the total length. Whatever does not fit in a packet of
    /// `MAX_IPV4_PACKET_LEN` bytes is cut off.
    pub fn set_payload(&mut self, payload: &[u8]) {
        let header_len = usize::from(self.ihl()) * 4;
        let payload = &payload[..payload.len().min(MAX_IPV4_PACKET_LEN - header_len)];
        let total_len = u16::try_from(header_len + payload.len()).unwrap_or(u16::MAX);

        self.data.truncate(self.payload_offset);
        self.data[self.layer3_offset + 2..=self.layer3_offset + 3]
            .copy_from_slice(&total_len.to_be_bytes());

        self.data.reserve_exact(payload.len());
        self.data.extend(payload);
    }

    /// The packet from the start of the IP header onward, without any link layer header
    pub fn bytes(&self) -> &[u8] {
        &self.data[self.layer3_offset..]
    }

    pub fn protocol(&self) -> IpProtocol {
        IpProtocol::from(self.data[self.layer3_offset + 9])
    }

    pub fn set_protocol(&mut self, protocol: IpProtocol) {
        self.data[self.layer3_offset + 9] = protocol.into();
    }

    pub fn total_len(&self) -> u16 {
        u16::from_be_bytes(
            self.data[self.layer3_offset + 2..=self.layer3_offset + 3]
                .try_into()
                .unwrap(),
        )
    }

    pub fn ttl(&self) -> u8 {
        self.data[self.layer3_offset + 8]
    }

    pub fn set_ttl(&mut self, ttl: u8) {
        self.data[self.layer3_offset + 8] = ttl;
    }

    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes(
            self.data[self.layer3_offset + 10..=self.layer3_offset + 11]
                .try_into()
                .unwrap(),
        )
    }

    /// Verifies the IP header checksum
    pub fn validate_checksum(&self) -> bool {
        internet_checksum(&self.data[self.layer3_offset..self.payload_offset]) == 0
    }

    /// Calculates what the checksum should be set to given the current header
    pub fn calculate_checksum(&self) -> u16 {
        let mut header = self.data[self.layer3_offset..self.payload_offset].to_vec();
        header[10] = 0;
        header[11] = 0;
        internet_checksum(&header)
    }

    /// Sets checksum field to valid value
    pub fn set_checksum(&mut self) {
        let new_checksum = self.calculate_checksum();
        self.data[self.layer3_offset + 10..=self.layer3_offset + 11]
            .copy_from_slice(&new_checksum.to_be_bytes());
    }
}

/// Ipv4Packets are considered the same if they have the same data from the layer 3
/// header and onward. This function does not consider the data before the start of
/// the IPv4 header.
impl PartialEq for Ipv4Packet {
    fn eq(&self, other: &Self) -> bool {
        self.bytes() == other.bytes()
    }
}

impl Eq for Ipv4Packet {}

impl TryFrom<EthernetFrame> for Ipv4Packet {
    type Error = &'static str;

    fn try_from(frame: EthernetFrame) -> Result<Self, Self::Error> {
        if frame.ether_type() != IPV4_ETHER_TYPE {
            return Err("Frame does not have IPv4 ether type");
        }
        Ipv4Packet::new(frame.data, Some(0), frame.payload_offset)
    }
}
