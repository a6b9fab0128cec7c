use crate::error::ConfigError;
use cidr::Ipv4Cidr;
use flowrouter_packets::MacAddr;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Static mapping from a destination network to the switch port and next hop that reach it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub network: Ipv4Cidr,
    /// The host living on `network`. Kept for operators, never consulted when forwarding.
    pub host_ip: Ipv4Addr,
    pub interface_name: String,
    pub gateway_ip: Ipv4Addr,
    pub port: u16,
    pub gateway_mac: MacAddr,
}

impl RouteEntry {
    pub fn new(
        network: Ipv4Cidr,
        host_ip: Ipv4Addr,
        interface_name: &str,
        gateway_ip: Ipv4Addr,
        port: u16,
        gateway_mac: MacAddr,
    ) -> Self {
        RouteEntry {
            network,
            host_ip,
            interface_name: String::from(interface_name),
            gateway_ip,
            port,
            gateway_mac,
        }
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.network,
            self.host_ip,
            self.interface_name,
            self.gateway_ip,
            self.port,
            self.gateway_mac
        )
    }
}

impl FromStr for RouteEntry {
    type Err = ConfigError;

    /// Parses `network,host_ip,interface,gateway_ip,port,gateway_mac`, for example
    /// `10.0.1.0/24,10.0.1.100,s1-eth1,10.0.1.1,1,00:00:00:00:00:01`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ConfigError::InvalidRoute {
            route: String::from(s),
            reason,
        };

        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() != 6 {
            return Err(invalid(format!("expected 6 fields, found {}", fields.len())));
        }

        let network = fields[0]
            .parse::<Ipv4Cidr>()
            .map_err(|err| invalid(format!("network: {}", err)))?;
        let host_ip = fields[1]
            .parse::<Ipv4Addr>()
            .map_err(|err| invalid(format!("host ip: {}", err)))?;
        if fields[2].is_empty() {
            return Err(invalid(String::from("interface name is empty")));
        }
        let gateway_ip = fields[3]
            .parse::<Ipv4Addr>()
            .map_err(|err| invalid(format!("gateway ip: {}", err)))?;
        let port = fields[4]
            .parse::<u16>()
            .map_err(|err| invalid(format!("port: {}", err)))?;
        let gateway_mac = fields[5]
            .parse::<MacAddr>()
            .map_err(|err| invalid(format!("gateway mac: {}", err)))?;

        Ok(RouteEntry::new(
            network,
            host_ip,
            fields[2],
            gateway_ip,
            port,
            gateway_mac,
        ))
    }
}
