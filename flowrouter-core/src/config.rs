use crate::controller::Dpid;
use crate::route::{RouteEntry, RouteTable};
use cidr::{Cidr, Ipv4Cidr};
use flowrouter_packets::MacAddr;
use std::collections::HashMap;
use std::net::Ipv4Addr;

/// Address the router claims for every one of its interfaces when answering ARP
pub const DEFAULT_ROUTER_MAC: MacAddr = MacAddr {
    bytes: [0x40, 0x10, 0x40, 0x10, 0x40, 0x10],
};

/// Seconds an installed rule may sit unused before the switch evicts it
pub const DEFAULT_IDLE_TIMEOUT: u16 = 240;

/// Everything a router needs to know about the switch it is bound to. Fixed once the router is
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    pub router_mac: MacAddr,
    /// Router interface address to the switch port it sits behind
    pub interfaces: HashMap<Ipv4Addr, u16>,
    pub routes: RouteTable,
    pub idle_timeout: u16,
    /// Answer ARP requests for addresses that are not router interfaces
    pub proxy_arp: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig::new()
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        RouterConfig {
            router_mac: DEFAULT_ROUTER_MAC,
            interfaces: HashMap::new(),
            routes: RouteTable::new(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            proxy_arp: true,
        }
    }

    pub fn router_mac(self, router_mac: MacAddr) -> Self {
        RouterConfig { router_mac, ..self }
    }

    pub fn interface(mut self, ip: Ipv4Addr, port: u16) -> Self {
        self.interfaces.insert(ip, port);
        self
    }

    pub fn route(mut self, entry: RouteEntry) -> Self {
        self.routes.push(entry);
        self
    }

    pub fn routes(self, routes: RouteTable) -> Self {
        RouterConfig { routes, ..self }
    }

    pub fn idle_timeout(self, idle_timeout: u16) -> Self {
        RouterConfig {
            idle_timeout,
            ..self
        }
    }

    pub fn proxy_arp(self, proxy_arp: bool) -> Self {
        RouterConfig { proxy_arp, ..self }
    }

    /// One switch, three hosts: 10.0.N.100/24 behind port N with gateway 10.0.N.1
    pub fn single_switch() -> Self {
        let mut config = RouterConfig::new();
        config.interfaces = maplit::hashmap! {
            Ipv4Addr::new(10, 0, 1, 1) => 1,
            Ipv4Addr::new(10, 0, 2, 1) => 2,
            Ipv4Addr::new(10, 0, 3, 1) => 3,
        };
        (1..=3u8).fold(config, |config, n| {
            with_route(config, local_route(1, n, u16::from(n)))
        })
    }
}

/// The route to subnet 10.0.`subnet`.0/24 whose host hangs off `port` of switch `switch`
fn local_route(switch: u8, subnet: u8, port: u16) -> Option<RouteEntry> {
    let network = <Ipv4Cidr as Cidr>::new(Ipv4Addr::new(10, 0, subnet, 0), 24).ok()?;
    Some(RouteEntry::new(
        network,
        Ipv4Addr::new(10, 0, subnet, 100),
        &format!("s{}-eth{}", switch, port),
        Ipv4Addr::new(10, 0, subnet, 1),
        port,
        MacAddr::new([0, 0, 0, 0, 0, subnet]),
    ))
}

fn with_route(config: RouterConfig, entry: Option<RouteEntry>) -> RouterConfig {
    match entry {
        Some(entry) => config.route(entry),
        None => config,
    }
}

/// Built-in topologies the controller knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Three hosts on one switch
    SingleSwitch,
    /// Two hosts on each of two switches, joined by a trunk on port 3 of both
    DualSwitch,
}

/// Datapath ids the built-in topologies assign to their switches
pub const S1_DPID: Dpid = 1;
pub const S2_DPID: Dpid = 2;

/// Port of each switch that leads to the other in the dual-switch topology
pub const TRUNK_PORT: u16 = 3;

impl Topology {
    /// Per-switch configuration, keyed by datapath id
    pub fn configs(self) -> HashMap<Dpid, RouterConfig> {
        match self {
            Topology::SingleSwitch => maplit::hashmap! {
                S1_DPID => RouterConfig::single_switch(),
            },
            Topology::DualSwitch => maplit::hashmap! {
                S1_DPID => dual_switch_config(1, [1, 2], [3, 4]),
                S2_DPID => dual_switch_config(2, [3, 4], [1, 2]),
            },
        }
    }
}

fn dual_switch_config(switch: u8, local: [u8; 2], remote: [u8; 2]) -> RouterConfig {
    let mut config = RouterConfig::new();
    for (port, subnet) in (1u16..).zip(local.iter()) {
        config = config.interface(Ipv4Addr::new(10, 0, *subnet, 1), port);
        config = with_route(config, local_route(switch, *subnet, port));
    }
    for subnet in remote.iter() {
        // The next hop for remote subnets is the other switch's router
        let trunk = local_route(switch, *subnet, TRUNK_PORT).map(|trunk| RouteEntry {
            gateway_mac: DEFAULT_ROUTER_MAC,
            ..trunk
        });
        config = with_route(config, trunk);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_switch_matches_three_host_topology() {
        let config = RouterConfig::single_switch();
        assert_eq!(config.router_mac, DEFAULT_ROUTER_MAC);
        assert_eq!(config.idle_timeout, 240);
        assert!(config.proxy_arp);
        assert_eq!(config.interfaces.get(&Ipv4Addr::new(10, 0, 2, 1)), Some(&2));

        let routes = config.routes.entries();
        assert_eq!(routes.len(), 3);
        assert_eq!(
            routes[0].to_string(),
            "10.0.1.0/24,10.0.1.100,s1-eth1,10.0.1.1,1,00:00:00:00:00:01"
        );
        assert_eq!(
            routes[2].to_string(),
            "10.0.3.0/24,10.0.3.100,s1-eth3,10.0.3.1,3,00:00:00:00:00:03"
        );
    }

    #[test]
    fn builder_overrides() {
        let config = RouterConfig::new()
            .idle_timeout(30)
            .proxy_arp(false)
            .interface(Ipv4Addr::new(192, 168, 0, 1), 4);
        assert_eq!(config.idle_timeout, 30);
        assert!(!config.proxy_arp);
        assert_eq!(config.interfaces.len(), 1);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn every_built_in_subnet_is_routed() {
        for (dpid, config) in Topology::DualSwitch.configs() {
            assert_eq!(config.routes.len(), 4, "switch {}", dpid);
            for subnet in 1..=4 {
                let host = Ipv4Addr::new(10, 0, subnet, 100);
                assert!(config.routes.lookup(host).is_some(), "{} on {}", host, dpid);
            }
        }
    }

    #[test]
    fn dual_switch_routes_remote_subnets_over_trunk() {
        let configs = Topology::DualSwitch.configs();
        assert_eq!(configs.len(), 2);

        let s1 = &configs[&S1_DPID];
        let to_h4 = s1.routes.lookup(Ipv4Addr::new(10, 0, 4, 100)).unwrap();
        assert_eq!(to_h4.port, TRUNK_PORT);
        assert_eq!(to_h4.gateway_mac, DEFAULT_ROUTER_MAC);
        assert_eq!(to_h4.interface_name, "s1-eth3");

        let s2 = &configs[&S2_DPID];
        let to_h3 = s2.routes.lookup(Ipv4Addr::new(10, 0, 3, 100)).unwrap();
        assert_eq!(to_h3.port, 1);
        assert_eq!(to_h3.gateway_mac, MacAddr::new([0, 0, 0, 0, 0, 3]));
        assert_eq!(s2.interfaces.get(&Ipv4Addr::new(10, 0, 4, 1)), Some(&2));
    }
}
