use crate::config::RouterConfig;
use crate::connection::{PacketIn, SwitchConnection};
use crate::error::ControllerError;
use crate::router::Router;
use std::collections::HashMap;
use tracing::info;

/// OpenFlow datapath id, unique per switch
pub type Dpid = u64;

/// One router per connected switch.
///
/// Routers are built when their switch connects, from the configuration registered for that
/// datapath id or, failing that, the default configuration. A switch with neither is refused.
pub struct Controller<C: SwitchConnection> {
    routers: HashMap<Dpid, Router<C>>,
    default_config: Option<RouterConfig>,
    switch_configs: HashMap<Dpid, RouterConfig>,
}

impl<C: SwitchConnection> Default for Controller<C> {
    fn default() -> Self {
        Controller::new()
    }
}

impl<C: SwitchConnection> Controller<C> {
    pub fn new() -> Self {
        Controller {
            routers: HashMap::new(),
            default_config: None,
            switch_configs: HashMap::new(),
        }
    }

    /// Configuration for any switch without one of its own
    pub fn default_config(self, config: RouterConfig) -> Self {
        Controller {
            default_config: Some(config),
            ..self
        }
    }

    pub fn switch_config(mut self, dpid: Dpid, config: RouterConfig) -> Self {
        self.switch_configs.insert(dpid, config);
        self
    }

    pub fn switch_configs(mut self, configs: HashMap<Dpid, RouterConfig>) -> Self {
        self.switch_configs.extend(configs);
        self
    }

    pub fn connection_up(
        &mut self,
        dpid: Dpid,
        connection: C,
    ) -> Result<&mut Router<C>, ControllerError> {
        let config = self
            .switch_configs
            .get(&dpid)
            .or_else(|| self.default_config.as_ref())
            .cloned()
            .ok_or(ControllerError::UnknownSwitch(dpid))?;

        let routes = config.routes.len();
        if self.routers.remove(&dpid).is_some() {
            info!(dpid = %format_dpid(dpid), "Replacing router for reconnected switch");
        }
        info!(dpid = %format_dpid(dpid), routes, "Switch connected");

        Ok(self
            .routers
            .entry(dpid)
            .or_insert_with(|| Router::new(connection, config)))
    }

    /// Hand a packet-in event to the router bound to `dpid`
    pub fn packet_in(&mut self, dpid: Dpid, packet_in: PacketIn) -> Result<(), ControllerError> {
        let router = self
            .routers
            .get_mut(&dpid)
            .ok_or(ControllerError::UnknownSwitch(dpid))?;
        router.handle_packet_in(packet_in)?;
        Ok(())
    }

    /// Forget the switch. Whatever its router learned goes with it.
    pub fn connection_down(&mut self, dpid: Dpid) -> Option<Router<C>> {
        let router = self.routers.remove(&dpid);
        if router.is_some() {
            info!(dpid = %format_dpid(dpid), "Switch disconnected");
        }
        router
    }

    pub fn router(&self, dpid: Dpid) -> Option<&Router<C>> {
        self.routers.get(&dpid)
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}

/// Datapath ids are conventionally shown as 16 hex digits
pub fn format_dpid(dpid: Dpid) -> String {
    format!("{:016x}", dpid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Topology, S1_DPID, S2_DPID};
    use crate::error::{ConnectionError, RouterError};
    use crate::utils::test::packet_generators::*;
    use crate::utils::test::recording_connection::RecordingConnection;
    use std::net::Ipv4Addr;

    fn arp_reply_in(port: u16) -> PacketIn {
        PacketIn {
            in_port: port,
            buffer_id: None,
            data: arp_reply(H2_MAC, H2_IP, SWITCH_MAC, Ipv4Addr::new(10, 0, 2, 1)),
        }
    }

    #[test]
    fn switch_without_config_is_refused() {
        let mut controller = Controller::new().switch_config(S1_DPID, RouterConfig::single_switch());
        assert!(controller
            .connection_up(S1_DPID, RecordingConnection::new())
            .is_ok());
        assert_eq!(
            controller
                .connection_up(9, RecordingConnection::new())
                .err(),
            Some(ControllerError::UnknownSwitch(9))
        );
        assert_eq!(controller.len(), 1);
    }

    #[test]
    fn default_config_covers_any_switch() {
        let mut controller = Controller::new().default_config(RouterConfig::new().idle_timeout(5));
        let router = controller
            .connection_up(77, RecordingConnection::new())
            .unwrap();
        assert_eq!(router.config().idle_timeout, 5);
    }

    #[test]
    fn each_switch_gets_its_own_config() {
        let mut controller = Controller::new().switch_configs(Topology::DualSwitch.configs());
        controller
            .connection_up(S1_DPID, RecordingConnection::new())
            .unwrap();
        controller
            .connection_up(S2_DPID, RecordingConnection::new())
            .unwrap();

        let s1 = controller.router(S1_DPID).unwrap();
        let s2 = controller.router(S2_DPID).unwrap();
        assert!(s1.is_router_interface(Ipv4Addr::new(10, 0, 1, 1)));
        assert!(!s1.is_router_interface(Ipv4Addr::new(10, 0, 3, 1)));
        assert!(s2.is_router_interface(Ipv4Addr::new(10, 0, 3, 1)));
    }

    #[test]
    fn reconnect_starts_with_empty_address_table() {
        let mut controller = Controller::new().default_config(RouterConfig::single_switch());
        controller
            .connection_up(S1_DPID, RecordingConnection::new())
            .unwrap();
        controller.packet_in(S1_DPID, arp_reply_in(2)).unwrap();
        assert_eq!(controller.router(S1_DPID).unwrap().address_table().len(), 1);

        let router = controller
            .connection_up(S1_DPID, RecordingConnection::new())
            .unwrap();
        assert!(router.address_table().is_empty());
        assert_eq!(controller.len(), 1);
    }

    #[test]
    fn packet_in_for_unknown_switch_is_an_error() {
        let mut controller: Controller<RecordingConnection> =
            Controller::new().default_config(RouterConfig::single_switch());
        assert_eq!(
            controller.packet_in(3, arp_reply_in(1)),
            Err(ControllerError::UnknownSwitch(3))
        );
    }

    #[test]
    fn router_errors_pass_through() {
        let mut controller = Controller::new().default_config(RouterConfig::single_switch());
        controller
            .connection_up(S1_DPID, RecordingConnection::failing(ConnectionError::Closed))
            .unwrap();
        let echo = PacketIn {
            in_port: 1,
            buffer_id: None,
            data: echo_request(H1_MAC, SWITCH_MAC, H1_IP, H2_IP, 1, 1),
        };
        assert_eq!(
            controller.packet_in(S1_DPID, echo),
            Err(ControllerError::Router(RouterError::Connection(
                ConnectionError::Closed
            )))
        );
    }

    #[test]
    fn connection_down_drops_router() {
        let mut controller = Controller::new().default_config(RouterConfig::single_switch());
        controller
            .connection_up(S1_DPID, RecordingConnection::new())
            .unwrap();
        controller.packet_in(S1_DPID, arp_reply_in(2)).unwrap();

        let router = controller.connection_down(S1_DPID).unwrap();
        assert_eq!(router.address_table().get(&H2_MAC), Some(2));
        assert!(controller.is_empty());
        assert!(controller.connection_down(S1_DPID).is_none());
    }

    #[test]
    fn dpid_is_zero_padded_hex() {
        assert_eq!(format_dpid(0x1f), "000000000000001f");
    }
}
