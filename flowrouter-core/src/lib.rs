//! Decision engine for a controller-driven router.
//!
//! A switch hands every frame it has no rule for to the controller. The `Router` bound to that
//! switch answers ARP and ICMP echo on the network's behalf, forwards other IPv4 traffic along a
//! static route table and installs short-lived flow rules so the switch can handle repeats itself.
//! Everything the router asks of the switch goes through a `SwitchConnection`.
pub mod classifier;
pub mod config;
pub mod connection;
pub mod controller;
pub mod error;
mod handler;
pub mod route;
pub mod router;
pub mod state;
#[cfg(test)]
mod utils;

pub use crate::config::{RouterConfig, Topology};
pub use crate::connection::{
    ChannelConnection, FlowAction, FlowMod, PacketIn, PacketOut, SwitchCommand, SwitchConnection,
};
pub use crate::controller::{Controller, Dpid};
pub use crate::error::{ConfigError, ConnectionError, ControllerError, RouterError};
pub use crate::route::{RouteEntry, RouteTable};
pub use crate::router::Router;
