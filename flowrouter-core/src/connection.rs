//! # The switch side of the controller
//!
//! A router never talks to a socket. Everything it wants the switch to do is expressed as a
//! `SwitchCommand` and handed to a `SwitchConnection`, which owns framing and delivery. Commands
//! are fire-and-forget: the connection reports whether it accepted the command, never whether the
//! switch acted on it.
use crate::error::ConnectionError;
use crossbeam::crossbeam_channel::Sender;

/// Emit a frame out of one switch port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketOut {
    pub data: Vec<u8>,
    pub out_port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    Output { port: u16 },
}

/// Install a match-and-forward rule in the switch's flow table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowMod {
    pub match_in_port: u16,
    pub actions: Vec<FlowAction>,
    /// Seconds without a matching packet before the switch evicts the rule
    pub idle_timeout: u16,
    /// The switch-side buffer holding the frame that triggered this rule, if it buffered one
    pub buffer_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchCommand {
    PacketOut(PacketOut),
    FlowMod(FlowMod),
}

/// A frame the switch had no rule for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketIn {
    pub in_port: u16,
    pub buffer_id: Option<u32>,
    pub data: Vec<u8>,
}

pub trait SwitchConnection {
    fn send_packet_out(&mut self, packet_out: PacketOut) -> Result<(), ConnectionError>;

    fn install_flow(&mut self, flow_mod: FlowMod) -> Result<(), ConnectionError>;
}

/// Connection that forwards every command into a channel. Whoever holds the receiving end plays
/// the part of the switch.
#[derive(Clone)]
pub struct ChannelConnection {
    commands: Sender<SwitchCommand>,
}

impl ChannelConnection {
    pub fn new(commands: Sender<SwitchCommand>) -> Self {
        ChannelConnection { commands }
    }

    fn send(&self, command: SwitchCommand) -> Result<(), ConnectionError> {
        self.commands
            .send(command)
            .map_err(|_| ConnectionError::Closed)
    }
}

impl SwitchConnection for ChannelConnection {
    fn send_packet_out(&mut self, packet_out: PacketOut) -> Result<(), ConnectionError> {
        self.send(SwitchCommand::PacketOut(packet_out))
    }

    fn install_flow(&mut self, flow_mod: FlowMod) -> Result<(), ConnectionError> {
        self.send(SwitchCommand::FlowMod(flow_mod))
    }
}
