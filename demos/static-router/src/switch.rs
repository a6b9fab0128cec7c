use crossbeam::crossbeam_channel::Receiver;
use flowrouter_core::controller::format_dpid;
use flowrouter_core::{Dpid, FlowAction, SwitchCommand};
use std::thread::{self, JoinHandle};
use tracing::info;

/// Stands in for a switch: drains the commands a router sends it and logs each one. The thread
/// ends once the router's connection is dropped and returns how many commands it saw.
pub fn spawn(dpid: Dpid, commands: Receiver<SwitchCommand>) -> JoinHandle<usize> {
    thread::spawn(move || {
        let dpid = format_dpid(dpid);
        let mut count = 0;
        for command in commands.iter() {
            count += 1;
            match command {
                SwitchCommand::PacketOut(packet_out) => info!(
                    %dpid,
                    out_port = packet_out.out_port,
                    bytes = packet_out.data.len(),
                    "packet out"
                ),
                SwitchCommand::FlowMod(flow_mod) => {
                    let ports: Vec<u16> = flow_mod
                        .actions
                        .iter()
                        .map(|FlowAction::Output { port }| *port)
                        .collect();
                    info!(
                        %dpid,
                        in_port = flow_mod.match_in_port,
                        ?ports,
                        idle_timeout = flow_mod.idle_timeout,
                        "flow mod"
                    )
                }
            }
        }
        count
    })
}
