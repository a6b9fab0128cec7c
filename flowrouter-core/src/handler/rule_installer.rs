use crate::connection::{FlowAction, FlowMod, SwitchConnection};
use crate::error::RouterError;
use crate::router::Router;
use tracing::debug;

impl<C: SwitchConnection> Router<C> {
    /// Tell the switch to send everything arriving on `in_port` out of `out_port` until the rule
    /// has gone unused for the configured idle timeout. Carries the buffer id of the triggering
    /// frame, if the switch kept one.
    pub fn install_timed_rule(
        &mut self,
        in_port: u16,
        out_port: u16,
        buffer_id: Option<u32>,
    ) -> Result<(), RouterError> {
        let flow_mod = FlowMod {
            match_in_port: in_port,
            actions: vec![FlowAction::Output { port: out_port }],
            idle_timeout: self.config.idle_timeout,
            buffer_id,
        };
        self.connection.install_flow(flow_mod)?;
        debug!(
            in_port,
            out_port,
            idle_timeout = self.config.idle_timeout,
            "Flow mod installed"
        );
        Ok(())
    }
}
