use crate::controller::Dpid;

/// Failures reported by the transport when handing it a command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("switch connection is closed")]
    Closed,

    #[error("switch rejected command: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("no router registered for switch {0:#018x}")]
    UnknownSwitch(Dpid),

    #[error(transparent)]
    Router(#[from] RouterError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid route `{route}`: {reason}")]
    InvalidRoute { route: String, reason: String },
}
