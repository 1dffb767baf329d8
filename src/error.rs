use crate::config::ConfigError;

/// Errors raised by the driver-facing surfaces (scenario lookup, packed states, config).
///
/// The physics itself never returns an error: a singular configuration shows up
/// as NaN/Inf in the body state.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("unknown scenario id '{0}'")]
    UnknownScenario(String),

    #[error("packed states must hold {expected} values ([x, y, z, vx, vy, vz, m] x 3), got {got}")]
    InvalidStateLength { expected: usize, got: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
