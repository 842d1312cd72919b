use thiserror::Error;

/// Errors raised while setting up simulation buffers.
///
/// Capacity exhaustion (full store, full grid cell, full neighbor list) is
/// not an error; it is reported through [`crate::StepStats`] instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid simulation config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}
