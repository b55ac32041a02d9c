use std::fmt;
use std::error::Error;

/// Represents errors raised when validating simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationError {
    /// Indicates a negative gravitational constant.
    InvalidGravitationalConstant,
    /// Indicates a negative softening length.
    InvalidSoftening,
    /// Indicates a zero or negative fixed time step.
    InvalidTimeStep,
    /// Indicates a zero or negative Barnes-Hut opening threshold.
    InvalidTheta,
    /// Indicates a zero or negative velocity clamp.
    InvalidVelocityClamp,
    /// A parameter was NaN or infinite; carries the field name.
    NonFiniteParameter(&'static str),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::InvalidGravitationalConstant => write!(f, "Gravitational constant must be non-negative"),
            SimulationError::InvalidSoftening => write!(f, "Softening length must be non-negative"),
            SimulationError::InvalidTimeStep => write!(f, "Fixed time step must be positive"),
            SimulationError::InvalidTheta => write!(f, "Theta must be positive"),
            SimulationError::InvalidVelocityClamp => write!(f, "Velocity clamp must be positive"),
            SimulationError::NonFiniteParameter(name) => write!(f, "Parameter `{}` is not finite", name),
        }
    }
}

impl Error for SimulationError {}
