//! Configuration errors

use crate::common::Real;
use std::io;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parameter sets rejected before a demo is built
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Parameter must be strictly positive
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: Real },

    /// Parameter must be a finite number
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: Real },

    /// Pulse does not fit in its repetition interval
    #[error("pulse width {width} exceeds pulse repetition interval {interval}")]
    PulseLongerThanInterval { width: Real, interval: Real },

    /// Negative radar cross-section
    #[error("target {index} has negative cross-section {value}")]
    NegativeCrossSection { index: usize, value: Real },

    /// Target closes on the radar at the propagation speed
    #[error("target {index} velocity {velocity} equals minus the propagation speed")]
    DegenerateVelocity { index: usize, velocity: Real },

    /// Nothing to reflect off
    #[error("at least one target is required")]
    NoTargets,

    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    /// Config file could not be parsed
    #[error("invalid config file: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
