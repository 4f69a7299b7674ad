mod common;
mod config;
mod correlate;
mod driver;
mod error;
mod filter;
mod noise;
mod reflection;
pub mod render;
pub mod scene;
mod waveform;

pub use common::*;
pub use config::{ClockConfig, CompressionConfig, Config, DopplerConfig, Surface};
pub use correlate::{correlate, Method, Mode};
pub use driver::{Clock, Driver, FramePacer};
pub use error::{ConfigError, ConfigResult};
pub use filter::{MatchedFilter, Taper};
pub use noise::{deterministic_noise, DeterministicNoise, DEFAULT_SEED};
pub use reflection::{reflection, Attenuation, Reflection};
pub use waveform::{
    chirp_pulse, cw_pulse, BoxedWaveform, Chirp, ContinuousWave, Pulse, PulseTrain, Superposition,
    Waveform,
};
