//! Demo parameter sets.
//!
//! Defaults reproduce the constants the two demos were tuned with. Any
//! subset of fields can be overridden from a JSON file.

use crate::common::{Decibel, Real, Target, SPEED_OF_LIGHT};
use crate::correlate::Method;
use crate::error::{ConfigError, ConfigResult};
use crate::filter::Taper;
use crate::reflection::Attenuation;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn check_finite(name: &'static str, value: Real) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

fn check_positive(name: &'static str, value: Real) -> ConfigResult<()> {
    check_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn check_pulse(width: Real, interval: Real) -> ConfigResult<()> {
    check_positive("pulse_width", width)?;
    check_positive("pulse_interval", interval)?;
    if width > interval {
        return Err(ConfigError::PulseLongerThanInterval { width, interval });
    }
    Ok(())
}

fn check_target(index: usize, target: &Target) -> ConfigResult<()> {
    check_finite("target location", target.location)?;
    check_finite("target velocity", target.velocity)?;
    check_finite("target cross-section", target.cross_section)?;
    if target.cross_section < 0.0 {
        return Err(ConfigError::NegativeCrossSection {
            index,
            value: target.cross_section,
        });
    }
    if target.velocity + SPEED_OF_LIGHT == 0.0 {
        return Err(ConfigError::DegenerateVelocity {
            index,
            velocity: target.velocity,
        });
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub frame_rate: u32,
    /// Simulation time advanced per frame.
    pub time_step: Real,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            time_step: 2.0 / 60.0,
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        check_positive("frame_rate", self.frame_rate as Real)?;
        check_positive("time_step", self.time_step)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DopplerConfig {
    pub frequency: Real,
    pub pulse_width: Real,
    pub pulse_interval: Real,
    pub target: Target,
    pub attenuation: Attenuation,
    pub start_time: Real,
    /// Pixels per sample unit on screen.
    pub amplitude: Real,
    pub surface: Surface,
}

impl Default for DopplerConfig {
    fn default() -> Self {
        Self {
            frequency: 0.5,
            pulse_width: 1.0,
            pulse_interval: 1.0,
            target: Target::new(8.0, -0.2, 0.5),
            attenuation: Attenuation::None,
            start_time: 10.0,
            amplitude: 50.0,
            surface: Surface::new(1000, 200),
        }
    }
}

impl DopplerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        check_positive("frequency", self.frequency)?;
        check_pulse(self.pulse_width, self.pulse_interval)?;
        check_target(0, &self.target)?;
        check_finite("start_time", self.start_time)?;
        check_finite("amplitude", self.amplitude)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Chirp when set, plain CW pulse otherwise.
    pub pulse_compression: bool,
    pub frequency: Real,
    /// The chirp sweeps `frequency ± chirp_half_band`.
    pub chirp_half_band: Real,
    pub pulse_width: Real,
    pub pulse_interval: Real,
    /// Range shown on screen.
    pub window_width: Real,
    pub noise_level: Decibel,
    pub noise_seed: u64,
    pub resolution: Real,
    pub compression_gain: Real,
    pub taper: Taper,
    pub method: Method,
    pub targets: Vec<Target>,
    pub attenuation: Attenuation,
    pub start_time: Real,
    pub amplitude: Real,
    pub surface: Surface,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            pulse_compression: true,
            frequency: 10.0,
            chirp_half_band: 8.0,
            pulse_width: 1.0,
            pulse_interval: 10.0,
            window_width: 5.0,
            noise_level: Decibel::from(-40.0_f64),
            noise_seed: crate::noise::DEFAULT_SEED,
            resolution: 0.01,
            compression_gain: 16.0,
            taper: Taper::Rectangular,
            method: Method::Auto,
            targets: vec![Target::stationary(0.6, 0.5), Target::stationary(0.75, 0.25)],
            attenuation: Attenuation::None,
            start_time: 0.0,
            amplitude: 50.0,
            surface: Surface::new(1000, 400),
        }
    }
}

impl CompressionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        check_positive("frequency", self.frequency)?;
        check_finite("chirp_half_band", self.chirp_half_band)?;
        check_pulse(self.pulse_width, self.pulse_interval)?;
        check_positive("window_width", self.window_width)?;
        check_finite("noise_level", self.noise_level.into())?;
        check_positive("resolution", self.resolution)?;
        check_positive("compression_gain", self.compression_gain)?;
        check_finite("start_time", self.start_time)?;
        check_finite("amplitude", self.amplitude)?;
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        self.targets
            .iter()
            .enumerate()
            .try_for_each(|(index, target)| check_target(index, target))
    }

    /// Number of samples across the visible window.
    pub fn window_samples(&self) -> i64 {
        (self.window_width / (SPEED_OF_LIGHT * self.resolution)) as i64
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub clock: ClockConfig,
    pub doppler: DopplerConfig,
    pub compression: CompressionConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Config = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.clock.validate()?;
        self.doppler.validate()?;
        self.compression.validate()
    }
}
