//! Transmit waveforms as pure functions of time.
//!
//! Every waveform maps a sample time to a complex amplitude and is zero
//! outside the active window of its pulse train: for `t < 0` and wherever
//! `t mod interval > width`.

use crate::common::Real;

use ndarray::Array1;
use num::complex::Complex64;
use num::traits::{FloatConst, Zero};
use serde::{Deserialize, Serialize};

pub trait Waveform {
    fn sample(&self, t: Real) -> Complex64;

    /// Evaluates the waveform at each time, in order. Times need not be
    /// sorted and may be negative.
    fn evaluate(&self, times: &Array1<Real>) -> Array1<Complex64> {
        times.map(|&t| self.sample(t))
    }
}

impl<W: Waveform + ?Sized> Waveform for &W {
    fn sample(&self, t: Real) -> Complex64 {
        (**self).sample(t)
    }

    fn evaluate(&self, times: &Array1<Real>) -> Array1<Complex64> {
        (**self).evaluate(times)
    }
}

impl<W: Waveform + ?Sized> Waveform for Box<W> {
    fn sample(&self, t: Real) -> Complex64 {
        (**self).sample(t)
    }

    fn evaluate(&self, times: &Array1<Real>) -> Array1<Complex64> {
        (**self).evaluate(times)
    }
}

/// Rectangular gate repeated every `interval`, open for `width`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PulseTrain {
    pub width: Real,
    pub interval: Real,
}

impl PulseTrain {
    pub fn new(width: Real, interval: Real) -> Self {
        Self { width, interval }
    }

    /// Time since the start of the current pulse, or `None` while the gate
    /// is closed.
    pub fn phase(&self, t: Real) -> Option<Real> {
        if t < 0.0 {
            return None;
        }
        let tau = t.rem_euclid(self.interval);
        if tau > self.width {
            None
        } else {
            Some(tau)
        }
    }
}

/// Fixed-frequency complex carrier, `exp(2πi·t·freq)`, under a pulse gate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuousWave {
    pub freq: Real,
    pub gate: PulseTrain,
}

impl Waveform for ContinuousWave {
    fn sample(&self, t: Real) -> Complex64 {
        match self.gate.phase(t) {
            Some(_) => Complex64::new(0.0, 2.0 * Real::PI() * t * self.freq).exp(),
            None => Complex64::zero(),
        }
    }
}

/// Real linear sweep from `f0` to `f1` across each pulse.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chirp {
    pub f0: Real,
    pub f1: Real,
    pub gate: PulseTrain,
}

impl Chirp {
    pub fn sweep_rate(&self) -> Real {
        (self.f1 - self.f0) / self.gate.width
    }

    /// Instantaneous frequency `tau` into a pulse.
    pub fn frequency_at(&self, tau: Real) -> Real {
        self.f0 + self.sweep_rate() * tau
    }
}

impl Waveform for Chirp {
    fn sample(&self, t: Real) -> Complex64 {
        match self.gate.phase(t) {
            Some(tau) => {
                let phase = 2.0 * Real::PI() * (self.f0 * tau + self.sweep_rate() * tau * tau / 2.0);
                Complex64::new(phase.cos(), 0.0)
            }
            None => Complex64::zero(),
        }
    }
}

pub fn cw_pulse(freq: Real, pw: Real, prf: Real) -> ContinuousWave {
    ContinuousWave {
        freq,
        gate: PulseTrain::new(pw, prf),
    }
}

pub fn chirp_pulse(f0: Real, f1: Real, pw: Real, prf: Real) -> Chirp {
    Chirp {
        f0,
        f1,
        gate: PulseTrain::new(pw, prf),
    }
}

/// Transmit pulse selected at configuration time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pulse {
    Cw(ContinuousWave),
    Chirp(Chirp),
}

impl Pulse {
    pub fn gate(&self) -> PulseTrain {
        match self {
            Pulse::Cw(cw) => cw.gate,
            Pulse::Chirp(chirp) => chirp.gate,
        }
    }
}

impl Waveform for Pulse {
    fn sample(&self, t: Real) -> Complex64 {
        match self {
            Pulse::Cw(cw) => cw.sample(t),
            Pulse::Chirp(chirp) => chirp.sample(t),
        }
    }
}

impl From<ContinuousWave> for Pulse {
    fn from(cw: ContinuousWave) -> Self {
        Pulse::Cw(cw)
    }
}

impl From<Chirp> for Pulse {
    fn from(chirp: Chirp) -> Self {
        Pulse::Chirp(chirp)
    }
}

pub type BoxedWaveform = Box<dyn Waveform + Send + Sync>;

/// Sample-wise sum of several waveforms.
#[derive(Default)]
pub struct Superposition {
    parts: Vec<BoxedWaveform>,
}

impl Superposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<W>(mut self, part: W) -> Self
    where
        W: Waveform + Send + Sync + 'static,
    {
        self.parts.push(Box::new(part));
        self
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Waveform for Superposition {
    fn sample(&self, t: Real) -> Complex64 {
        self.parts.iter().map(|part| part.sample(t)).sum()
    }

    fn evaluate(&self, times: &Array1<Real>) -> Array1<Complex64> {
        self.parts
            .iter()
            .fold(Array1::zeros(times.len()), |acc, part| acc + part.evaluate(times))
    }
}
