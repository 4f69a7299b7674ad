//! Deterministic complex noise keyed by sample time.
//!
//! The bit pattern of the (shifted) time value stands in for a random
//! draw, so the field needs no generator state: the same time and seed
//! always give the same sample, whatever order samples are requested in.
//! The output is only roughly Gaussian.

use crate::common::Real;
use crate::waveform::Waveform;

use num::complex::Complex64;
use num::traits::FloatConst;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 18;

/// Alternating bit mask splitting a sample into its two uniform draws.
const SPLIT_MASK: i64 = 0x0AAA_AAAA_AAAA_AAAA;

const LOG_GUARD: Real = 1e-7;

const TIME_STRETCH: Real = 1.3;

/// SplitMix64 finalizer.
fn mix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed offset added to the time axis. Kept to 20 bits so that it does not
/// swamp the mantissa of the time value it is added to.
fn seed_offset(seed: u64) -> Real {
    (mix64(seed) >> 44) as Real
}

/// Box-Muller radius for the uniform draw `a` in `[0, e)`. Near `a = e` the
/// guard pushes the radicand a hair negative, so it is clamped at zero.
fn rayleigh_radius(a: Real) -> Real {
    (2.0 - 2.0 * (a + LOG_GUARD).ln()).max(0.0).sqrt()
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeterministicNoise {
    pub scale: Real,
    pub seed: u64,
}

pub fn deterministic_noise(scale: Real, seed: u64) -> DeterministicNoise {
    DeterministicNoise::new(scale, seed)
}

impl DeterministicNoise {
    pub fn new(scale: Real, seed: u64) -> Self {
        Self { scale, seed }
    }

    pub fn with_scale(scale: Real) -> Self {
        Self::new(scale, DEFAULT_SEED)
    }
}

impl Default for DeterministicNoise {
    fn default() -> Self {
        Self::with_scale(1.0)
    }
}

impl Waveform for DeterministicNoise {
    fn sample(&self, t: Real) -> Complex64 {
        let x = (t * TIME_STRETCH + seed_offset(self.seed)).to_bits() as i64;
        let a = ((x & SPLIT_MASK) as Real).rem_euclid(Real::E());
        let b = ((x & !SPLIT_MASK) as Real).rem_euclid(Real::PI());
        // `a` sets the radius, `b` the angle.
        Complex64::from_polar(self.scale * rayleigh_radius(a), 2.0 * b)
    }
}
