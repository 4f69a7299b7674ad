//! Echo of a waveform off a point target in constant-velocity motion.
//!
//! For each receive time the transform solves for the instant the wavefront
//! met the target and the instant it must have left the transmitter, then
//! evaluates the source waveform at that send time. The solution is exact
//! for 1-D constant-velocity motion, so the Doppler scaling of the echo falls
//! out of the time mapping with no small-velocity approximation.
//!
//! A velocity of exactly `-SPEED_OF_LIGHT` divides by zero; the resulting
//! infinities and NaNs are passed through unchanged.

use crate::common::{Real, Target, SPEED_OF_LIGHT};
use crate::waveform::Waveform;

use num::complex::Complex64;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attenuation {
    #[default]
    None,
    /// Scales the echo by the inverse square of the range at reflection.
    InverseSquare,
}

#[derive(Clone, Debug)]
pub struct Reflection<W> {
    source: W,
    target: Target,
    attenuation: Attenuation,
}

pub fn reflection<W: Waveform>(
    sig: W,
    tgt_loc: Real,
    tgt_vel: Real,
    tgt_xs: Real,
) -> Reflection<W> {
    Reflection::new(sig, Target::new(tgt_loc, tgt_vel, tgt_xs))
}

impl<W: Waveform> Reflection<W> {
    pub fn new(source: W, target: Target) -> Self {
        Self {
            source,
            target,
            attenuation: Attenuation::None,
        }
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    /// Time the wavefront hits the target, given its arrival time back at
    /// the receiver.
    pub fn reflect_time(&self, t_recv: Real) -> Real {
        (t_recv * SPEED_OF_LIGHT - self.target.location) / (self.target.velocity + SPEED_OF_LIGHT)
    }

    /// Emission time of the wavefront received at `t_recv`.
    pub fn send_time(&self, t_recv: Real) -> Real {
        let t_refl = self.reflect_time(t_recv);
        let d_refl = self.target.position_at(t_refl);
        t_refl - d_refl / SPEED_OF_LIGHT
    }

    /// Ratio of received to transmitted frequency, `(c - v) / (c + v)`.
    pub fn doppler_ratio(&self) -> Real {
        (SPEED_OF_LIGHT - self.target.velocity) / (SPEED_OF_LIGHT + self.target.velocity)
    }
}

impl<W: Waveform> Waveform for Reflection<W> {
    fn sample(&self, t_recv: Real) -> Complex64 {
        let t_refl = self.reflect_time(t_recv);
        let d_refl = self.target.position_at(t_refl);
        let t_send = t_refl - d_refl / SPEED_OF_LIGHT;
        let echo = self.source.sample(t_send) * self.target.cross_section;
        match self.attenuation {
            Attenuation::None => echo,
            Attenuation::InverseSquare => echo * d_refl.powi(-2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time_grid;
    use crate::waveform::{chirp_pulse, cw_pulse};
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;
    use num::traits::FloatConst;

    /// Mean frequency from the unwrapped phase of a complex tone.
    fn mean_frequency(samples: &Array1<Complex64>, dt: Real) -> Real {
        let steps: Vec<Real> = samples
            .iter()
            .zip(samples.iter().skip(1))
            .map(|(a, b)| (b * a.conj()).arg())
            .collect();
        steps.iter().sum::<Real>() / steps.len() as Real / (2.0 * Real::PI() * dt)
    }

    #[test]
    fn stationary_target_is_pure_delay() {
        let cw = cw_pulse(10.0, 1.0, 10.0);
        let echo = reflection(cw, 0.6, 0.0, 0.5);
        let times = time_grid(0, 2000, 0.005, 0.0);
        let delayed = times.map(|&t| t - 2.0 * 0.6 / SPEED_OF_LIGHT);
        let expected = cw.evaluate(&delayed) * Complex64::new(0.5, 0.0);
        // Gate edges may land on either side of a boundary sample, so skip
        // samples that sit on one.
        let got = echo.evaluate(&times);
        for ((x, y), &t) in got.iter().zip(expected.iter()).zip(delayed.iter()) {
            let tau = t.rem_euclid(10.0);
            if tau.abs() < 1e-9 || (tau - 1.0).abs() < 1e-9 {
                continue;
            }
            assert_abs_diff_eq!(x.re, y.re, epsilon = 1e-9);
            assert_abs_diff_eq!(x.im, y.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn stationary_chirp_echo_starts_after_round_trip() {
        let chirp = chirp_pulse(2.0, 18.0, 1.0, 10.0);
        let echo = reflection(chirp, 0.75, 0.0, 0.25);
        assert_abs_diff_eq!(echo.send_time(5.0), 0.0, epsilon = 1e-12);
        assert!(echo.sample(4.9).re == 0.0);
        assert_abs_diff_eq!(echo.sample(5.5).re, 0.25 * chirp.sample(0.5).re, epsilon = 1e-9);
    }

    #[test]
    fn approaching_target_raises_frequency() {
        let cw = cw_pulse(0.5, 1.0, 1.0);
        let echo = reflection(cw, 8.0, -0.2, 0.5);
        assert_abs_diff_eq!(echo.doppler_ratio(), 5.0, epsilon = 1e-12);

        let dt = 0.001;
        let times = time_grid(0, 2000, dt, 33.0);
        let received = echo.evaluate(&times);
        assert!(received.iter().all(|s| s.norm() > 0.0));
        let freq = mean_frequency(&received, dt);
        assert_abs_diff_eq!(freq, 0.5 * 5.0, epsilon = 1e-6);
    }

    #[test]
    fn receding_target_lowers_frequency() {
        let cw = cw_pulse(2.0, 1.0, 1.0);
        let echo = reflection(cw, 1.0, 0.1, 1.0);
        let dt = 0.001;
        let times = time_grid(0, 3000, dt, 20.0);
        let freq = mean_frequency(&echo.evaluate(&times), dt);
        assert!(freq < 2.0);
        assert_abs_diff_eq!(freq, 2.0 * echo.doppler_ratio(), epsilon = 1e-6);
    }

    #[test]
    fn echo_keeps_gating() {
        let cw = cw_pulse(10.0, 1.0, 10.0);
        let echo = reflection(cw, 0.6, 0.05, 1.0);
        let times = time_grid(-1000, 20000, 0.003, 0.0);
        for (&t, s) in times.iter().zip(echo.evaluate(&times).iter()) {
            let t_send = echo.send_time(t);
            if t_send < 0.0 || t_send.rem_euclid(10.0) > 1.0 {
                assert_eq!(*s, Complex64::new(0.0, 0.0));
            }
        }
    }

    #[test]
    fn inverse_square_attenuation() {
        let cw = cw_pulse(1.0, 1.0, 1.0);
        let plain = reflection(cw, 2.0, 0.0, 1.0);
        let attenuated = reflection(cw, 2.0, 0.0, 1.0).with_attenuation(Attenuation::InverseSquare);
        let t = 20.3;
        assert_abs_diff_eq!(attenuated.sample(t).norm(), plain.sample(t).norm() / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_velocity_is_not_finite() {
        let cw = cw_pulse(1.0, 1.0, 1.0);
        let echo = reflection(cw, 2.0, -SPEED_OF_LIGHT, 1.0);
        assert!(!echo.send_time(3.0).is_finite());
    }
}
