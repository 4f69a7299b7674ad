use crate::common::{time_grid, Real};
use crate::correlate::{correlate, Method, Mode};
use crate::waveform::Waveform;

use ndarray::Array1;
use num::complex::Complex64;
use num::traits::FloatConst;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taper {
    #[default]
    Rectangular,
    Hann,
}

fn hanning(length: usize) -> Array1<Real> {
    let l = length as Real;
    Array1::linspace(0.5, l - 0.5, length).map(|&n| Real::sin(Real::PI() * n / l).powf(2.0))
}

impl Taper {
    /// Window with unit mean power, so tapering keeps the filter gain.
    pub fn window(&self, length: usize) -> Array1<Real> {
        match self {
            Taper::Rectangular => Array1::ones(length),
            Taper::Hann => {
                let window = hanning(length);
                let norm = (window.dot(&window) / length as Real).sqrt();
                window / norm
            }
        }
    }
}

/// Correlator against a sampled copy of one transmitted pulse.
#[derive(Clone, Debug)]
pub struct MatchedFilter {
    reference: Array1<Complex64>,
    method: Method,
}

impl MatchedFilter {
    /// Samples `transmit` over one pulse width at `resolution` and scales the
    /// copy by `sqrt(gain)`.
    pub fn new<W: Waveform>(transmit: &W, pulse_width: Real, resolution: Real, gain: Real) -> Self {
        Self::tapered(transmit, pulse_width, resolution, gain, Taper::Rectangular)
    }

    pub fn tapered<W: Waveform>(
        transmit: &W,
        pulse_width: Real,
        resolution: Real,
        gain: Real,
        taper: Taper,
    ) -> Self {
        let len = (pulse_width / resolution).floor() as i64;
        let pulse = transmit.evaluate(&time_grid(0, len, resolution, 0.0));
        let window = taper.window(pulse.len()).map(|&w| Complex64::new(w * gain.sqrt(), 0.0));
        trace!(len, ?taper, gain, "matched filter reference");
        Self {
            reference: pulse * window,
            method: Method::Auto,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn reference(&self) -> &Array1<Complex64> {
        &self.reference
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Compressed pulse, same length as `received`, normalised by the
    /// reference length.
    pub fn apply(&self, received: &Array1<Complex64>) -> Array1<Complex64> {
        let received = received.to_vec();
        let reference = self.reference.to_vec();
        let scale = self.reference.len().max(1) as Real;
        correlate(&received, &reference, Mode::Same, self.method).map(|&c| c / scale)
    }
}
