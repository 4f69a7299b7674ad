use crate::common::Real;

use ndarray::Array1;
use num::complex::Complex64;
use num::traits::Zero;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};

/// Direct correlation is used below this many multiply-adds with `Auto`.
const DIRECT_LIMIT: usize = 1 << 14;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Every lag with any overlap, `n + m - 1` samples.
    Full,
    /// The centred `n` samples of the full output.
    Same,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    #[default]
    Auto,
    Direct,
    Fft,
}

/// Cross-correlation `z[k] = Σ x[k - (m - 1) + j] · conj(y[j])`.
pub fn correlate(x: &[Complex64], y: &[Complex64], mode: Mode, method: Method) -> Array1<Complex64> {
    let (n, m) = (x.len(), y.len());
    if n == 0 || m == 0 {
        let len = match mode {
            Mode::Full => (n + m).saturating_sub(1),
            Mode::Same => n,
        };
        return Array1::zeros(len);
    }

    let full = match method {
        Method::Direct => correlate_direct(x, y),
        Method::Fft => correlate_fft(x, y),
        Method::Auto if n * m <= DIRECT_LIMIT => correlate_direct(x, y),
        Method::Auto => correlate_fft(x, y),
    };

    match mode {
        Mode::Full => Array1::from(full),
        Mode::Same => {
            let start = (m - 1) / 2;
            full[start..start + n].iter().cloned().collect()
        }
    }
}

fn correlate_direct(x: &[Complex64], y: &[Complex64]) -> Vec<Complex64> {
    let (n, m) = (x.len(), y.len());

    let lag = |k: usize| -> Complex64 {
        y.iter()
            .enumerate()
            .filter_map(|(j, &c)| {
                let i = (k + j).checked_sub(m - 1)?;
                x.get(i).map(|&v| v * c.conj())
            })
            .sum()
    };

    (0..n + m - 1).map(lag).collect()
}

fn correlate_fft(x: &[Complex64], y: &[Complex64]) -> Vec<Complex64> {
    let (n, m) = (x.len(), y.len());
    let len = n + m - 1;

    let mut planner: FftPlanner<Real> = FftPlanner::new();
    let fft = planner.plan_fft_forward(len);
    let ifft = planner.plan_fft_inverse(len);

    let mut signal = vec![Complex64::zero(); len];
    signal[..n].copy_from_slice(x);

    // Time-reversed conjugate turns the correlation into a convolution.
    let mut kernel = vec![Complex64::zero(); len];
    kernel
        .iter_mut()
        .zip(y.iter().rev())
        .for_each(|(k, &c)| *k = c.conj());

    fft.process(&mut signal);
    fft.process(&mut kernel);

    let mut product: Vec<Complex64> = signal
        .iter()
        .zip(kernel.iter())
        .map(|(&s, &k)| s * k)
        .collect();

    ifft.process(&mut product);

    let scale = len as Real;
    product.iter().map(|&c| c / scale).collect()
}
