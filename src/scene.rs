//! The two demos.
//!
//! *Doppler*: a CW tone travels out to a target closing on the radar and
//! comes back compressed in time, so the echo (red) has a visibly higher
//! frequency than the transmitted wave (blue).
//!
//! *Compression*: two stationary targets closer together than one pulse
//! length. The bottom trace shows transmit (blue) and raw receive (red);
//! the top trace shows the receive signal after the matched filter. With a
//! chirp the two returns come out as separate peaks, with a CW pulse they
//! merge.

use crate::common::{time_grid, Real, Units, SPEED_OF_LIGHT};
use crate::config::{CompressionConfig, DopplerConfig, Surface};
use crate::error::ConfigResult;
use crate::filter::MatchedFilter;
use crate::noise::DeterministicNoise;
use crate::reflection::Reflection;
use crate::render::{Renderer, Rgb};
use crate::waveform::{chirp_pulse, cw_pulse, ContinuousWave, Pulse, Superposition, Waveform};

use ndarray::Array1;
use num::complex::Complex64;
use tracing::info;

/// Screen column of the radar in the doppler demo.
const RADAR_X: Real = 100.0;

const PIXELS_PER_METRE: Real = 100.0;

/// Samples drawn across each doppler trace.
const TRACE_SAMPLES: usize = 1000;

pub trait Scene {
    fn name(&self) -> &'static str;

    fn start_time(&self) -> Real;

    fn surface(&self) -> Surface;

    fn draw(&self, t: Real, renderer: &mut dyn Renderer);
}

fn scaled(samples: Array1<Complex64>, gain: Real) -> Array1<Complex64> {
    samples.map(|&s| s * gain)
}

/// Samples of one doppler frame. Both traces are indexed by distance from
/// the radar, out to the target.
pub struct DopplerFrame {
    pub target_range: Real,
    /// Outgoing wave: the field at distance `x` left the radar `x / c` ago.
    pub transmit: Array1<Complex64>,
    /// Returning wave: the field at distance `x` reaches the radar `x / c`
    /// from now.
    pub receive: Array1<Complex64>,
}

pub struct DopplerScene {
    config: DopplerConfig,
    transmit: ContinuousWave,
    echo: Reflection<ContinuousWave>,
}

impl DopplerScene {
    pub fn new(config: &DopplerConfig) -> ConfigResult<Self> {
        config.validate()?;
        let transmit = cw_pulse(config.frequency, config.pulse_width, config.pulse_interval);
        let echo = Reflection::new(transmit, config.target).with_attenuation(config.attenuation);
        info!(
            target_location = config.target.location,
            target_velocity = config.target.velocity,
            doppler_ratio = echo.doppler_ratio(),
            "doppler scene"
        );
        Ok(Self {
            config: config.clone(),
            transmit,
            echo,
        })
    }

    pub fn sample(&self, t: Real) -> DopplerFrame {
        let d = self.config.target.position_at(t);
        let flight = d / SPEED_OF_LIGHT;
        let outgoing = Array1::linspace(0.0, -flight, TRACE_SAMPLES) + t;
        let returning = Array1::linspace(0.0, flight, TRACE_SAMPLES) + t;
        DopplerFrame {
            target_range: d,
            transmit: self.transmit.evaluate(&outgoing),
            receive: self.echo.evaluate(&returning),
        }
    }
}

impl Scene for DopplerScene {
    fn name(&self) -> &'static str {
        "doppler"
    }

    fn start_time(&self) -> Real {
        self.config.start_time
    }

    fn surface(&self) -> Surface {
        self.config.surface
    }

    fn draw(&self, t: Real, renderer: &mut dyn Renderer) {
        let frame = self.sample(t);
        let height = self.config.surface.height as i32;
        let middle = self.config.surface.height as Real / 2.0;
        let target_x = RADAR_X + PIXELS_PER_METRE * frame.target_range;
        let gain = self.config.amplitude;

        renderer.fill(Rgb::WHITE);
        renderer.draw_line(Rgb::BLACK, (RADAR_X as i32, 0), (RADAR_X as i32, height));
        renderer.draw_line(Rgb::BLACK, (target_x as i32, 0), (target_x as i32, height));
        renderer.draw_wave(&scaled(frame.transmit, gain), RADAR_X, target_x, middle, Rgb::BLUE);
        renderer.draw_wave(&scaled(frame.receive, gain), RADAR_X, target_x, middle, Rgb::RED);
    }
}

/// Samples of one compression frame over the visible range window.
pub struct CompressionFrame {
    pub transmit: Array1<Complex64>,
    pub receive: Array1<Complex64>,
    pub compressed: Array1<Complex64>,
}

pub struct CompressionScene {
    config: CompressionConfig,
    transmit: Pulse,
    receive: Superposition,
    filter: MatchedFilter,
}

impl CompressionScene {
    pub fn new(config: &CompressionConfig) -> ConfigResult<Self> {
        config.validate()?;
        let transmit: Pulse = if config.pulse_compression {
            chirp_pulse(
                config.frequency - config.chirp_half_band,
                config.frequency + config.chirp_half_band,
                config.pulse_width,
                config.pulse_interval,
            )
            .into()
        } else {
            cw_pulse(config.frequency, config.pulse_width, config.pulse_interval).into()
        };

        let noise = DeterministicNoise::new(config.noise_level.ratio().value(), config.noise_seed);
        let receive = config
            .targets
            .iter()
            .fold(Superposition::new(), |sum, &target| {
                sum.with(Reflection::new(transmit, target).with_attenuation(config.attenuation))
            })
            .with(noise);

        let filter = MatchedFilter::tapered(
            &transmit,
            config.pulse_width,
            config.resolution,
            config.compression_gain,
            config.taper,
        )
        .with_method(config.method);

        info!(
            pulse_compression = config.pulse_compression,
            targets = config.targets.len(),
            reference_len = filter.len(),
            window_samples = config.window_samples(),
            "compression scene"
        );

        Ok(Self {
            config: config.clone(),
            transmit,
            receive,
            filter,
        })
    }

    /// Sample times covering the window that ends at `t`.
    pub fn window(&self, t: Real) -> Array1<Real> {
        time_grid(-self.config.window_samples(), 0, self.config.resolution, t)
    }

    pub fn sample(&self, t: Real) -> CompressionFrame {
        let times = self.window(t);
        let transmit = self.transmit.evaluate(&times);
        let receive = self.receive.evaluate(&times);
        let compressed = self.filter.apply(&receive);
        CompressionFrame {
            transmit,
            receive,
            compressed,
        }
    }
}

impl Scene for CompressionScene {
    fn name(&self) -> &'static str {
        "compression"
    }

    fn start_time(&self) -> Real {
        self.config.start_time
    }

    fn surface(&self) -> Surface {
        self.config.surface
    }

    fn draw(&self, t: Real, renderer: &mut dyn Renderer) {
        let frame = self.sample(t);
        let width = self.config.surface.width;
        let height = self.config.surface.height as Real;
        let x1 = width as Real;
        // Screen y grows downwards; flip the traces so positive is up.
        let gain = -self.config.amplitude;

        renderer.fill(Rgb::WHITE);
        renderer.draw_line(
            Rgb::BLACK,
            (0, (height / 2.0) as i32),
            (width as i32, (height / 2.0) as i32),
        );
        renderer.draw_wave(&scaled(frame.receive, gain), 0.0, x1, height * 0.75, Rgb::RED);
        renderer.draw_wave(&scaled(frame.transmit, gain), 0.0, x1, height * 0.75, Rgb::BLUE);
        renderer.draw_wave(&scaled(frame.compressed, gain), 0.0, x1, height * 0.25, Rgb::RED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FrameRecorder;
    use approx::assert_abs_diff_eq;
    use ndarray::s;

    #[test]
    fn doppler_traces_span_radar_to_target() {
        let scene = DopplerScene::new(&DopplerConfig::default()).unwrap();
        let frame = scene.sample(10.0);
        assert_abs_diff_eq!(frame.target_range, 6.0, epsilon = 1e-12);
        assert_eq!(frame.transmit.len(), TRACE_SAMPLES);
        assert_eq!(frame.receive.len(), TRACE_SAMPLES);
        // Only the part of the outgoing trace sent after t = 0 is lit.
        assert!(frame.transmit.iter().take(499).all(|s| (s.norm() - 1.0).abs() < 1e-9));
        assert!(frame.transmit.iter().skip(501).all(|s| s.norm() == 0.0));
        // The first echo has not come back yet.
        assert!(frame.receive.iter().all(|s| s.norm() == 0.0));
    }

    #[test]
    fn doppler_echo_arrives_later() {
        let scene = DopplerScene::new(&DopplerConfig::default()).unwrap();
        let frame = scene.sample(33.0);
        assert!(frame.receive.iter().all(|s| (s.norm() - 0.5).abs() < 1e-9));
    }

    #[test]
    fn doppler_draws_markers_and_two_waves() {
        let scene = DopplerScene::new(&DopplerConfig::default()).unwrap();
        let mut recorder = FrameRecorder::new(1000, 200);
        scene.draw(10.0, &mut recorder);
        recorder.present();
        let lines = &recorder.last().unwrap().lines;
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].points, vec![(100, 0), (100, 200)]);
        assert_eq!(lines[1].points[0], (700, 0));
        assert_eq!(lines[2].color, Rgb::BLUE);
        assert_eq!(lines[2].points.first().unwrap().0, 100);
        assert!((lines[2].points.last().unwrap().0 - 700).abs() <= 1);
        assert_eq!(lines[3].color, Rgb::RED);
    }

    #[test]
    fn compression_window_ends_at_current_time() {
        let scene = CompressionScene::new(&CompressionConfig::default()).unwrap();
        let times = scene.window(20.0);
        assert_eq!(times.len(), 1666);
        assert_abs_diff_eq!(times[times.len() - 1], 19.99, epsilon = 1e-9);
        assert_abs_diff_eq!(times[0], 20.0 - 16.66, epsilon = 1e-9);
    }

    #[test]
    fn compression_frame_resolves_both_targets() {
        let mut config = CompressionConfig::default();
        config.noise_level = crate::common::Decibel::from(-300.0_f64);
        let scene = CompressionScene::new(&config).unwrap();
        // Window covers receive times 3.34 .. 20, echoes at 4..5 and 5..6.
        let frame = scene.sample(20.0);
        let mags = frame.compressed.map(|c| c.norm());
        let index_of = |t: Real| ((t - 3.34) / 0.01).round() as usize;
        let near = index_of(4.5);
        let far = index_of(5.5);
        assert!(mags.slice(s![near - 2..=near + 2]).iter().any(|&m| m > 0.8));
        assert!(mags.slice(s![far - 2..=far + 2]).iter().any(|&m| m > 0.4));
        assert!(mags[index_of(5.0)] < 0.2);
        assert_eq!(frame.compressed.len(), frame.receive.len());
    }

    #[test]
    fn compression_draws_three_traces() {
        let scene = CompressionScene::new(&CompressionConfig::default()).unwrap();
        let mut recorder = FrameRecorder::new(1000, 400);
        scene.draw(4.5, &mut recorder);
        recorder.present();
        let lines = &recorder.last().unwrap().lines;
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].points, vec![(0, 200), (1000, 200)]);
        let colors: Vec<Rgb> = lines[1..].iter().map(|l| l.color).collect();
        assert_eq!(colors, vec![Rgb::RED, Rgb::BLUE, Rgb::RED]);
        assert!(lines[1..].iter().all(|l| l.points.len() == 1666));
    }

    #[test]
    fn cw_mode_builds_cw_reference() {
        let mut config = CompressionConfig::default();
        config.pulse_compression = false;
        let scene = CompressionScene::new(&config).unwrap();
        assert!(matches!(scene.transmit, Pulse::Cw(_)));
        assert_eq!(scene.filter.len(), 100);
    }
}
