//! Frame loop: owns the simulation clock and feeds each frame's time to a
//! scene.

use crate::common::Real;
use crate::config::ClockConfig;
use crate::render::Renderer;
use crate::scene::Scene;

use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq)]
pub struct Clock {
    pub t: Real,
    pub time_step: Real,
    pub frame: u64,
}

impl Clock {
    pub fn new(start: Real, time_step: Real) -> Self {
        Self {
            t: start,
            time_step,
            frame: 0,
        }
    }

    pub fn advance(&mut self) {
        self.t += self.time_step;
        self.frame += 1;
    }
}

/// Sleeps away whatever is left of each frame period.
#[derive(Debug)]
pub struct FramePacer {
    period: Duration,
    last: Option<Instant>,
}

impl FramePacer {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / frame_rate.max(1),
            last: None,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last {
            let elapsed = now.duration_since(last);
            if elapsed < self.period {
                thread::sleep(self.period - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

pub struct Driver<S, R> {
    scene: S,
    renderer: R,
    clock: Clock,
    pacer: Option<FramePacer>,
}

impl<S: Scene, R: Renderer> Driver<S, R> {
    pub fn new(scene: S, renderer: R, clock: &ClockConfig) -> Self {
        let clock = Clock::new(scene.start_time(), clock.time_step);
        Self {
            scene,
            renderer,
            clock,
            pacer: None,
        }
    }

    /// Holds the loop to real time at `frame_rate`.
    pub fn paced(mut self, frame_rate: u32) -> Self {
        self.pacer = Some(FramePacer::new(frame_rate));
        self
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Draws one frame at the current time, then advances the clock.
    pub fn step(&mut self) {
        debug!(frame = self.clock.frame, t = self.clock.t, "frame");
        self.scene.draw(self.clock.t, &mut self.renderer);
        self.renderer.present();
        if let Some(pacer) = self.pacer.as_mut() {
            pacer.tick();
        }
        self.clock.advance();
    }

    /// Runs frames until `quit` returns true. `quit` is polled before every
    /// frame. Returns the number of frames drawn.
    pub fn run<Q>(&mut self, mut quit: Q) -> u64
    where
        Q: FnMut(&Clock) -> bool,
    {
        info!(scene = self.scene.name(), t = self.clock.t, "starting frame loop");
        let first = self.clock.frame;
        while !quit(&self.clock) {
            self.step();
        }
        let frames = self.clock.frame - first;
        info!(frames, t = self.clock.t, "frame loop stopped");
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Surface;
    use crate::render::{FrameRecorder, Rgb};
    use approx::assert_abs_diff_eq;

    struct Marker;

    impl Scene for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn start_time(&self) -> Real {
            1.0
        }

        fn surface(&self) -> Surface {
            Surface::new(10, 10)
        }

        fn draw(&self, t: Real, renderer: &mut dyn Renderer) {
            renderer.fill(Rgb::WHITE);
            let x = (t * 100.0) as i32;
            renderer.draw_line(Rgb::BLACK, (x, 0), (x, 10));
        }
    }

    #[test]
    fn clock_advances_by_fixed_step() {
        let mut clock = Clock::new(10.0, 2.0 / 60.0);
        for _ in 0..60 {
            clock.advance();
        }
        assert_eq!(clock.frame, 60);
        assert_abs_diff_eq!(clock.t, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn runs_until_quit() {
        let config = ClockConfig {
            frame_rate: 60,
            time_step: 0.5,
        };
        let mut driver = Driver::new(Marker, FrameRecorder::new(10, 10), &config);
        let frames = driver.run(|clock| clock.frame >= 3);
        assert_eq!(frames, 3);
        assert_abs_diff_eq!(driver.clock().t, 2.5);

        let recorder = driver.into_renderer();
        let xs: Vec<i32> = recorder
            .frames
            .iter()
            .map(|frame| frame.lines[0].points[0].0)
            .collect();
        assert_eq!(xs, vec![100, 150, 200]);
    }

    #[test]
    fn quit_before_first_frame_draws_nothing() {
        let mut driver = Driver::new(Marker, FrameRecorder::new(10, 10), &ClockConfig::default());
        assert_eq!(driver.run(|_| true), 0);
        assert!(driver.renderer().frames.is_empty());
    }

    #[test]
    fn pacer_holds_frame_period() {
        let mut pacer = FramePacer::new(100);
        let start = Instant::now();
        for _ in 0..3 {
            pacer.tick();
        }
        assert!(start.elapsed() >= Duration::from_millis(19));
    }
}
