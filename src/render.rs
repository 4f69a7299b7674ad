//! Drawing surface abstraction and a headless recorder.
//!
//! Waves are drawn as polylines: sample `i` of `n` lands at
//! `x0 + i·(x1 - x0)/(n - 1)` and `y + Re(sample)`, truncated to whole
//! pixels. Only the real part of a complex sample is drawn.

use crate::common::{Real, Storable};

use ndarray::Array1;
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);

    fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub type Point = (i32, i32);

/// Pixel coordinates of a wave drawn across `[x0, x1]` around row `y`.
pub fn wave_points(samples: &Array1<Complex64>, x0: Real, x1: Real, y: Real) -> Vec<Point> {
    let xs = Array1::linspace(x0, x1, samples.len());
    xs.iter()
        .zip(samples.iter())
        .map(|(&x, s)| (x as i32, (s.re + y) as i32))
        .collect()
}

pub trait Renderer {
    fn fill(&mut self, color: Rgb);

    fn draw_line(&mut self, color: Rgb, from: Point, to: Point);

    fn draw_polyline(&mut self, color: Rgb, points: &[Point]);

    /// Ends the current frame.
    fn present(&mut self);

    fn draw_wave(&mut self, samples: &Array1<Complex64>, x0: Real, x1: Real, y: Real, color: Rgb) {
        let points = wave_points(samples, x0, x1, y);
        self.draw_polyline(color, &points);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub color: Rgb,
    pub points: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub background: Rgb,
    pub lines: Vec<Polyline>,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            lines: vec![],
        }
    }
}

impl Frame {
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = width,
            h = height
        );
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
            self.background.hex()
        ));
        for line in self.lines.iter().filter(|l| l.points.len() > 1) {
            let points: Vec<String> = line
                .points
                .iter()
                .map(|(x, y)| format!("{},{}", x, y))
                .collect();
            svg.push_str(&format!(
                "<polyline fill=\"none\" stroke=\"{}\" points=\"{}\"/>\n",
                line.color.hex(),
                points.join(" ")
            ));
        }
        svg.push_str("</svg>\n");
        svg
    }
}

/// Keeps every presented frame in memory.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FrameRecorder {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Frame>,
    #[serde(skip)]
    current: Frame,
}

impl Storable for FrameRecorder {}

impl FrameRecorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn last_svg(&self) -> Option<String> {
        self.last().map(|frame| frame.to_svg(self.width, self.height))
    }
}

impl Renderer for FrameRecorder {
    fn fill(&mut self, color: Rgb) {
        self.current.background = color;
        self.current.lines.clear();
    }

    fn draw_line(&mut self, color: Rgb, from: Point, to: Point) {
        self.draw_polyline(color, &[from, to]);
    }

    fn draw_polyline(&mut self, color: Rgb, points: &[Point]) {
        self.current.lines.push(Polyline {
            color,
            points: points.to_vec(),
        });
    }

    fn present(&mut self) {
        let frame = std::mem::take(&mut self.current);
        self.frames.push(frame);
    }
}
