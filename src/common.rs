use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Add;

use ndarray::Array1;
use num::traits::{Num, ToPrimitive};
use serde::{Deserialize, Serialize};

pub type Real = f64;

/// Propagation speed in metres per nanosecond.
pub const SPEED_OF_LIGHT: Real = 0.3;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decibel(Real);

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ratio(Real);

impl Add for Decibel {
    type Output = Decibel;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl From<Decibel> for Ratio {
    fn from(db: Decibel) -> Self {
        Self(Real::powf(10.0, db.0 / 20.0))
    }
}

impl From<Ratio> for Decibel {
    fn from(ratio: Ratio) -> Self {
        Self(20.0 * Real::log10(ratio.0))
    }
}

macro_rules! impl_from_primitive_for {
    ($DR: ty) => {
        impl<T: Num + ToPrimitive> From<T> for $DR {
            #[inline]
            fn from(value: T) -> Self {
                Self(value.to_f64().unwrap_or(Real::NAN))
            }
        }
    };
}

impl_from_primitive_for!(Decibel);
impl_from_primitive_for!(Ratio);

impl From<Decibel> for Real {
    fn from(db: Decibel) -> Self {
        db.0
    }
}

impl From<Ratio> for Real {
    fn from(ratio: Ratio) -> Self {
        ratio.0
    }
}

pub trait Units {
    fn db(self) -> Decibel;

    fn ratio(self) -> Ratio;

    fn value(self) -> Real;
}

impl<T: Into<Decibel> + Into<Ratio> + Into<Real>> Units for T {
    fn db(self) -> Decibel {
        self.into()
    }

    fn ratio(self) -> Ratio {
        self.into()
    }

    fn value(self) -> Real {
        self.into()
    }
}

/// Point reflector moving at constant velocity along the line of sight.
///
/// Negative velocity moves the target towards the radar.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub location: Real,
    pub velocity: Real,
    pub cross_section: Real,
}

impl Target {
    pub fn new(location: Real, velocity: Real, cross_section: Real) -> Self {
        Self {
            location,
            velocity,
            cross_section,
        }
    }

    pub fn stationary(location: Real, cross_section: Real) -> Self {
        Self::new(location, 0.0, cross_section)
    }

    pub fn position_at(&self, t: Real) -> Real {
        self.location + self.velocity * t
    }

    /// Two-way delay to the target at its initial location.
    pub fn round_trip_delay(&self) -> Real {
        2.0 * self.location / SPEED_OF_LIGHT
    }
}

/// Sample times `n * resolution + offset` for `n` in `start..stop`.
pub fn time_grid(start: i64, stop: i64, resolution: Real, offset: Real) -> Array1<Real> {
    (start..stop)
        .map(|n| n as Real * resolution + offset)
        .collect()
}

pub trait Storable: Serialize {
    fn to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
