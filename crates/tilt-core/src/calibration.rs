//! Zero-offset calibration
//!
//! A calibration event averages N raw samples per axis. The resulting means
//! are used as divisors when normalizing later readings, so a mean of exactly
//! zero is replaced by one. A real zero baseline therefore looks the same as
//! a guarded one.

use core::num::NonZeroU16;

use embedded_hal::i2c::I2c;
use log::info;

use crate::accelerometer::{AccelerometerDriver, Axis, AxisSample};
use crate::config::RawEncoding;
use crate::error::AccelError;

/// Per-axis divisors produced by one calibration event.
///
/// Never zero on any axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationReference {
    x: f32,
    y: f32,
    z: f32,
}

impl CalibrationReference {
    /// Build a reference from per-axis means, applying the zero-guard.
    pub fn from_means(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: guard_zero(x),
            y: guard_zero(y),
            z: guard_zero(z),
        }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Divide a raw axis value by this axis' reference.
    pub fn normalize(&self, axis: Axis, value: i32) -> f32 {
        value as f32 / self.get(axis)
    }
}

fn guard_zero(mean: f32) -> f32 {
    if mean == 0.0 { 1.0 } else { mean }
}

/// Running per-axis sums. `i64` cannot overflow for any `u16` sample count.
#[derive(Default)]
struct AxisSums([i64; 3]);

impl AxisSums {
    fn add(&mut self, sample: &AxisSample, encoding: RawEncoding) {
        for (sum, axis) in self.0.iter_mut().zip(Axis::ALL) {
            *sum += sample.value(axis, encoding) as i64;
        }
    }

    fn mean(&self, count: usize) -> CalibrationReference {
        let n = count as f32;
        let [x, y, z] = self.0;
        CalibrationReference::from_means(x as f32 / n, y as f32 / n, z as f32 / n)
    }
}

/// Averages raw samples into a [`CalibrationReference`].
#[derive(Debug, Clone, Copy)]
pub struct CalibrationEngine {
    samples: NonZeroU16,
    encoding: RawEncoding,
}

impl CalibrationEngine {
    pub const fn new(samples: NonZeroU16, encoding: RawEncoding) -> Self {
        Self { samples, encoding }
    }

    /// Average already-collected samples.
    ///
    /// Returns `None` for an empty slice.
    pub fn reference_from(&self, samples: &[AxisSample]) -> Option<CalibrationReference> {
        if samples.is_empty() {
            return None;
        }

        let mut sums = AxisSums::default();
        for sample in samples {
            sums.add(sample, self.encoding);
        }
        Some(sums.mean(samples.len()))
    }

    /// Read the configured number of samples and average them.
    ///
    /// Performs one bus transaction per sample, back to back. The first
    /// failure aborts the pass and is returned unchanged.
    pub fn calibrate<I: I2c>(
        &self,
        driver: &mut AccelerometerDriver<I>,
    ) -> Result<CalibrationReference, AccelError<I::Error>> {
        let mut sums = AxisSums::default();
        for _ in 0..self.samples.get() {
            sums.add(&driver.read_all_axes()?, self.encoding);
        }
        let reference = sums.mean(self.samples.get() as usize);

        info!(
            "Calibrated over {} samples: x={} y={} z={}",
            self.samples.get(),
            reference.x,
            reference.y,
            reference.z
        );
        Ok(reference)
    }
}
