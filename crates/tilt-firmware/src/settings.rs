//! Settings baked in at compile time by `build.rs`

use core::num::NonZeroU16;

use log::warn;
use tilt_core::config::{DEFAULT_CALIBRATION_SAMPLES, parse_calibration_samples};

/// Bus clock used when `TILT_I2C_FREQUENCY_KHZ` is unusable.
pub const DEFAULT_I2C_FREQUENCY_KHZ: u32 = 400;

const CALIBRATION_SAMPLES: &str = env!("TILT_CALIBRATION_SAMPLES");
const I2C_FREQUENCY_KHZ: &str = env!("TILT_I2C_FREQUENCY_KHZ");

/// Samples averaged per calibration event.
pub fn calibration_samples() -> NonZeroU16 {
    parse_calibration_samples(CALIBRATION_SAMPLES).unwrap_or_else(|e| {
        warn!(
            "TILT_CALIBRATION_SAMPLES={:?} rejected ({}), using {}",
            CALIBRATION_SAMPLES, e, DEFAULT_CALIBRATION_SAMPLES
        );
        DEFAULT_CALIBRATION_SAMPLES
    })
}

pub fn i2c_frequency_khz() -> u32 {
    match I2C_FREQUENCY_KHZ.trim().parse::<u32>() {
        Ok(khz) if khz > 0 => khz,
        _ => {
            warn!(
                "TILT_I2C_FREQUENCY_KHZ={:?} rejected, using {}",
                I2C_FREQUENCY_KHZ, DEFAULT_I2C_FREQUENCY_KHZ
            );
            DEFAULT_I2C_FREQUENCY_KHZ
        }
    }
}
