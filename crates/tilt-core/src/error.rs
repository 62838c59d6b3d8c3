//! Error types shared by the driver, calibration and sample loop

use thiserror_no_std::Error;

/// Failure of an accelerometer operation.
///
/// `E` is the error type of the underlying I2C bus. A bus failure is never
/// retried or swallowed inside this crate; it always reaches the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelError<E> {
    #[error("I2C transaction failed: {0:?}")]
    Bus(E),
}

/// Rejected compile-time configuration value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("value is empty")]
    Empty,
    #[error("value is not a decimal number")]
    NotANumber,
    #[error("calibration sample count must be at least 1")]
    ZeroCalibrationSamples,
}
