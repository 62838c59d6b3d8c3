//! Hardware-independent core library for tilt-rs
//!
//! This crate contains all platform-agnostic logic for the tilt accelerometer
//! display: the MPU6050 register map and driver, zero-offset calibration, the
//! recalibration request flag shared with the button interrupt, the text
//! screen layout, and the sample loop that ties them together.
//!
//! It is `#![no_std]` so it compiles on both embedded targets (ESP32-S3) and
//! desktop hosts (for the simulator and tests).

#![no_std]

pub mod accelerometer;
pub mod calibration;
pub mod config;
pub mod display;
pub mod error;
pub mod recalibration;
pub mod registers;
pub mod sample_loop;
pub mod shared_i2c_bus;

pub use accelerometer::{AccelerometerDriver, Axis, AxisSample, DeviceIdentity};
pub use calibration::{CalibrationEngine, CalibrationReference};
pub use config::{RawEncoding, SampleLoopConfig};
pub use display::{DisplaySink, Screen};
pub use error::{AccelError, ConfigError};
pub use recalibration::{
    EdgeWatcher, RecalibrationFlag, RecalibrationMonitor, RecalibrationTrigger, RisingEdge,
};
pub use registers::DeviceHandle;
pub use sample_loop::{LoopState, NormalizedSample, SampleLoop, Step};
pub use shared_i2c_bus::SharedI2cDevice;
