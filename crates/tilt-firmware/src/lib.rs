//! ESP32-S3 firmware-specific modules for tilt-rs
//!
//! This crate contains the code that only makes sense on the device: I2C bus
//! bring-up, the SSD1306 panel behind the core display contract, the
//! recalibration button interrupt, and the settings baked in by `build.rs`.

#![no_std]

pub mod button;
pub mod hardware;
pub mod oled;
pub mod settings;
