//! MPU6050 accelerometer driver
//!
//! Owns the sensor's power and sample-rate configuration and exposes raw
//! axis reads. Every read is a fresh bus transaction; nothing is cached.

use embedded_hal::i2c::I2c;
use log::{debug, info, warn};

use crate::config::RawEncoding;
use crate::error::AccelError;
use crate::registers::{
    ACCEL_BURST_LEN, ACCEL_XOUT_H, DeviceHandle, EXPECTED_IDENTITY, PWR_MGMT_1,
    SAMPLE_RATE_DIVIDER, SMPLRT_DIV, WAKE, WHO_AM_I,
};

/// One accelerometer axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Offset of this axis' high byte within the acceleration burst.
    const fn burst_offset(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 2,
            Axis::Z => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Raw X/Y/Z words from one acceleration burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSample {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

impl AxisSample {
    pub const fn new(x: u16, y: u16, z: u16) -> Self {
        Self { x, y, z }
    }

    /// Decode a six byte X-H, X-L, Y-H, Y-L, Z-H, Z-L burst.
    pub const fn from_burst(burst: &[u8; ACCEL_BURST_LEN]) -> Self {
        Self {
            x: decode_word(burst[0], burst[1]),
            y: decode_word(burst[2], burst[3]),
            z: decode_word(burst[4], burst[5]),
        }
    }

    pub const fn raw(&self, axis: Axis) -> u16 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Axis value under the given encoding.
    pub const fn value(&self, axis: Axis, encoding: RawEncoding) -> i32 {
        encoding.decode(self.raw(axis))
    }
}

/// Combine a high and low byte into one big-endian 16-bit word.
#[inline]
pub const fn decode_word(hi: u8, lo: u8) -> u16 {
    ((hi as u16) << 8) | lo as u16
}

/// Outcome of the identity check performed by [`AccelerometerDriver::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceIdentity {
    /// `WHO_AM_I` returned the expected value.
    Confirmed,
    /// `WHO_AM_I` returned something else. The device was configured anyway.
    Mismatch { found: u8 },
}

impl DeviceIdentity {
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, DeviceIdentity::Confirmed)
    }
}

/// Blocking MPU6050 driver over any `embedded-hal` I2C bus.
pub struct AccelerometerDriver<I> {
    i2c: I,
    device: DeviceHandle,
}

impl<I: I2c> AccelerometerDriver<I> {
    pub fn new(i2c: I, device: DeviceHandle) -> Self {
        Self { i2c, device }
    }

    /// Wake the sensor, check its identity and set the sample rate divider.
    ///
    /// An identity mismatch is reported through the returned
    /// [`DeviceIdentity`] rather than as an error: the divider is still
    /// written and the caller decides how to warn the operator.
    pub fn initialize(&mut self) -> Result<DeviceIdentity, AccelError<I::Error>> {
        self.write_register(PWR_MGMT_1, WAKE)?;

        let found = self.read_register(WHO_AM_I)?;
        let identity = if found == EXPECTED_IDENTITY {
            info!("MPU6050 at {:#04x} awake", self.device.address());
            DeviceIdentity::Confirmed
        } else {
            warn!(
                "MPU6050 at {:#04x}: WHO_AM_I returned {:#04x}, expected {:#04x}",
                self.device.address(),
                found,
                EXPECTED_IDENTITY
            );
            DeviceIdentity::Mismatch { found }
        };

        self.write_register(SMPLRT_DIV, SAMPLE_RATE_DIVIDER)?;

        Ok(identity)
    }

    /// Read all three axes in one burst.
    pub fn read_all_axes(&mut self) -> Result<AxisSample, AccelError<I::Error>> {
        let sample = AxisSample::from_burst(&self.read_burst()?);
        debug!("accel raw x={} y={} z={}", sample.x, sample.y, sample.z);
        Ok(sample)
    }

    /// Read a single axis.
    ///
    /// The sensor's output registers are read as a full burst from
    /// `ACCEL_XOUT_H`, and only the requested pair is kept.
    pub fn read_axis(&mut self, axis: Axis) -> Result<u16, AccelError<I::Error>> {
        let burst = self.read_burst()?;
        let at = axis.burst_offset();
        Ok(decode_word(burst[at], burst[at + 1]))
    }

    fn read_burst(&mut self) -> Result<[u8; ACCEL_BURST_LEN], AccelError<I::Error>> {
        let mut burst = [0u8; ACCEL_BURST_LEN];
        self.i2c
            .write_read(self.device.address(), &[ACCEL_XOUT_H], &mut burst)
            .map_err(AccelError::Bus)?;
        Ok(burst)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), AccelError<I::Error>> {
        self.i2c
            .write(self.device.address(), &[register, value])
            .map_err(AccelError::Bus)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, AccelError<I::Error>> {
        let mut value = [0u8];
        self.i2c
            .write_read(self.device.address(), &[register], &mut value)
            .map_err(AccelError::Bus)?;
        Ok(value[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_word_is_unsigned_big_endian() {
        assert_eq!(decode_word(0x00, 0x00), 0);
        assert_eq!(decode_word(0x01, 0x02), 0x0102);
        assert_eq!(decode_word(0x80, 0x00), 0x8000);
        assert_eq!(decode_word(0xFF, 0xFF), 0xFFFF);
    }

    #[test]
    fn test_decode_word_exhaustive_high_bytes() {
        // Every high byte, including those with the sign bit set, keeps its
        // unsigned magnitude.
        for hi in 0..=u8::MAX {
            for lo in [0x00, 0x7F, 0x80, 0xFF] {
                let expected = ((hi as u32) << 8 | lo as u32) as u16;
                assert_eq!(decode_word(hi, lo), expected);
            }
        }
    }

    #[test]
    fn test_from_burst_pairs_axes_in_register_order() {
        let sample = AxisSample::from_burst(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]);
        assert_eq!(sample, AxisSample::new(0x1234, 0x5678, 0x9ABC));
        assert_eq!(sample.raw(Axis::Y), 0x5678);
        assert_eq!(sample.value(Axis::Z, RawEncoding::Unsigned), 0x9ABC);
        assert_eq!(
            sample.value(Axis::Z, RawEncoding::TwosComplement),
            0x9ABCu16 as i16 as i32
        );
    }
}
