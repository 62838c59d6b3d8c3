//! MPU6050 register map and fixed protocol values

/// Device identity register. Reads back [`EXPECTED_IDENTITY`] on a genuine part.
pub const WHO_AM_I: u8 = 0x75;
/// Power management 1. Writing [`WAKE`] clears the sleep bit.
pub const PWR_MGMT_1: u8 = 0x6B;
/// Sample rate divider.
pub const SMPLRT_DIV: u8 = 0x19;
/// First of the six contiguous acceleration output registers.
pub const ACCEL_XOUT_H: u8 = 0x3B;

/// Number of bytes in one X/Y/Z acceleration burst.
pub const ACCEL_BURST_LEN: usize = 6;

/// Value reported by [`WHO_AM_I`] (decimal 104).
pub const EXPECTED_IDENTITY: u8 = 0x68;
/// Wake command: sleep cleared, clock from the X gyro PLL.
pub const WAKE: u8 = 0x01;
/// Divider of 8 against the 8 kHz gyro output rate gives a 1 kHz update rate.
pub const SAMPLE_RATE_DIVIDER: u8 = 0x07;

/// Identifies one MPU6050 on the bus.
///
/// The register map is fixed by the part, so only the 7-bit address varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceHandle {
    address: u8,
}

impl DeviceHandle {
    /// Default address with the AD0 pin tied low.
    pub const MPU6050: Self = Self::new(0x68);
    /// Alternate address with the AD0 pin tied high.
    pub const MPU6050_ALT: Self = Self::new(0x69);

    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    /// 7-bit bus address.
    pub const fn address(&self) -> u8 {
        self.address
    }
}

impl Default for DeviceHandle {
    fn default() -> Self {
        Self::MPU6050
    }
}
