//! Sample loop configuration
//!
//! Everything here is fixed at build time. The firmware reads the
//! calibration sample count from a compile-time environment variable (see the
//! firmware `build.rs`) and validates it with [`parse_calibration_samples`].

use core::num::NonZeroU16;

use crate::error::ConfigError;

/// Samples averaged per calibration event when nothing else is configured.
pub const DEFAULT_CALIBRATION_SAMPLES: NonZeroU16 = NonZeroU16::MIN;

/// Pause after each steady-state display update.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 200;
/// How long "Init OK" stays on screen.
pub const DEFAULT_INIT_OK_MS: u32 = 1000;
/// How long the identity warning stays on screen.
pub const DEFAULT_IDENTITY_WARNING_MS: u32 = 5000;
/// Settle time after the sample rate divider is written.
pub const DEFAULT_SETTLE_MS: u32 = 1000;
/// How long "Calibrating..." stays on screen after a calibration pass.
pub const DEFAULT_CALIBRATION_NOTICE_MS: u32 = 1000;

/// How the two raw bytes of an axis are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawEncoding {
    /// `(hi << 8) | lo` as an unsigned 16-bit value, no sign extension.
    #[default]
    Unsigned,
    /// The same 16 bits read as two's complement, which is what the sensor
    /// actually produces.
    TwosComplement,
}

impl RawEncoding {
    /// Interpret a raw 16-bit axis word.
    pub const fn decode(self, raw: u16) -> i32 {
        match self {
            RawEncoding::Unsigned => raw as i32,
            RawEncoding::TwosComplement => raw as i16 as i32,
        }
    }
}

/// Tunables for [`SampleLoop`](crate::SampleLoop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLoopConfig {
    pub calibration_samples: NonZeroU16,
    pub encoding: RawEncoding,
    pub sample_interval_ms: u32,
    pub init_ok_ms: u32,
    pub identity_warning_ms: u32,
    pub settle_ms: u32,
    pub calibration_notice_ms: u32,
}

impl Default for SampleLoopConfig {
    fn default() -> Self {
        Self {
            calibration_samples: DEFAULT_CALIBRATION_SAMPLES,
            encoding: RawEncoding::default(),
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            init_ok_ms: DEFAULT_INIT_OK_MS,
            identity_warning_ms: DEFAULT_IDENTITY_WARNING_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            calibration_notice_ms: DEFAULT_CALIBRATION_NOTICE_MS,
        }
    }
}

impl SampleLoopConfig {
    pub fn with_calibration_samples(mut self, samples: NonZeroU16) -> Self {
        self.calibration_samples = samples;
        self
    }

    pub fn with_encoding(mut self, encoding: RawEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_sample_interval_ms(mut self, ms: u32) -> Self {
        self.sample_interval_ms = ms;
        self
    }

    /// Set every startup and notice pause at once. Mostly useful for tests
    /// and the simulator, which have no operator to wait for.
    pub fn with_notice_pauses_ms(mut self, ms: u32) -> Self {
        self.init_ok_ms = ms;
        self.identity_warning_ms = ms;
        self.settle_ms = ms;
        self.calibration_notice_ms = ms;
        self
    }
}

/// Parse a calibration sample count such as `"16"`.
///
/// Surrounding whitespace is ignored. Zero is rejected since the mean of no
/// samples is undefined.
pub fn parse_calibration_samples(value: &str) -> Result<NonZeroU16, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty);
    }

    let count: u16 = value.parse().map_err(|_| ConfigError::NotANumber)?;
    NonZeroU16::new(count).ok_or(ConfigError::ZeroCalibrationSamples)
}
