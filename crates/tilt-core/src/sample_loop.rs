//! The init → calibrate → read/normalize/display cycle
//!
//! [`SampleLoop`] owns everything the cycle touches: the driver (and with it
//! the bus handle), the screen, the delay source, the current calibration
//! reference and the read side of the recalibration flag.
//!
//! ```text
//!   Init ──▶ Calibrating ──▶ Normalizing ──┐
//!                 ▲               │        │ every iteration
//!                 └── flag set ───┘◀───────┘
//! ```
//!
//! The flag is only looked at at the top of an iteration, so an edge that
//! arrives while a reading is in flight is served by the next iteration.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};

use crate::accelerometer::{AccelerometerDriver, Axis, DeviceIdentity};
use crate::calibration::{CalibrationEngine, CalibrationReference};
use crate::config::SampleLoopConfig;
use crate::display::{
    CALIBRATING_MESSAGE, DisplaySink, IDENTITY_WARNING_MESSAGE, INIT_OK_MESSAGE, Screen,
};
use crate::error::AccelError;
use crate::recalibration::RecalibrationMonitor;

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Sensor not yet initialized.
    Init,
    /// A calibration pass is running or was interrupted by a bus error.
    Calibrating,
    /// Steady state: reading, normalizing and displaying.
    Normalizing,
}

/// One steady-state reading divided by the calibration reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl NormalizedSample {
    pub fn as_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// What a single [`SampleLoop::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Calibrated(CalibrationReference),
    Displayed(NormalizedSample),
}

/// The accelerometer sample loop.
pub struct SampleLoop<'a, I, S, D> {
    driver: AccelerometerDriver<I>,
    screen: Screen<S>,
    delay: D,
    engine: CalibrationEngine,
    reference: Option<CalibrationReference>,
    pending: RecalibrationMonitor<'a>,
    config: SampleLoopConfig,
    state: LoopState,
}

impl<'a, I, S, D> SampleLoop<'a, I, S, D>
where
    I: I2c,
    S: DisplaySink,
    D: DelayNs,
{
    pub fn new(
        driver: AccelerometerDriver<I>,
        sink: S,
        delay: D,
        pending: RecalibrationMonitor<'a>,
        config: SampleLoopConfig,
    ) -> Self {
        Self {
            driver,
            screen: Screen::new(sink),
            delay,
            engine: CalibrationEngine::new(config.calibration_samples, config.encoding),
            reference: None,
            pending,
            config,
            state: LoopState::Init,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The reference currently used for normalization, if any calibration
    /// has completed.
    pub fn reference(&self) -> Option<CalibrationReference> {
        self.reference
    }

    /// Initialize the sensor and tell the operator how it went.
    ///
    /// An identity mismatch is shown for longer than the OK message but does
    /// not stop startup.
    pub fn start(&mut self) -> Result<DeviceIdentity, AccelError<I::Error>> {
        let identity = self.driver.initialize()?;

        match identity {
            DeviceIdentity::Confirmed => {
                self.screen.show_message(INIT_OK_MESSAGE);
                self.delay.delay_ms(self.config.init_ok_ms);
            }
            DeviceIdentity::Mismatch { .. } => {
                self.screen.show_message(IDENTITY_WARNING_MESSAGE);
                self.delay.delay_ms(self.config.identity_warning_ms);
            }
        }

        self.delay.delay_ms(self.config.settle_ms);
        self.state = LoopState::Calibrating;
        info!("Sensor initialized ({:?})", identity);
        Ok(identity)
    }

    /// Run one iteration.
    ///
    /// If a recalibration is pending (or no reference exists yet) this
    /// iteration calibrates; otherwise it reads, normalizes and displays one
    /// sample. Bus errors are returned as-is.
    pub fn step(&mut self) -> Result<Step, AccelError<I::Error>> {
        if self.state == LoopState::Init {
            self.start()?;
        }

        let reference = self.reference;
        match reference {
            Some(reference) if !self.pending.is_pending() => {
                self.normalize(reference).map(Step::Displayed)
            }
            _ => self.calibrate().map(Step::Calibrated),
        }
    }

    /// Initialize, then iterate until a bus error occurs.
    ///
    /// Never returns `Ok`. Whoever owns the loop decides whether a bus error
    /// means halting or restarting.
    pub fn run(&mut self) -> Result<Infallible, AccelError<I::Error>> {
        loop {
            self.step()?;
        }
    }

    fn calibrate(&mut self) -> Result<CalibrationReference, AccelError<I::Error>> {
        self.state = LoopState::Calibrating;

        let reference = self.engine.calibrate(&mut self.driver)?;
        self.reference = Some(reference);
        self.pending.clear();

        self.screen.show_message(CALIBRATING_MESSAGE);
        self.delay.delay_ms(self.config.calibration_notice_ms);

        self.state = LoopState::Normalizing;
        Ok(reference)
    }

    fn normalize(
        &mut self,
        reference: CalibrationReference,
    ) -> Result<NormalizedSample, AccelError<I::Error>> {
        let encoding = self.config.encoding;
        let mut values = [0.0f32; 3];
        for (value, axis) in values.iter_mut().zip(Axis::ALL) {
            let raw = self.driver.read_axis(axis)?;
            *value = reference.normalize(axis, encoding.decode(raw));
        }

        let [x, y, z] = values;
        let sample = NormalizedSample { x, y, z };
        debug!("normalized x={} y={} z={}", x, y, z);

        self.screen.show_values(values);
        self.delay.delay_ms(self.config.sample_interval_ms);
        Ok(sample)
    }
}
