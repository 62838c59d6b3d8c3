//! Recalibration request flag shared between the button interrupt and the
//! sample loop
//!
//! The flag is the only state crossing from interrupt context into the main
//! loop. It is split into two capabilities:
//!
//! - [`RecalibrationTrigger`] can only *set* the flag. It is what the GPIO
//!   interrupt handler gets, so the handler has no way to reach the bus, the
//!   display or anything that blocks.
//! - [`RecalibrationMonitor`] can read and clear it. Only the sample loop
//!   holds one.
//!
//! Setting is idempotent: any number of edges before the loop consumes the
//! flag result in a single recalibration.
//!
//! # Example
//!
//! ```
//! use tilt_core::RecalibrationFlag;
//!
//! static RECALIBRATE: RecalibrationFlag = RecalibrationFlag::new();
//!
//! let trigger = RECALIBRATE.trigger();
//! let monitor = RECALIBRATE.monitor();
//!
//! // Starts pending so the first loop iteration calibrates.
//! assert!(monitor.is_pending());
//! monitor.clear();
//!
//! trigger.request();
//! trigger.request();
//! assert!(monitor.is_pending());
//! monitor.clear();
//! assert!(!monitor.is_pending());
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::InputPin;

/// Backing storage for the pending-recalibration flag.
///
/// Usually placed in a `static` so the interrupt handler can reach it.
#[derive(Debug)]
pub struct RecalibrationFlag {
    pending: AtomicBool,
}

impl RecalibrationFlag {
    /// A new flag, already pending so startup calibrates once.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(true),
        }
    }

    /// Set-only handle for interrupt context.
    pub const fn trigger(&self) -> RecalibrationTrigger<'_> {
        RecalibrationTrigger { flag: &self.pending }
    }

    /// Read/clear handle for the sample loop.
    pub const fn monitor(&self) -> RecalibrationMonitor<'_> {
        RecalibrationMonitor { flag: &self.pending }
    }
}

impl Default for RecalibrationFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Requests a recalibration. Safe to call from an interrupt handler.
#[derive(Debug, Clone, Copy)]
pub struct RecalibrationTrigger<'a> {
    flag: &'a AtomicBool,
}

impl RecalibrationTrigger<'_> {
    /// Mark a recalibration as pending. Never blocks.
    #[inline]
    pub fn request(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

/// Observes and consumes recalibration requests.
#[derive(Debug)]
pub struct RecalibrationMonitor<'a> {
    flag: &'a AtomicBool,
}

impl RecalibrationMonitor<'_> {
    /// Whether a recalibration is pending. May change between calls.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Mark the pending request as served.
    ///
    /// A request arriving while the calibration pass ran is folded into that
    /// pass.
    #[inline]
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Software rising-edge detector over sampled pin levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisingEdge {
    last_high: bool,
}

impl RisingEdge {
    /// Start from a known level so a pin that is already high at startup does
    /// not count as an edge.
    pub const fn new(initial_high: bool) -> Self {
        Self {
            last_high: initial_high,
        }
    }

    /// Feed the current level. Returns `true` on a low to high transition.
    pub fn update(&mut self, high: bool) -> bool {
        let rising = high && !self.last_high;
        self.last_high = high;
        rising
    }
}

/// Polls a pull-down button and requests recalibration on each press.
///
/// For targets or tests without a GPIO edge interrupt. It holds the same
/// set-only capability an interrupt handler would.
pub struct EdgeWatcher<'a, P> {
    pin: P,
    edge: RisingEdge,
    trigger: RecalibrationTrigger<'a>,
}

impl<'a, P: InputPin> EdgeWatcher<'a, P> {
    pub fn new(mut pin: P, trigger: RecalibrationTrigger<'a>) -> Result<Self, P::Error> {
        let initial_high = pin.is_high()?;
        Ok(Self {
            pin,
            edge: RisingEdge::new(initial_high),
            trigger,
        })
    }

    /// Sample the pin once. Returns `true` if this poll saw a rising edge.
    pub fn poll(&mut self) -> Result<bool, P::Error> {
        let rising = self.edge.update(self.pin.is_high()?);
        if rising {
            self.trigger.request();
        }
        Ok(rising)
    }
}
