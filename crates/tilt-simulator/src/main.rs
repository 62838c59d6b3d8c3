//! Desktop simulator for the tilt-rs accelerometer display.
//!
//! Runs the tilt-core sample loop against a simulated MPU6050 and renders the
//! 128x64 OLED in an SDL2 window via `embedded-graphics-simulator`. The
//! simulated sensor reports a slowly wobbling gravity vector.
//!
//! # Key bindings
//!
//! | Key     | Action                                  |
//! |---------|-----------------------------------------|
//! | C       | Press the recalibration button          |
//! | F       | Inject an I2C fault (halts the loop)    |
//! | Q / Esc | Quit                                    |

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
    sdl2::Keycode,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use log::{error, info, warn};

use tilt_core::display::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, draw_text};
use tilt_core::registers::{ACCEL_XOUT_H, EXPECTED_IDENTITY, WHO_AM_I};
use tilt_core::{
    AccelerometerDriver, DeviceHandle, DisplaySink, RawEncoding, RecalibrationFlag,
    RecalibrationTrigger, SampleLoop, SampleLoopConfig,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 4;

/// Longest stretch a pause sleeps before pumping window events again.
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// One g at the sensor's ±2 g full scale.
const LSB_PER_G: f32 = 16384.0;

/// Recalibration request shared with the keyboard "button".
static RECALIBRATE: RecalibrationFlag = RecalibrationFlag::new();

// ---------------------------------------------------------------------------
// Simulated sensor
// ---------------------------------------------------------------------------

/// Register-level MPU6050 stand-in.
///
/// Acceleration registers are computed on read from the time since start, so
/// the board appears to be rocking gently.
struct SimulatedMpu {
    registers: [u8; 128],
    pointer: u8,
    started: Instant,
    fault: Rc<Cell<bool>>,
}

impl SimulatedMpu {
    fn new(fault: Rc<Cell<bool>>) -> Self {
        let mut registers = [0u8; 128];
        registers[WHO_AM_I as usize] = EXPECTED_IDENTITY;

        Self {
            registers,
            pointer: 0,
            started: Instant::now(),
            fault,
        }
    }

    /// Gravity in g along X, Y and Z at `t` seconds.
    fn gravity(t: f32) -> [f32; 3] {
        let x = 0.35 * (t * 0.4).sin();
        let y = 0.25 * (t * 0.27).cos();
        let z = (1.0 - x * x - y * y).max(0.0).sqrt();
        [x, y, z]
    }

    fn latch_acceleration(&mut self) {
        let t = self.started.elapsed().as_secs_f32();
        for (i, g) in Self::gravity(t).into_iter().enumerate() {
            let [hi, lo] = ((g * LSB_PER_G) as i16).to_be_bytes();
            self.registers[ACCEL_XOUT_H as usize + 2 * i] = hi;
            self.registers[ACCEL_XOUT_H as usize + 2 * i + 1] = lo;
        }
    }
}

impl ErrorType for SimulatedMpu {
    type Error = ErrorKind;
}

impl I2c for SimulatedMpu {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fault.get() {
            return Err(ErrorKind::Other);
        }
        if address != DeviceHandle::MPU6050.address() {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&register, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = register;
                    for (offset, value) in data.iter().enumerate() {
                        self.registers[(register as usize + offset) % 128] = *value;
                    }
                }
                Operation::Read(buffer) => {
                    if self.pointer == ACCEL_XOUT_H {
                        self.latch_acceleration();
                    }
                    for (offset, slot) in buffer.iter_mut().enumerate() {
                        *slot = self.registers[(self.pointer as usize + offset) % 128];
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// What the keyboard can do to the running simulation.
struct Controls {
    recalibrate: RecalibrationTrigger<'static>,
    fault: Rc<Cell<bool>>,
    quit: Rc<Cell<bool>>,
}

/// The SDL window plus the frame buffer drawn into it.
///
/// Shared between the display sink (which draws and presents) and the delay
/// (which keeps handling window events while the loop pauses).
struct Frontend {
    display: SimulatorDisplay<BinaryColor>,
    window: Window,
    controls: Controls,
}

impl Frontend {
    fn new(controls: Controls) -> Self {
        let display = SimulatorDisplay::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
        let output_settings = OutputSettingsBuilder::new()
            .theme(BinaryColorTheme::OledBlue)
            .scale(WINDOW_SCALE)
            .build();
        let mut window = Window::new("Tilt Simulator", &output_settings);

        // The SDL window is lazily initialized on the first `update()` call.
        // We must call `update()` once before `events()` or it will panic.
        window.update(&display);

        Self {
            display,
            window,
            controls,
        }
    }

    fn pump_events(&mut self) {
        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit => self.controls.quit.set(true),

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        self.controls.quit.set(true);
                    } else if keycode == Keycode::C {
                        info!("Recalibration requested");
                        self.controls.recalibrate.request();
                    } else if keycode == Keycode::F {
                        warn!("Injecting I2C fault");
                        self.controls.fault.set(true);
                    }
                }

                _ => {}
            }
        }
    }

    fn quit_requested(&self) -> bool {
        self.controls.quit.get()
    }
}

/// [`DisplaySink`] drawing into the simulator window.
struct SimulatorSink(Rc<RefCell<Frontend>>);

impl DisplaySink for SimulatorSink {
    type Error = core::convert::Infallible;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().display.clear(BinaryColor::Off)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), Self::Error> {
        draw_text(&mut self.0.borrow_mut().display, text, x, y)
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        let mut frontend = self.0.borrow_mut();
        let Frontend {
            display, window, ..
        } = &mut *frontend;
        window.update(display);
        Ok(())
    }
}

/// Wall-clock delay that keeps the window responsive.
///
/// Pauses are cut short once quit has been requested.
struct SimulatorDelay(Rc<RefCell<Frontend>>);

impl SimulatorDelay {
    fn pause(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let mut frontend = self.0.borrow_mut();
            frontend.pump_events();
            if frontend.quit_requested() {
                return;
            }
            drop(frontend);

            let now = Instant::now();
            if now >= deadline {
                return;
            }
            std::thread::sleep((deadline - now).min(FRAME_DURATION));
        }
    }
}

impl DelayNs for SimulatorDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.pause(Duration::from_nanos(ns.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.pause(Duration::from_millis(ms.into()));
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting tilt-rs simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: C=Recalibrate  F=Inject fault  Q=Quit");

    let fault = Rc::new(Cell::new(false));
    let quit = Rc::new(Cell::new(false));
    let frontend = Rc::new(RefCell::new(Frontend::new(Controls {
        recalibrate: RECALIBRATE.trigger(),
        fault: fault.clone(),
        quit: quit.clone(),
    })));

    // The simulated sensor produces signed readings.
    let config = SampleLoopConfig::default().with_encoding(RawEncoding::TwosComplement);
    let driver = AccelerometerDriver::new(SimulatedMpu::new(fault), DeviceHandle::MPU6050);
    let mut sample_loop = SampleLoop::new(
        driver,
        SimulatorSink(frontend.clone()),
        SimulatorDelay(frontend.clone()),
        RECALIBRATE.monitor(),
        config,
    );

    while !quit.get() {
        if let Err(e) = sample_loop.step() {
            error!("Accelerometer bus failure, halting: {}", e);
            break;
        }
    }

    // Halted: leave the last frame up until the window is closed.
    let mut idle = SimulatorDelay(frontend);
    while !quit.get() {
        idle.delay_ms(FRAME_DURATION.as_millis() as u32);
    }

    info!("Simulator exiting");
}
