#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::Io;
use log::{error, info};
use tilt_core::{AccelerometerDriver, DeviceHandle, RecalibrationFlag, SampleLoop, SampleLoopConfig};
use tilt_firmware::button;
use tilt_firmware::hardware::init_i2c_bus;
use tilt_firmware::oled::Oled;
use tilt_firmware::settings;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

/// Pending recalibration request. Starts set so the first iteration
/// calibrates. The button handler only ever sees its trigger.
static RECALIBRATE: RecalibrationFlag = RecalibrationFlag::new();

#[esp_hal::main]
fn main() -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let mut io = Io::new(peripherals.IO_MUX);
    button::init_button(&mut io, peripherals.GPIO18, RECALIBRATE.trigger());

    let devices = init_i2c_bus(
        peripherals.I2C0,
        peripherals.GPIO16,
        peripherals.GPIO17,
        settings::i2c_frequency_khz(),
    )
    .expect("Failed to configure I2C0");

    let oled = Oled::new(devices.display).expect("Failed to initialize display");
    info!("Display initialized!");

    let config =
        SampleLoopConfig::default().with_calibration_samples(settings::calibration_samples());
    info!("Averaging {} sample(s) per calibration", config.calibration_samples);

    let driver = AccelerometerDriver::new(devices.accelerometer, DeviceHandle::MPU6050);
    let mut sample_loop = SampleLoop::new(
        driver,
        oled,
        Delay::new(),
        RECALIBRATE.monitor(),
        config,
    );

    let Err(e) = sample_loop.run();
    error!("Accelerometer bus failure, halting: {}", e);

    loop {}
}
