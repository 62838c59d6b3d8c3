//! I2C bus bring-up for the tilt device
//!
//! The MPU6050 and the SSD1306 share I2C0. The bus lives in a static so each
//! device can hold a `'static` handle to it.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use esp_hal::Blocking;
use esp_hal::i2c::master::{Config as I2cConfig, ConfigError, I2c};
use esp_hal::peripherals::{GPIO16, GPIO17, I2C0};
use esp_hal::time::Rate;
use log::info;
use static_cell::StaticCell;
use tilt_core::SharedI2cDevice;

pub type I2cBus = I2c<'static, Blocking>;

/// Handle to the shared I2C0 bus, one per device.
pub type BusDevice = SharedI2cDevice<'static, CriticalSectionRawMutex, I2cBus>;

/// Bus handles for every I2C peripheral on the board.
pub struct I2cDevices {
    pub accelerometer: BusDevice,
    pub display: BusDevice,
}

/// Configure I2C0 on SDA = GPIO16, SCL = GPIO17 and hand out one device
/// handle per peripheral.
///
/// Must be called at most once; the bus is placed in a `StaticCell`.
pub fn init_i2c_bus(
    i2c0: I2C0<'static>,
    sda: GPIO16<'static>,
    scl: GPIO17<'static>,
    frequency_khz: u32,
) -> Result<I2cDevices, ConfigError> {
    static I2C0_BUS: StaticCell<Mutex<CriticalSectionRawMutex, RefCell<I2cBus>>> =
        StaticCell::new();

    let config = I2cConfig::default().with_frequency(Rate::from_khz(frequency_khz));
    let i2c = I2c::new(i2c0, config)?.with_sda(sda).with_scl(scl);
    let bus = I2C0_BUS.init(Mutex::new(RefCell::new(i2c)));

    info!("I2C0 ready at {} kHz", frequency_khz);

    Ok(I2cDevices {
        accelerometer: SharedI2cDevice::new(bus),
        display: SharedI2cDevice::new(bus),
    })
}
