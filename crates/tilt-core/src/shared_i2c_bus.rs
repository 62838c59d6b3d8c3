//! Blocking I2C bus sharing
//!
//! The accelerometer and the OLED sit on the same two-wire bus. Each gets its
//! own [`SharedI2cDevice`] handle, and every transaction holds the bus lock
//! for its whole duration so two devices never interleave on the wire.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::i2c::{ErrorType, I2c, Operation};

/// I2C bus sharing device using Embassy's blocking Mutex.
///
/// The bus is not reentrant and must only be used from the main context; the
/// recalibration interrupt never touches it. A bus kept in a `static` needs a
/// `CriticalSectionRawMutex`, while a `NoopRawMutex` is enough for a bus that
/// lives on the stack.
///
/// # Example
///
/// ```
/// use core::cell::RefCell;
/// use embassy_sync::blocking_mutex::{Mutex, raw::NoopRawMutex};
/// use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
/// use tilt_core::SharedI2cDevice;
///
/// let expectations: [Transaction; 0] = [];
/// let mut i2c = Mock::new(&expectations);
/// let bus: Mutex<NoopRawMutex, _> = Mutex::new(RefCell::new(i2c.clone()));
///
/// let _sensor = SharedI2cDevice::new(&bus);
/// let _display = SharedI2cDevice::new(&bus);
/// i2c.done();
/// ```
pub struct SharedI2cDevice<'a, M: RawMutex, T> {
    bus: &'a Mutex<M, RefCell<T>>,
}

impl<'a, M: RawMutex, T> SharedI2cDevice<'a, M, T> {
    /// Create a new `SharedI2cDevice`.
    #[inline]
    pub const fn new(bus: &'a Mutex<M, RefCell<T>>) -> Self {
        Self { bus }
    }
}

impl<M, T> ErrorType for SharedI2cDevice<'_, M, T>
where
    M: RawMutex,
    T: ErrorType,
{
    type Error = T::Error;
}

impl<M, T> I2c for SharedI2cDevice<'_, M, T>
where
    M: RawMutex,
    T: I2c,
{
    #[inline]
    fn read(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.lock(|bus| bus.borrow_mut().read(address, read))
    }

    #[inline]
    fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        self.bus.lock(|bus| bus.borrow_mut().write(address, write))
    }

    #[inline]
    fn write_read(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.bus
            .lock(|bus| bus.borrow_mut().write_read(address, write, read))
    }

    #[inline]
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.bus
            .lock(|bus| bus.borrow_mut().transaction(address, operations))
    }
}
