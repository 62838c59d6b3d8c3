//! SSD1306 panel behind [`DisplaySink`]

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::i2c::I2c;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use tilt_core::DisplaySink;
use tilt_core::display::draw_text;

pub type OledDriver<I> =
    Ssd1306<I2CInterface<I>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

pub type OledError<I> = <OledDriver<I> as DrawTarget>::Error;

/// 128x64 SSD1306 at the default address (0x3C), buffered.
///
/// Frames are drawn into the local buffer and only sent over the bus on
/// [`present`](DisplaySink::present).
pub struct Oled<I> {
    driver: OledDriver<I>,
}

impl<I: I2c> Oled<I> {
    pub fn new(i2c: I) -> Result<Self, OledError<I>> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        driver.init()?;

        Ok(Self { driver })
    }
}

impl<I: I2c> DisplaySink for Oled<I> {
    type Error = OledError<I>;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.driver.clear(BinaryColor::Off)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), Self::Error> {
        draw_text(&mut self.driver, text, x, y)
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.driver.flush()
    }
}
