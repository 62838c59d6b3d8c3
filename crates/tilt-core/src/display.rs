//! Text output to the monochrome display
//!
//! [`DisplaySink`] is the contract a concrete panel (SSD1306 on the device,
//! an SDL window in the simulator) has to meet. [`Screen`] owns a sink and
//! knows the layout of every screen the sample loop shows.
//!
//! Display failures never change the control flow of the sample loop: the
//! screen logs them and carries on.

use core::fmt::{Debug, Write};

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use log::{debug, error};

use crate::accelerometer::Axis;

/// Panel width in pixels.
pub const DISPLAY_WIDTH_PX: u32 = 128;
/// Panel height in pixels.
pub const DISPLAY_HEIGHT_PX: u32 = 64;

/// Left edge of the axis labels.
const LABEL_X_PX: i32 = 0;
/// Left edge of the axis values.
const VALUE_X_PX: i32 = 30;
/// Vertical pitch between text rows; one 6x10 glyph cell.
const ROW_HEIGHT_PX: i32 = 10;

/// Decimal places shown for normalized values.
const VALUE_PRECISION: usize = 3;

/// Shown when the sensor identity was confirmed.
pub const INIT_OK_MESSAGE: &str = "Init OK";
/// Shown when the sensor reported an unexpected identity.
pub const IDENTITY_WARNING_MESSAGE: &str = "WHO_AM_I";
/// Shown after a calibration pass.
pub const CALIBRATING_MESSAGE: &str = "Calibrating...";

/// Something that can render text frames.
///
/// A frame is built with [`clear`](Self::clear) and
/// [`draw_text`](Self::draw_text), then made visible with
/// [`present`](Self::present).
pub trait DisplaySink {
    type Error: Debug;

    /// Blank the frame being built.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Push the built frame to the panel.
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Draw text in the screen font onto any binary-color draw target.
///
/// Concrete [`DisplaySink`] implementations use this for `draw_text` so that
/// the device and the simulator render identically.
pub fn draw_text<D>(target: &mut D, text: &str, x: i32, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Lays out the sample loop's screens on a [`DisplaySink`].
pub struct Screen<S> {
    sink: S,
}

impl<S: DisplaySink> Screen<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Show a single line message in the top-left corner.
    pub fn show_message(&mut self, message: &str) {
        debug!("Screen message: {}", message);
        if let Err(e) = self.render_message(message) {
            error!("Display error while showing {:?}: {:?}", message, e);
        }
    }

    /// Show one labelled row per axis.
    pub fn show_values(&mut self, values: [f32; 3]) {
        if let Err(e) = self.render_values(values) {
            error!("Display error while showing values: {:?}", e);
        }
    }

    fn render_message(&mut self, message: &str) -> Result<(), S::Error> {
        self.sink.clear()?;
        self.sink.draw_text(message, LABEL_X_PX, 0)?;
        self.sink.present()
    }

    fn render_values(&mut self, values: [f32; 3]) -> Result<(), S::Error> {
        self.sink.clear()?;

        for (row, (axis, value)) in Axis::ALL.into_iter().zip(values).enumerate() {
            let y = row as i32 * ROW_HEIGHT_PX;

            let mut label: String<8> = String::new();
            // Capacity covers "X = ".
            let _ = write!(label, "{} = ", axis.label());
            self.sink.draw_text(&label, LABEL_X_PX, y)?;

            self.sink.draw_text(&format_value(value), VALUE_X_PX, y)?;
        }

        self.sink.present()
    }
}

/// Format a normalized value for display.
///
/// Values too wide for the buffer (only possible for huge magnitudes) are
/// shown as `"ovf"`.
pub fn format_value(value: f32) -> String<24> {
    let mut text = String::new();
    if write!(text, "{:.*}", VALUE_PRECISION, value).is_err() {
        text.clear();
        let _ = text.push_str("ovf");
    }
    text
}
