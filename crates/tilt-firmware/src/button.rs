//! Recalibration button on GPIO18
//!
//! A rising edge on the pin raises an interrupt. The handler acknowledges it
//! and requests a recalibration through the trigger it was given; the sample
//! loop picks the request up at the top of its next iteration. Presses that
//! arrive before then collapse into one request.

use core::cell::RefCell;

use critical_section::Mutex;
use esp_hal::gpio::{Event, Input, InputConfig, Io, Pull};
use esp_hal::handler;
use esp_hal::peripherals::GPIO18;
use log::info;
use tilt_core::RecalibrationTrigger;

/// The button pin and the only capability its handler gets.
struct Button {
    input: Input<'static>,
    trigger: RecalibrationTrigger<'static>,
}

static BUTTON: Mutex<RefCell<Option<Button>>> = Mutex::new(RefCell::new(None));

/// Configure the button as a pulled-down input and listen for rising edges.
pub fn init_button(io: &mut Io<'_>, pin: GPIO18<'static>, trigger: RecalibrationTrigger<'static>) {
    io.set_interrupt_handler(on_button_edge);

    let mut input = Input::new(pin, InputConfig::default().with_pull(Pull::Down));

    critical_section::with(|cs| {
        input.listen(Event::RisingEdge);
        BUTTON.borrow_ref_mut(cs).replace(Button { input, trigger });
    });

    info!("Recalibration button armed on GPIO18");
}

#[handler]
fn on_button_edge() {
    critical_section::with(|cs| {
        let mut button = BUTTON.borrow_ref_mut(cs);
        let Some(button) = button.as_mut() else {
            return;
        };

        if button.input.is_interrupt_set() {
            button.input.clear_interrupt();
            button.trigger.request();
        }
    });
}
