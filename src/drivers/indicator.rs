//! Tri-color indicator driver.
//!
//! Generic over `embedded-hal` output pins so the same driver runs against
//! real GPIO (via [`GpioOut`]) and against in-memory pins under test.
//!
//! ## Exclusivity
//!
//! The classifier guarantees at most one indicator per spec; this driver
//! guarantees it at the pin level regardless: on every `drive` call the
//! two non-active pins are written low *first* and the active pin last, so
//! not even a transient multi-color state reaches the outputs.

use embedded_hal::digital::{OutputPin, PinState};

use crate::app::ports::IndicatorPort;
use crate::classify::Indicator;
use crate::drivers::hw_init;
use crate::pins;

/// Raw GPIO-backed output pin (real register writes on ESP-IDF, no-ops in
/// host simulation — see `hw_init::gpio_write`).
pub struct GpioOut {
    pin: i32,
}

impl GpioOut {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl embedded_hal::digital::ErrorType for GpioOut {
    type Error = core::convert::Infallible;
}

impl OutputPin for GpioOut {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, true);
        Ok(())
    }
}

/// The three indicator outputs plus the last commanded state.
pub struct IndicatorPins<P: OutputPin> {
    red: P,
    green: P,
    blue: P,
    active: Indicator,
    lit: bool,
}

impl<P: OutputPin> IndicatorPins<P> {
    /// Takes ownership of the three pins and drives them all low.
    pub fn new(red: P, green: P, blue: P) -> Self {
        let mut this = Self {
            red,
            green,
            blue,
            active: Indicator::None,
            lit: false,
        };
        this.all_off();
        this
    }

    /// Last commanded (indicator, level) — diagnostics/tests only.
    pub fn current(&self) -> (Indicator, bool) {
        (self.active, self.lit)
    }
}

impl<P: OutputPin> IndicatorPort for IndicatorPins<P> {
    fn drive(&mut self, indicator: Indicator, on: bool) {
        // Inactive pins first, active pin last.
        match indicator {
            Indicator::None => {
                let _ = self.red.set_low();
                let _ = self.green.set_low();
                let _ = self.blue.set_low();
            }
            Indicator::Red => {
                let _ = self.green.set_low();
                let _ = self.blue.set_low();
                let _ = self.red.set_state(PinState::from(on));
            }
            Indicator::Green => {
                let _ = self.red.set_low();
                let _ = self.blue.set_low();
                let _ = self.green.set_state(PinState::from(on));
            }
            Indicator::Blue => {
                let _ = self.red.set_low();
                let _ = self.green.set_low();
                let _ = self.blue.set_state(PinState::from(on));
            }
        }
        self.active = indicator;
        self.lit = on && indicator != Indicator::None;
    }

    fn all_off(&mut self) {
        self.drive(Indicator::None, false);
    }
}

/// The board's indicator, wired to the pins in [`crate::pins`].
pub fn board_indicator() -> IndicatorPins<GpioOut> {
    IndicatorPins::new(
        GpioOut::new(pins::LED_R_GPIO),
        GpioOut::new(pins::LED_G_GPIO),
        GpioOut::new(pins::LED_B_GPIO),
    )
}
