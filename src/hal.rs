//! The hardware seam. Everything the firmware needs from the board goes through
//! these traits, so the same code runs against real pins or the simulators.
//!
//! Timing and the GPIO lines use `embedded-hal`. The EEPROM bus keeps its own
//! trait because the store drives start, restart and stop conditions one step
//! at a time.

use core::convert::Infallible;

pub use embedded_hal::delay::DelayNs;
pub use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState, StatefulOutputPin};

/// Level of the D/C line of the display controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Command,
    Data,
}

impl From<Mode> for PinState {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Command => PinState::Low,
            Mode::Data => PinState::High,
        }
    }
}

/// The control lines between the MCU and the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    DataCommand,
    ChipSelect,
    Reset,
    Backlight,
}

impl Line {
    pub const ALL: [Line; 4] = [
        Line::DataCommand,
        Line::ChipSelect,
        Line::Reset,
        Line::Backlight,
    ];
}

/// Unwraps a GPIO result on a port that cannot fail.
pub fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// The SPI side of the panel plus its control lines.
///
/// The handheld's port pins never fail, so the lines are bound to
/// `Error = Infallible` and the helpers below return plain values.
pub trait DisplayBus {
    type Pin: StatefulOutputPin<Error = Infallible>;

    fn pin(&mut self, line: Line) -> &mut Self::Pin;
    fn transfer(&mut self, byte: u8);

    fn set_mode(&mut self, mode: Mode) {
        infallible(self.pin(Line::DataCommand).set_state(mode.into()));
    }

    /// `true` selects the controller. The line itself is active low.
    fn set_chip_select(&mut self, selected: bool) {
        infallible(self.pin(Line::ChipSelect).set_state(PinState::from(!selected)));
    }

    /// `true` holds the controller in reset. Active low as well.
    fn set_reset(&mut self, active: bool) {
        infallible(self.pin(Line::Reset).set_state(PinState::from(!active)));
    }

    fn set_backlight(&mut self, on: bool) {
        infallible(self.pin(Line::Backlight).set_state(PinState::from(on)));
    }

    fn backlight(&mut self) -> bool {
        infallible(self.pin(Line::Backlight).is_set_high())
    }

    fn toggle_backlight(&mut self) {
        infallible(self.pin(Line::Backlight).toggle());
    }
}

/// Byte level two-wire (I2C) master.
pub trait TwoWireBus {
    type Error: std::error::Error + 'static;

    fn set_enabled(&mut self, enabled: bool);
    fn start(&mut self) -> Result<(), Self::Error>;
    fn restart(&mut self) -> Result<(), Self::Error>;
    fn stop(&mut self) -> Result<(), Self::Error>;
    /// Sends one byte and checks that the device acknowledged it.
    fn put(&mut self, byte: u8) -> Result<(), Self::Error>;
    /// Reads one byte. `nack` marks the last byte of a read.
    fn get(&mut self, nack: bool) -> Result<u8, Self::Error>;
}

/// The single push button, wired to pull its input low.
pub trait Controls {
    type Button: InputPin<Error = Infallible>;

    fn button(&mut self) -> &mut Self::Button;

    fn pressed(&mut self) -> bool {
        infallible(self.button().is_low())
    }
}

/// A complete handheld: timer, button, panel and EEPROM bus.
pub trait Board: DelayNs + Controls + DisplayBus + TwoWireBus {}

impl<T: DelayNs + Controls + DisplayBus + TwoWireBus> Board for T {}
