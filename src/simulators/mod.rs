//! In-memory stand-ins for the handheld's peripherals. They run the firmware on
//! the desktop, in the browser and in tests.

pub mod board;
pub mod eeprom;
pub mod lcd;

pub use board::{SimulatedBoard, SimulatedButton, SimulatedLine};
pub use eeprom::{BusError, SimulatedEeprom};
pub use lcd::SimulatedLcd;
