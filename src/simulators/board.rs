use super::eeprom::{BusError, SimulatedEeprom};
use super::lcd::SimulatedLcd;
use crate::hal::{
    Controls, DelayNs, DisplayBus, ErrorType, InputPin, Line, Mode, OutputPin, StatefulOutputPin,
    TwoWireBus,
};
use std::convert::Infallible;

/// Decides the button level from the virtual time in milliseconds.
pub type ButtonScript = Box<dyn FnMut(u64) -> bool>;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// An output port pin. Remembers whether it was driven low since the board
/// last looked, so a reset pulse between two transfers is not lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedLine {
    high: bool,
    pulled_low: bool,
}

impl SimulatedLine {
    pub fn is_high(&self) -> bool {
        self.high
    }

    fn take_pulled_low(&mut self) -> bool {
        std::mem::take(&mut self.pulled_low)
    }
}

impl ErrorType for SimulatedLine {
    type Error = Infallible;
}

impl OutputPin for SimulatedLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        self.pulled_low = true;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for SimulatedLine {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high)
    }
}

/// The button input. Its level comes from a script over the board's clock.
pub struct SimulatedButton {
    script: ButtonScript,
    now_ms: u64,
}

impl ErrorType for SimulatedButton {
    type Error = Infallible;
}

impl InputPin for SimulatedButton {
    // pressed pulls the line low
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!(self.script)(self.now_ms))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok((self.script)(self.now_ms))
    }
}

/// A whole handheld in memory. Delays only advance a virtual clock, so a full
/// session runs instantly.
pub struct SimulatedBoard {
    lcd: SimulatedLcd,
    eeprom: SimulatedEeprom,
    lines: [SimulatedLine; 4],
    elapsed_ns: u64,
    button: SimulatedButton,
}

impl Default for SimulatedBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimulatedBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SimulatedBoard")
            .field("elapsed_ns", &self.elapsed_ns)
            .field("lines", &self.lines)
            .field("eeprom", &self.eeprom)
            .finish()
    }
}

impl SimulatedBoard {
    pub fn new() -> Self {
        Self::with_eeprom(SimulatedEeprom::new())
    }

    pub fn with_eeprom(eeprom: SimulatedEeprom) -> Self {
        Self {
            lcd: SimulatedLcd::new(),
            eeprom,
            lines: [SimulatedLine::default(); 4],
            elapsed_ns: 0,
            button: SimulatedButton {
                script: Box::new(|_| false),
                now_ms: 0,
            },
        }
    }

    pub fn set_button_script<F>(&mut self, script: F)
    where
        F: FnMut(u64) -> bool + 'static,
    {
        self.button.script = Box::new(script);
    }

    /// Presses the button for `hold_ms` at the start of every `period_ms`.
    pub fn press_periodically(&mut self, period_ms: u64, hold_ms: u64) {
        let period_ms = period_ms.max(1);
        self.set_button_script(move |now| now % period_ms < hold_ms);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / NANOS_PER_MILLI
    }

    pub fn line(&self, line: Line) -> SimulatedLine {
        self.lines[line as usize]
    }

    /// Whether the backlight LED is lit.
    pub fn backlight_on(&self) -> bool {
        self.line(Line::Backlight).is_high()
    }

    pub fn lcd(&self) -> &SimulatedLcd {
        &self.lcd
    }

    pub fn eeprom(&self) -> &SimulatedEeprom {
        &self.eeprom
    }

    pub fn eeprom_mut(&mut self) -> &mut SimulatedEeprom {
        &mut self.eeprom
    }
}

impl DelayNs for SimulatedBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.elapsed_ns += u64::from(us) * 1000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ns += u64::from(ms) * NANOS_PER_MILLI;
    }
}

impl Controls for SimulatedBoard {
    type Button = SimulatedButton;

    fn button(&mut self) -> &mut SimulatedButton {
        self.button.now_ms = self.elapsed_ms();
        &mut self.button
    }
}

impl DisplayBus for SimulatedBoard {
    type Pin = SimulatedLine;

    fn pin(&mut self, line: Line) -> &mut SimulatedLine {
        &mut self.lines[line as usize]
    }

    fn transfer(&mut self, byte: u8) {
        let reset = &mut self.lines[Line::Reset as usize];
        if reset.take_pulled_low() {
            self.lcd.reset();
        }
        let in_reset = !reset.is_high();
        if in_reset || self.line(Line::ChipSelect).is_high() {
            return;
        }

        let mode = if self.line(Line::DataCommand).is_high() {
            Mode::Data
        } else {
            Mode::Command
        };
        self.lcd.write(mode, byte);
    }
}

impl TwoWireBus for SimulatedBoard {
    type Error = BusError;

    fn set_enabled(&mut self, enabled: bool) {
        self.eeprom.set_enabled(enabled);
    }

    fn start(&mut self) -> Result<(), BusError> {
        self.eeprom.start()
    }

    fn restart(&mut self) -> Result<(), BusError> {
        self.eeprom.restart()
    }

    fn stop(&mut self) -> Result<(), BusError> {
        self.eeprom.stop()
    }

    fn put(&mut self, byte: u8) -> Result<(), BusError> {
        self.eeprom.put(byte)
    }

    fn get(&mut self, nack: bool) -> Result<u8, BusError> {
        self.eeprom.get(nack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::FRAMEBUFFER_SIZE;
    use crate::hal::infallible;

    #[test]
    fn test_delays_advance_the_clock() {
        let mut board = SimulatedBoard::new();
        board.delay_ms(80);
        board.delay_us(200);
        board.delay_us(800);
        board.delay_ns(999_999);
        assert_eq!(81, board.elapsed_ms());
        board.delay_ns(1);
        assert_eq!(82, board.elapsed_ms());
    }

    #[test]
    fn test_button_script_sees_the_clock() {
        let mut board = SimulatedBoard::new();
        assert!(!board.pressed());
        assert!(infallible(board.button().is_high()));

        board.set_button_script(|now| now >= 100);
        assert!(!board.pressed());
        board.delay_ms(100);
        assert!(board.pressed());
        assert!(!infallible(board.button().is_high()));

        board.press_periodically(50, 10);
        assert!(board.pressed());
        board.delay_ms(10);
        assert!(!board.pressed());
        board.delay_ms(40);
        assert!(board.pressed());
    }

    #[test]
    fn test_unselected_bytes_are_ignored() {
        let mut board = SimulatedBoard::new();
        board.set_reset(false);
        board.set_mode(Mode::Data);
        board.set_chip_select(false);
        board.transfer(0xFF);
        assert_eq!(&[0; FRAMEBUFFER_SIZE], board.lcd().ram());

        board.set_chip_select(true);
        board.transfer(0xFF);
        assert_eq!(0xFF, board.lcd().ram()[0]);
    }

    #[test]
    fn test_reset_pulse_reaches_the_controller() {
        let mut board = SimulatedBoard::new();
        board.set_reset(false);
        board.set_chip_select(true);
        board.set_mode(Mode::Command);
        board.transfer(0x21);
        board.transfer(0xC2);
        assert_eq!(0x42, board.lcd().vop());

        // held in reset, bytes are dropped
        board.set_reset(true);
        board.transfer(0xC5);
        assert_eq!(0, board.lcd().vop());

        // a pulse that ends before the next transfer still resets
        board.transfer(0x21);
        board.transfer(0xC2);
        board.set_reset(false);
        board.transfer(0x21);
        board.transfer(0xC2);
        assert_eq!(0x42, board.lcd().vop());
        board.set_reset(true);
        board.set_reset(false);
        board.transfer(0x20);
        assert_eq!(0, board.lcd().vop());
    }

    #[test]
    fn test_backlight_line() {
        let mut board = SimulatedBoard::new();
        assert!(!board.backlight_on());
        board.set_backlight(true);
        assert!(board.backlight_on());
        board.toggle_backlight();
        assert!(!board.backlight_on());
        assert!(!board.line(Line::Backlight).is_high());
    }
}
