use super::framebuffer::Framebuffer;
use crate::hal::{DelayNs, DisplayBus, Mode};

// PCD8544 instruction bytes
pub const FUNCTION_SET: u8 = 0x20;
pub const EXTENDED_INSTRUCTIONS: u8 = 0x01;
pub const DISPLAY_CONTROL: u8 = 0x08;
pub const DISPLAY_NORMAL: u8 = 0x04;
pub const TEMPERATURE_COEFFICIENT: u8 = 0x04;
pub const BIAS_SYSTEM: u8 = 0x10;
pub const SET_VOP: u8 = 0x80;
pub const SET_Y_ADDRESS: u8 = 0x40;
pub const SET_X_ADDRESS: u8 = 0x80;

// contrast used by the init sequence
pub const INIT_VOP: u8 = 0x42;

pub fn command<D: DisplayBus>(bus: &mut D, value: u8) {
    bus.set_mode(Mode::Command);
    bus.set_chip_select(true);
    bus.transfer(value);
    bus.set_chip_select(false);
}

pub fn data<D: DisplayBus>(bus: &mut D, value: u8) {
    bus.set_mode(Mode::Data);
    bus.set_chip_select(true);
    bus.transfer(value);
    bus.set_chip_select(false);
}

/// Pushes the whole framebuffer to the panel. Relies on the controller's
/// horizontal addressing wrapping back to (0, 0) after the last byte.
pub fn flush<D: DisplayBus>(bus: &mut D, fb: &Framebuffer) {
    bus.set_mode(Mode::Data);
    bus.set_chip_select(true);
    for byte in fb.serialize() {
        bus.transfer(byte);
    }
    bus.set_chip_select(false);
}

pub fn init<B: DisplayBus + DelayNs>(bus: &mut B, fb: &mut Framebuffer) {
    bus.set_mode(Mode::Data);
    bus.set_chip_select(false);
    bus.delay_us(200);

    bus.set_reset(true);
    bus.delay_ms(1);
    bus.set_reset(false);

    command(bus, FUNCTION_SET | EXTENDED_INSTRUCTIONS);
    command(bus, SET_VOP | INIT_VOP);
    command(bus, BIAS_SYSTEM | 0x03);
    command(bus, FUNCTION_SET);
    command(bus, DISPLAY_CONTROL | 0x01);
    bus.delay_ms(1);

    fb.clear();
    flush(bus, fb);

    command(bus, DISPLAY_CONTROL);
    bus.delay_ms(1);
    command(bus, DISPLAY_CONTROL | DISPLAY_NORMAL);
    bus.delay_ms(1);
}

/// Sets the operating voltage (contrast). Only the low 7 bits are used.
pub fn set_contrast<D: DisplayBus>(bus: &mut D, vop: u8) {
    command(bus, FUNCTION_SET | EXTENDED_INSTRUCTIONS);
    command(bus, SET_VOP | (vop & 0x7f));
    command(bus, FUNCTION_SET);
}

pub fn set_backlight<D: DisplayBus>(bus: &mut D, on: bool) {
    bus.set_backlight(on);
}

pub fn toggle_backlight<D: DisplayBus>(bus: &mut D) {
    bus.toggle_backlight();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::FRAMEBUFFER_SIZE;
    use crate::hal::{ErrorType, Line, OutputPin, StatefulOutputPin};
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Level(Line, bool),
        Byte(u8),
        WaitUs(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct LoggedPin {
        line: Line,
        high: bool,
        log: Log,
    }

    impl ErrorType for LoggedPin {
        type Error = Infallible;
    }

    impl OutputPin for LoggedPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.log.borrow_mut().push(Event::Level(self.line, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.log.borrow_mut().push(Event::Level(self.line, true));
            Ok(())
        }
    }

    impl StatefulOutputPin for LoggedPin {
        fn is_set_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    struct Recorder {
        pins: Vec<LoggedPin>,
        log: Log,
    }

    impl Default for Recorder {
        fn default() -> Self {
            let log = Log::default();
            let pins = Line::ALL
                .iter()
                .map(|&line| LoggedPin {
                    line,
                    high: false,
                    log: log.clone(),
                })
                .collect();
            Self { pins, log }
        }
    }

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.log.borrow().clone()
        }

        fn bytes(&self, mode: Mode) -> Vec<u8> {
            let mut current = Mode::Data;
            let mut out = Vec::new();
            for event in self.events() {
                match event {
                    Event::Level(Line::DataCommand, high) => {
                        current = if high { Mode::Data } else { Mode::Command };
                    }
                    Event::Byte(b) if current == mode => out.push(b),
                    _ => {}
                }
            }
            out
        }
    }

    impl DisplayBus for Recorder {
        type Pin = LoggedPin;

        fn pin(&mut self, line: Line) -> &mut LoggedPin {
            &mut self.pins[line as usize]
        }

        fn transfer(&mut self, byte: u8) {
            self.log.borrow_mut().push(Event::Byte(byte));
        }
    }

    impl DelayNs for Recorder {
        fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Event::WaitUs(ns / 1000));
        }

        fn delay_us(&mut self, us: u32) {
            self.log.borrow_mut().push(Event::WaitUs(us));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::WaitUs(ms * 1000));
        }
    }

    #[test]
    fn test_flush_sends_exactly_the_framebuffer() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(0, 0, true);
        fb.set_pixel(83, 47, true);

        let mut bus = Recorder::default();
        flush(&mut bus, &fb);

        let sent = bus.bytes(Mode::Data);
        assert_eq!(FRAMEBUFFER_SIZE, sent.len());
        assert_eq!(fb.serialize().to_vec(), sent);
        assert!(bus.bytes(Mode::Command).is_empty());
        // deselected again, the line is active low
        assert_eq!(
            Some(&Event::Level(Line::ChipSelect, true)),
            bus.events().last()
        );
    }

    #[test]
    fn test_init_sequence() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(1, 1, true);
        let mut bus = Recorder::default();
        init(&mut bus, &mut fb);

        assert_eq!(
            vec![0x21, 0xC2, 0x13, 0x20, 0x09, 0x08, 0x0C],
            bus.bytes(Mode::Command)
        );
        assert_eq!(vec![0; FRAMEBUFFER_SIZE], bus.bytes(Mode::Data));
        assert_eq!(0, fb.count_lit());

        assert_eq!(
            &[
                Event::Level(Line::DataCommand, true),
                Event::Level(Line::ChipSelect, true),
                Event::WaitUs(200),
                Event::Level(Line::Reset, false),
                Event::WaitUs(1000),
                Event::Level(Line::Reset, true),
            ],
            &bus.events()[..6]
        );
    }

    #[test]
    fn test_contrast_is_wrapped_in_extended_mode() {
        let mut bus = Recorder::default();
        set_contrast(&mut bus, 0x3f);
        set_contrast(&mut bus, 0xff);
        assert_eq!(
            vec![0x21, 0xBF, 0x20, 0x21, 0xFF, 0x20],
            bus.bytes(Mode::Command)
        );
    }

    #[test]
    fn test_backlight_toggle() {
        let mut bus = Recorder::default();
        set_backlight(&mut bus, true);
        toggle_backlight(&mut bus);
        assert!(!bus.backlight());
        toggle_backlight(&mut bus);
        assert!(bus.backlight());
    }
}
