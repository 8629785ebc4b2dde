use crate::definitions::{FRAMEBUFFER_SIZE, LCD_HEIGHT, LCD_PAGES, LCD_WIDTH};
use crate::hal::Mode;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Blank,
    AllOn,
    Normal,
    Inverse,
}

/// A PCD8544 controller. Only the visible behaviour is modelled: the display
/// RAM, the address pointer and the command registers. The board decides from
/// its control lines which bytes reach [SimulatedLcd::write].
#[derive(Clone)]
pub struct SimulatedLcd {
    ram: [u8; FRAMEBUFFER_SIZE],
    column: usize,
    page: usize,

    power_down: bool,
    vertical: bool,
    extended: bool,
    display_mode: DisplayMode,
    vop: u8,
    bias: u8,
    temperature_coefficient: u8,

    frames: u64,
}

impl Default for SimulatedLcd {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimulatedLcd {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for y in 0..LCD_HEIGHT {
            for x in 0..LCD_WIDTH {
                write!(f, "{}", if self.pixel(x, y) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl SimulatedLcd {
    pub fn new() -> Self {
        Self {
            ram: [0; FRAMEBUFFER_SIZE],
            column: 0,
            page: 0,
            power_down: true,
            vertical: false,
            extended: false,
            display_mode: DisplayMode::Blank,
            vop: 0,
            bias: 0,
            temperature_coefficient: 0,
            frames: 0,
        }
    }

    pub fn reset(&mut self) {
        self.column = 0;
        self.page = 0;
        self.power_down = true;
        self.vertical = false;
        self.extended = false;
        self.display_mode = DisplayMode::Blank;
        self.vop = 0;
        self.bias = 0;
        self.temperature_coefficient = 0;
    }

    pub fn ram(&self) -> &[u8; FRAMEBUFFER_SIZE] {
        &self.ram
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn vop(&self) -> u8 {
        self.vop
    }

    pub fn bias(&self) -> u8 {
        self.bias
    }

    pub fn temperature_coefficient(&self) -> u8 {
        self.temperature_coefficient
    }

    pub fn is_powered_down(&self) -> bool {
        self.power_down
    }

    pub fn address(&self) -> (usize, usize) {
        (self.column, self.page)
    }

    /// Number of times the address pointer wrapped back to (0, 0).
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// What the glass shows at (x, y), after the display mode is applied.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= LCD_WIDTH || y >= LCD_HEIGHT || self.power_down {
            return false;
        }
        let bit = self.ram[(y / 8) * LCD_WIDTH + x] & (1 << (y % 8)) != 0;
        match self.display_mode {
            DisplayMode::Blank => false,
            DisplayMode::AllOn => true,
            DisplayMode::Normal => bit,
            DisplayMode::Inverse => !bit,
        }
    }

    fn write_data(&mut self, byte: u8) {
        self.ram[self.page * LCD_WIDTH + self.column] = byte;

        if self.vertical {
            self.page += 1;
            if self.page == LCD_PAGES {
                self.page = 0;
                self.column = (self.column + 1) % LCD_WIDTH;
            }
        } else {
            self.column += 1;
            if self.column == LCD_WIDTH {
                self.column = 0;
                self.page = (self.page + 1) % LCD_PAGES;
            }
        }

        if self.column == 0 && self.page == 0 {
            self.frames += 1;
        }
    }

    fn write_command(&mut self, byte: u8) {
        trace!("lcd command {:#04x}", byte);

        // function set is shared by both instruction sets
        if byte & 0xF8 == 0x20 {
            self.power_down = byte & 0x04 != 0;
            self.vertical = byte & 0x02 != 0;
            self.extended = byte & 0x01 != 0;
            return;
        }

        if self.extended {
            match byte {
                0x04..=0x07 => self.temperature_coefficient = byte & 0x03,
                0x10..=0x17 => self.bias = byte & 0x07,
                0x80..=0xFF => self.vop = byte & 0x7F,
                _ => debug!("unhandled extended lcd command {:#04x}", byte),
            }
        } else {
            match byte {
                0x08..=0x0F if byte & 0x02 == 0 => {
                    let d = byte & 0x04 != 0;
                    let e = byte & 0x01 != 0;
                    self.display_mode = match (d, e) {
                        (false, false) => DisplayMode::Blank,
                        (false, true) => DisplayMode::AllOn,
                        (true, false) => DisplayMode::Normal,
                        (true, true) => DisplayMode::Inverse,
                    };
                }
                0x40..=0x47 => {
                    let page = (byte & 0x07) as usize;
                    if page < LCD_PAGES {
                        self.page = page;
                    }
                }
                0x80..=0xFF => {
                    let column = (byte & 0x7F) as usize;
                    if column < LCD_WIDTH {
                        self.column = column;
                    }
                }
                _ => debug!("unhandled lcd command {:#04x}", byte),
            }
        }
    }
}

impl SimulatedLcd {
    /// One byte clocked in while the chip is selected.
    pub fn write(&mut self, mode: Mode, byte: u8) {
        match mode {
            Mode::Command => self.write_command(byte),
            Mode::Data => self.write_data(byte),
        }
    }
}
