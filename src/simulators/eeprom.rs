use crate::definitions::{Address, EEPROM_BANK_BIT, EEPROM_DEVICE_ADDRESS, EEPROM_ERASED};
use crate::hal::TwoWireBus;
use log::trace;
use thiserror::Error;

// 2 banks of 32 KiB
pub const BANK_SIZE: usize = 0x8000;
pub const EEPROM_SIZE: usize = 2 * BANK_SIZE;

// bits of the control byte that are matched against the chip: the fixed 1010
// code and the A1/A0 pins. B0 and R/W are masked out.
const CONTROL_MASK: u8 = 0xF6;
const READ_BIT: u8 = 0x01;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    #[error("byte {0:#04x} was not acknowledged")]
    Nack(u8),
    #[error("the bus is disabled")]
    Disabled,
    #[error("no transaction was started")]
    NotStarted,
    #[error("the bus is stuck")]
    Stuck,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("EEPROM image must be {EEPROM_SIZE} bytes, got {0}")]
pub struct ImageSizeError(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Control,
    AddressHigh,
    AddressLow,
    Writing,
    Reading,
    // the master sent NACK, only a stop or restart may follow
    Finished,
}

/// A 24LC515 on its own two-wire bus, with A1/A0 strapped to 0b01.
#[derive(Clone)]
pub struct SimulatedEeprom {
    memory: Box<[u8]>,
    enabled: bool,
    stuck: bool,
    phase: Phase,
    bank: usize,
    pointer: usize,
}

impl Default for SimulatedEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimulatedEeprom {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SimulatedEeprom")
            .field("enabled", &self.enabled)
            .field("phase", &self.phase)
            .field("bank", &self.bank)
            .field("pointer", &self.pointer)
            .finish()
    }
}

impl SimulatedEeprom {
    pub fn new() -> Self {
        Self {
            memory: vec![EEPROM_ERASED; EEPROM_SIZE].into_boxed_slice(),
            enabled: false,
            stuck: false,
            phase: Phase::Idle,
            bank: 0,
            pointer: 0,
        }
    }

    pub fn from_image(image: &[u8]) -> Result<Self, ImageSizeError> {
        let mut eeprom = Self::new();
        eeprom.load_image(image)?;
        Ok(eeprom)
    }

    /// The full contents in logical address order (bank 0 then bank 1).
    pub fn image(&self) -> &[u8] {
        &self.memory
    }

    pub fn load_image(&mut self, image: &[u8]) -> Result<(), ImageSizeError> {
        if image.len() != EEPROM_SIZE {
            return Err(ImageSizeError(image.len()));
        }
        self.memory.copy_from_slice(image);
        Ok(())
    }

    /// Reads a cell without going through the bus.
    pub fn peek(&self, address: Address) -> u8 {
        self.memory[address as usize]
    }

    pub fn poke(&mut self, address: Address, value: u8) {
        self.memory[address as usize] = value;
    }

    /// Makes every following transaction fail as if SDA was held low.
    pub fn set_stuck(&mut self, stuck: bool) {
        self.stuck = stuck;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn check_line(&self) -> Result<(), BusError> {
        if !self.enabled {
            return Err(BusError::Disabled);
        }
        if self.stuck {
            return Err(BusError::Stuck);
        }
        Ok(())
    }

    fn cell(&mut self) -> &mut u8 {
        &mut self.memory[self.bank * BANK_SIZE + self.pointer]
    }

    fn advance(&mut self) {
        self.pointer = (self.pointer + 1) % BANK_SIZE;
    }
}

impl TwoWireBus for SimulatedEeprom {
    type Error = BusError;

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.phase = Phase::Idle;
        }
    }

    fn start(&mut self) -> Result<(), BusError> {
        self.check_line()?;
        self.phase = Phase::Control;
        Ok(())
    }

    fn restart(&mut self) -> Result<(), BusError> {
        self.check_line()?;
        if self.phase == Phase::Idle {
            return Err(BusError::NotStarted);
        }
        self.phase = Phase::Control;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BusError> {
        self.check_line()?;
        if self.phase == Phase::Idle {
            return Err(BusError::NotStarted);
        }
        self.phase = Phase::Idle;
        Ok(())
    }

    fn put(&mut self, byte: u8) -> Result<(), BusError> {
        self.check_line()?;
        match self.phase {
            Phase::Idle => return Err(BusError::NotStarted),
            Phase::Control => {
                if byte & CONTROL_MASK != EEPROM_DEVICE_ADDRESS {
                    // another device, the line stays released
                    self.phase = Phase::Idle;
                    return Err(BusError::Nack(byte));
                }
                self.bank = usize::from(byte & EEPROM_BANK_BIT != 0);
                self.phase = if byte & READ_BIT != 0 {
                    Phase::Reading
                } else {
                    Phase::AddressHigh
                };
            }
            Phase::AddressHigh => {
                // the top address bit is ignored, the bank comes from B0
                self.pointer = usize::from(byte & 0x7F) << 8;
                self.phase = Phase::AddressLow;
            }
            Phase::AddressLow => {
                self.pointer |= usize::from(byte);
                self.phase = Phase::Writing;
            }
            Phase::Writing => {
                trace!("eeprom write {:#06x} <- {:#04x}", self.pointer, byte);
                *self.cell() = byte;
                self.advance();
            }
            Phase::Reading | Phase::Finished => return Err(BusError::Nack(byte)),
        }
        Ok(())
    }

    fn get(&mut self, nack: bool) -> Result<u8, BusError> {
        self.check_line()?;
        if self.phase != Phase::Reading {
            return Err(BusError::NotStarted);
        }
        let value = *self.cell();
        self.advance();
        if nack {
            self.phase = Phase::Finished;
        }
        Ok(value)
    }
}
