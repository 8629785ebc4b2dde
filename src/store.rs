//! High score persistence on a 24LC515 style EEPROM.
//!
//! Every function assumes the two-wire bus is already enabled. Sequential
//! transactions wait [SETTLE_MS] so the chip can finish its write cycle.

use crate::definitions::{
    Address, EEPROM_BANK_BIT, EEPROM_BANK_BOUNDARY, EEPROM_DEVICE_ADDRESS, EEPROM_ERASED,
    EEPROM_READ_BIT, HIGH_SCORE_ADDRESS, MAX_SCORE,
};
use crate::hal::{DelayNs, TwoWireBus};
use crate::util::split_address;
use thiserror::Error;

pub const SETTLE_MS: u32 = 5;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("EEPROM access at {address:#06x} failed: {source}")]
pub struct StoreError<E: std::error::Error + 'static> {
    pub address: Address,
    #[source]
    pub source: E,
}

pub type StoreResult<T, E> = Result<T, StoreError<E>>;

/// Control byte for the bank that holds `address`.
pub fn device_selector(address: Address) -> u8 {
    if address & EEPROM_BANK_BOUNDARY != 0 {
        EEPROM_DEVICE_ADDRESS | EEPROM_BANK_BIT
    } else {
        EEPROM_DEVICE_ADDRESS
    }
}

fn at<E: std::error::Error + 'static>(address: Address) -> impl Fn(E) -> StoreError<E> {
    move |source| StoreError { address, source }
}

pub fn read_byte<B: TwoWireBus>(bus: &mut B, address: Address) -> StoreResult<u8, B::Error> {
    let selector = device_selector(address);
    let (hi, lo) = split_address(address);

    let read = |bus: &mut B| -> Result<u8, B::Error> {
        bus.start()?;
        bus.put(selector)?;
        bus.put(hi)?;
        bus.put(lo)?;
        bus.restart()?;
        bus.put(selector | EEPROM_READ_BIT)?;
        let value = bus.get(true)?;
        bus.stop()?;
        Ok(value)
    };

    read(bus).map_err(at(address))
}

pub fn write_byte<B: TwoWireBus>(
    bus: &mut B,
    address: Address,
    value: u8,
) -> StoreResult<(), B::Error> {
    let selector = device_selector(address);
    let (hi, lo) = split_address(address);

    let write = |bus: &mut B| -> Result<(), B::Error> {
        bus.start()?;
        bus.put(selector)?;
        bus.put(hi)?;
        bus.put(lo)?;
        bus.put(value)?;
        bus.stop()
    };

    write(bus).map_err(at(address))
}

/// Writes `text` up to its first NUL and terminates it with a 0 byte.
/// Returns the address just past the terminator.
pub fn write_string<B: TwoWireBus + DelayNs>(
    bus: &mut B,
    address: Address,
    text: &[u8],
) -> StoreResult<Address, B::Error> {
    let mut address = address;
    for &byte in text.iter().take_while(|&&b| b != 0) {
        write_byte(bus, address, byte)?;
        bus.delay_ms(SETTLE_MS);
        address = address.wrapping_add(1);
    }
    write_byte(bus, address, 0)?;
    bus.delay_ms(SETTLE_MS);
    Ok(address.wrapping_add(1))
}

/// Reads bytes until a 0x00 terminator or an erased (0xFF) cell.
pub fn read_until_null<B: TwoWireBus + DelayNs>(
    bus: &mut B,
    address: Address,
) -> StoreResult<Vec<u8>, B::Error> {
    let mut bytes = Vec::new();
    let mut address = address;
    loop {
        let value = read_byte(bus, address)?;
        if value == 0 || value == EEPROM_ERASED {
            return Ok(bytes);
        }
        bytes.push(value);
        bus.delay_ms(SETTLE_MS);

        address = address.wrapping_add(1);
        // the whole address space was non-terminated
        if bytes.len() > Address::MAX as usize {
            return Ok(bytes);
        }
    }
}

/// Reads every byte in `from..to`.
pub fn read_between<B: TwoWireBus + DelayNs>(
    bus: &mut B,
    from: Address,
    to: Address,
) -> StoreResult<Vec<u8>, B::Error> {
    let mut bytes = Vec::with_capacity(to.saturating_sub(from) as usize);
    for address in from..to {
        bytes.push(read_byte(bus, address)?);
        bus.delay_ms(SETTLE_MS);
    }
    Ok(bytes)
}

/// Writes 0 to every byte in `from..to`.
pub fn zero_range<B: TwoWireBus + DelayNs>(
    bus: &mut B,
    from: Address,
    to: Address,
) -> StoreResult<(), B::Error> {
    for address in from..to {
        write_byte(bus, address, 0)?;
        bus.delay_ms(SETTLE_MS);
    }
    Ok(())
}

/// `None` when the cell is still erased.
pub fn load_high_score<B: TwoWireBus>(bus: &mut B) -> StoreResult<Option<u8>, B::Error> {
    let value = read_byte(bus, HIGH_SCORE_ADDRESS)?;
    Ok((value != EEPROM_ERASED).then_some(value))
}

/// Scores above [MAX_SCORE] are stored as [MAX_SCORE], since the erased value
/// would read back as "nothing recorded".
pub fn save_high_score<B: TwoWireBus>(bus: &mut B, score: u8) -> StoreResult<(), B::Error> {
    write_byte(bus, HIGH_SCORE_ADDRESS, score.min(MAX_SCORE))
}

/// Erases the high score cell back to "nothing recorded".
pub fn clear_high_score<B: TwoWireBus>(bus: &mut B) -> StoreResult<(), B::Error> {
    write_byte(bus, HIGH_SCORE_ADDRESS, EEPROM_ERASED)
}
