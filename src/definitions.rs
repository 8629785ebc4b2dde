// geometry of the PCD8544 (Nokia 5110) panel
pub const LCD_WIDTH: usize = 84;
pub const LCD_HEIGHT: usize = 48;
pub const LCD_PAGES: usize = LCD_HEIGHT / 8;
// one byte per column per page
pub const FRAMEBUFFER_SIZE: usize = LCD_WIDTH * LCD_PAGES;

// a character cell is 5 glyph columns plus one blank separator
pub const CHAR_WIDTH: usize = 6;
pub const GLYPH_WIDTH: usize = 5;
pub const LARGE_GLYPH_WIDTH: usize = 10;
pub const LARGE_GLYPH_BYTES: usize = 2 * LARGE_GLYPH_WIDTH;

pub const NEWLINE_KEY: u8 = b'\n';
pub const CARRIAGE_RETURN_KEY: u8 = 0x0d;
pub const BACKSPACE_KEY: u8 = 0x08;

// 24LC515 style EEPROM on the two-wire bus
pub const EEPROM_DEVICE_ADDRESS: u8 = 0xA2;
pub const EEPROM_BANK_BIT: u8 = 0x08;
pub const EEPROM_READ_BIT: u8 = 0x01;
pub const EEPROM_BANK_BOUNDARY: u16 = 0x8000;
pub const EEPROM_ERASED: u8 = 0xFF;
pub const HIGH_SCORE_ADDRESS: u16 = 0x1337;
// the erased value marks "no high score", so scores stop one below it
pub const MAX_SCORE: u8 = EEPROM_ERASED - 1;

// a logical address in the EEPROM
pub type Address = u16;
