use crate::definitions::{GLYPH_WIDTH, LARGE_GLYPH_BYTES, LARGE_GLYPH_WIDTH};
use lazy_static::lazy_static;
use std::collections::HashMap;

const FIRST_PRINTABLE: u8 = 0x20;
const LAST_PRINTABLE: u8 = 0x7f;

// 5x7 glyphs, one byte per column, least significant bit at the top
static ASCII: [[u8; GLYPH_WIDTH]; (LAST_PRINTABLE - FIRST_PRINTABLE) as usize + 1] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // 0x20 SPACE
    [0x00, 0x00, 0x5f, 0x00, 0x00], // 0x21 !
    [0x00, 0x07, 0x00, 0x07, 0x00], // 0x22 "
    [0x14, 0x7f, 0x14, 0x7f, 0x14], // 0x23 #
    [0x24, 0x2a, 0x7f, 0x2a, 0x12], // 0x24 $
    [0x23, 0x13, 0x08, 0x64, 0x62], // 0x25 %
    [0x36, 0x49, 0x55, 0x22, 0x50], // 0x26 &
    [0x00, 0x05, 0x03, 0x00, 0x00], // 0x27 '
    [0x00, 0x1c, 0x22, 0x41, 0x00], // 0x28 (
    [0x00, 0x41, 0x22, 0x1c, 0x00], // 0x29 )
    [0x14, 0x08, 0x3e, 0x08, 0x14], // 0x2a *
    [0x08, 0x08, 0x3e, 0x08, 0x08], // 0x2b +
    [0x00, 0x50, 0x30, 0x00, 0x00], // 0x2c ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // 0x2d -
    [0x00, 0x60, 0x60, 0x00, 0x00], // 0x2e .
    [0x20, 0x10, 0x08, 0x04, 0x02], // 0x2f /
    [0x3e, 0x51, 0x49, 0x45, 0x3e], // 0x30 0
    [0x00, 0x42, 0x7f, 0x40, 0x00], // 0x31 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 0x32 2
    [0x21, 0x41, 0x45, 0x4b, 0x31], // 0x33 3
    [0x18, 0x14, 0x12, 0x7f, 0x10], // 0x34 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 0x35 5
    [0x3c, 0x4a, 0x49, 0x49, 0x30], // 0x36 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 0x37 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 0x38 8
    [0x06, 0x49, 0x49, 0x29, 0x1e], // 0x39 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // 0x3a :
    [0x00, 0x56, 0x36, 0x00, 0x00], // 0x3b ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // 0x3c <
    [0x14, 0x14, 0x14, 0x14, 0x14], // 0x3d =
    [0x00, 0x41, 0x22, 0x14, 0x08], // 0x3e >
    [0x02, 0x01, 0x51, 0x09, 0x06], // 0x3f ?
    [0x32, 0x49, 0x79, 0x41, 0x3e], // 0x40 @
    [0x7e, 0x11, 0x11, 0x11, 0x7e], // 0x41 A
    [0x7f, 0x49, 0x49, 0x49, 0x36], // 0x42 B
    [0x3e, 0x41, 0x41, 0x41, 0x22], // 0x43 C
    [0x7f, 0x41, 0x41, 0x22, 0x1c], // 0x44 D
    [0x7f, 0x49, 0x49, 0x49, 0x41], // 0x45 E
    [0x7f, 0x09, 0x09, 0x09, 0x01], // 0x46 F
    [0x3e, 0x41, 0x49, 0x49, 0x7a], // 0x47 G
    [0x7f, 0x08, 0x08, 0x08, 0x7f], // 0x48 H
    [0x00, 0x41, 0x7f, 0x41, 0x00], // 0x49 I
    [0x20, 0x40, 0x41, 0x3f, 0x01], // 0x4a J
    [0x7f, 0x08, 0x14, 0x22, 0x41], // 0x4b K
    [0x7f, 0x40, 0x40, 0x40, 0x40], // 0x4c L
    [0x7f, 0x02, 0x0c, 0x02, 0x7f], // 0x4d M
    [0x7f, 0x04, 0x08, 0x10, 0x7f], // 0x4e N
    [0x3e, 0x41, 0x41, 0x41, 0x3e], // 0x4f O
    [0x7f, 0x09, 0x09, 0x09, 0x06], // 0x50 P
    [0x3e, 0x41, 0x51, 0x21, 0x5e], // 0x51 Q
    [0x7f, 0x09, 0x19, 0x29, 0x46], // 0x52 R
    [0x46, 0x49, 0x49, 0x49, 0x31], // 0x53 S
    [0x01, 0x01, 0x7f, 0x01, 0x01], // 0x54 T
    [0x3f, 0x40, 0x40, 0x40, 0x3f], // 0x55 U
    [0x1f, 0x20, 0x40, 0x20, 0x1f], // 0x56 V
    [0x3f, 0x40, 0x38, 0x40, 0x3f], // 0x57 W
    [0x63, 0x14, 0x08, 0x14, 0x63], // 0x58 X
    [0x07, 0x08, 0x70, 0x08, 0x07], // 0x59 Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // 0x5a Z
    [0x00, 0x7f, 0x41, 0x41, 0x00], // 0x5b [
    [0x02, 0x04, 0x08, 0x10, 0x20], // 0x5c backslash
    [0x00, 0x41, 0x41, 0x7f, 0x00], // 0x5d ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // 0x5e ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // 0x5f _
    [0x00, 0x01, 0x02, 0x04, 0x00], // 0x60 `
    [0x20, 0x54, 0x54, 0x54, 0x78], // 0x61 a
    [0x7f, 0x48, 0x44, 0x44, 0x38], // 0x62 b
    [0x38, 0x44, 0x44, 0x44, 0x20], // 0x63 c
    [0x38, 0x44, 0x44, 0x48, 0x7f], // 0x64 d
    [0x38, 0x54, 0x54, 0x54, 0x18], // 0x65 e
    [0x08, 0x7e, 0x09, 0x01, 0x02], // 0x66 f
    [0x0c, 0x52, 0x52, 0x52, 0x3e], // 0x67 g
    [0x7f, 0x08, 0x04, 0x04, 0x78], // 0x68 h
    [0x00, 0x44, 0x7d, 0x40, 0x00], // 0x69 i
    [0x20, 0x40, 0x44, 0x3d, 0x00], // 0x6a j
    [0x7f, 0x10, 0x28, 0x44, 0x00], // 0x6b k
    [0x00, 0x41, 0x7f, 0x40, 0x00], // 0x6c l
    [0x7c, 0x04, 0x18, 0x04, 0x78], // 0x6d m
    [0x7c, 0x08, 0x04, 0x04, 0x78], // 0x6e n
    [0x38, 0x44, 0x44, 0x44, 0x38], // 0x6f o
    [0x7c, 0x14, 0x14, 0x14, 0x08], // 0x70 p
    [0x08, 0x14, 0x14, 0x18, 0x7c], // 0x71 q
    [0x7c, 0x08, 0x04, 0x04, 0x08], // 0x72 r
    [0x48, 0x54, 0x54, 0x54, 0x20], // 0x73 s
    [0x04, 0x3f, 0x44, 0x40, 0x20], // 0x74 t
    [0x3c, 0x40, 0x40, 0x20, 0x7c], // 0x75 u
    [0x1c, 0x20, 0x40, 0x20, 0x1c], // 0x76 v
    [0x3c, 0x40, 0x30, 0x40, 0x3c], // 0x77 w
    [0x44, 0x28, 0x10, 0x28, 0x44], // 0x78 x
    [0x0c, 0x50, 0x50, 0x50, 0x3c], // 0x79 y
    [0x44, 0x64, 0x54, 0x4c, 0x44], // 0x7a z
    [0x00, 0x08, 0x36, 0x41, 0x00], // 0x7b {
    [0x00, 0x00, 0x7f, 0x00, 0x00], // 0x7c |
    [0x00, 0x41, 0x36, 0x08, 0x00], // 0x7d }
    [0x10, 0x08, 0x08, 0x10, 0x08], // 0x7e ~
    [0x78, 0x46, 0x41, 0x46, 0x78], // 0x7f DEL
];

/// Column pattern of a printable ASCII character (0x20 up to and including DEL).
pub fn glyph(code: u8) -> Option<&'static [u8; GLYPH_WIDTH]> {
    if !(FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&code) {
        return None;
    }
    ASCII.get((code - FIRST_PRINTABLE) as usize)
}

/// A 10x16 digit, stored as (upper page, lower page) byte pairs per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LargeGlyph {
    pub columns: usize,
    pub data: &'static [u8; LARGE_GLYPH_BYTES],
}

impl LargeGlyph {
    pub fn column(&self, index: usize) -> (u8, u8) {
        (self.data[2 * index], self.data[2 * index + 1])
    }
}

pub const BLANK_LARGE_GLYPH: LargeGlyph = LargeGlyph {
    columns: LARGE_GLYPH_WIDTH,
    data: &[0; LARGE_GLYPH_BYTES],
};

lazy_static! {
    static ref LARGE_DIGITS: HashMap<u8, LargeGlyph> = {
        let mut map = HashMap::new();

        let full = |data| LargeGlyph { columns: LARGE_GLYPH_WIDTH, data };

        map.insert(b'-', full(&[
            0xC0, 0x01, 0xC0, 0x01, 0xC0, 0x01, 0xC0, 0x01, 0xC0, 0x01,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]));
        // the only half width glyph
        map.insert(b'.', LargeGlyph { columns: LARGE_GLYPH_WIDTH / 2, data: &[
            0x00, 0x00, 0x00, 0x0E, 0x00, 0x0E, 0x00, 0x0E, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]});
        map.insert(b' ', BLANK_LARGE_GLYPH);
        map.insert(b'0', full(&[
            0x00, 0x00, 0xFC, 0x03, 0xFE, 0x07, 0xFF, 0x0F, 0x03, 0x0C,
            0x03, 0x0C, 0xFF, 0x0F, 0xFE, 0x07, 0xFC, 0x03, 0x00, 0x00,
        ]));
        map.insert(b'1', full(&[
            0x00, 0x00, 0x00, 0x00, 0x30, 0x00, 0x38, 0x00, 0x1C, 0x00,
            0xFF, 0x0F, 0xFF, 0x0F, 0xFF, 0x0F, 0x00, 0x00, 0x00, 0x00,
        ]));
        map.insert(b'2', full(&[
            0x00, 0x00, 0x0C, 0x0C, 0x0E, 0x0E, 0x0F, 0x0F, 0x83, 0x0F,
            0xC3, 0x0D, 0xFF, 0x0C, 0x7E, 0x0C, 0x3C, 0x0C, 0x00, 0x00,
        ]));
        map.insert(b'3', full(&[
            0x00, 0x00, 0x04, 0x03, 0x0E, 0x07, 0x0F, 0x0F, 0x63, 0x0C,
            0x63, 0x0C, 0xFF, 0x0F, 0xFE, 0x07, 0x9C, 0x03, 0x00, 0x00,
        ]));
        map.insert(b'4', full(&[
            0x00, 0x00, 0xC0, 0x01, 0xE0, 0x01, 0xF8, 0x01, 0x9C, 0x01,
            0x8E, 0x01, 0xFF, 0x0F, 0xFF, 0x0F, 0xFF, 0x0F, 0x80, 0x01,
        ]));
        map.insert(b'5', full(&[
            0x00, 0x00, 0x78, 0x03, 0x7F, 0x07, 0x7F, 0x0F, 0x33, 0x0C,
            0x33, 0x0C, 0xF3, 0x0F, 0xE3, 0x07, 0xC3, 0x03, 0x00, 0x00,
        ]));
        map.insert(b'6', full(&[
            0x00, 0x00, 0xF8, 0x01, 0xFE, 0x07, 0xFF, 0x0F, 0x23, 0x0C,
            0x33, 0x0C, 0xF7, 0x0F, 0xE7, 0x07, 0xC6, 0x03, 0x00, 0x00,
        ]));
        map.insert(b'7', full(&[
            0x00, 0x00, 0x03, 0x00, 0x03, 0x00, 0x03, 0x0E, 0xC3, 0x0F,
            0xF3, 0x0F, 0xFB, 0x00, 0x0F, 0x00, 0x03, 0x00, 0x00, 0x00,
        ]));
        map.insert(b'8', full(&[
            0x00, 0x00, 0x9C, 0x03, 0xFE, 0x07, 0xFF, 0x0F, 0x63, 0x0C,
            0x63, 0x0C, 0xFF, 0x0F, 0xFE, 0x07, 0x9C, 0x03, 0x00, 0x00,
        ]));
        map.insert(b'9', full(&[
            0x00, 0x00, 0x3C, 0x06, 0x7E, 0x0E, 0xFF, 0x0E, 0xC3, 0x0C,
            0x43, 0x0C, 0xFF, 0x0F, 0xFE, 0x07, 0xF8, 0x01, 0x00, 0x00,
        ]));

        map
    };
}

/// Large glyph for `-`, `.`, space and the digits.
pub fn large_digit(code: u8) -> Option<LargeGlyph> {
    LARGE_DIGITS.get(&code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_range() {
        assert_eq!(Some(&[0; GLYPH_WIDTH]), glyph(b' '));
        assert_eq!(Some(&[0x7e, 0x11, 0x11, 0x11, 0x7e]), glyph(b'A'));
        assert_eq!(Some(&[0x78, 0x46, 0x41, 0x46, 0x78]), glyph(0x7f));

        assert_eq!(None, glyph(0x1f));
        assert_eq!(None, glyph(b'\n'));
        assert_eq!(None, glyph(0x80));
        assert_eq!(None, glyph(0xff));
    }

    #[test]
    fn test_large_digit_alphabet() {
        for code in b"-. 0123456789" {
            assert!(large_digit(*code).is_some(), "missing {}", *code as char);
        }
        assert_eq!(5, large_digit(b'.').unwrap().columns);
        assert_eq!(10, large_digit(b'8').unwrap().columns);
        assert_eq!(Some(BLANK_LARGE_GLYPH), large_digit(b' '));

        // '/' sits between '.' and '0' in ASCII but is not part of the alphabet
        assert_eq!(None, large_digit(b'/'));
        assert_eq!(None, large_digit(b'A'));
        assert_eq!(None, large_digit(0xff));
    }

    #[test]
    fn test_large_glyph_columns_are_pairs() {
        let minus = large_digit(b'-').unwrap();
        assert_eq!((0xC0, 0x01), minus.column(0));
        assert_eq!((0x00, 0x00), minus.column(9));
    }
}
