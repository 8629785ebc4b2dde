use super::font::{self, BLANK_LARGE_GLYPH};
use super::framebuffer::Framebuffer;
use crate::definitions::{
    BACKSPACE_KEY, CARRIAGE_RETURN_KEY, CHAR_WIDTH, LCD_PAGES, LCD_WIDTH, NEWLINE_KEY,
};
use log::warn;

const LAST_COLUMN: usize = LCD_WIDTH - 1;
const LAST_ROW: usize = LCD_PAGES - 1;
// start of the last full character cell in a row
const LAST_CELL: usize = (LCD_WIDTH / CHAR_WIDTH - 1) * CHAR_WIDTH;

/// Text cursor over the page grid. The column is a pixel column, the row is a page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    column: usize,
    row: usize,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.column, self.row)
    }

    pub fn move_cursor(&mut self, column: usize, row: usize) {
        self.column = column.min(LAST_COLUMN);
        self.row = row.min(LAST_ROW);
    }

    fn next_row(&mut self) {
        self.row = if self.row >= LAST_ROW { 0 } else { self.row + 1 };
    }

    pub fn println(&mut self) {
        self.column = 0;
        self.next_row();
    }

    /// Steps back one character cell and blanks it.
    pub fn backspace(&mut self, fb: &mut Framebuffer) {
        if self.column < CHAR_WIDTH {
            self.column = LAST_CELL;
            self.row = if self.row == 0 { LAST_ROW } else { self.row - 1 };
        } else {
            self.column -= CHAR_WIDTH;
        }

        for column in self.column..self.column + CHAR_WIDTH {
            fb.set_column(column, self.row, 0);
        }
    }

    fn put_column(&mut self, fb: &mut Framebuffer, value: u8) {
        if self.column > LAST_COLUMN {
            self.println();
        }
        fb.set_column(self.column, self.row, value);
        self.column += 1;
    }

    pub fn draw_char(&mut self, fb: &mut Framebuffer, code: u8) {
        match code {
            NEWLINE_KEY | CARRIAGE_RETURN_KEY => self.println(),
            BACKSPACE_KEY => self.backspace(fb),
            _ => {
                // anything without a glyph is dropped without moving the cursor
                if let Some(glyph) = font::glyph(code) {
                    for column in glyph {
                        self.put_column(fb, *column);
                    }
                    // blank separator between characters
                    self.put_column(fb, 0);
                }
            }
        }
    }

    pub fn draw_str(&mut self, fb: &mut Framebuffer, text: &str) {
        for code in text.bytes().take_while(|&c| c != 0) {
            self.draw_char(fb, code);
        }
    }

    /// Draws one 10x16 glyph over the cursor row and the row below it.
    pub fn draw_large_digit(&mut self, fb: &mut Framebuffer, code: u8) {
        let glyph = match font::large_digit(code) {
            Some(glyph) => glyph,
            None => {
                debug_assert!(false, "no large glyph for {:#04x}", code);
                warn!("no large glyph for {:#04x}, drawing a blank", code);
                BLANK_LARGE_GLYPH
            }
        };

        for i in 0..glyph.columns {
            let (upper, lower) = glyph.column(i);
            fb.set_column(self.column, self.row, upper);
            fb.set_column(self.column, self.row + 1, lower);
            self.column += 1;
        }
    }

    pub fn draw_large_str(&mut self, fb: &mut Framebuffer, text: &str) {
        for code in text.bytes().take_while(|&c| c != 0) {
            self.draw_large_digit(fb, code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_cursor_clamps() {
        let mut out = Output::new();
        out.move_cursor(200, 9);
        assert_eq!((83, 5), out.cursor());
        out.move_cursor(37, 0);
        assert_eq!((37, 0), out.cursor());
    }

    #[test]
    fn test_newline_wraps_rows() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        for row in 0..LCD_PAGES {
            out.move_cursor(42, row);
            out.draw_char(&mut fb, b'\n');
            assert_eq!((0, (row + 1) % LCD_PAGES), out.cursor());
        }

        out.move_cursor(10, 5);
        out.draw_char(&mut fb, 0x0d);
        assert_eq!((0, 0), out.cursor());
        assert_eq!(0, fb.count_lit());
    }

    #[test]
    fn test_printable_char_takes_six_columns() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        out.move_cursor(12, 2);
        out.draw_char(&mut fb, b'H');

        assert_eq!((18, 2), out.cursor());
        assert_eq!(Some(0x7f), fb.column(12, 2));
        assert_eq!(Some(0x08), fb.column(14, 2));
        assert_eq!(Some(0x7f), fb.column(16, 2));
        assert_eq!(Some(0x00), fb.column(17, 2));
    }

    #[test]
    fn test_unprintable_codes_are_dropped() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        out.move_cursor(6, 1);
        for code in [0x00, 0x01, 0x1f, 0x80, 0xfe, 0xff] {
            out.draw_char(&mut fb, code);
        }
        assert_eq!((6, 1), out.cursor());
        assert_eq!(0, fb.count_lit());
    }

    #[test]
    fn test_row_wraps_after_fourteen_chars() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        out.draw_str(&mut fb, "ABCDEFGHIJKLMN");
        assert_eq!((84, 0), out.cursor());

        out.draw_char(&mut fb, b'O');
        assert_eq!((6, 1), out.cursor());
        assert_eq!(font::glyph(b'O').map(|g| g[0]), fb.column(0, 1));

        // wrapping off the last row goes back to the top
        out.move_cursor(80, 5);
        out.draw_char(&mut fb, b'I');
        assert_eq!((2, 0), out.cursor());
    }

    #[test]
    fn test_backspace_blanks_previous_cell() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        out.move_cursor(0, 3);
        out.draw_str(&mut fb, "AB");
        out.draw_char(&mut fb, BACKSPACE_KEY);

        assert_eq!((6, 3), out.cursor());
        for column in 6..12 {
            assert_eq!(Some(0), fb.column(column, 3));
        }
        assert_ne!(Some(0), fb.column(0, 3));
    }

    #[test]
    fn test_backspace_wraps_to_previous_row() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        out.move_cursor(78, 5);
        out.draw_char(&mut fb, b'#');
        assert_ne!(0, fb.count_lit());

        out.move_cursor(0, 0);
        out.backspace(&mut fb);
        assert_eq!((78, 5), out.cursor());
        assert_eq!(0, fb.count_lit());

        out.move_cursor(0, 2);
        out.backspace(&mut fb);
        assert_eq!((78, 1), out.cursor());
    }

    #[test]
    fn test_draw_str_stops_at_nul() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        out.draw_str(&mut fb, "ab\0cd");
        assert_eq!((12, 0), out.cursor());
    }

    #[test]
    fn test_large_digits_span_two_rows() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        out.move_cursor(0, 2);
        out.draw_large_digit(&mut fb, b'1');
        assert_eq!((10, 2), out.cursor());
        assert_eq!(Some(0xFF), fb.column(5, 2));
        assert_eq!(Some(0x0F), fb.column(5, 3));

        out.draw_large_digit(&mut fb, b'.');
        assert_eq!((15, 2), out.cursor());

        out.draw_large_str(&mut fb, "- 9");
        assert_eq!((45, 2), out.cursor());
    }

    #[test]
    fn test_large_digit_on_last_row_is_clipped() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        out.move_cursor(78, 5);
        out.draw_large_digit(&mut fb, b'8');

        assert_eq!((88, 5), out.cursor());
        assert_eq!(Some(0x9C), fb.column(79, 5));
        assert_eq!(Some(0xFE), fb.column(80, 5));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "no large glyph")]
    fn test_unknown_large_digit_fails_loudly() {
        let mut fb = Framebuffer::new();
        let mut out = Output::new();
        out.draw_large_digit(&mut fb, b'A');
    }
}
