use crate::definitions::{FRAMEBUFFER_SIZE, LCD_HEIGHT, LCD_PAGES, LCD_WIDTH};

/// Video memory of the panel.
///
/// The memory is organised exactly like the controller RAM: 6 pages of 84 column
/// bytes, where bit `y % 8` of the byte at `(y / 8, x)` is the pixel `(x, y)`.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    memory: Box<[u8; FRAMEBUFFER_SIZE]>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Framebuffer {
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

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            memory: Box::new([0; FRAMEBUFFER_SIZE]),
        }
    }

    #[inline]
    fn index(column: usize, page: usize) -> usize {
        page * LCD_WIDTH + column
    }

    pub fn clear(&mut self) {
        self.memory.fill(0);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= LCD_WIDTH || y >= LCD_HEIGHT {
            return;
        }

        let mask = 1 << (y % 8);
        let byte = &mut self.memory[Self::index(x, y / 8)];
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= LCD_WIDTH || y >= LCD_HEIGHT {
            return false;
        }
        self.memory[Self::index(x, y / 8)] & (1 << (y % 8)) != 0
    }

    /// The whole column byte of one page. `None` outside of the page grid.
    pub fn column(&self, column: usize, page: usize) -> Option<u8> {
        if column >= LCD_WIDTH || page >= LCD_PAGES {
            return None;
        }
        Some(self.memory[Self::index(column, page)])
    }

    /// Overwrites a whole column byte. Writes outside of the page grid are dropped.
    pub fn set_column(&mut self, column: usize, page: usize, value: u8) {
        if column >= LCD_WIDTH || page >= LCD_PAGES {
            return;
        }
        self.memory[Self::index(column, page)] = value;
    }

    pub fn invert(&mut self) {
        for byte in self.memory.iter_mut() {
            *byte = !*byte;
        }
    }

    /// The byte stream the panel expects: page by page, column by column.
    pub fn serialize(&self) -> [u8; FRAMEBUFFER_SIZE] {
        *self.memory
    }

    /// Loads a full screen image in [serialize](Self::serialize) order.
    /// Only as many bytes as the buffer holds are read.
    pub fn load_bitmap(&mut self, bitmap: &[u8]) {
        for (dst, src) in self.memory.iter_mut().zip(bitmap.iter()) {
            *dst = *src;
        }
    }

    pub fn count_lit(&self) -> usize {
        self.memory.iter().map(|b| b.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pixel_maps_to_page_bit() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(3, 0, true);
        fb.set_pixel(3, 9, true);
        fb.set_pixel(83, 47, true);

        assert_eq!(Some(0b0000_0001), fb.column(3, 0));
        assert_eq!(Some(0b0000_0010), fb.column(3, 1));
        assert_eq!(Some(0b1000_0000), fb.column(83, 5));
        assert_eq!(3, fb.count_lit());

        fb.set_pixel(3, 9, false);
        assert_eq!(Some(0), fb.column(3, 1));
        assert!(fb.pixel(3, 0));
        assert!(!fb.pixel(3, 9));
    }

    #[test]
    fn test_out_of_range_pixels_are_ignored() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(10, 10, true);
        let before = fb.serialize();

        for x in [84, 85, 200, usize::MAX] {
            fb.set_pixel(x, 0, true);
            fb.set_pixel(x, 47, false);
        }
        for y in [48, 49, 255, usize::MAX] {
            fb.set_pixel(0, y, true);
            fb.set_pixel(10, y, false);
        }

        assert_eq!(before, fb.serialize());
        assert!(!fb.pixel(84, 0));
        assert!(!fb.pixel(0, 48));
    }

    #[test]
    fn test_serialize_is_page_major() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(1, 0, true);
        fb.set_pixel(0, 8, true);
        let bytes = fb.serialize();

        assert_eq!(FRAMEBUFFER_SIZE, bytes.len());
        assert_eq!(1, bytes[1]);
        assert_eq!(1, bytes[LCD_WIDTH]);
        assert_eq!(2, bytes.iter().filter(|b| **b != 0).count());
    }

    #[test]
    fn test_invert_and_clear() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(5, 5, true);
        fb.invert();

        assert!(!fb.pixel(5, 5));
        assert_eq!(LCD_WIDTH * LCD_HEIGHT - 1, fb.count_lit());

        fb.clear();
        assert_eq!(0, fb.count_lit());
    }

    #[test]
    fn test_load_bitmap_reads_at_most_one_screen() {
        let mut fb = Framebuffer::new();
        let image = vec![0xAA; FRAMEBUFFER_SIZE + 10];
        fb.load_bitmap(&image);
        assert_eq!([0xAA; FRAMEBUFFER_SIZE], fb.serialize());

        // a short image only overwrites its prefix
        fb.load_bitmap(&[0x01, 0x02]);
        let bytes = fb.serialize();
        assert_eq!(0x01, bytes[0]);
        assert_eq!(0x02, bytes[1]);
        assert_eq!(0xAA, bytes[2]);
    }
}
