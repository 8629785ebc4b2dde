use rand::Rng;

pub const WALL_WIDTH: i32 = 6;
pub const OPENING_HEIGHT: i32 = 15;
pub const SCROLL_SPEED: i8 = 2;
/// Openings start somewhere in `0..MAX_OPENING_Y`.
pub const MAX_OPENING_Y: i8 = 31;

/// A wall scrolling in from the right with an opening at `y`.
///
/// `x` is an 8 bit column: it keeps moving left off screen and wraps back around
/// to the right after 128 ticks unless the slot is reused first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub x: i8,
    pub y: i8,
}

impl Gap {
    pub fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn init_random<R: Rng>(&mut self, x: i8, rng: &mut R) {
        self.x = x;
        self.y = rng.gen_range(0..MAX_OPENING_Y);
    }

    pub fn update(&mut self) {
        self.x = self.x.wrapping_sub(SCROLL_SPEED);
    }

    pub fn visible(&self) -> bool {
        let x = i32::from(self.x);
        x > -WALL_WIDTH && x < crate::definitions::LCD_WIDTH as i32
    }

    /// Scrolled past the left edge, the slot can be reused.
    pub fn gone(&self) -> bool {
        i32::from(self.x) < -WALL_WIDTH
    }

    /// Whether `left..=right` fits between the wall edges.
    pub fn contains_columns(&self, left: i32, right: i32) -> bool {
        let x = i32::from(self.x);
        x <= left && x + WALL_WIDTH >= right
    }

    /// Whether `top..=bottom` fits inside the opening.
    pub fn contains_rows(&self, top: i32, bottom: i32) -> bool {
        let y = i32::from(self.y);
        y <= top && y + OPENING_HEIGHT >= bottom
    }
}
