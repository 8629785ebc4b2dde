use crate::definitions::{LCD_HEIGHT, LCD_WIDTH};

pub const GRAVITY: f32 = 0.85;
pub const THRUST: f32 = -2.0;

pub const START_X: f32 = 6.0;
pub const START_Y: f32 = 20.0;
pub const RADIUS: i32 = 2;

const WIDTH: f32 = LCD_WIDTH as f32;
const HEIGHT: f32 = LCD_HEIGHT as f32;

/// Top of the band along the floor line where a stalled bubble counts as
/// landed: one bubble diameter above the last row.
pub const FLOOR_Y: f32 = HEIGHT - 1.0 - 2.0 * RADIUS as f32;

/// The bubble. Position and velocity are fractional, the radius is whole pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub radius: i32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(START_X, START_Y, 0.0, 0.0, RADIUS)
    }
}

impl Player {
    pub fn new(x: f32, y: f32, dx: f32, dy: f32, radius: i32) -> Self {
        Self {
            x,
            y,
            dx,
            dy,
            radius,
        }
    }

    /// Pixel the bubble is drawn and collided at.
    pub fn position(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }

    pub fn update(&mut self, thrust: bool) {
        let r = self.radius as f32;

        if thrust {
            if self.dy > 0.0 {
                self.dy = 0.0;
            }
            self.dy = THRUST;
        } else {
            self.dy += GRAVITY;
        }

        // above the top edge the velocity is replaced, the position is never clamped
        if self.y - r < 0.0 {
            self.dy = GRAVITY;
        }

        if self.y + r >= HEIGHT - 1.0 {
            self.dy = 0.0;
        }

        // dx is always 0 in play, kept so a sideways push stops at the walls
        if self.x + r > WIDTH - 1.0 || self.x - r < 1.0 {
            self.dx = 0.0;
        }

        self.y += self.dy;
        self.x += self.dx;

        if self.y + r > HEIGHT {
            self.y = HEIGHT - r;
        }
        if self.x + r > WIDTH {
            self.x = WIDTH - r;
        }
        if self.x - r < 0.0 {
            self.x = r;
        }
    }

    /// Resting on the floor with no vertical speed left.
    pub fn on_floor(&self) -> bool {
        self.y >= FLOOR_Y && self.dy == 0.0
    }
}
