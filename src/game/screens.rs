//! Static screens shown around a session. Each function only draws; flushing and
//! waiting is up to the caller.

use crate::definitions::{LCD_HEIGHT, LCD_WIDTH};
use crate::lcd::screen::{circle, line};
use crate::lcd::{Color, Framebuffer, Output};

pub const INTRO_STEP_MS: u32 = 4;
pub const SCREEN_WAIT_MS: u32 = 3000;

pub const TITLE: &str = "BUBBLE COURSE\nv1.0\n\nBY:\nJordan S.\nElisabeth A.";
pub const CREDITS: &str = "inspired by\n\nFLAPPY BIRD\n\n\nR.I.P. 2014";
pub const HIGH_SCORE_LABEL: &str = "highest score:\n";
pub const READY: &str = "READY?\n\n\n\nPress button\nto fly!";
pub const GAME_OVER: &str = "game over :(";
pub const NEW_HIGH_SCORE: &str = "\nNEW HIGH SCORE";

/// Rows painted by the intro before the rings start.
pub const FILL_ROWS: usize = LCD_HEIGHT;

/// Radii of the erasing rings, growing out of the centre.
pub fn explosion_radii() -> std::ops::Range<u32> {
    1..LCD_WIDTH as u32
}

pub fn fill_row(fb: &mut Framebuffer, row: usize) {
    let y = row as i32;
    line(fb, 0, y, LCD_WIDTH as i32, y, Color::Black);
}

pub fn explosion_ring(fb: &mut Framebuffer, radius: u32) {
    let (cx, cy) = (LCD_WIDTH as i32 / 2, LCD_HEIGHT as i32 / 2);
    circle(fb, cx, cy, radius, false, Color::White);
}

fn text_screen(fb: &mut Framebuffer, out: &mut Output, text: &str) {
    fb.clear();
    out.move_cursor(0, 0);
    out.draw_str(fb, text);
}

pub fn title(fb: &mut Framebuffer, out: &mut Output) {
    text_screen(fb, out, TITLE);
}

pub fn credits(fb: &mut Framebuffer, out: &mut Output) {
    text_screen(fb, out, CREDITS);
}

/// The best score in large digits, or a dash when nothing was recorded yet.
pub fn high_score(fb: &mut Framebuffer, out: &mut Output, score: Option<u8>) {
    text_screen(fb, out, HIGH_SCORE_LABEL);
    let digits = match score {
        Some(score) => score.to_string(),
        None => "-".to_string(),
    };
    out.draw_large_str(fb, &digits);
}

pub fn ready(fb: &mut Framebuffer, out: &mut Output) {
    out.move_cursor(0, 0);
    out.draw_str(fb, READY);
}

/// Draws over whatever the last frame left on screen.
pub fn game_over(fb: &mut Framebuffer, out: &mut Output, new_high_score: bool) {
    out.move_cursor(6, 2);
    out.draw_str(fb, GAME_OVER);
    if new_high_score {
        out.draw_str(fb, NEW_HIGH_SCORE);
    }
}
