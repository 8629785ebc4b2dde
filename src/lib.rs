use wasm_bindgen::prelude::*;

pub mod config;
pub mod console;
pub mod definitions;
pub mod game;
pub mod hal;
pub mod keyboard;
pub mod lcd;
pub mod simulators;
pub mod store;
pub mod util;

use config::Settings;
use definitions::{LCD_HEIGHT, LCD_WIDTH};
use game::{Game, Tick};
use hal::{DisplayBus, TwoWireBus};
use lcd::panel;
use simulators::{BusError, SimulatedBoard};
use store::StoreResult;

use wasm_bindgen::Clamped;
use web_sys::ImageData;

#[wasm_bindgen]
pub fn is_button_key(key: &str) -> bool {
    keyboard::is_button_key(key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Playing,
    GameOver { ticks_left: u32, held: bool },
}

/// The browser frontend. The page calls [App::step] once per frame time, so
/// nothing in here ever blocks.
#[wasm_bindgen]
pub struct App {
    board: SimulatedBoard,
    game: Game,
    settings: Settings,
    phase: Phase,
    button: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    fn flush(&mut self) {
        panel::flush(&mut self.board, self.game.framebuffer());
    }

    fn read_high_score(&mut self) -> StoreResult<Option<u8>, BusError> {
        self.board.set_enabled(true);
        let score = store::load_high_score(&mut self.board);
        self.board.set_enabled(false);
        score
    }

    fn show_ready(&mut self) {
        self.game.show_ready();
        self.flush();
        self.phase = Phase::Ready;
    }

    fn game_over_ticks(&self) -> u32 {
        self.settings.game_over_wait_ms / self.settings.tick_ms.max(1)
    }

    fn end_game_over(&mut self) -> Result<(), JsError> {
        if let Some(record) = self.game.finish() {
            self.board.set_enabled(true);
            let saved = store::save_high_score(&mut self.board, record);
            self.board.set_enabled(false);
            saved?;
        }
        self.board.set_backlight(true);
        self.show_ready();
        Ok(())
    }

    fn pixels(&self) -> Vec<u8> {
        let lcd = self.board.lcd();
        // an unlit panel is a shade darker
        let background = if self.board.backlight_on() { 255 } else { 190 };

        let mut data = Vec::with_capacity(Self::data_buffer_size());
        for y in 0..LCD_HEIGHT {
            for x in 0..LCD_WIDTH {
                let color = if lcd.pixel(x, y) { 0 } else { background };
                data.push(color);
                data.push(color);
                data.push(color);
                data.push(255);
            }
        }
        data
    }
}

#[wasm_bindgen]
impl App {
    pub fn new() -> Self {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let settings = Settings::default();
        let mut app = Self {
            board: SimulatedBoard::new(),
            game: Game::new(None, settings.seed),
            settings,
            phase: Phase::Ready,
            button: false,
        };

        let (fb, _) = app.game.canvas();
        panel::init(&mut app.board, fb);
        panel::set_backlight(&mut app.board, true);
        app.show_ready();
        app
    }

    /// Replaces the EEPROM contents, e.g. with an image saved by the desktop build,
    /// and starts over with the high score found in it.
    pub fn load_eeprom(&mut self, image: &[u8]) -> Result<(), JsError> {
        self.board.eeprom_mut().load_image(image)?;
        let high_score = self.read_high_score()?;
        self.game = Game::new(high_score, self.settings.seed);
        self.show_ready();
        Ok(())
    }

    pub fn eeprom_image(&self) -> Vec<u8> {
        self.board.eeprom().image().to_vec()
    }

    pub fn set_key(&mut self, key: &str, down: bool) {
        if keyboard::is_button_key(key) {
            self.button = down;
        }
    }

    pub fn set_button(&mut self, down: bool) {
        self.button = down;
    }

    pub fn tick_ms(&self) -> u32 {
        self.settings.tick_ms
    }

    pub fn score(&self) -> u8 {
        self.game.score()
    }

    pub fn high_score(&self) -> Option<u8> {
        self.game.high_score()
    }

    pub fn step(&mut self) -> Result<(), JsError> {
        match self.phase {
            Phase::Ready => {
                if self.button {
                    self.game.start();
                    self.phase = Phase::Playing;
                }
            }
            Phase::Playing => {
                self.game.draw_frame();
                self.flush();
                if self.game.finish_tick(self.button) == Tick::Crashed {
                    self.game.show_game_over();
                    self.flush();
                    self.phase = Phase::GameOver {
                        ticks_left: self.game_over_ticks(),
                        held: self.button,
                    };
                }
            }
            Phase::GameOver { ticks_left, held } => {
                // blink the backlight during the first frames like the handheld does
                if self.game_over_ticks().saturating_sub(ticks_left) < self.settings.flash_count {
                    panel::toggle_backlight(&mut self.board);
                }

                let pressed = !held && self.button;
                if pressed || ticks_left <= 1 {
                    self.end_game_over()?;
                } else {
                    self.phase = Phase::GameOver {
                        ticks_left: ticks_left - 1,
                        held: held && self.button,
                    };
                }
            }
        }
        Ok(())
    }

    pub fn data_buffer_size() -> usize {
        const BYTES_PER_PIXEL: usize = 4; // rgba
        BYTES_PER_PIXEL * LCD_WIDTH * LCD_HEIGHT
    }

    pub fn width() -> u32 {
        LCD_WIDTH as u32
    }

    pub fn height() -> u32 {
        LCD_HEIGHT as u32
    }

    pub fn display_data(&self) -> Result<ImageData, JsValue> {
        let data = self.pixels();
        ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(data.as_slice()),
            LCD_WIDTH as u32,
            LCD_HEIGHT as u32,
        )
    }
}
