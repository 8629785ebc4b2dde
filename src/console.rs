use crate::config::Settings;
use crate::game::{screens, Game, Tick};
use crate::hal::Board;
use crate::lcd::panel;
use crate::store::{self, StoreError};
use log::{debug, info};
use thiserror::Error;

// guard time around switching the EEPROM bus
const BUS_GUARD_MS: u32 = 20;
const FLASH_MS: u32 = 50;

#[derive(Error, Debug)]
pub enum ConsoleError<E: std::error::Error + 'static> {
    #[error("could not reach the high score store")]
    Store(#[from] StoreError<E>),
}

pub type ConsoleResult<T, E> = Result<T, ConsoleError<E>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub score: u8,
    pub new_high_score: bool,
}

/// Drives a [Game] on real (or simulated) hardware: boot, screens, frame pacing
/// and persisting the high score.
pub struct Console<B: Board> {
    board: B,
    game: Game,
    settings: Settings,
    first_session: bool,
}

impl<B: Board> Console<B> {
    /// Reads the stored high score and leaves the EEPROM bus switched off.
    pub fn boot(mut board: B, settings: Settings) -> ConsoleResult<Self, B::Error> {
        board.set_enabled(true);
        board.delay_ms(BUS_GUARD_MS);
        let loaded = store::load_high_score(&mut board);
        board.delay_ms(BUS_GUARD_MS);
        board.set_enabled(false);
        board.delay_ms(BUS_GUARD_MS);

        let high_score = loaded?;
        info!("booted, high score {:?}", high_score);

        Ok(Self {
            board,
            game: Game::new(high_score, settings.seed),
            settings,
            first_session: true,
        })
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn into_board(self) -> B {
        self.board
    }

    fn flush(&mut self) {
        panel::flush(&mut self.board, self.game.framebuffer());
    }

    /// Waits up to `ms`, returning early on a press. A button already held when
    /// the wait starts only counts after it was released.
    pub fn wait_or_press(&mut self, ms: u32) -> bool {
        let mut held = self.board.pressed();
        for _ in 1..ms {
            let pressed = self.board.pressed();
            if held {
                held = pressed;
            } else if pressed {
                return true;
            }
            self.board.delay_ms(1);
        }
        false
    }

    pub fn wait_for_press(&mut self) {
        while !self.board.pressed() {
            self.board.delay_ms(1);
        }
    }

    fn intro(&mut self) {
        {
            let (fb, _) = self.game.canvas();
            fb.clear();
        }
        for row in 0..screens::FILL_ROWS {
            screens::fill_row(self.game.canvas().0, row);
            self.flush();
            self.board.delay_ms(screens::INTRO_STEP_MS);
        }
        for radius in screens::explosion_radii() {
            screens::explosion_ring(self.game.canvas().0, radius);
            self.flush();
            self.board.delay_ms(screens::INTRO_STEP_MS);
        }

        if self.first_session {
            let (fb, out) = self.game.canvas();
            screens::title(fb, out);
            self.flush();
            self.wait_or_press(screens::SCREEN_WAIT_MS);

            let (fb, out) = self.game.canvas();
            screens::credits(fb, out);
            self.flush();
            self.wait_or_press(screens::SCREEN_WAIT_MS);
        }
    }

    fn show_high_score(&mut self) {
        let high_score = self.game.high_score();
        let (fb, out) = self.game.canvas();
        screens::high_score(fb, out, high_score);
        self.flush();
        self.wait_or_press(screens::SCREEN_WAIT_MS);
    }

    fn play(&mut self) {
        self.game.start();
        loop {
            self.game.draw_frame();
            self.flush();

            let thrust = self.board.pressed();
            let tick = self.game.finish_tick(thrust);
            self.board.delay_ms(self.settings.tick_ms);

            if tick == Tick::Crashed {
                return;
            }
        }
    }

    fn persist_high_score(&mut self, score: u8) -> ConsoleResult<(), B::Error> {
        self.board.delay_ms(BUS_GUARD_MS);
        self.board.set_enabled(true);
        let saved = store::save_high_score(&mut self.board, score);
        self.board.delay_ms(BUS_GUARD_MS);
        self.board.set_enabled(false);
        saved?;
        info!("new high score {} saved", score);
        Ok(())
    }

    /// One full round: panel init, screens, play and game over.
    pub fn run_session(&mut self) -> ConsoleResult<SessionOutcome, B::Error> {
        let (fb, _) = self.game.canvas();
        panel::init(&mut self.board, fb);
        if self.settings.contrast != panel::INIT_VOP {
            panel::set_contrast(&mut self.board, self.settings.contrast);
        }
        panel::set_backlight(&mut self.board, true);

        if self.settings.intro {
            self.intro();
        }
        self.first_session = false;
        self.show_high_score();

        self.game.show_ready();
        self.flush();
        self.wait_for_press();

        self.play();
        let score = self.game.score();

        for _ in 0..self.settings.flash_count {
            panel::toggle_backlight(&mut self.board);
            self.board.delay_ms(FLASH_MS);
        }

        let new_high_score = self.game.show_game_over();
        self.flush();
        self.wait_or_press(self.settings.game_over_wait_ms);

        if let Some(record) = self.game.finish() {
            self.persist_high_score(record)?;
        }
        debug!("session finished with score {}", score);

        Ok(SessionOutcome {
            score,
            new_high_score,
        })
    }

    /// Plays `sessions` rounds, or forever when `None`.
    pub fn run(&mut self, sessions: Option<u32>) -> ConsoleResult<Vec<SessionOutcome>, B::Error> {
        let mut outcomes = Vec::new();
        let mut played = 0;
        while sessions.map_or(true, |limit| played < limit) {
            outcomes.push(self.run_session()?);
            played += 1;
        }
        Ok(outcomes)
    }
}
