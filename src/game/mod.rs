pub mod gap;
pub mod player;
pub mod screens;

use crate::definitions::{LCD_HEIGHT, LCD_WIDTH, MAX_SCORE};
use crate::lcd::screen::{circle, line, rect};
use crate::lcd::{Color, Framebuffer, Output};
use gap::{Gap, OPENING_HEIGHT, WALL_WIDTH};
use log::{debug, info, trace};
use player::Player;
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub const GAP_SLOTS: usize = 5;
pub const MAX_ACTIVE_GAPS: usize = 4;
pub const SPAWN_X: i8 = LCD_WIDTH as i8;
pub const RELEASE_TICKS: u8 = 20;
// the first spawn happens on the first tick
const INITIAL_RELEASE_TIMER: u8 = 35;
const SCORE_CURSOR: (usize, usize) = (37, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    WaitingForStart,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running,
    Crashed,
}

/// One handheld's worth of game: the video memory, the text cursor and the
/// session state. Nothing in here touches hardware.
pub struct Game {
    fb: Framebuffer,
    out: Output,
    seed: u64,
    rng: SmallRng,
    state: State,

    player: Player,
    gaps: [Gap; GAP_SLOTS],
    count: usize,
    next_slot: usize,
    release_timer: u8,
    in_gap: Option<usize>,

    score: u8,
    high_score: Option<u8>,
}

impl Game {
    pub fn new(high_score: Option<u8>, seed: u64) -> Self {
        Self {
            fb: Framebuffer::new(),
            out: Output::new(),
            seed,
            rng: SmallRng::seed_from_u64(seed),
            state: State::WaitingForStart,
            player: Player::default(),
            gaps: [Gap::default(); GAP_SLOTS],
            count: 0,
            next_slot: 0,
            release_timer: INITIAL_RELEASE_TIMER,
            in_gap: None,
            score: 0,
            high_score,
        }
    }

    /// Resets everything but the high score. The generator is reseeded, so every
    /// session sees the same course.
    pub fn new_session(&mut self) {
        self.rng = SmallRng::seed_from_u64(self.seed);
        self.state = State::WaitingForStart;
        self.player = Player::default();
        self.gaps = [Gap::default(); GAP_SLOTS];
        self.count = 0;
        self.next_slot = 0;
        self.release_timer = INITIAL_RELEASE_TIMER;
        self.in_gap = None;
        self.score = 0;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn high_score(&self) -> Option<u8> {
        self.high_score
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    pub fn active_gaps(&self) -> usize {
        self.count
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Video memory and cursor, for drawing screens outside of play.
    pub fn canvas(&mut self) -> (&mut Framebuffer, &mut Output) {
        (&mut self.fb, &mut self.out)
    }

    pub fn beats_high_score(&self) -> bool {
        self.score > self.high_score.unwrap_or(0)
    }

    /// Shows the ready screen over the resting bubble.
    pub fn show_ready(&mut self) {
        self.fb.clear();
        self.draw_player(true, Color::Black);
        screens::ready(&mut self.fb, &mut self.out);
    }

    pub fn start(&mut self) {
        if self.state == State::WaitingForStart {
            info!("session started");
            self.state = State::Playing;
        }
    }

    fn draw_player(&mut self, fill: bool, color: Color) {
        let (x, y) = self.player.position();
        circle(&mut self.fb, x, y, self.player.radius as u32, fill, color);
    }

    fn draw_gap(fb: &mut Framebuffer, gap: &Gap) {
        if !gap.visible() {
            return;
        }
        let x = i32::from(gap.x);
        let y = i32::from(gap.y);
        let left = x.clamp(0, LCD_WIDTH as i32);
        let right = (x + WALL_WIDTH).clamp(0, LCD_WIDTH as i32);

        rect(fb, left, 0, right, LCD_HEIGHT as i32, true, Color::Black);
        rect(fb, left, y, right, y + OPENING_HEIGHT, true, Color::White);
    }

    fn release_gaps(&mut self) {
        if self.count >= MAX_ACTIVE_GAPS {
            return;
        }
        if self.release_timer < RELEASE_TICKS {
            self.release_timer += 1;
            return;
        }

        if let Some(gap) = self.gaps.get_mut(self.next_slot) {
            gap.init_random(SPAWN_X, &mut self.rng);
            debug!("gap spawned in slot {} with opening at {}", self.next_slot, gap.y);
        }
        self.release_timer = 0;
        // the count lags one spawn behind the slot index
        self.count = self.count.max(self.next_slot);
        self.next_slot += 1;
    }

    /// Draws the next frame and scrolls the course. Only valid while playing.
    pub fn draw_frame(&mut self) {
        if self.state != State::Playing {
            return;
        }

        self.fb.clear();
        line(&mut self.fb, 0, 47, 83, 47, Color::Black);

        for i in 0..self.count {
            let gap = &mut self.gaps[i];
            Self::draw_gap(&mut self.fb, gap);
            gap.update();
            if gap.gone() {
                if self.next_slot != i {
                    debug!("gap slot {} free for reuse", i);
                }
                self.next_slot = i;
            }
        }

        self.release_gaps();
        self.draw_player(true, Color::Black);

        self.out.move_cursor(SCORE_CURSOR.0, SCORE_CURSOR.1);
        let score = self.score.to_string();
        self.out.draw_str(&mut self.fb, &score);
    }

    /// Checks the bubble against every active wall and updates the score.
    /// Returns `true` on a crash.
    pub fn check_for_collision(&mut self) -> bool {
        let (px, py) = self.player.position();
        let r = self.player.radius;

        for (i, gap) in self.gaps.iter().enumerate().take(self.count) {
            if gap.contains_columns(px - r, px + r) {
                if !gap.contains_rows(py - r, py + r) {
                    return true;
                }
                self.in_gap = Some(i);
            } else if self.in_gap == Some(i) {
                self.score = self.score.saturating_add(1).min(MAX_SCORE);
                self.in_gap = None;
                debug!("passed gap {}, score {}", i, self.score);
            }
        }

        false
    }

    /// Collision and physics half of a tick, run after the frame was shown.
    /// Outside of play nothing moves and the tick counts as a crash.
    pub fn finish_tick(&mut self, thrust: bool) -> Tick {
        if self.state != State::Playing {
            return Tick::Crashed;
        }

        let crashed = self.check_for_collision() || self.player.on_floor();
        if crashed {
            // hollow bubble
            self.draw_player(true, Color::White);
            self.draw_player(false, Color::Black);
            self.state = State::GameOver;
            info!("crashed with score {}", self.score);
        }

        self.player.update(thrust);
        trace!("player {:?}", self.player);

        if crashed {
            Tick::Crashed
        } else {
            Tick::Running
        }
    }

    pub fn tick(&mut self, thrust: bool) -> Tick {
        self.draw_frame();
        self.finish_tick(thrust)
    }

    /// Prints the game over message. Returns whether the score is a new record.
    pub fn show_game_over(&mut self) -> bool {
        let new_high_score = self.beats_high_score();
        screens::game_over(&mut self.fb, &mut self.out, new_high_score);
        new_high_score
    }

    /// Ends the session. Returns the new high score if this session set one.
    pub fn finish(&mut self) -> Option<u8> {
        let record = if self.beats_high_score() {
            self.high_score = Some(self.score);
            Some(self.score)
        } else {
            None
        };
        info!("session over, score {} high score {:?}", self.score, self.high_score);
        self.new_session();
        record
    }
}
