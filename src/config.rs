use crate::lcd::panel::INIT_VOP;

/// Runtime knobs of the console. The defaults are the values the handheld ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Frame time of the play loop.
    pub tick_ms: u32,
    pub seed: u64,
    /// Panel operating voltage, 7 bits.
    pub contrast: u8,
    /// Show the intro animation and the title screens on the first session.
    pub intro: bool,
    pub flash_count: u32,
    pub game_over_wait_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: 80,
            seed: 20,
            contrast: INIT_VOP,
            intro: true,
            flash_count: 4,
            game_over_wait_ms: 5000,
        }
    }
}
