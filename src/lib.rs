//! Coin Dash - a side-scrolling coin collector and shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, session state)
//! - `level`: Level content and per-level tuning
//! - `loader`: Asset load tracking for the Loading phase
//! - `platform`: Browser/native platform abstraction (input, wasm exports)
//! - `highscores`: Top-3 leaderboard
//! - `settings`: Player preferences

pub mod highscores;
pub mod level;
pub mod loader;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use level::{LevelDef, LevelError, Tuning};
pub use settings::Settings;
pub use sim::{Session, TickInput};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one animation frame at 60 Hz).
    /// Speeds, gravity and impulses are all expressed per frame.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Viewport width before the host resizes the canvas
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;

    /// Force the Loading phase to end after this many seconds
    pub const LOAD_TIMEOUT_SECS: f32 = 3.0;

    /// Countdown period (one HUD second)
    pub const COUNTDOWN_PERIOD_SECS: f32 = 1.0;

    /// Player health range for levels that track health
    pub const MAX_HEALTH: f32 = 100.0;

    /// Tolerance used when comparing resting positions
    pub const EPSILON: f32 = 1e-3;
}

/// Clamp `value` into `[lo, hi]`, collapsing to `lo` when the range is empty
#[inline]
pub fn clamp_span(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi.max(lo)).max(lo)
}
