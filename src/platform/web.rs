//! Browser surface
//!
//! The JS host owns the canvas, the image/audio handles and the
//! `requestAnimationFrame` chain. It forwards key and touch events, reports
//! asset loads, calls `frame` once per animation frame and draws from the
//! JSON snapshot.

use wasm_bindgen::prelude::*;

use super::{Button, KeyState};
use crate::highscores::HighScores;
use crate::level::LevelDef;
use crate::settings::Settings;
use crate::sim::{Session, SessionOptions};

/// Joystick dead zone as a fraction of full deflection
const AXIS_DEAD_ZONE: f32 = 0.25;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("Logger already initialized"));
    }
    log::info!("Coin Dash starting...");
}

/// Game instance driven by the JS host
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    keys: KeyState,
    settings: Settings,
    high_scores: HighScores,
    /// Score of this play-through already on the board
    recorded: bool,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a built-in level. `expected_assets` is how many loads the host
    /// will report through `asset_settled`.
    #[wasm_bindgen(constructor)]
    pub fn new(level_index: usize, expected_assets: u32) -> WebGame {
        Self::with_level(LevelDef::builtin(level_index), expected_assets)
    }

    /// Start a level described as JSON
    pub fn from_level_json(json: &str, expected_assets: u32) -> Result<WebGame, JsValue> {
        let level = LevelDef::from_json(json).map_err(|e| {
            log::warn!("Rejected level content: {e}");
            JsValue::from_str(&e.to_string())
        })?;
        Ok(Self::with_level(level, expected_assets))
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        self.keys.key(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.keys.key(code, false)
    }

    /// On-screen buttons: "left", "right", "primary", "pause"
    pub fn touch(&mut self, button: &str, down: bool) {
        let button = match button {
            "left" => Button::Left,
            "right" => Button::Right,
            "primary" => Button::Primary,
            "pause" => Button::Pause,
            other => {
                log::debug!("Unknown touch button '{other}'");
                return;
            }
        };
        self.keys.set_button(button, down);
    }

    /// Virtual joystick x deflection in [-1, 1]
    pub fn joystick(&mut self, x: f32) {
        self.keys.set_axis(x, AXIS_DEAD_ZONE);
    }

    /// Window lost focus: release keys and pause
    pub fn blur(&mut self) {
        self.keys.clear();
        if self.session.pause() {
            log::info!("Auto-paused (window blur)");
        }
    }

    /// Page became hidden (`visibilitychange`): pause and forget the gap
    pub fn visibility_hidden(&mut self) {
        self.keys.clear();
        self.last_time = None;
        if self.session.pause() {
            log::info!("Auto-paused (tab hidden)");
        }
    }

    pub fn asset_settled(&mut self, ok: bool) {
        self.session.asset_settled(ok);
    }

    /// One animation frame at `now_ms` (the rAF timestamp)
    pub fn frame(&mut self, now_ms: f64) {
        let elapsed = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        let input = self.keys.take_input();
        self.session.advance(&input, elapsed);
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|e| {
            log::warn!("Snapshot failed to serialize: {e}");
            String::from("{}")
        })
    }

    pub fn restart(&mut self) -> bool {
        self.keys.clear();
        let restarted = self.session.restart();
        if restarted {
            self.recorded = false;
        }
        restarted
    }

    pub fn resize(&mut self, width: f32) {
        if self.settings.viewport_width != width {
            self.settings.viewport_width = width;
            self.settings.save();
        }
        self.session.set_viewport_width(width);
    }

    /// Whether the host should prompt for initials
    pub fn qualifies_for_high_score(&self) -> bool {
        self.session.is_over()
            && !self.recorded
            && self.high_scores.qualifies(self.session.score())
    }

    /// Record the finished session's score. Returns the rank, 0 if none.
    pub fn submit_initials(&mut self, initials: &str) -> u32 {
        if !self.session.is_over() || self.recorded {
            return 0;
        }
        self.recorded = true;
        match self.high_scores.add_score(initials, self.session.score()) {
            Some(rank) => {
                self.high_scores.save();
                rank as u32
            }
            None => 0,
        }
    }

    pub fn high_scores_json(&self) -> String {
        self.high_scores.to_json()
    }

    pub fn toggle_music(&mut self) -> bool {
        let enabled = self.settings.toggle_music();
        self.settings.save();
        enabled
    }

    pub fn music_volume(&self) -> f32 {
        self.settings.effective_music_volume()
    }

    pub fn show_touch_controls(&self) -> bool {
        self.settings.show_touch_controls
    }
}

impl WebGame {
    fn with_level(level: LevelDef, expected_assets: u32) -> WebGame {
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let options = SessionOptions::from_settings(&settings, seed, expected_assets);
        WebGame {
            session: Session::new(level, options),
            keys: KeyState::new(),
            settings,
            high_scores: HighScores::load(),
            recorded: false,
            last_time: None,
        }
    }
}
