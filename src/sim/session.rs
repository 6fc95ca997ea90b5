//! Game clock and session state machine
//!
//! `Session` is the single owner of all mutable game state. The host calls
//! `advance` once per animation frame with the wall-clock time elapsed; the
//! session converts that into fixed simulation frames and countdown seconds.
//!
//! Phases: `Loading -> Playing <-> Paused`, `Playing -> Ended`.

use serde::Serialize;

use super::camera::Camera;
use super::pickup::CoinSpawner;
use super::state::{
    Collectible, Effect, EndReason, Enemy, EntityState, GameEvent, Player, Projectile,
    SessionPhase,
};
use super::tick::{TickInput, tick};
use super::timer::{OneShot, PeriodicTimer};
use super::world::WorldGeometry;
use crate::consts::*;
use crate::level::{LevelDef, LevelError};
use crate::loader::{LoadStatus, LoadTracker};
use crate::settings::Settings;

/// Longest wall-clock step fed to the simulation in one call
const MAX_FRAME_SECS: f32 = 0.1;

/// How a session is set up by its host
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Seeds the coin rain RNG
    pub seed: u64,
    pub viewport_width: f32,
    /// Assets the host will report through `asset_settled`
    pub expected_assets: u32,
    pub load_timeout_secs: f32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            expected_assets: 0,
            load_timeout_secs: LOAD_TIMEOUT_SECS,
        }
    }
}

impl SessionOptions {
    pub fn from_settings(settings: &Settings, seed: u64, expected_assets: u32) -> Self {
        Self {
            seed,
            viewport_width: settings.viewport_width,
            expected_assets,
            load_timeout_secs: settings.load_timeout_secs,
        }
    }
}

/// Read-only view of a session for the presentation layer
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: SessionPhase,
    pub end_reason: Option<EndReason>,
    pub score: u32,
    pub time_remaining: u32,
    /// HUD clock text ("m:ss")
    pub clock: String,
    pub camera_offset: f32,
    pub load_progress: f32,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub collectibles: &'a [Collectible],
    pub projectiles: &'a [Projectile],
    pub effects: &'a [Effect],
    pub events: &'a [GameEvent],
}

/// One play-through of one level
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) level: LevelDef,
    pub(super) world: WorldGeometry,
    pub(super) entities: EntityState,
    pub(super) phase: SessionPhase,
    pub(super) end_reason: Option<EndReason>,
    pub(super) score: u32,
    pub(super) time_remaining: u32,
    pub(super) camera: Camera,
    pub(super) countdown: PeriodicTimer,
    /// Speed boost expiry
    pub(super) boost: OneShot,
    pub(super) spawner: Option<CoinSpawner>,
    pub(super) loader: LoadTracker,
    pub(super) accumulator: f32,
    /// Primary press waiting for the next simulation frame
    pub(super) pending_primary: bool,
    /// Events since the start of the current host frame
    pub(super) events: Vec<GameEvent>,
    pub(super) frame: u64,
    options: SessionOptions,
}

impl Session {
    /// Build a session for `level`. It starts in `Loading` and moves to
    /// `Playing` as soon as the expected assets have settled.
    pub fn new(level: LevelDef, options: SessionOptions) -> Self {
        let tuning = &level.tuning;

        let player = Player::new(
            level.spawn_point,
            level.player_size,
            tuning.speed,
            tuning.track_health,
        );
        let mut entities = EntityState::new(player, level.hazards.len());
        for &pos in &level.collectibles {
            entities.spawn_collectible(pos, tuning.coin_size, 0.0);
        }
        for &pos in &level.enemy_spawns {
            entities.spawn_enemy(pos, tuning.enemy_size, tuning.enemy_health);
        }

        let world = WorldGeometry::new(
            level.platforms.clone(),
            level.hazards.clone(),
            level.world_width,
            level.world_height,
        );
        let mut camera = Camera::new(options.viewport_width, tuning.camera_anchor);
        camera.follow(level.spawn_point.x, world.width);

        let mut session = Self {
            time_remaining: tuning.time_limit_secs,
            spawner: tuning.coin_rain.map(|rain| CoinSpawner::new(rain, options.seed)),
            loader: LoadTracker::new(options.expected_assets, options.load_timeout_secs),
            countdown: PeriodicTimer::new(COUNTDOWN_PERIOD_SECS),
            level,
            world,
            entities,
            phase: SessionPhase::Loading,
            end_reason: None,
            score: 0,
            camera,
            boost: OneShot::default(),
            accumulator: 0.0,
            pending_primary: false,
            events: Vec::new(),
            frame: 0,
            options,
        };
        log::info!(
            "Session created for '{}' (seed {})",
            session.level.name,
            session.options.seed
        );
        session.finish_loading_if_ready();
        session
    }

    /// Parse a level and build a session for it
    pub fn from_json(json: &str, options: SessionOptions) -> Result<Self, LevelError> {
        Ok(Self::new(LevelDef::from_json(json)?, options))
    }

    /// Host reports one asset as loaded (`ok`) or failed
    pub fn asset_settled(&mut self, ok: bool) {
        self.loader.settle(ok);
        self.finish_loading_if_ready();
    }

    /// Feed one host animation frame.
    ///
    /// Runs as many fixed frames as the elapsed time covers (capped), and
    /// feeds the countdown. Paused, loading and ended sessions never step
    /// physics.
    pub fn advance(&mut self, input: &TickInput, elapsed: f32) {
        self.events.clear();
        let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };

        if input.pause {
            self.toggle_pause();
        }

        match self.phase {
            SessionPhase::Loading => {
                if self.loader.advance(elapsed) != LoadStatus::Pending {
                    self.finish_loading_if_ready();
                }
                return;
            }
            SessionPhase::Paused | SessionPhase::Ended => return,
            SessionPhase::Playing => {}
        }

        // Countdown runs on wall-clock time, before this frame's steps
        for _ in 0..self.countdown.advance(elapsed) {
            self.on_countdown_tick();
        }

        self.pending_primary |= input.primary;
        self.accumulator += elapsed.min(MAX_FRAME_SECS);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let step_input = TickInput {
                primary: std::mem::take(&mut self.pending_primary),
                pause: false,
                ..input.clone()
            };
            tick(self, &step_input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop backlog we could not run; never catch up later
        self.accumulator = self.accumulator.min(SIM_DT);
    }

    /// One countdown second elapsed
    pub fn on_countdown_tick(&mut self) {
        if self.phase != SessionPhase::Playing || self.time_remaining == 0 {
            return;
        }
        self.time_remaining -= 1;
        if self.time_remaining == 0 {
            self.end(EndReason::TimeUp);
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            SessionPhase::Playing => self.pause(),
            SessionPhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Freeze frames and countdown. Only valid while playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        self.phase = SessionPhase::Paused;
        self.countdown.stop();
        log::info!("Paused at frame {}", self.frame);
        true
    }

    /// Resume from pause with a fresh countdown period and no frame backlog
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Playing;
        self.accumulator = 0.0;
        self.pending_primary = false;
        self.countdown.start();
        log::info!("Resumed");
        true
    }

    /// End the session. Only the first call while playing has an effect.
    pub fn end(&mut self, reason: EndReason) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        self.phase = SessionPhase::Ended;
        self.end_reason = Some(reason);
        self.countdown.stop();
        self.boost.cancel();
        self.events.push(GameEvent::SessionEnded {
            reason,
            score: self.score,
        });
        log::info!(
            "Session ended ({reason:?}) with score {} and {}s left",
            self.score,
            self.time_remaining
        );
        true
    }

    /// Rebuild everything from level content and start playing again.
    /// Assets are already loaded, so there is no Loading phase.
    pub fn restart(&mut self) -> bool {
        if !matches!(self.phase, SessionPhase::Paused | SessionPhase::Ended) {
            return false;
        }
        let options = SessionOptions {
            viewport_width: self.camera.viewport_width,
            expected_assets: 0,
            ..self.options.clone()
        };
        *self = Self::new(self.level.clone(), options);
        log::info!("Session restarted");
        true
    }

    /// Host canvas resized
    pub fn set_viewport_width(&mut self, width: f32) {
        self.camera.resize(width);
        self.camera
            .follow(self.entities.player.pos.x, self.world.width);
    }

    fn finish_loading_if_ready(&mut self) {
        if self.phase != SessionPhase::Loading || !self.loader.is_ready() {
            return;
        }
        self.phase = SessionPhase::Playing;
        self.accumulator = 0.0;
        self.countdown.start();
        log::info!(
            "Playing '{}' ({}s on the clock)",
            self.level.name,
            self.time_remaining
        );
        if self.time_remaining == 0 {
            self.end(EndReason::TimeUp);
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_offset(&self) -> f32 {
        self.camera.offset_x
    }

    pub fn player(&self) -> &Player {
        &self.entities.player
    }

    pub fn entities(&self) -> &EntityState {
        &self.entities
    }

    pub fn world(&self) -> &WorldGeometry {
        &self.world
    }

    pub fn level(&self) -> &LevelDef {
        &self.level
    }

    pub fn loader(&self) -> &LoadTracker {
        &self.loader
    }

    /// Simulation frames run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn seed(&self) -> u64 {
        self.options.seed
    }

    /// Events from the current host frame
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            end_reason: self.end_reason,
            score: self.score,
            time_remaining: self.time_remaining,
            clock: format_clock(self.time_remaining),
            camera_offset: self.camera.offset_x,
            load_progress: self.loader.progress(),
            player: &self.entities.player,
            enemies: &self.entities.enemies,
            collectibles: &self.entities.collectibles,
            projectiles: &self.entities.projectiles,
            effects: &self.entities.effects,
            events: &self.events,
        }
    }
}

/// HUD clock text
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
