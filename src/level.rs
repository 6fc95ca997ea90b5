//! Level content and per-level tuning
//!
//! A level is static data: geometry, spawn points and the knobs that make
//! each stage play differently. Levels can be authored as JSON or taken from
//! the built-in set.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Aabb;

/// Errors from loading level content
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid level field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl LevelError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LevelError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// What the primary button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrimaryAction {
    #[default]
    Jump,
    Shoot,
}

/// Penalty applied once per hazard contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardPenalty {
    /// Subtracted from score (saturating at 0)
    pub score: u32,
    /// Subtracted from health in levels that track it
    pub health: f32,
}

impl Default for HazardPenalty {
    fn default() -> Self {
        Self {
            score: 5,
            health: 20.0,
        }
    }
}

/// Coins that drop from the top of the screen at random x positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinRain {
    /// Frames between spawns
    pub interval_ticks: u32,
    /// Pixels per frame
    pub fall_speed: f32,
    /// Coin edge length
    pub size: f32,
}

impl Default for CoinRain {
    fn default() -> Self {
        Self {
            interval_ticks: 90,
            fall_speed: 3.0,
            size: 40.0,
        }
    }
}

/// Temporary speed-up every N points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedBoost {
    /// Trigger when score is a positive multiple of this
    pub every: u32,
    pub multiplier: f32,
    /// Boosted speed never exceeds `cap * base speed`
    pub cap: f32,
    pub duration_ticks: u32,
}

impl Default for SpeedBoost {
    fn default() -> Self {
        Self {
            every: 5,
            multiplier: 1.3,
            cap: 2.0,
            duration_ticks: 180,
        }
    }
}

/// Per-level gameplay knobs. All rates are per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal speed
    pub speed: f32,
    /// Added to vertical velocity every frame
    pub gravity: f32,
    /// Vertical velocity set on jump (negative is up)
    pub jump_impulse: f32,
    /// Allow exactly one extra jump while airborne
    pub double_jump: bool,
    pub primary: PrimaryAction,
    /// Player has a health bar
    pub track_health: bool,
    /// Health lost per frame while touching a live enemy
    pub contact_damage: f32,
    /// Enemy chase speed
    pub pursuit_speed: f32,
    pub enemy_size: Vec2,
    pub enemy_health: i32,
    pub hazard_penalty: HazardPenalty,
    pub coin_score: u32,
    pub coin_size: Vec2,
    pub projectile_speed: f32,
    pub projectile_size: Vec2,
    /// Shoot pose duration
    pub action_lock_ticks: u32,
    /// Player sits at this fraction of the viewport width
    pub camera_anchor: f32,
    pub time_limit_secs: u32,
    /// Frames per walk-cycle step
    pub anim_ticks_per_frame: u32,
    pub coin_rain: Option<CoinRain>,
    pub speed_boost: Option<SpeedBoost>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: 6.0,
            gravity: 1.0,
            jump_impulse: -18.0,
            double_jump: false,
            primary: PrimaryAction::Jump,
            track_health: false,
            contact_damage: 0.5,
            pursuit_speed: 1.5,
            enemy_size: Vec2::new(64.0, 64.0),
            enemy_health: 5,
            hazard_penalty: HazardPenalty::default(),
            coin_score: 1,
            coin_size: Vec2::new(32.0, 32.0),
            projectile_speed: 10.0,
            projectile_size: Vec2::new(16.0, 8.0),
            action_lock_ticks: 15,
            camera_anchor: 1.0 / 3.0,
            time_limit_secs: 120,
            anim_ticks_per_frame: 8,
            coin_rain: None,
            speed_boost: None,
        }
    }
}

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub world_width: f32,
    pub world_height: f32,
    pub spawn_point: Vec2,
    pub player_size: Vec2,
    #[serde(default)]
    pub platforms: Vec<Aabb>,
    #[serde(default)]
    pub hazards: Vec<Aabb>,
    /// Top-left corners of placed coins
    #[serde(default)]
    pub collectibles: Vec<Vec2>,
    #[serde(default)]
    pub enemy_spawns: Vec<Vec2>,
    #[serde(default)]
    pub tuning: Tuning,
}

impl LevelDef {
    /// Parse and validate a level description
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelDef = serde_json::from_str(json)?;
        level.validate()?;
        log::info!(
            "Loaded level '{}' ({} platforms, {} coins, {} enemies)",
            level.name,
            level.platforms.len(),
            level.collectibles.len(),
            level.enemy_spawns.len()
        );
        Ok(level)
    }

    /// Reject content the simulation cannot run. Empty geometry is allowed.
    pub fn validate(&self) -> Result<(), LevelError> {
        if !(self.world_width.is_finite() && self.world_width > 0.0) {
            return Err(LevelError::invalid("world_width", "must be positive"));
        }
        if !(self.world_height.is_finite() && self.world_height > 0.0) {
            return Err(LevelError::invalid("world_height", "must be positive"));
        }
        if !self.spawn_point.is_finite() {
            return Err(LevelError::invalid("spawn_point", "must be finite"));
        }
        if !(self.player_size.is_finite() && self.player_size.x > 0.0 && self.player_size.y > 0.0)
        {
            return Err(LevelError::invalid("player_size", "must be positive"));
        }
        if let Some(i) = self.platforms.iter().position(|p| !p.is_well_formed()) {
            return Err(LevelError::invalid(
                "platforms",
                format!("box {i} has negative size or non-finite coordinates"),
            ));
        }
        if let Some(i) = self.hazards.iter().position(|h| !h.is_well_formed()) {
            return Err(LevelError::invalid(
                "hazards",
                format!("box {i} has negative size or non-finite coordinates"),
            ));
        }
        if self
            .collectibles
            .iter()
            .chain(&self.enemy_spawns)
            .any(|p| !p.is_finite())
        {
            return Err(LevelError::invalid("collectibles", "positions must be finite"));
        }

        let t = &self.tuning;
        if !(0.0..=1.0).contains(&t.camera_anchor) {
            return Err(LevelError::invalid("tuning.camera_anchor", "must be in [0, 1]"));
        }
        if ![t.speed, t.gravity, t.jump_impulse, t.contact_damage, t.pursuit_speed]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(LevelError::invalid("tuning", "rates must be finite"));
        }
        if t.speed <= 0.0 {
            return Err(LevelError::invalid("tuning.speed", "must be > 0"));
        }
        if t.gravity <= 0.0 {
            return Err(LevelError::invalid("tuning.gravity", "must be > 0"));
        }
        if t.pursuit_speed <= 0.0 {
            return Err(LevelError::invalid("tuning.pursuit_speed", "must be > 0"));
        }
        if t.contact_damage < 0.0 {
            return Err(LevelError::invalid("tuning.contact_damage", "must be >= 0"));
        }
        if !(t.hazard_penalty.health.is_finite() && t.hazard_penalty.health >= 0.0) {
            return Err(LevelError::invalid("tuning.hazard_penalty.health", "must be >= 0"));
        }
        if t.time_limit_secs == 0 {
            return Err(LevelError::invalid("tuning.time_limit_secs", "must be > 0"));
        }
        if t.coin_rain.is_some_and(|r| r.interval_ticks == 0) {
            return Err(LevelError::invalid("tuning.coin_rain.interval_ticks", "must be > 0"));
        }
        if t.speed_boost.is_some_and(|b| b.every == 0) {
            return Err(LevelError::invalid("tuning.speed_boost.every", "must be > 0"));
        }
        Ok(())
    }

    /// Built-in levels in play order
    pub fn builtin_levels() -> Vec<LevelDef> {
        vec![coin_rain(), platform_run(), gunner_alley()]
    }

    /// Built-in level by index (wraps around)
    pub fn builtin(index: usize) -> LevelDef {
        let mut levels = Self::builtin_levels();
        let i = index % levels.len();
        levels.swap_remove(i)
    }
}

/// Catch falling coins on a single screen
fn coin_rain() -> LevelDef {
    // Ground sits 12% above the bottom of a 600px canvas
    let ground_y = 528.0;
    let player_size = Vec2::new(80.0, 100.0);
    LevelDef {
        name: "Coin Rain".to_string(),
        world_width: 800.0,
        world_height: 600.0,
        spawn_point: Vec2::new(400.0 - player_size.x / 2.0, ground_y - player_size.y),
        player_size,
        platforms: vec![Aabb::new(0.0, ground_y, 800.0, 72.0)],
        hazards: Vec::new(),
        collectibles: Vec::new(),
        enemy_spawns: Vec::new(),
        tuning: Tuning {
            speed: 5.0,
            gravity: 0.8,
            jump_impulse: -15.0,
            double_jump: true,
            camera_anchor: 0.5,
            coin_rain: Some(CoinRain::default()),
            speed_boost: Some(SpeedBoost::default()),
            ..Tuning::default()
        },
    }
}

/// Side-scrolling platform course with spikes
fn platform_run() -> LevelDef {
    let base_y = 560.0;
    let coin = 32.0;
    let spike_h = 20.0;

    let mut platforms = vec![Aabb::new(0.0, base_y, 6000.0, 40.0)];
    let ledges: [(f32, f32, f32); 23] = [
        (300.0, 140.0, 120.0),
        (500.0, 210.0, 120.0),
        (700.0, 140.0, 120.0),
        (1000.0, 180.0, 120.0),
        (1400.0, 140.0, 120.0),
        (1700.0, 100.0, 150.0),
        (1900.0, 200.0, 100.0),
        (2100.0, 150.0, 120.0),
        (2350.0, 120.0, 180.0),
        (2600.0, 220.0, 100.0),
        (2800.0, 100.0, 150.0),
        (3050.0, 180.0, 120.0),
        (3300.0, 130.0, 200.0),
        (3600.0, 200.0, 100.0),
        (3800.0, 100.0, 150.0),
        (4050.0, 160.0, 120.0),
        (4300.0, 120.0, 180.0),
        (4550.0, 210.0, 100.0),
        (4800.0, 100.0, 150.0),
        (5000.0, 170.0, 200.0),
        (5300.0, 150.0, 150.0),
        (5550.0, 100.0, 100.0),
        (5800.0, 180.0, 180.0),
    ];
    platforms.extend(
        ledges
            .iter()
            .map(|&(x, rise, w)| Aabb::new(x, base_y - rise, w, 20.0)),
    );

    let raised_coins: [(f32, f32); 22] = [
        (350.0, 140.0),
        (550.0, 210.0),
        (1050.0, 180.0),
        (1450.0, 140.0),
        (1750.0, 100.0),
        (1950.0, 200.0),
        (2150.0, 150.0),
        (2400.0, 120.0),
        (2650.0, 220.0),
        (2850.0, 100.0),
        (3100.0, 180.0),
        (3350.0, 130.0),
        (3650.0, 200.0),
        (3850.0, 100.0),
        (4100.0, 160.0),
        (4350.0, 120.0),
        (4600.0, 210.0),
        (4850.0, 100.0),
        (5050.0, 170.0),
        (5350.0, 150.0),
        (5600.0, 100.0),
        (5850.0, 180.0),
    ];
    let ground_coins = [
        400.0, 900.0, 1600.0, 2200.0, 2900.0, 3500.0, 4200.0, 4900.0, 5500.0,
    ];
    let collectibles = raised_coins
        .iter()
        .map(|&(x, rise)| Vec2::new(x, base_y - rise - coin))
        .chain(ground_coins.iter().map(|&x| Vec2::new(x, base_y - coin)))
        .collect();

    let spikes: [(f32, f32); 16] = [
        (850.0, 0.0),
        (1300.0, 0.0),
        (1800.0, 0.0),
        (1780.0, 100.0),
        (2500.0, 0.0),
        (2540.0, 0.0),
        (3000.0, 0.0),
        (3350.0, 130.0),
        (3700.0, 0.0),
        (4000.0, 0.0),
        (4040.0, 0.0),
        (4400.0, 120.0),
        (4700.0, 0.0),
        (5100.0, 170.0),
        (5400.0, 0.0),
        (5850.0, 180.0),
    ];
    let hazards = spikes
        .iter()
        .map(|&(x, rise)| Aabb::new(x, base_y - rise - spike_h, 40.0, spike_h))
        .collect();

    LevelDef {
        name: "Platform Run".to_string(),
        world_width: 6000.0,
        world_height: 600.0,
        spawn_point: Vec2::new(100.0, 440.0),
        player_size: Vec2::new(50.0, 70.0),
        platforms,
        hazards,
        collectibles,
        enemy_spawns: Vec::new(),
        tuning: Tuning::default(),
    }
}

/// Scrolling alley with chasing enemies and a blaster
fn gunner_alley() -> LevelDef {
    let tile = 64.0;
    let ground_y = 464.0;
    LevelDef {
        name: "Gunner Alley".to_string(),
        world_width: 32.0 * tile,
        world_height: 600.0,
        spawn_point: Vec2::new(100.0, ground_y - tile),
        player_size: Vec2::new(tile, tile),
        platforms: vec![Aabb::new(0.0, ground_y, 32.0 * tile, 600.0 - ground_y)],
        hazards: Vec::new(),
        collectibles: Vec::new(),
        enemy_spawns: vec![Vec2::new(800.0, 400.0), Vec2::new(1300.0, 400.0)],
        tuning: Tuning {
            speed: 4.0,
            jump_impulse: -15.0,
            primary: PrimaryAction::Shoot,
            track_health: true,
            camera_anchor: 0.5,
            time_limit_secs: 180,
            ..Tuning::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_validate() {
        for level in LevelDef::builtin_levels() {
            level
                .validate()
                .unwrap_or_else(|e| panic!("{} failed validation: {e}", level.name));
        }
    }

    #[test]
    fn test_builtin_wraps() {
        assert_eq!(LevelDef::builtin(0).name, "Coin Rain");
        assert_eq!(LevelDef::builtin(1).name, "Platform Run");
        assert_eq!(LevelDef::builtin(2).name, "Gunner Alley");
        assert_eq!(LevelDef::builtin(3).name, "Coin Rain");
    }

    #[test]
    fn test_platform_run_content() {
        let level = LevelDef::builtin(1);
        assert_eq!(level.platforms.len(), 24);
        assert_eq!(level.collectibles.len(), 31);
        assert_eq!(level.hazards.len(), 16);
        // Main ground spans the whole world
        assert_eq!(level.platforms[0], Aabb::new(0.0, 560.0, 6000.0, 40.0));
    }

    #[test]
    fn test_json_round_trip_minimal() {
        let json = r#"{
            "name": "Empty",
            "world_width": 1000.0,
            "world_height": 600.0,
            "spawn_point": [10.0, 10.0],
            "player_size": [50.0, 70.0]
        }"#;
        let level = LevelDef::from_json(json).expect("minimal level parses");
        assert!(level.platforms.is_empty());
        assert_eq!(level.tuning, Tuning::default());
    }

    #[test]
    fn test_json_partial_tuning_uses_defaults() {
        let json = r#"{
            "name": "Floaty",
            "world_width": 1000.0,
            "world_height": 600.0,
            "spawn_point": [10.0, 10.0],
            "player_size": [50.0, 70.0],
            "platforms": [{"x": 0.0, "y": 560.0, "width": 1000.0, "height": 40.0}],
            "tuning": {"gravity": 0.5, "double_jump": true}
        }"#;
        let level = LevelDef::from_json(json).expect("level parses");
        assert_eq!(level.tuning.gravity, 0.5);
        assert!(level.tuning.double_jump);
        assert_eq!(level.tuning.speed, Tuning::default().speed);
    }

    #[test]
    fn test_malformed_json() {
        let err = LevelDef::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LevelError::Json(_)));
    }

    #[test]
    fn test_invalid_world_width() {
        let mut level = LevelDef::builtin(1);
        level.world_width = 0.0;
        match level.validate() {
            Err(LevelError::Invalid { field, .. }) => assert_eq!(field, "world_width"),
            other => panic!("expected invalid world_width, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_negative_platform() {
        let mut level = LevelDef::builtin(1);
        level.platforms.push(Aabb::new(0.0, 0.0, -5.0, 10.0));
        assert!(matches!(
            level.validate(),
            Err(LevelError::Invalid {
                field: "platforms",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_zero_time_limit() {
        let json = r#"{
            "name": "No time",
            "world_width": 800.0,
            "world_height": 600.0,
            "spawn_point": [100.0, 400.0],
            "player_size": [50.0, 70.0],
            "tuning": {"time_limit_secs": 0}
        }"#;
        assert!(matches!(
            LevelDef::from_json(json),
            Err(LevelError::Invalid {
                field: "tuning.time_limit_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_tuning_signs() {
        let cases: [(&str, fn(&mut Tuning)); 5] = [
            ("tuning.speed", |t| t.speed = -6.0),
            ("tuning.gravity", |t| t.gravity = 0.0),
            ("tuning.pursuit_speed", |t| t.pursuit_speed = 0.0),
            ("tuning.contact_damage", |t| t.contact_damage = -0.5),
            ("tuning.hazard_penalty.health", |t| t.hazard_penalty.health = -20.0),
        ];
        for (expected, tweak) in cases {
            let mut level = LevelDef::builtin(1);
            tweak(&mut level.tuning);
            match level.validate() {
                Err(LevelError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_camera_anchor() {
        let mut level = LevelDef::builtin(2);
        level.tuning.camera_anchor = 1.5;
        assert!(level.validate().is_err());
    }
}
