//! Entity records and session-level enums
//!
//! Everything the presentation layer reads lives here. All records are plain
//! data; behavior is implemented as free functions in the step modules.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::timer::OneShot;
use crate::consts::MAX_HEALTH;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for assets to settle (or the load timeout)
    Loading,
    /// Frame pipeline and countdown running
    Playing,
    /// Everything frozen
    Paused,
    /// Terminal for this session instance
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Countdown reached zero
    TimeUp,
    /// Every collectible picked up
    Cleared,
    /// Player health reached zero
    Defeated,
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing implied by a horizontal delta (None for zero)
    pub fn from_dx(dx: f32) -> Option<Self> {
        if dx > 0.0 {
            Some(Facing::Right)
        } else if dx < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// `x` is re-derived from input every frame, `y` is integrated
    pub vel: Vec2,
    pub size: Vec2,
    /// Current horizontal speed (base speed unless boosted)
    pub speed: f32,
    pub grounded: bool,
    /// One mid-air jump available (only used when the level allows it)
    pub can_double_jump: bool,
    pub facing: Facing,
    /// None in levels without health
    pub health: Option<f32>,
    /// Shoot/attack pose lock
    pub action_lock: OneShot,
    /// Walk cycle frame for the presentation layer
    pub anim_frame: u32,
    #[serde(skip)]
    pub anim_timer: u32,
}

impl Player {
    pub fn new(spawn: Vec2, size: Vec2, speed: f32, track_health: bool) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            size,
            speed,
            grounded: false,
            can_double_jump: false,
            facing: Facing::Right,
            health: track_health.then_some(MAX_HEALTH),
            action_lock: OneShot::default(),
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::at(self.pos, self.size)
    }

    /// Shoot/attack pose active
    pub fn is_acting(&self) -> bool {
        self.action_lock.is_active()
    }

    /// Back to spawn: position, velocity and movement flags. Score,
    /// health and speed boosts are untouched.
    pub fn reset_to(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.grounded = false;
        self.can_double_jump = false;
        self.facing = Facing::Right;
        self.anim_frame = 0;
        self.anim_timer = 0;
    }

    /// Subtract health, clamped to `[0, MAX_HEALTH]`. Returns the amount
    /// actually removed (0 for levels without health).
    pub fn damage(&mut self, amount: f32) -> f32 {
        match self.health.as_mut() {
            Some(health) => {
                let before = *health;
                *health = (*health - amount).clamp(0.0, MAX_HEALTH);
                before - *health
            }
            None => 0.0,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.health.is_some_and(|h| h <= 0.0)
    }
}

/// A chasing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Dead enemies stay in storage as tombstones and are never revived
    pub alive: bool,
    pub facing: Facing,
    /// Close enough to the player to stop and attack
    pub attacking: bool,
    pub anim_frame: u32,
    #[serde(skip)]
    pub anim_timer: u32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, size: Vec2, health: i32) -> Self {
        Self {
            id,
            pos,
            size,
            health,
            max_health: health,
            alive: true,
            facing: Facing::Left,
            attacking: false,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::at(self.pos, self.size)
    }
}

/// A coin (placed by the level or dropped by coin rain)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Monotonic: never goes back to false within a session
    pub collected: bool,
    /// Per-frame fall speed (0 for placed coins)
    pub fall_speed: f32,
}

impl Collectible {
    pub fn aabb(&self) -> Aabb {
        Aabb::at(self.pos, self.size)
    }
}

/// A player shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Signed by firing direction
    pub vel: Vec2,
    pub size: Vec2,
}

impl Projectile {
    pub fn aabb(&self) -> Aabb {
        Aabb::at(self.pos, self.size)
    }
}

/// Visual effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Explosion,
    MuzzleFlash,
}

/// A short sprite animation with no gameplay effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub frame_index: u32,
    pub frame_count: u32,
    pub ticks_per_frame: u32,
    pub elapsed_ticks: u32,
}

impl Effect {
    pub fn explosion(pos: Vec2) -> Self {
        Self::new(EffectKind::Explosion, pos, 4, 5)
    }

    pub fn muzzle_flash(pos: Vec2) -> Self {
        Self::new(EffectKind::MuzzleFlash, pos, 2, 3)
    }

    fn new(kind: EffectKind, pos: Vec2, frame_count: u32, ticks_per_frame: u32) -> Self {
        Self {
            kind,
            pos,
            frame_index: 0,
            frame_count,
            ticks_per_frame: ticks_per_frame.max(1),
            elapsed_ticks: 0,
        }
    }

    /// Advance one tick; returns false once the animation has finished
    pub fn advance(&mut self) -> bool {
        self.elapsed_ticks += 1;
        if self.elapsed_ticks % self.ticks_per_frame == 0 {
            self.frame_index += 1;
        }
        self.frame_index < self.frame_count
    }
}

/// Things that happened during a frame (for audio/HUD hosts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { double: bool },
    Landed,
    CoinCollected { id: u32 },
    HazardHit { index: usize },
    FellOut,
    PlayerDamaged { amount: f32 },
    ShotFired,
    EnemyHit { id: u32 },
    EnemyKilled { id: u32 },
    SpeedBoost { speed: f32 },
    SpeedBoostEnded,
    SessionEnded { reason: EndReason, score: u32 },
}

/// Mutable entity state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    pub player: Player,
    /// Stable order by id; tombstones stay in place
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<Effect>,
    /// Per hazard: armed until the player touches it, re-armed on separation
    pub hazard_armed: Vec<bool>,
    next_id: u32,
}

impl EntityState {
    pub fn new(player: Player, hazard_count: usize) -> Self {
        Self {
            player,
            enemies: Vec::new(),
            collectibles: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            hazard_armed: vec![true; hazard_count],
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_enemy(&mut self, pos: Vec2, size: Vec2, health: i32) {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, pos, size, health));
    }

    pub fn spawn_collectible(&mut self, pos: Vec2, size: Vec2, fall_speed: f32) {
        let id = self.next_entity_id();
        self.collectibles.push(Collectible {
            id,
            pos,
            size,
            collected: false,
            fall_speed,
        });
    }

    pub fn spawn_projectile(&mut self, pos: Vec2, vel: Vec2, size: Vec2) {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile { id, pos, vel, size });
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_damage_clamps() {
        let mut player = Player::new(Vec2::ZERO, Vec2::new(64.0, 64.0), 4.0, true);
        assert_eq!(player.damage(30.0), 30.0);
        assert_eq!(player.health, Some(70.0));
        assert_eq!(player.damage(500.0), 70.0);
        assert_eq!(player.health, Some(0.0));
        assert!(player.is_defeated());
        // Negative damage cannot heal past the cap
        player.damage(-1000.0);
        assert_eq!(player.health, Some(MAX_HEALTH));
    }

    #[test]
    fn test_player_without_health_ignores_damage() {
        let mut player = Player::new(Vec2::ZERO, Vec2::new(50.0, 70.0), 6.0, false);
        assert_eq!(player.damage(10.0), 0.0);
        assert!(player.health.is_none());
        assert!(!player.is_defeated());
    }

    #[test]
    fn test_player_reset_keeps_health() {
        let mut player = Player::new(Vec2::new(100.0, 440.0), Vec2::new(50.0, 70.0), 6.0, true);
        player.pos = Vec2::new(900.0, 100.0);
        player.vel = Vec2::new(6.0, -12.0);
        player.grounded = true;
        player.facing = Facing::Left;
        player.damage(25.0);

        player.reset_to(Vec2::new(100.0, 440.0));
        assert_eq!(player.pos, Vec2::new(100.0, 440.0));
        assert_eq!(player.vel, Vec2::ZERO);
        assert!(!player.grounded);
        assert_eq!(player.facing, Facing::Right);
        assert_eq!(player.health, Some(75.0));
    }

    #[test]
    fn test_effect_lifecycle() {
        let mut fx = Effect::explosion(Vec2::ZERO);
        let mut ticks = 0;
        while fx.advance() {
            ticks += 1;
            assert!(ticks < 100, "effect never finished");
        }
        // 4 frames x 5 ticks: finishes on the 20th tick
        assert_eq!(ticks + 1, 20);
        assert_eq!(fx.frame_index, fx.frame_count);
    }

    #[test]
    fn test_facing_from_dx() {
        assert_eq!(Facing::from_dx(3.0), Some(Facing::Right));
        assert_eq!(Facing::from_dx(-0.5), Some(Facing::Left));
        assert_eq!(Facing::from_dx(0.0), None);
        assert_eq!(Facing::Left.sign(), -1.0);
    }

    #[test]
    fn test_entity_ids_unique() {
        let player = Player::new(Vec2::ZERO, Vec2::ONE, 1.0, false);
        let mut state = EntityState::new(player, 2);
        state.spawn_enemy(Vec2::ZERO, Vec2::ONE, 5);
        state.spawn_collectible(Vec2::ZERO, Vec2::ONE, 0.0);
        state.spawn_projectile(Vec2::ZERO, Vec2::X, Vec2::ONE);
        assert_eq!(state.enemies[0].id, 1);
        assert_eq!(state.collectibles[0].id, 2);
        assert_eq!(state.projectiles[0].id, 3);
        assert_eq!(state.hazard_armed, vec![true, true]);
    }
}
