//! Enemies, shots, effects and hazards
//!
//! Enemies fly straight at the player (no gravity) and hurt on contact every
//! frame they overlap. Hazards are discrete: one penalty per contact, re-armed
//! only after the player has separated from the hazard.

use glam::Vec2;

use super::physics::{Movable, drift};
use super::state::{Effect, EntityState, Facing, GameEvent};
use super::world::WorldGeometry;
use crate::level::Tuning;

/// Frames per enemy animation step
const ENEMY_ANIM_TICKS: u32 = 15;
/// Enemy animation cycle length
const ENEMY_ANIM_FRAMES: u32 = 3;
/// Vertical muzzle position as a fraction of player height
const MUZZLE_HEIGHT: f32 = 0.3;

/// Move live enemies toward the player and apply contact damage.
/// Returns total damage dealt this frame.
pub fn step_enemies(state: &mut EntityState, tuning: &Tuning, events: &mut Vec<GameEvent>) -> f32 {
    let target = state.player.aabb().center();
    let mut contact = 0.0;

    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        let to_player = target - enemy.bounds().center();
        let dist = to_player.length();
        if dist > 1.0 {
            enemy.translate(to_player / dist * tuning.pursuit_speed);
            enemy.attacking = false;
        } else {
            enemy.attacking = true;
        }
        if let Some(facing) = Facing::from_dx(to_player.x) {
            enemy.facing = facing;
        }

        enemy.anim_timer += 1;
        if enemy.anim_timer % ENEMY_ANIM_TICKS == 0 {
            enemy.anim_frame = (enemy.anim_frame + 1) % ENEMY_ANIM_FRAMES;
        }

        if enemy.aabb().overlaps(&state.player.aabb()) {
            contact += tuning.contact_damage;
        }
    }

    if contact > 0.0 {
        let dealt = state.player.damage(contact);
        if dealt > 0.0 {
            events.push(GameEvent::PlayerDamaged { amount: dealt });
        }
    }
    contact
}

/// Fire a shot from the player's front and (re)arm the shoot pose
pub fn fire(state: &mut EntityState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    let player = &state.player;
    let size = tuning.projectile_size;
    let muzzle_x = match player.facing {
        Facing::Right => player.pos.x + player.size.x,
        Facing::Left => player.pos.x - size.x,
    };
    let muzzle = Vec2::new(muzzle_x, player.pos.y + player.size.y * MUZZLE_HEIGHT);
    let vel = Vec2::new(tuning.projectile_speed * player.facing.sign(), 0.0);

    state.spawn_projectile(muzzle, vel, size);
    state.effects.push(Effect::muzzle_flash(muzzle));
    state.player.action_lock.arm(tuning.action_lock_ticks);
    events.push(GameEvent::ShotFired);
}

/// Advance shots, resolve hits on live enemies, drop shots that left the world
pub fn step_projectiles(
    state: &mut EntityState,
    world: &WorldGeometry,
    events: &mut Vec<GameEvent>,
) {
    let mut projectiles = std::mem::take(&mut state.projectiles);

    projectiles.retain_mut(|shot| {
        let vel = shot.vel;
        drift(shot, vel);
        if shot.bounds().right() < 0.0 || shot.pos.x > world.width {
            return false;
        }

        let shot_box = shot.aabb();
        let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|e| e.alive && e.aabb().overlaps(&shot_box))
        else {
            return true;
        };

        enemy.health -= 1;
        events.push(GameEvent::EnemyHit { id: enemy.id });
        if enemy.health <= 0 {
            enemy.alive = false;
            enemy.attacking = false;
            state.effects.push(Effect::explosion(enemy.pos));
            events.push(GameEvent::EnemyKilled { id: enemy.id });
            log::debug!("Enemy {} destroyed", enemy.id);
        }
        false
    });

    state.projectiles = projectiles;
}

/// Advance effect animations and drop finished ones
pub fn step_effects(state: &mut EntityState) {
    state.effects.retain_mut(Effect::advance);
}

/// Check hazard contact. A touch disarms the hazard and sends the player back
/// to spawn; the hazard re-arms once the player is no longer touching it.
/// Returns the index of the first hazard that triggered.
pub fn resolve_hazards(
    state: &mut EntityState,
    world: &WorldGeometry,
    spawn: Vec2,
    tuning: &Tuning,
    score: &mut u32,
    events: &mut Vec<GameEvent>,
) -> Option<usize> {
    let body = state.player.aabb();
    let mut triggered = None;

    for (i, hazard) in world.hazards().iter().enumerate() {
        let Some(armed) = state.hazard_armed.get_mut(i) else {
            break;
        };
        if body.overlaps(hazard) {
            if *armed {
                *armed = false;
                triggered.get_or_insert(i);
            }
        } else {
            *armed = true;
        }
    }

    let index = triggered?;
    state.player.reset_to(spawn);
    if state.player.health.is_some() {
        let dealt = state.player.damage(tuning.hazard_penalty.health);
        if dealt > 0.0 {
            events.push(GameEvent::PlayerDamaged { amount: dealt });
        }
    } else {
        *score = score.saturating_sub(tuning.hazard_penalty.score);
    }
    events.push(GameEvent::HazardHit { index });
    log::debug!("Hazard {index} hit, score now {score}");
    Some(index)
}

/// Respawn a player that dropped below the world
pub fn check_fall_out(
    state: &mut EntityState,
    world: &WorldGeometry,
    spawn: Vec2,
    events: &mut Vec<GameEvent>,
) -> bool {
    if state.player.pos.y <= world.height {
        return false;
    }
    state.player.reset_to(spawn);
    events.push(GameEvent::FellOut);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Aabb;
    use crate::sim::state::{EffectKind, Player};

    fn shooter_state(player_pos: Vec2) -> EntityState {
        let player = Player::new(player_pos, Vec2::new(64.0, 64.0), 4.0, true);
        EntityState::new(player, 0)
    }

    fn empty_world(width: f32) -> WorldGeometry {
        WorldGeometry::new(Vec::new(), Vec::new(), width, 600.0)
    }

    #[test]
    fn test_enemy_chases_player_center() {
        let tuning = Tuning::default();
        let mut state = shooter_state(Vec2::new(100.0, 400.0));
        state.spawn_enemy(Vec2::new(400.0, 400.0), Vec2::new(64.0, 64.0), 5);
        let mut events = Vec::new();

        step_enemies(&mut state, &tuning, &mut events);
        let enemy = &state.enemies[0];
        assert!((enemy.pos.x - (400.0 - tuning.pursuit_speed)).abs() < 1e-4);
        assert!((enemy.pos.y - 400.0).abs() < 1e-4);
        assert_eq!(enemy.facing, Facing::Left);
        assert!(!enemy.attacking);
        assert!(events.is_empty());
    }

    #[test]
    fn test_enemy_moves_diagonally() {
        let tuning = Tuning::default();
        let mut state = shooter_state(Vec2::new(0.0, 0.0));
        state.spawn_enemy(Vec2::new(300.0, 400.0), Vec2::new(64.0, 64.0), 5);
        let mut events = Vec::new();

        step_enemies(&mut state, &tuning, &mut events);
        let enemy = &state.enemies[0];
        let moved = enemy.pos - Vec2::new(300.0, 400.0);
        assert!((moved.length() - tuning.pursuit_speed).abs() < 1e-4);
        assert!(moved.x < 0.0 && moved.y < 0.0);
    }

    #[test]
    fn test_enemy_attacks_when_on_top_of_player() {
        let tuning = Tuning::default();
        let mut state = shooter_state(Vec2::new(100.0, 400.0));
        state.spawn_enemy(Vec2::new(100.0, 400.0), Vec2::new(64.0, 64.0), 5);
        let mut events = Vec::new();

        let dealt = step_enemies(&mut state, &tuning, &mut events);
        assert!(state.enemies[0].attacking);
        assert_eq!(state.enemies[0].pos, Vec2::new(100.0, 400.0));
        assert_eq!(dealt, tuning.contact_damage);
        assert_eq!(state.player.health, Some(99.5));
    }

    #[test]
    fn test_contact_damage_is_continuous_and_clamped() {
        let tuning = Tuning::default();
        let mut state = shooter_state(Vec2::new(100.0, 400.0));
        state.spawn_enemy(Vec2::new(100.0, 400.0), Vec2::new(64.0, 64.0), 5);
        let mut events = Vec::new();

        for _ in 0..10 {
            step_enemies(&mut state, &tuning, &mut events);
        }
        assert_eq!(state.player.health, Some(95.0));

        for _ in 0..500 {
            step_enemies(&mut state, &tuning, &mut events);
        }
        assert_eq!(state.player.health, Some(0.0));
    }

    #[test]
    fn test_dead_enemies_are_inert() {
        let tuning = Tuning::default();
        let mut state = shooter_state(Vec2::new(100.0, 400.0));
        state.spawn_enemy(Vec2::new(100.0, 400.0), Vec2::new(64.0, 64.0), 5);
        state.enemies[0].alive = false;
        let mut events = Vec::new();

        assert_eq!(step_enemies(&mut state, &tuning, &mut events), 0.0);
        assert_eq!(state.player.health, Some(100.0));
    }

    #[test]
    fn test_fire_direction_and_lock() {
        let tuning = Tuning::default();
        let mut state = shooter_state(Vec2::new(100.0, 400.0));
        let mut events = Vec::new();

        fire(&mut state, &tuning, &mut events);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].vel.x, tuning.projectile_speed);
        assert_eq!(state.projectiles[0].pos.x, 164.0);
        assert!(state.player.is_acting());

        state.player.facing = Facing::Left;
        fire(&mut state, &tuning, &mut events);
        assert_eq!(state.projectiles[1].vel.x, -tuning.projectile_speed);
        assert_eq!(state.projectiles[1].pos.x, 100.0 - tuning.projectile_size.x);
        assert_eq!(state.player.action_lock.remaining(), tuning.action_lock_ticks);
        assert_eq!(events, vec![GameEvent::ShotFired, GameEvent::ShotFired]);
    }

    #[test]
    fn test_projectile_kills_enemy_after_five_hits() {
        let tuning = Tuning::default();
        let world = empty_world(2048.0);
        let mut state = shooter_state(Vec2::new(100.0, 400.0));
        state.spawn_enemy(Vec2::new(300.0, 400.0), Vec2::new(64.0, 64.0), 5);
        let mut events = Vec::new();

        for _ in 0..5 {
            fire(&mut state, &tuning, &mut events);
            for _ in 0..30 {
                step_projectiles(&mut state, &world, &mut events);
            }
        }

        let enemy = &state.enemies[0];
        assert!(!enemy.alive);
        assert_eq!(enemy.health, 0);
        assert!(state.projectiles.is_empty());
        assert!(state.effects.iter().any(|e| e.kind == EffectKind::Explosion));
        let kills = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
    }

    #[test]
    fn test_tombstoned_enemy_does_not_absorb_shots() {
        let tuning = Tuning::default();
        let world = empty_world(2048.0);
        let mut state = shooter_state(Vec2::new(100.0, 400.0));
        state.spawn_enemy(Vec2::new(300.0, 400.0), Vec2::new(64.0, 64.0), 1);
        state.enemies[0].alive = false;
        let mut events = Vec::new();

        fire(&mut state, &tuning, &mut events);
        for _ in 0..10 {
            step_projectiles(&mut state, &world, &mut events);
        }
        assert_eq!(state.enemies[0].health, 1);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_projectile_leaves_world() {
        let tuning = Tuning::default();
        let world = empty_world(400.0);
        let mut state = shooter_state(Vec2::new(100.0, 400.0));
        let mut events = Vec::new();

        fire(&mut state, &tuning, &mut events);
        for _ in 0..30 {
            step_projectiles(&mut state, &world, &mut events);
        }
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_effects_expire() {
        let mut state = shooter_state(Vec2::ZERO);
        state.effects.push(Effect::muzzle_flash(Vec2::ZERO));
        state.effects.push(Effect::explosion(Vec2::ZERO));
        for _ in 0..6 {
            step_effects(&mut state);
        }
        assert_eq!(state.effects.len(), 1);
        for _ in 0..14 {
            step_effects(&mut state);
        }
        assert!(state.effects.is_empty());
    }

    fn spike_world() -> WorldGeometry {
        WorldGeometry::new(
            vec![Aabb::new(0.0, 560.0, 2000.0, 40.0)],
            vec![Aabb::new(850.0, 540.0, 40.0, 20.0)],
            2000.0,
            600.0,
        )
    }

    #[test]
    fn test_hazard_resets_and_penalizes_once() {
        let tuning = Tuning::default();
        let world = spike_world();
        let spawn = Vec2::new(100.0, 440.0);
        let player = Player::new(Vec2::new(840.0, 490.0), Vec2::new(50.0, 70.0), 6.0, false);
        let mut state = EntityState::new(player, world.hazards().len());
        let mut score = 12;
        let mut events = Vec::new();

        let hit = resolve_hazards(&mut state, &world, spawn, &tuning, &mut score, &mut events);
        assert_eq!(hit, Some(0));
        assert_eq!(score, 7);
        assert_eq!(state.player.pos, spawn);
        assert!(!state.hazard_armed[0]);

        // Away from the spike: re-armed, nothing triggers
        let hit = resolve_hazards(&mut state, &world, spawn, &tuning, &mut score, &mut events);
        assert_eq!(hit, None);
        assert!(state.hazard_armed[0]);
        assert_eq!(score, 7);
    }

    #[test]
    fn test_hazard_on_spawn_does_not_retrigger_every_frame() {
        let tuning = Tuning::default();
        let world = spike_world();
        // Bad content: spawn overlaps the spike
        let spawn = Vec2::new(840.0, 490.0);
        let player = Player::new(spawn, Vec2::new(50.0, 70.0), 6.0, false);
        let mut state = EntityState::new(player, world.hazards().len());
        let mut score = 20;
        let mut events = Vec::new();

        for _ in 0..10 {
            resolve_hazards(&mut state, &world, spawn, &tuning, &mut score, &mut events);
        }
        assert_eq!(score, 15);
        let hits = events
            .iter()
            .filter(|e| matches!(e, GameEvent::HazardHit { .. }))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_hazard_score_saturates() {
        let tuning = Tuning::default();
        let world = spike_world();
        let player = Player::new(Vec2::new(840.0, 490.0), Vec2::new(50.0, 70.0), 6.0, false);
        let mut state = EntityState::new(player, 1);
        let mut score = 2;
        let mut events = Vec::new();
        resolve_hazards(&mut state, &world, Vec2::ZERO, &tuning, &mut score, &mut events);
        assert_eq!(score, 0);
    }

    #[test]
    fn test_hazard_costs_health_in_health_levels() {
        let tuning = Tuning::default();
        let world = spike_world();
        let player = Player::new(Vec2::new(840.0, 490.0), Vec2::new(50.0, 70.0), 6.0, true);
        let mut state = EntityState::new(player, 1);
        let mut score = 9;
        let mut events = Vec::new();
        resolve_hazards(&mut state, &world, Vec2::ZERO, &tuning, &mut score, &mut events);
        assert_eq!(score, 9);
        assert_eq!(state.player.health, Some(100.0 - tuning.hazard_penalty.health));
    }

    #[test]
    fn test_fall_out_respawns() {
        let world = empty_world(800.0);
        let mut state = shooter_state(Vec2::new(100.0, 700.0));
        let mut events = Vec::new();
        assert!(check_fall_out(&mut state, &world, Vec2::new(10.0, 10.0), &mut events));
        assert_eq!(state.player.pos, Vec2::new(10.0, 10.0));
        assert_eq!(events, vec![GameEvent::FellOut]);
        assert!(!check_fall_out(&mut state, &world, Vec2::new(10.0, 10.0), &mut events));
    }
}
