//! Movement integration
//!
//! One call advances one entity by one frame. Player motion uses explicit
//! Euler integration with per-frame units: `dy += gravity; y += dy`.

use glam::Vec2;

use super::aabb::Aabb;
use super::collision::{clamp_to_world_x, find_landing};
use super::state::{Collectible, Enemy, Facing, Player, Projectile};
use super::world::WorldGeometry;
use crate::level::Tuning;

/// Shared capability of everything that moves through the world
pub trait Movable {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn size(&self) -> Vec2;

    fn bounds(&self) -> Aabb {
        Aabb::at(self.position(), self.size())
    }

    fn translate(&mut self, delta: Vec2) {
        let pos = self.position() + delta;
        self.set_position(pos);
    }
}

macro_rules! impl_movable {
    ($($ty:ty),*) => {
        $(impl Movable for $ty {
            fn position(&self) -> Vec2 {
                self.pos
            }
            fn set_position(&mut self, pos: Vec2) {
                self.pos = pos;
            }
            fn size(&self) -> Vec2 {
                self.size
            }
        })*
    };
}

impl_movable!(Player, Enemy, Projectile, Collectible);

/// What happened to the player during a physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Touched down this frame after being airborne
    pub landed: bool,
}

/// Derive horizontal velocity and facing from the held directions.
/// With both held, right wins.
pub fn apply_intent(player: &mut Player, move_left: bool, move_right: bool) {
    let mut dx = 0.0;
    if move_left {
        dx = -player.speed;
    }
    if move_right {
        dx = player.speed;
    }
    player.vel.x = dx;
    if let Some(facing) = Facing::from_dx(dx) {
        player.facing = facing;
    }
}

/// Try to jump. From the ground this always succeeds; in the air it
/// consumes the double jump when the level allows one.
/// Returns `Some(is_double)` when a jump happened.
pub fn apply_jump(player: &mut Player, tuning: &Tuning) -> Option<bool> {
    if player.grounded {
        player.grounded = false;
        player.can_double_jump = tuning.double_jump;
        player.vel.y = tuning.jump_impulse;
        Some(false)
    } else if tuning.double_jump && player.can_double_jump {
        player.can_double_jump = false;
        player.vel.y = tuning.jump_impulse;
        Some(true)
    } else {
        None
    }
}

/// Advance the player one frame and resolve landings
pub fn step_player(player: &mut Player, world: &WorldGeometry, tuning: &Tuning) -> StepOutcome {
    let was_grounded = player.grounded;

    player.pos.x = clamp_to_world_x(player.pos.x + player.vel.x, player.size.x, world.width);

    player.vel.y += tuning.gravity;
    player.pos.y += player.vel.y;

    match find_landing(&player.aabb(), player.vel.y, world) {
        Some(top) => {
            player.pos.y = top - player.size.y;
            player.vel.y = 0.0;
            player.grounded = true;
            player.can_double_jump = tuning.double_jump;
        }
        None => player.grounded = false,
    }

    StepOutcome {
        landed: player.grounded && !was_grounded,
    }
}

/// Two-frame walk cycle while moving on the ground
pub fn advance_walk_cycle(player: &mut Player, ticks_per_frame: u32) {
    if !player.grounded {
        return;
    }
    if player.vel.x != 0.0 {
        player.anim_timer += 1;
        if player.anim_timer % ticks_per_frame.max(1) == 0 {
            player.anim_frame = (player.anim_frame + 1) % 2;
        }
    } else {
        player.anim_frame = 0;
    }
}

/// Straight-line motion for bodies with a constant velocity
pub fn drift<M: Movable>(body: &mut M, vel: Vec2) {
    body.translate(vel);
}
