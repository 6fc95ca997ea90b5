//! Fixed timestep simulation tick
//!
//! Core frame pipeline that advances a session deterministically. Order:
//! input, player physics, timers, enemies and shots, hazards, pickups,
//! camera, end checks.

use serde::{Deserialize, Serialize};

use super::behavior::{
    check_fall_out, fire, resolve_hazards, step_effects, step_enemies, step_projectiles,
};
use super::physics::{advance_walk_cycle, apply_intent, apply_jump, step_player};
use super::pickup::{all_placed_collected, collect_coins, maybe_boost, tick_boost};
use super::session::Session;
use super::state::{EndReason, GameEvent, SessionPhase};
use crate::level::PrimaryAction;

/// Normalized input for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump or shoot depending on the level (one-shot press)
    pub primary: bool,
    /// Pause toggle (one-shot press)
    pub pause: bool,
}

/// Advance the session by one frame. Does nothing unless it is playing.
pub fn tick(session: &mut Session, input: &TickInput) {
    if session.phase != SessionPhase::Playing {
        return;
    }
    session.frame += 1;

    let tuning = &session.level.tuning;
    let spawn = session.level.spawn_point;
    let world = &session.world;
    let entities = &mut session.entities;
    let events = &mut session.events;

    // Input
    apply_intent(&mut entities.player, input.move_left, input.move_right);
    if input.primary {
        match tuning.primary {
            PrimaryAction::Jump => {
                if let Some(double) = apply_jump(&mut entities.player, tuning) {
                    events.push(GameEvent::Jumped { double });
                }
            }
            PrimaryAction::Shoot => fire(entities, tuning, events),
        }
    }

    // Player physics
    if step_player(&mut entities.player, world, tuning).landed {
        events.push(GameEvent::Landed);
    }
    check_fall_out(entities, world, spawn, events);

    // Timers
    entities.player.action_lock.tick();
    tick_boost(entities, tuning.speed, &mut session.boost, events);

    // Enemies, shots, effects
    step_enemies(entities, tuning, events);
    step_projectiles(entities, world, events);
    step_effects(entities);

    // Hazards and pickups
    resolve_hazards(entities, world, spawn, tuning, &mut session.score, events);
    if let Some(spawner) = session.spawner.as_mut() {
        spawner.step(entities, world);
    }
    let before_pickup = session.score;
    collect_coins(entities, tuning, &mut session.score, events);
    if let Some(boost) = &tuning.speed_boost {
        maybe_boost(
            entities,
            boost,
            tuning.speed,
            &mut session.boost,
            before_pickup,
            session.score,
            events,
        );
    }

    // Presentation state
    advance_walk_cycle(&mut entities.player, tuning.anim_ticks_per_frame);
    session.camera.follow(entities.player.pos.x, world.width);

    // End checks
    let defeated = entities.player.is_defeated();
    let cleared = tuning.coin_rain.is_none() && all_placed_collected(entities);
    if defeated {
        session.end(EndReason::Defeated);
    } else if cleared {
        session.end(EndReason::Cleared);
    }
}
