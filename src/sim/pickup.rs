//! Coins, coin rain and the score-driven speed boost

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::physics::drift;
use super::state::{EntityState, GameEvent};
use super::timer::OneShot;
use super::world::WorldGeometry;
use crate::level::{CoinRain, SpeedBoost, Tuning};

/// Pick up every uncollected coin the player overlaps. Each coin scores at
/// most once; returns the number picked up this frame.
pub fn collect_coins(
    state: &mut EntityState,
    tuning: &Tuning,
    score: &mut u32,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let body = state.player.aabb();
    let mut picked = 0;
    for coin in state
        .collectibles
        .iter_mut()
        .filter(|c| !c.collected && c.aabb().overlaps(&body))
    {
        coin.collected = true;
        *score = score.saturating_add(tuning.coin_score);
        picked += 1;
        events.push(GameEvent::CoinCollected { id: coin.id });
    }
    picked
}

/// Placed coins only; rain coins never count toward clearing a level
pub fn all_placed_collected(state: &EntityState) -> bool {
    let mut placed = state.collectibles.iter().filter(|c| c.fall_speed == 0.0).peekable();
    placed.peek().is_some() && placed.all(|c| c.collected)
}

/// Drops coins from above the world at random x positions
#[derive(Debug, Clone)]
pub struct CoinSpawner {
    rain: CoinRain,
    timer: u32,
    rng: Pcg32,
}

impl CoinSpawner {
    pub fn new(rain: CoinRain, seed: u64) -> Self {
        Self {
            rain,
            timer: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Spawn when due, move falling coins, forget collected or fallen ones
    pub fn step(&mut self, state: &mut EntityState, world: &WorldGeometry) {
        self.timer += 1;
        if self.timer >= self.rain.interval_ticks {
            self.timer = 0;
            let max_x = (world.width - self.rain.size).max(0.0);
            let x = if max_x > 0.0 {
                self.rng.random_range(0.0..max_x)
            } else {
                0.0
            };
            let size = Vec2::splat(self.rain.size);
            state.spawn_collectible(Vec2::new(x, -self.rain.size), size, self.rain.fall_speed);
        }

        for coin in state.collectibles.iter_mut().filter(|c| c.fall_speed > 0.0) {
            let vel = Vec2::new(0.0, coin.fall_speed);
            drift(coin, vel);
        }
        state
            .collectibles
            .retain(|c| c.fall_speed == 0.0 || (!c.collected && c.pos.y <= world.height));
    }
}

/// Boost speed when the score crosses a multiple of `boost.every`.
/// A new boost replaces the pending expiry.
pub fn maybe_boost(
    state: &mut EntityState,
    boost: &SpeedBoost,
    base_speed: f32,
    timer: &mut OneShot,
    score_before: u32,
    score_after: u32,
    events: &mut Vec<GameEvent>,
) -> bool {
    if score_after <= score_before || score_after / boost.every == score_before / boost.every {
        return false;
    }
    let player = &mut state.player;
    player.speed = (player.speed * boost.multiplier).min(base_speed * boost.cap);
    timer.arm(boost.duration_ticks);
    events.push(GameEvent::SpeedBoost {
        speed: player.speed,
    });
    log::debug!("Speed boost to {}", player.speed);
    true
}

/// Count down the boost and restore base speed when it runs out
pub fn tick_boost(
    state: &mut EntityState,
    base_speed: f32,
    timer: &mut OneShot,
    events: &mut Vec<GameEvent>,
) {
    if timer.tick() {
        state.player.speed = base_speed;
        events.push(GameEvent::SpeedBoostEnded);
    }
}
