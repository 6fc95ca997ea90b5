//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one step per animation frame)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod behavior;
pub mod camera;
pub mod collision;
pub mod physics;
pub mod pickup;
pub mod session;
pub mod state;
pub mod tick;
pub mod timer;
pub mod world;

pub use aabb::Aabb;
pub use camera::{Camera, camera_offset};
pub use collision::find_landing;
pub use physics::{Movable, apply_jump, step_player};
pub use session::{Session, SessionOptions, Snapshot, format_clock};
pub use state::{
    Collectible, Effect, EffectKind, EndReason, Enemy, EntityState, Facing, GameEvent, Player,
    Projectile, SessionPhase,
};
pub use tick::{TickInput, tick};
pub use timer::{OneShot, PeriodicTimer};
pub use world::WorldGeometry;
