//! Collision queries against static geometry
//!
//! Only landing on top of a surface is modeled. Walls are not solid and
//! ceilings are passed through while moving upward; horizontal motion is
//! limited by the world bounds alone.

use super::aabb::Aabb;
use super::world::WorldGeometry;
use crate::clamp_span;

/// Find the surface a falling body lands on this frame.
///
/// A surface catches the body when their horizontal spans overlap, the
/// body's bottom edge has dropped past the surface top but not further than
/// half the surface height plus this frame's fall, and the body is not
/// moving upward. Returns the `y` of the highest such surface top.
pub fn find_landing(body: &Aabb, dy: f32, world: &WorldGeometry) -> Option<f32> {
    if dy < 0.0 {
        return None;
    }
    let bottom = body.bottom();
    world
        .platforms_near(body.left(), body.right())
        .filter(|p| bottom > p.top() && bottom < p.top() + p.height / 2.0 + dy)
        .map(|p| p.top())
        .min_by(f32::total_cmp)
}

/// Keep a body of `width` fully inside `[0, world_width]`
#[inline]
pub fn clamp_to_world_x(x: f32, width: f32, world_width: f32) -> f32 {
    clamp_span(x, 0.0, world_width - width)
}
