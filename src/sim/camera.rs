//! Horizontal scrolling camera
//!
//! The camera snaps to the player every frame; there is no smoothing.

use serde::{Deserialize, Serialize};

use crate::clamp_span;

/// World-to-screen offset for a player at `player_x`.
///
/// Keeps the player at `anchor` of the viewport width, clamped so the view
/// never leaves `[0, world_width]`. A world narrower than the viewport pins
/// the camera at 0.
pub fn camera_offset(player_x: f32, viewport_width: f32, anchor: f32, world_width: f32) -> f32 {
    let max_offset = (world_width - viewport_width).max(0.0);
    clamp_span(player_x - viewport_width * anchor, 0.0, max_offset)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset_x: f32,
    pub viewport_width: f32,
    pub anchor: f32,
}

impl Camera {
    pub fn new(viewport_width: f32, anchor: f32) -> Self {
        Self {
            offset_x: 0.0,
            viewport_width: viewport_width.max(0.0),
            anchor,
        }
    }

    pub fn follow(&mut self, player_x: f32, world_width: f32) {
        self.offset_x = camera_offset(player_x, self.viewport_width, self.anchor, world_width);
    }

    /// Host canvas resized
    pub fn resize(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width.max(0.0);
    }
}
