//! Static world geometry
//!
//! Read-only index over the level's solid platforms and hazards. Platforms
//! are kept sorted by left edge so landing queries only visit boxes whose
//! horizontal span can touch the mover.

use super::aabb::Aabb;

/// Static geometry for one level
#[derive(Debug, Clone, Default)]
pub struct WorldGeometry {
    /// Solid surfaces (sorted by `x`)
    platforms: Vec<Aabb>,
    /// Widest platform, bounds the backwards scan in `platforms_near`
    max_platform_width: f32,
    /// Spikes and other penalty boxes (level order preserved)
    hazards: Vec<Aabb>,
    /// Horizontal extent of the playable area
    pub width: f32,
    /// Vertical extent; anything falling below is out of the world
    pub height: f32,
}

impl WorldGeometry {
    pub fn new(mut platforms: Vec<Aabb>, hazards: Vec<Aabb>, width: f32, height: f32) -> Self {
        platforms.sort_by(|a, b| a.x.total_cmp(&b.x));
        let max_platform_width = platforms.iter().map(|p| p.width).fold(0.0, f32::max);
        Self {
            platforms,
            max_platform_width,
            hazards,
            width,
            height,
        }
    }

    pub fn platforms(&self) -> &[Aabb] {
        &self.platforms
    }

    pub fn hazards(&self) -> &[Aabb] {
        &self.hazards
    }

    /// Platforms whose horizontal span strictly overlaps `[left, right]`
    pub fn platforms_near(&self, left: f32, right: f32) -> impl Iterator<Item = &Aabb> {
        let min_x = left - self.max_platform_width;
        let start = self.platforms.partition_point(|p| p.x <= min_x);
        let end = self.platforms.partition_point(|p| p.x < right);
        self.platforms[start..end.max(start)]
            .iter()
            .filter(move |p| p.right() > left && p.x < right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_world() -> WorldGeometry {
        WorldGeometry::new(
            vec![
                Aabb::new(500.0, 350.0, 120.0, 20.0),
                Aabb::new(0.0, 560.0, 6000.0, 40.0),
                Aabb::new(300.0, 420.0, 120.0, 20.0),
            ],
            vec![Aabb::new(850.0, 540.0, 40.0, 20.0)],
            6000.0,
            600.0,
        )
    }

    #[test]
    fn test_platforms_sorted() {
        let world = sample_world();
        let xs: Vec<f32> = world.platforms().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 300.0, 500.0]);
    }

    #[test]
    fn test_platforms_near_includes_wide_ground() {
        let world = sample_world();
        // Far to the right: only the ground spans this far
        let near: Vec<_> = world.platforms_near(4000.0, 4050.0).collect();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].y, 560.0);
    }

    #[test]
    fn test_platforms_near_matches_linear_scan() {
        let world = sample_world();
        for left in (0..700).step_by(7) {
            let left = left as f32;
            let right = left + 50.0;
            let indexed: Vec<_> = world.platforms_near(left, right).copied().collect();
            let linear: Vec<_> = world
                .platforms()
                .iter()
                .filter(|p| p.right() > left && p.x < right)
                .copied()
                .collect();
            assert_eq!(indexed, linear, "span [{left}, {right}]");
        }
    }

    #[test]
    fn test_touching_span_excluded() {
        let world = sample_world();
        // Mover ends exactly where the 300..420 platform starts
        let hits: Vec<_> = world
            .platforms_near(250.0, 300.0)
            .filter(|p| p.y == 420.0)
            .collect();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_empty_world() {
        let world = WorldGeometry::new(Vec::new(), Vec::new(), 800.0, 600.0);
        assert_eq!(world.platforms_near(0.0, 100.0).count(), 0);
    }
}
