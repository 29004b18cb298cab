//! Horizontal tracking camera.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::BodyArena;
use crate::entity::BodyId;

/// Easing rate toward the tracked body, per second.
pub const TRACK_RATE: f32 = 5.0;

/// Viewport into the world, following one body.
///
/// Only the x axis tracks; y stays pinned to the top of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position of the viewport's top-left corner
    pub position: Vec2,
    /// Viewport size in world units
    pub viewport: Vec2,
    target: Option<BodyId>,
}

impl Camera {
    /// A camera at the origin tracking nothing.
    #[must_use]
    pub const fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
            target: None,
        }
    }

    /// Body being tracked.
    #[must_use]
    pub const fn target(&self) -> Option<BodyId> {
        self.target
    }

    /// Starts tracking `id`.
    pub fn follow(&mut self, id: BodyId) {
        self.target = Some(id);
    }

    /// Stops tracking.
    pub fn clear(&mut self) {
        self.target = None;
    }

    /// Stops tracking `id` if it is the current target.
    pub fn forget(&mut self, id: BodyId) {
        if self.target == Some(id) {
            self.target = None;
        }
    }

    /// Eases toward the tracked body and clamps the viewport to the map.
    pub fn update(&mut self, bodies: &BodyArena, map_size: Vec2, dt: f32) {
        if let Some(body) = self.target.and_then(|id| bodies.get(id)) {
            let goal = body.physics.position.x - self.viewport.x / 2.0;
            self.position.x += (goal - self.position.x) * TRACK_RATE * dt;
        }
        let max = (map_size - self.viewport).max(Vec2::ZERO);
        self.position = self.position.clamp(Vec2::ZERO, max);
    }

    /// Converts a world position to viewport coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BodyInner;

    #[test]
    fn eases_toward_target() {
        let mut bodies = BodyArena::new();
        let id = bodies.spawn(Vec2::new(1000.0, 50.0), Vec2::ZERO, BodyInner::Debris);
        let mut camera = Camera::new(Vec2::new(800.0, 450.0));
        camera.follow(id);

        camera.update(&bodies, Vec2::new(2048.0, 512.0), 0.1);
        // Goal 600, half the distance covered at rate 5 over 0.1 s
        assert!((camera.position.x - 300.0).abs() < 1e-4);
        assert_eq!(camera.position.y, 0.0);
    }

    #[test]
    fn clamps_to_map() {
        let mut bodies = BodyArena::new();
        let id = bodies.spawn(Vec2::new(2000.0, 50.0), Vec2::ZERO, BodyInner::Debris);
        let mut camera = Camera::new(Vec2::new(800.0, 450.0));
        camera.follow(id);
        for _ in 0..100 {
            camera.update(&bodies, Vec2::new(1024.0, 512.0), 0.1);
        }
        assert!((camera.position.x - 224.0).abs() < 1e-3);
    }

    #[test]
    fn narrow_map_pins_to_origin() {
        let mut camera = Camera::new(Vec2::new(800.0, 450.0));
        camera.position = Vec2::new(50.0, 20.0);
        camera.update(&BodyArena::new(), Vec2::new(256.0, 128.0), 0.1);
        assert_eq!(camera.position, Vec2::ZERO);
    }

    #[test]
    fn forgets_removed_target() {
        let mut bodies = BodyArena::new();
        let id = bodies.spawn(Vec2::new(700.0, 50.0), Vec2::ZERO, BodyInner::Debris);
        let mut camera = Camera::new(Vec2::new(800.0, 450.0));
        camera.follow(id);
        camera.forget(BodyId::new(99));
        assert_eq!(camera.target(), Some(id));
        bodies.despawn(id);
        camera.update(&bodies, Vec2::new(2048.0, 512.0), 0.1);
        assert_eq!(camera.position.x, 0.0);
        camera.forget(id);
        assert_eq!(camera.target(), None);
    }
}
