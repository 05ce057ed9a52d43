//! Projectiles fired by towers
//!
//! A projectile flies in a straight line at the point its target occupied
//! when it was fired; it never re-aims.

use glam::Vec2;

use super::collision::Aabb;
use crate::consts::{PROJECTILE_ARRIVAL_DISTANCE, PROJECTILE_HALF_EXTENT};
use crate::renderer::Surface;
use crate::settings::Settings;

pub const PROJECTILE_SPRITE: &str = "basic_bullet";

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    /// Tower that fired it
    pub source: u32,
    pub pos: Vec2,
    pub target: Vec2,
    pub damage: u32,
    vel: Vec2,
    alive: bool,
}

impl Projectile {
    pub fn new(id: u32, source: u32, spawn: Vec2, target: Vec2, speed: f32, damage: u32) -> Self {
        Self {
            id,
            source,
            pos: spawn,
            target,
            damage,
            vel: (target - spawn).normalize_or_zero() * speed,
            alive: true,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Spent on contact with a hostile
    pub fn consume(&mut self) {
        self.alive = false;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, PROJECTILE_HALF_EXTENT)
    }

    /// Move one tick; expires near the target point or off the playfield
    pub fn update(&mut self, settings: &Settings) {
        if !self.alive {
            return;
        }
        self.pos += self.vel;
        if self.pos.distance(self.target) < PROJECTILE_ARRIVAL_DISTANCE || !settings.is_inside(self.pos) {
            self.alive = false;
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.sprite(PROJECTILE_SPRITE, self.pos, self.vel.y.atan2(self.vel.x));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_target_along_axis() {
        let settings = Settings::default();
        let target = Vec2::new(100.0, 0.0);
        let mut projectile = Projectile::new(1, 0, Vec2::ZERO, target, 5.0, 20);
        assert_eq!(projectile.velocity(), Vec2::new(5.0, 0.0));

        let mut last_distance = projectile.pos.distance(target);
        for _ in 0..18 {
            projectile.update(&settings);
            let distance = projectile.pos.distance(target);
            assert!(distance < last_distance);
            assert_eq!(projectile.pos.y, 0.0);
            last_distance = distance;
        }
        // 90 px travelled: exactly 10 away, which is not yet "closer than 10"
        assert_eq!(projectile.pos, Vec2::new(90.0, 0.0));
        assert!(projectile.is_alive());

        projectile.update(&settings);
        assert!(!projectile.is_alive());
    }

    #[test]
    fn test_expires_off_screen() {
        let settings = Settings::default();
        let mut projectile =
            Projectile::new(1, 0, Vec2::new(2.0, 400.0), Vec2::new(-500.0, 400.0), 5.0, 20);
        projectile.update(&settings);
        assert!(!projectile.is_alive());
    }

    #[test]
    fn test_spawn_on_target_expires_immediately() {
        let settings = Settings::default();
        let at = Vec2::new(300.0, 300.0);
        let mut projectile = Projectile::new(1, 0, at, at, 5.0, 20);
        assert_eq!(projectile.velocity(), Vec2::ZERO);
        projectile.update(&settings);
        assert!(!projectile.is_alive());
    }
}
