//! Hostiles walking the level path

use glam::Vec2;

use super::collision::Aabb;
use super::wave::{HostileKind, HostileSpawn};
use crate::consts::{HOSTILE_HALF_HEIGHT, HOSTILE_HALF_WIDTH};
use crate::renderer::Surface;

/// Outcome of one movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moving,
    /// Reached the final waypoint; the hostile is gone and the player lost
    Breakthrough,
}

/// A hostile entity
#[derive(Debug, Clone)]
pub struct Hostile {
    pub id: u32,
    pub kind: HostileKind,
    pub pos: Vec2,
    pub speed: f32,
    health: u32,
    waypoints: Vec<Vec2>,
    /// Index of the waypoint the current segment starts at (never decreases)
    waypoint_index: usize,
    alive: bool,
}

impl Hostile {
    /// Spawn at the first waypoint of `path`
    pub fn new(id: u32, spawn: &HostileSpawn, path: &[Vec2]) -> Self {
        Self {
            id,
            kind: spawn.kind,
            pos: path.first().copied().unwrap_or(Vec2::ZERO),
            speed: spawn.speed,
            health: spawn.health,
            waypoints: path.to_vec(),
            waypoint_index: 0,
            alive: true,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(HOSTILE_HALF_WIDTH, HOSTILE_HALF_HEIGHT))
    }

    /// Move `speed` pixels along the current segment.
    ///
    /// Once within `speed` of the segment end the next segment begins; the
    /// leftover distance is not carried over.
    pub fn advance(&mut self) -> Advance {
        if !self.alive {
            return Advance::Moving;
        }
        let last = self.waypoints.len().saturating_sub(1);
        if self.waypoint_index < last {
            let start = self.waypoints[self.waypoint_index];
            let end = self.waypoints[self.waypoint_index + 1];
            let direction = (end - start).normalize_or_zero();
            self.pos += direction * self.speed;

            if self.pos.distance(end) < self.speed {
                self.waypoint_index += 1;
            }
        }

        if self.waypoint_index >= last {
            self.alive = false;
            return Advance::Breakthrough;
        }
        Advance::Moving
    }

    /// Apply damage; returns true if this hit killed the hostile
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.sprite(self.kind.sprite_key(), self.pos, 0.0);
    }
}
