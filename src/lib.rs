//! Waypoint Defense - a grid-placement tower defense game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hostiles, towers, projectiles, waves)
//! - `game`: Fixed-timestep driver, input commands and HUD
//! - `renderer`: Drawing surface abstraction
//! - `settings`: Static configuration bundle

pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, InputCommand, Screen};
pub use settings::{PathSpec, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICK_RATE: u32 = 60;
    /// Milliseconds per simulation tick
    pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// A projectile closer than this to its target point is spent
    pub const PROJECTILE_ARRIVAL_DISTANCE: f32 = 10.0;
    /// Projectile hitbox half extent
    pub const PROJECTILE_HALF_EXTENT: f32 = 4.0;

    /// Hostile hitbox (30x40 sprite)
    pub const HOSTILE_HALF_WIDTH: f32 = 15.0;
    pub const HOSTILE_HALF_HEIGHT: f32 = 20.0;

    /// Upgrade multipliers as integer ratios (x1.2 damage, x0.8 interval)
    pub const UPGRADE_DAMAGE_NUM: u32 = 6;
    pub const UPGRADE_DAMAGE_DEN: u32 = 5;
    pub const UPGRADE_INTERVAL_NUM: u64 = 4;
    pub const UPGRADE_INTERVAL_DEN: u64 = 5;
}

/// Heading angle (radians) from `from` looking at `to`
#[inline]
pub fn heading_towards(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Snap a continuous coordinate to the centroid of the cell containing it
#[inline]
pub fn snap_to_cell(pos: Vec2, cell_size: f32) -> Vec2 {
    let half = cell_size / 2.0;
    Vec2::new(
        (pos.x / cell_size).floor() * cell_size + half,
        (pos.y / cell_size).floor() * cell_size + half,
    )
}
