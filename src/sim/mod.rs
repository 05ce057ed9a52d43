//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as a millisecond counter, sampled once per tick
//! - Seeded RNG only (path choice)
//! - Stable iteration order (insertion order, ids ascending)
//! - No rendering or platform dependencies beyond the `Surface` trait

pub mod collision;
pub mod economy;
pub mod grid;
pub mod hostile;
pub mod level;
pub mod projectile;
pub mod tick;
pub mod tower;
pub mod wave;

pub use collision::Aabb;
pub use economy::{Economy, Shortfall};
pub use grid::PlacementGrid;
pub use hostile::{Advance, Hostile};
pub use level::{Level, LevelEvent, LevelPhase, PlacementRejected, SellRejected};
pub use projectile::Projectile;
pub use tick::tick;
pub use tower::{Shot, Targeting, Tower, TowerAction, TowerKind, TowerStats, UpgradeRejected, find_target};
pub use wave::{HostileKind, HostileSpawn, Wave, default_waves};
