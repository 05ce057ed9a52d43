//! Level controller state
//!
//! Owns the live hostiles, towers and projectiles, the wave cursor and the
//! economy. Player actions (place, upgrade, sell) are all-or-nothing: on
//! `Err` nothing has changed.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::economy::{Economy, Shortfall};
use super::grid::PlacementGrid;
use super::hostile::Hostile;
use super::projectile::Projectile;
use super::tower::{Tower, TowerKind, UpgradeRejected};
use super::wave::{Wave, default_waves};
use crate::renderer::{Anchor, Color, Surface};
use crate::settings::{PathSpec, Settings, SettingsError};

/// Where the level's state machine stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    /// Wave still has hostiles to release
    Spawning(usize),
    /// Wave fully released, hostiles still alive
    Active(usize),
    AllComplete,
    /// A hostile broke through
    GameOver,
}

/// Notable changes, drained by the game loop each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelEvent {
    WaveStarted { wave: usize },
    HostileSpawned { id: u32 },
    HostileHit { id: u32, damage: u32 },
    HostileKilled { id: u32 },
    Breakthrough { id: u32 },
    ProjectileFired { tower: u32, projectile: u32 },
    MoneyGenerated { tower: u32, amount: u32 },
    TowerPlaced { id: u32, kind: TowerKind, cell: Vec2 },
    TowerUpgraded { id: u32, level: u32 },
    TowerSold { id: u32, refund: u32 },
    AllWavesComplete,
    GameOver,
}

/// Why a placement request did nothing
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementRejected {
    UnknownKind(String),
    InsufficientFunds(Shortfall),
    /// Cell not eligible or already taken
    SpotUnavailable(Vec2),
}

impl fmt::Display for PlacementRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementRejected::UnknownKind(kind) => write!(f, "unknown tower type '{}'", kind),
            PlacementRejected::InsufficientFunds(shortfall) => {
                write!(f, "not enough money for a tower: {}", shortfall)
            }
            PlacementRejected::SpotUnavailable(cell) => {
                write!(f, "invalid position for tower at ({}, {})", cell.x, cell.y)
            }
        }
    }
}

impl std::error::Error for PlacementRejected {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SellRejected {
    NoTowerAt(Vec2),
}

impl fmt::Display for SellRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SellRejected::NoTowerAt(pos) => write!(f, "no tower to sell at ({}, {})", pos.x, pos.y),
        }
    }
}

impl std::error::Error for SellRejected {}

/// One level: a path, a wave roster and everything living on the field
#[derive(Debug, Clone)]
pub struct Level {
    pub(crate) settings: Settings,
    pub(crate) path: PathSpec,
    pub(crate) waves: Vec<Wave>,
    pub(crate) current_wave: usize,
    /// Spawn cursor into the current wave
    pub(crate) spawned: usize,
    pub(crate) last_spawn_ms: u64,
    /// Time of the most recent tick
    pub(crate) clock_ms: u64,
    pub(crate) hostiles: Vec<Hostile>,
    pub(crate) towers: Vec<Tower>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) grid: PlacementGrid,
    pub(crate) economy: Economy,
    pub(crate) lives: u32,
    pub(crate) game_over: bool,
    pub(crate) all_waves_complete: bool,
    pub(crate) events: Vec<LevelEvent>,
    pub(crate) ids: IdAllocator,
}

/// Monotonic entity ids shared by all entity kinds
#[derive(Debug, Clone)]
pub(crate) struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    fn new() -> Self {
        Self { next: 1 }
    }

    pub(crate) fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Level {
    /// Level with the shipped wave roster
    pub fn new(settings: Settings, seed: u64, now_ms: u64) -> Result<Self, SettingsError> {
        Self::with_waves(settings, default_waves(), seed, now_ms)
    }

    /// Level with a custom roster. The path is drawn from `settings.paths` with
    /// a PCG stream seeded by `seed`, so equal seeds give equal levels.
    pub fn with_waves(
        settings: Settings,
        waves: Vec<Wave>,
        seed: u64,
        now_ms: u64,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        if waves.is_empty() {
            return Err(SettingsError::NoWaves);
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let path = settings.paths[rng.random_range(0..settings.paths.len())].clone();
        log::info!("Level seed {} picked path {}", seed, path.number);

        let mut level = Self {
            grid: PlacementGrid::new(&settings),
            economy: Economy::new(settings.starting_money),
            lives: settings.starting_lives,
            settings,
            path,
            waves,
            current_wave: 0,
            spawned: 0,
            last_spawn_ms: now_ms,
            clock_ms: now_ms,
            hostiles: Vec::new(),
            towers: Vec::new(),
            projectiles: Vec::new(),
            game_over: false,
            all_waves_complete: false,
            events: Vec::new(),
            ids: IdAllocator::new(),
        };
        level.start_wave(now_ms);
        Ok(level)
    }

    /// Reset the spawn cursor and release the wave's first hostile at once
    pub(crate) fn start_wave(&mut self, now_ms: u64) {
        self.spawned = 0;
        log::info!(
            "Wave {} of {} started ({} hostiles)",
            self.current_wave + 1,
            self.waves.len(),
            self.waves[self.current_wave].len()
        );
        self.events.push(LevelEvent::WaveStarted {
            wave: self.current_wave,
        });
        self.spawn_next(now_ms);
    }

    /// Release the next hostile of the current wave, if any remain
    pub(crate) fn spawn_next(&mut self, now_ms: u64) {
        let Some(spawn) = self
            .waves
            .get(self.current_wave)
            .and_then(|w| w.get(self.spawned))
            .copied()
        else {
            return;
        };
        let id = self.ids.next_id();
        self.hostiles.push(Hostile::new(id, &spawn, &self.path.waypoints));
        self.spawned += 1;
        self.last_spawn_ms = now_ms;
        log::debug!("Spawned hostile {} ({:?})", id, spawn.kind);
        self.events.push(LevelEvent::HostileSpawned { id });
    }

    /// Whether the current wave still has hostiles to release
    pub fn wave_has_pending_spawns(&self) -> bool {
        self.waves
            .get(self.current_wave)
            .is_some_and(|w| self.spawned < w.len())
    }

    pub fn phase(&self) -> LevelPhase {
        if self.game_over {
            LevelPhase::GameOver
        } else if self.all_waves_complete {
            LevelPhase::AllComplete
        } else if self.wave_has_pending_spawns() {
            LevelPhase::Spawning(self.current_wave)
        } else {
            LevelPhase::Active(self.current_wave)
        }
    }

    /// Place a tower of the named kind in the cell under `pointer`
    pub fn attempt_place_tower(&mut self, pointer: Vec2, kind: &str) -> Result<u32, PlacementRejected> {
        let kind = TowerKind::from_str(kind).ok_or_else(|| PlacementRejected::UnknownKind(kind.to_string()));
        let result = kind.and_then(|kind| self.place_tower(pointer, kind));
        if let Err(reason) = &result {
            log::warn!("Tower placement rejected: {}", reason);
        }
        result
    }

    /// Check funds, check the cell, debit and build, in that order
    pub fn place_tower(&mut self, pointer: Vec2, kind: TowerKind) -> Result<u32, PlacementRejected> {
        let cost = self.settings.tower_cost;
        if !self.economy.can_afford(cost) {
            return Err(PlacementRejected::InsufficientFunds(Shortfall {
                needed: cost,
                available: self.economy.money(),
            }));
        }

        let cell = self.grid.cell_for(pointer);
        if !self.grid.is_spot_available(cell, &self.towers) {
            return Err(PlacementRejected::SpotUnavailable(cell));
        }

        self.economy
            .try_spend(cost)
            .map_err(PlacementRejected::InsufficientFunds)?;
        let id = self.ids.next_id();
        self.towers
            .push(Tower::new(id, kind, cell, self.grid.cell_size(), self.clock_ms));
        log::info!("Placed {} tower {} at ({}, {})", kind, id, cell.x, cell.y);
        self.events.push(LevelEvent::TowerPlaced { id, kind, cell });
        Ok(id)
    }

    pub fn tower_at(&self, pointer: Vec2) -> Option<&Tower> {
        self.towers.iter().find(|t| t.is_hovered(pointer))
    }

    /// Upgrade the tower under `pointer`; returns its new level
    pub fn upgrade_tower_at(&mut self, pointer: Vec2) -> Result<u32, UpgradeRejected> {
        let Some(tower) = self.towers.iter_mut().find(|t| t.is_hovered(pointer)) else {
            return Err(UpgradeRejected::NoTowerAt(pointer));
        };
        match tower.upgrade(&mut self.economy, &self.settings) {
            Ok(level) => {
                log::info!("Tower {} upgraded to level {}", tower.id, level);
                self.events.push(LevelEvent::TowerUpgraded { id: tower.id, level });
                Ok(level)
            }
            Err(reason) => {
                log::warn!("{}", reason);
                Err(reason)
            }
        }
    }

    /// Remove the tower under `pointer` for a partial refund, freeing its cell
    pub fn sell_tower_at(&mut self, pointer: Vec2) -> Result<u32, SellRejected> {
        let Some(index) = self.towers.iter().position(|t| t.is_hovered(pointer)) else {
            log::warn!("Nothing to sell at ({}, {})", pointer.x, pointer.y);
            return Err(SellRejected::NoTowerAt(pointer));
        };
        let tower = self.towers.remove(index);
        let refund = self.settings.sell_refund();
        self.economy.credit(refund);
        log::info!("Sold tower {} for ${}", tower.id, refund);
        self.events.push(LevelEvent::TowerSold { id: tower.id, refund });
        Ok(refund)
    }

    // === Observers ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &PathSpec {
        &self.path
    }

    pub fn hostiles(&self) -> &[Hostile] {
        &self.hostiles
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut PlacementGrid {
        &mut self.grid
    }

    pub fn money(&self) -> u32 {
        self.economy.money()
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn current_wave(&self) -> usize {
        self.current_wave
    }

    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    pub fn waves_left(&self) -> usize {
        self.waves.len() - self.current_wave
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Breakthrough happened
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn all_waves_complete(&self) -> bool {
        self.all_waves_complete
    }

    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Path, sites, entities and hover overlays
    pub fn draw(&self, surface: &mut dyn Surface, pointer: Vec2) {
        surface.polyline(&self.path.waypoints, Color::PATH, 5.0);
        self.grid.draw(surface);
        for hostile in self.hostiles.iter().filter(|h| h.is_alive()) {
            hostile.draw(surface);
        }
        for tower in &self.towers {
            tower.draw(surface, pointer, &self.settings);
        }
        for projectile in self.projectiles.iter().filter(|p| p.is_alive()) {
            projectile.draw(surface);
        }
        surface.text(
            &format!("Path: {}", self.path.number),
            Vec2::new(10.0, 130.0),
            Anchor::TopLeft,
            Color::WHITE,
        );
    }
}
