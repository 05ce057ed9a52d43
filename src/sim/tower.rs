//! Towers and their targeting rules
//!
//! A tower is plain data; what differs between kinds is the stat block and
//! the targeting rule, both looked up by matching on [`TowerKind`].

use std::fmt;

use glam::Vec2;

use super::collision::Aabb;
use super::economy::{Economy, Shortfall};
use super::hostile::Hostile;
use crate::consts::*;
use crate::heading_towards;
use crate::renderer::{Anchor, Color, Surface};
use crate::settings::Settings;

/// Tower catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TowerKind {
    Basic,
    Sniper,
    Money,
}

impl TowerKind {
    pub const ALL: [TowerKind; 3] = [TowerKind::Basic, TowerKind::Sniper, TowerKind::Money];

    pub fn as_str(&self) -> &'static str {
        match self {
            TowerKind::Basic => "basic",
            TowerKind::Sniper => "sniper",
            TowerKind::Money => "money",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(TowerKind::Basic),
            "sniper" => Some(TowerKind::Sniper),
            "money" => Some(TowerKind::Money),
            _ => None,
        }
    }

    pub fn sprite_key(&self) -> &'static str {
        match self {
            TowerKind::Basic => "basic_tower",
            TowerKind::Sniper => "sniper_tower",
            TowerKind::Money => "money_tower",
        }
    }

    /// Level-1 stats
    pub fn base_stats(&self) -> TowerStats {
        match self {
            TowerKind::Basic => TowerStats {
                range: 150.0,
                damage: 20,
                fire_interval_ms: 1000,
            },
            TowerKind::Sniper => TowerStats {
                range: 300.0,
                damage: 40,
                fire_interval_ms: 2000,
            },
            TowerKind::Money => TowerStats {
                range: 0.0,
                damage: 0,
                fire_interval_ms: 0,
            },
        }
    }

    /// Money towers never shoot
    pub fn targeting(&self) -> Option<Targeting> {
        match self {
            TowerKind::Basic => Some(Targeting::Nearest),
            TowerKind::Sniper => Some(Targeting::Healthiest),
            TowerKind::Money => None,
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerStats {
    pub range: f32,
    pub damage: u32,
    /// Minimum time between shots
    pub fire_interval_ms: u64,
}

/// How a tower picks among hostiles in range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Targeting {
    /// Closest to the tower
    Nearest,
    /// Most current health
    Healthiest,
}

/// Index of the hostile `rule` selects from `origin`, ties going to the earliest
pub fn find_target(rule: Targeting, origin: Vec2, range: f32, hostiles: &[Hostile]) -> Option<usize> {
    let in_range = hostiles
        .iter()
        .enumerate()
        .filter(|(_, h)| h.is_alive())
        .map(|(i, h)| (i, h, origin.distance(h.pos)))
        .filter(|&(_, _, d)| d <= range);

    let mut best: Option<(usize, f32)> = None;
    for (i, hostile, distance) in in_range {
        // Larger score wins; strict comparison keeps the first on ties
        let score = match rule {
            Targeting::Nearest => -distance,
            Targeting::Healthiest => hostile.health() as f32,
        };
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}

/// Why an upgrade request did nothing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeRejected {
    InsufficientFunds(Shortfall),
    /// No tower under the pointer
    NoTowerAt(Vec2),
}

impl fmt::Display for UpgradeRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeRejected::InsufficientFunds(shortfall) => {
                write!(f, "not enough money to upgrade tower: {}", shortfall)
            }
            UpgradeRejected::NoTowerAt(pos) => write!(f, "no tower at ({}, {})", pos.x, pos.y),
        }
    }
}

impl std::error::Error for UpgradeRejected {}

/// A shot requested by a tower this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: Vec2,
    pub target: Vec2,
    pub target_id: u32,
    pub damage: u32,
}

/// What a tower did this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TowerAction {
    Idle,
    Fired(Shot),
    /// Money tower payout, already credited
    Paid(u32),
}

/// A placed tower
#[derive(Debug, Clone)]
pub struct Tower {
    pub id: u32,
    pub kind: TowerKind,
    pub pos: Vec2,
    pub range: f32,
    pub damage: u32,
    pub fire_interval_ms: u64,
    pub level: u32,
    /// Visual only
    pub heading: f32,
    last_fire_ms: u64,
    last_payout_ms: u64,
    footprint: Aabb,
}

impl Tower {
    /// Build a level-1 tower on the cell centred at `pos`; timers start at `now_ms`
    pub fn new(id: u32, kind: TowerKind, pos: Vec2, cell_size: f32, now_ms: u64) -> Self {
        let stats = kind.base_stats();
        Self {
            id,
            kind,
            pos,
            range: stats.range,
            damage: stats.damage,
            fire_interval_ms: stats.fire_interval_ms,
            level: 1,
            heading: 0.0,
            last_fire_ms: now_ms,
            last_payout_ms: now_ms,
            footprint: Aabb::square(pos, cell_size / 2.0),
        }
    }

    pub fn last_fire_ms(&self) -> u64 {
        self.last_fire_ms
    }

    pub fn footprint(&self) -> Aabb {
        self.footprint
    }

    pub fn is_hovered(&self, pointer: Vec2) -> bool {
        self.footprint.contains_point(pointer)
    }

    pub fn upgrade_cost(&self, settings: &Settings) -> u32 {
        settings.upgrade_cost(self.level)
    }

    /// Run this tower's per-tick behavior against the live hostiles
    pub fn update(
        &mut self,
        now_ms: u64,
        hostiles: &[Hostile],
        economy: &mut Economy,
        settings: &Settings,
    ) -> TowerAction {
        let Some(rule) = self.kind.targeting() else {
            return self.generate_money(now_ms, economy, settings);
        };

        if now_ms.saturating_sub(self.last_fire_ms) <= self.fire_interval_ms {
            return TowerAction::Idle;
        }
        let Some(index) = find_target(rule, self.pos, self.range, hostiles) else {
            return TowerAction::Idle;
        };

        let target = &hostiles[index];
        self.heading = heading_towards(self.pos, target.pos);
        self.last_fire_ms = now_ms;
        TowerAction::Fired(Shot {
            origin: self.pos,
            target: target.pos,
            target_id: target.id,
            damage: self.damage,
        })
    }

    fn generate_money(&mut self, now_ms: u64, economy: &mut Economy, settings: &Settings) -> TowerAction {
        if now_ms.saturating_sub(self.last_payout_ms) <= settings.money_generation_rate_ms {
            return TowerAction::Idle;
        }
        economy.credit(settings.money_amount);
        self.last_payout_ms = now_ms;
        TowerAction::Paid(settings.money_amount)
    }

    /// Pay for and apply one level; returns the new level
    pub fn upgrade(&mut self, economy: &mut Economy, settings: &Settings) -> Result<u32, UpgradeRejected> {
        economy
            .try_spend(self.upgrade_cost(settings))
            .map_err(UpgradeRejected::InsufficientFunds)?;
        self.level += 1;
        self.damage = scale_u32(self.damage, UPGRADE_DAMAGE_NUM, UPGRADE_DAMAGE_DEN);
        self.fire_interval_ms = scale_u64(self.fire_interval_ms, UPGRADE_INTERVAL_NUM, UPGRADE_INTERVAL_DEN);
        Ok(self.level)
    }

    /// Sprite plus, when hovered, the stat overlay
    pub fn draw(&self, surface: &mut dyn Surface, pointer: Vec2, settings: &Settings) {
        surface.sprite(self.kind.sprite_key(), self.pos, self.heading);
        if !self.is_hovered(pointer) {
            return;
        }

        let below = self.pos + Vec2::new(0.0, 20.0);
        surface.text(&format!("Level: {}", self.level), below, Anchor::TopLeft, Color::WHITE);
        surface.text(
            &format!("Upgrade: ${}", self.upgrade_cost(settings)),
            below + Vec2::new(0.0, 20.0),
            Anchor::TopLeft,
            Color::WHITE,
        );
        surface.text(
            &format!("Damage: {}, Range: {}", self.damage, self.range),
            self.footprint.min() - Vec2::new(0.0, 20.0),
            Anchor::TopLeft,
            Color::WHITE,
        );
        if self.range > 0.0 {
            surface.circle(self.pos, self.range, Color::WHITE, 1.0);
        }
    }
}

/// `value * num / den`, widened so large stats saturate instead of wrapping
fn scale_u32(value: u32, num: u32, den: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(num) / u64::from(den);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

fn scale_u64(value: u64, num: u64, den: u64) -> u64 {
    let scaled = u128::from(value) * u128::from(num) / u128::from(den);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
