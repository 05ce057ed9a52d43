//! Static configuration bundle
//!
//! Everything the simulation reads at construction time. The defaults match
//! the shipped game; a JSON document can override any subset of fields.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::snap_to_cell;

/// A selectable hostile route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    /// Identifier shown in the HUD
    pub number: u32,
    /// Ordered waypoints, first is the spawn point, last is the breakthrough point
    pub waypoints: Vec<Vec2>,
}

impl PathSpec {
    fn from_points(number: u32, points: &[(f32, f32)]) -> Self {
        Self {
            number,
            waypoints: points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        }
    }
}

/// Reasons a configuration bundle cannot drive a level
#[derive(Debug)]
pub enum SettingsError {
    /// JSON override could not be parsed
    Json(serde_json::Error),
    NoPaths,
    /// Path with the given number has no waypoints
    EmptyPath(u32),
    NonPositiveCellSize(f32),
    /// Bundle declares no placement cells
    NoPlacementCells,
    /// Placement cell that is not a centroid of the configured grid
    OffGridCell(Vec2),
    /// Level was given an empty wave roster
    NoWaves,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Json(e) => write!(f, "invalid settings document: {}", e),
            SettingsError::NoPaths => write!(f, "at least one hostile path is required"),
            SettingsError::EmptyPath(number) => write!(f, "path {} has no waypoints", number),
            SettingsError::NonPositiveCellSize(size) => {
                write!(f, "cell size must be positive, got {}", size)
            }
            SettingsError::NoPlacementCells => write!(f, "no tower placement cells declared"),
            SettingsError::OffGridCell(cell) => {
                write!(f, "placement cell ({}, {}) is not on the grid", cell.x, cell.y)
            }
            SettingsError::NoWaves => write!(f, "a level needs at least one wave"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub rows: u32,
    pub cols: u32,
    /// Side length of a square grid cell
    pub cell_size: f32,

    // === Economy ===
    /// Price of any tower kind
    pub tower_cost: u32,
    /// Upgrade price is this times the tower's current level
    pub upgrade_cost_per_level: u32,
    /// Fraction of `tower_cost` refunded when a tower is sold
    pub tower_sell_percentage: f32,
    pub starting_money: u32,
    pub starting_lives: u32,
    /// Money tower payout interval
    pub money_generation_rate_ms: u64,
    /// Money tower payout
    pub money_amount: u32,

    // === Waves ===
    /// Minimum time between two hostile spawns
    pub spawn_delay_ms: u64,
    pub paths: Vec<PathSpec>,

    // === Towers ===
    pub projectile_speed: f32,
    /// Cell centroids where towers may be built
    pub placement_cells: Vec<Vec2>,
}

impl Default for Settings {
    fn default() -> Self {
        let rows = 10;
        let cols = 15;
        let cell_size = 64.0;
        Self {
            screen_width: 1200.0,
            screen_height: 800.0,
            rows,
            cols,
            cell_size,

            tower_cost: 100,
            upgrade_cost_per_level: 50,
            tower_sell_percentage: 0.75,
            starting_money: 500,
            starting_lives: 20,
            money_generation_rate_ms: 3000,
            money_amount: 50,

            spawn_delay_ms: 1000,
            paths: default_paths(),

            projectile_speed: 5.0,
            placement_cells: placement_cells_for(rows, cols, cell_size),
        }
    }
}

impl Settings {
    /// Parse a JSON override; fields left out keep their defaults, except
    /// that missing placement cells are rebuilt for the document's grid
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        let derive_cells = document.get("placement_cells").is_none();
        let mut settings: Settings = serde_json::from_value(document)?;
        if derive_cells {
            settings.placement_cells = placement_cells_for(settings.rows, settings.cols, settings.cell_size);
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cell_size <= 0.0 {
            return Err(SettingsError::NonPositiveCellSize(self.cell_size));
        }
        if self.paths.is_empty() {
            return Err(SettingsError::NoPaths);
        }
        if let Some(path) = self.paths.iter().find(|p| p.waypoints.is_empty()) {
            return Err(SettingsError::EmptyPath(path.number));
        }
        if self.placement_cells.is_empty() {
            return Err(SettingsError::NoPlacementCells);
        }
        if let Some(&cell) = self.placement_cells.iter().find(|&&c| !self.is_grid_centroid(c)) {
            return Err(SettingsError::OffGridCell(cell));
        }
        Ok(())
    }

    fn is_grid_centroid(&self, cell: Vec2) -> bool {
        let col = (cell.x / self.cell_size).floor();
        let row = (cell.y / self.cell_size).floor();
        (0.0..self.cols as f32).contains(&col)
            && (0.0..self.rows as f32).contains(&row)
            && snap_to_cell(cell, self.cell_size).distance(cell) < 1e-3
    }

    /// Whether a point lies on the playfield (edges included)
    pub fn is_inside(&self, pos: Vec2) -> bool {
        (0.0..=self.screen_width).contains(&pos.x) && (0.0..=self.screen_height).contains(&pos.y)
    }

    /// Price of taking a tower from `level` to `level + 1`
    pub fn upgrade_cost(&self, level: u32) -> u32 {
        self.upgrade_cost_per_level.saturating_mul(level)
    }

    /// Money returned for selling a tower
    pub fn sell_refund(&self) -> u32 {
        (self.tower_cost as f32 * self.tower_sell_percentage).floor() as u32
    }
}

/// Centroids of every column but the first, on the rows below the top three
pub fn placement_cells_for(rows: u32, cols: u32, cell_size: f32) -> Vec<Vec2> {
    let half = cell_size / 2.0;
    (1..cols)
        .flat_map(|x| {
            (3..rows).map(move |y| Vec2::new(x as f32 * cell_size + half, y as f32 * cell_size + half))
        })
        .collect()
}

fn default_paths() -> Vec<PathSpec> {
    vec![
        PathSpec::from_points(1, &[(50.0, 400.0), (200.0, 400.0), (200.0, 300.0), (400.0, 300.0), (400.0, 500.0), (700.0, 500.0), (700.0, 400.0), (1150.0, 400.0)]),
        PathSpec::from_points(2, &[(50.0, 400.0), (300.0, 400.0), (300.0, 600.0), (600.0, 600.0), (600.0, 200.0), (900.0, 200.0), (900.0, 500.0), (1150.0, 500.0)]),
        PathSpec::from_points(3, &[(50.0, 400.0), (300.0, 400.0), (300.0, 200.0), (600.0, 200.0), (600.0, 600.0), (900.0, 600.0), (900.0, 300.0), (1150.0, 300.0)]),
        PathSpec::from_points(4, &[(50.0, 400.0), (200.0, 400.0), (200.0, 500.0), (400.0, 500.0), (400.0, 300.0), (600.0, 300.0), (600.0, 400.0), (1150.0, 400.0)]),
        PathSpec::from_points(5, &[(50.0, 400.0), (300.0, 400.0), (300.0, 200.0), (600.0, 200.0), (600.0, 600.0), (900.0, 600.0), (900.0, 300.0), (1150.0, 300.0)]),
        PathSpec::from_points(6, &[(50.0, 400.0), (150.0, 400.0), (150.0, 500.0), (350.0, 500.0), (350.0, 300.0), (550.0, 300.0), (550.0, 400.0), (1150.0, 400.0)]),
        PathSpec::from_points(7, &[(50.0, 400.0), (100.0, 400.0), (100.0, 500.0), (300.0, 500.0), (300.0, 300.0), (500.0, 300.0), (500.0, 400.0), (1150.0, 400.0)]),
        PathSpec::from_points(8, &[(50.0, 400.0), (100.0, 400.0), (100.0, 500.0), (300.0, 500.0), (300.0, 300.0), (500.0, 200.0), (500.0, 400.0), (1150.0, 500.0)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.paths.len(), 8);
        // 14 columns x 7 rows
        assert_eq!(settings.placement_cells.len(), 98);
        assert!(settings.placement_cells.contains(&Vec2::new(96.0, 224.0)));
        assert!(!settings.placement_cells.contains(&Vec2::new(32.0, 224.0)));
        assert!(!settings.placement_cells.contains(&Vec2::new(96.0, 160.0)));
    }

    #[test]
    fn test_from_json_partial_override() {
        let settings = Settings::from_json(r#"{ "starting_money": 1000, "tower_cost": 250 }"#)
            .expect("partial override should parse");
        assert_eq!(settings.starting_money, 1000);
        assert_eq!(settings.tower_cost, 250);
        assert_eq!(settings.spawn_delay_ms, 1000);
    }

    #[test]
    fn test_from_json_rebuilds_cells_for_grid() {
        let settings = Settings::from_json(r#"{ "rows": 5, "cols": 4, "cell_size": 32.0 }"#)
            .expect("grid override should parse");
        // Columns 1..4, rows 3..5
        assert_eq!(settings.placement_cells.len(), 6);
        assert!(settings.placement_cells.contains(&Vec2::new(48.0, 112.0)));
        assert!(settings.placement_cells.contains(&Vec2::new(112.0, 144.0)));

        let explicit = Settings::from_json(r#"{ "placement_cells": [[96.0, 224.0]] }"#)
            .expect("explicit cells should parse");
        assert_eq!(explicit.placement_cells, vec![Vec2::new(96.0, 224.0)]);
    }

    #[test]
    fn test_rejects_off_grid_cells() {
        let json = r#"{ "rows": 5, "cols": 4, "placement_cells": [[96.0, 224.0], [600.0, 600.0]] }"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(SettingsError::OffGridCell(cell)) if cell == Vec2::new(600.0, 600.0)
        ));

        let settings = Settings {
            placement_cells: vec![Vec2::new(100.0, 224.0)],
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::OffGridCell(_))));
    }

    #[test]
    fn test_from_json_rejects_empty_path() {
        let json = r#"{ "paths": [ { "number": 9, "waypoints": [] } ] }"#;
        assert!(matches!(Settings::from_json(json), Err(SettingsError::EmptyPath(9))));
        assert!(matches!(Settings::from_json("{ nope"), Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_costs() {
        let settings = Settings::default();
        assert_eq!(settings.upgrade_cost(1), 50);
        assert_eq!(settings.upgrade_cost(3), 150);
        assert_eq!(settings.sell_refund(), 75);
        assert!(settings.is_inside(Vec2::new(1200.0, 0.0)));
        assert!(!settings.is_inside(Vec2::new(1200.1, 10.0)));
    }
}
