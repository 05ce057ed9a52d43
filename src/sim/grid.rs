//! Placement grid: which cells may hold a tower

use glam::Vec2;

use super::tower::Tower;
use crate::renderer::{Color, Surface};
use crate::settings::Settings;
use crate::snap_to_cell;

#[derive(Debug, Clone)]
pub struct PlacementGrid {
    cell_size: f32,
    /// Eligible cell centroids, fixed at construction
    spots: Vec<Vec2>,
    /// Debug overlay toggle
    pub show_spots: bool,
}

impl PlacementGrid {
    pub fn new(settings: &Settings) -> Self {
        Self {
            cell_size: settings.cell_size,
            spots: settings.placement_cells.clone(),
            show_spots: false,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn spots(&self) -> &[Vec2] {
        &self.spots
    }

    /// Centroid of the cell under a pointer position
    pub fn cell_for(&self, pointer: Vec2) -> Vec2 {
        snap_to_cell(pointer, self.cell_size)
    }

    pub fn is_eligible(&self, cell: Vec2) -> bool {
        self.spots.contains(&cell)
    }

    /// Eligible and not covered by any existing tower
    pub fn is_spot_available(&self, cell: Vec2, towers: &[Tower]) -> bool {
        self.is_eligible(cell) && !towers.iter().any(|t| t.footprint().contains_point(cell))
    }

    pub fn toggle_spots(&mut self) -> bool {
        self.show_spots = !self.show_spots;
        self.show_spots
    }

    /// Site markers are always drawn; the highlight rings only in debug mode
    pub fn draw(&self, surface: &mut dyn Surface) {
        for &spot in &self.spots {
            surface.circle(spot, 10.0, Color::SPOT_MARKER, 0.0);
        }
        if self.show_spots {
            for &spot in &self.spots {
                surface.circle(spot, 15.0, Color::SPOT_HIGHLIGHT, 2.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use crate::sim::tower::TowerKind;

    #[test]
    fn test_cell_for_pointer() {
        let grid = PlacementGrid::new(&Settings::default());
        assert_eq!(grid.cell_for(Vec2::new(100.0, 250.0)), Vec2::new(96.0, 224.0));
        assert_eq!(grid.cell_for(Vec2::new(127.9, 255.9)), Vec2::new(96.0, 224.0));
        assert_eq!(grid.cell_for(Vec2::new(128.0, 256.0)), Vec2::new(160.0, 288.0));
    }

    #[test]
    fn test_availability() {
        let grid = PlacementGrid::new(&Settings::default());
        let cell = Vec2::new(96.0, 224.0);
        assert!(grid.is_spot_available(cell, &[]));

        // Path rows and first column are not eligible
        assert!(!grid.is_spot_available(Vec2::new(96.0, 96.0), &[]));
        assert!(!grid.is_spot_available(Vec2::new(32.0, 224.0), &[]));

        let towers = vec![Tower::new(1, TowerKind::Basic, cell, 64.0, 0)];
        assert!(!grid.is_spot_available(cell, &towers));
        assert!(grid.is_spot_available(Vec2::new(160.0, 224.0), &towers));
    }

    #[test]
    fn test_debug_overlay() {
        let mut grid = PlacementGrid::new(&Settings::default());
        let mut surface = RecordingSurface::new();
        grid.draw(&mut surface);
        let markers = surface.commands.len();
        assert_eq!(markers, grid.spots().len());

        assert!(grid.toggle_spots());
        surface.clear();
        grid.draw(&mut surface);
        assert_eq!(surface.commands.len(), markers * 2);
        assert!(matches!(
            surface.commands.last(),
            Some(DrawCommand::Circle { color: Color::SPOT_HIGHLIGHT, .. })
        ));
    }
}
