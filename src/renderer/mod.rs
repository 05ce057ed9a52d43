//! Drawing surface abstraction
//!
//! The simulation never talks to a window directly. Entities describe
//! themselves through [`Surface`]; a backend (or the recording surface used by
//! tests and the headless runner) decides what that means.

pub mod recording;

pub use recording::{DrawCommand, RecordingSurface};

use glam::Vec2;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);
    pub const BLACK: Color = Color(0, 0, 0);
    pub const BACKGROUND: Color = Color(230, 230, 230);
    pub const PATH: Color = Color(0, 128, 0);
    pub const SPOT_MARKER: Color = Color(128, 0, 0);
    pub const SPOT_HIGHLIGHT: Color = Color(0, 255, 0);
    pub const WIN: Color = Color(255, 215, 0);
    pub const LOSS: Color = Color(255, 0, 0);
}

/// Where a text position is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

/// A drawable target
pub trait Surface {
    /// Clear the whole surface
    fn fill(&mut self, color: Color);

    /// Draw the named sprite centred at `center`, rotated to `heading` radians
    fn sprite(&mut self, key: &str, center: Vec2, heading: f32);

    /// Circle outline of `width` pixels (0 = filled)
    fn circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32);

    /// Open polyline through `points`
    fn polyline(&mut self, points: &[Vec2], color: Color, width: f32);

    fn text(&mut self, text: &str, pos: Vec2, anchor: Anchor, color: Color);
}
