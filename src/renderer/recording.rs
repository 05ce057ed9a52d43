//! Surface that records draw calls instead of rasterizing them

use glam::Vec2;

use super::{Anchor, Color, Surface};

/// One captured draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill(Color),
    Sprite { key: String, center: Vec2, heading: f32 },
    Circle { center: Vec2, radius: f32, color: Color, width: f32 },
    Polyline { points: Vec<Vec2>, color: Color, width: f32 },
    Text { text: String, pos: Vec2, anchor: Anchor, color: Color },
}

/// Headless surface; keeps every command of the current frame
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Number of sprites drawn with the given key
    pub fn sprite_count(&self, key: &str) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { key: k, .. } if k == key))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn fill(&mut self, color: Color) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn sprite(&mut self, key: &str, center: Vec2, heading: f32) {
        self.commands.push(DrawCommand::Sprite {
            key: key.to_string(),
            center,
            heading,
        });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            width,
        });
    }

    fn polyline(&mut self, points: &[Vec2], color: Color, width: f32) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn text(&mut self, text: &str, pos: Vec2, anchor: Anchor, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            anchor,
            color,
        });
    }
}
