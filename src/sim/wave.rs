//! Wave roster: ordered batches of hostile spawn descriptors
//!
//! Descriptors do not carry a route. A level picks one path when it is built
//! and every wave of that level walks it.

/// Hostile archetypes (only the sprite differs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostileKind {
    Basic,
    Fast,
    Strong,
}

impl HostileKind {
    pub fn sprite_key(&self) -> &'static str {
        match self {
            HostileKind::Basic => "basic_enemy",
            HostileKind::Fast => "fast_enemy",
            HostileKind::Strong => "strong_enemy",
        }
    }
}

/// How to build one hostile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostileSpawn {
    pub kind: HostileKind,
    /// Pixels per tick
    pub speed: f32,
    pub health: u32,
}

/// Ordered batch of spawns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wave {
    pub spawns: Vec<HostileSpawn>,
}

impl Wave {
    /// `count` copies of the same descriptor
    pub fn uniform(kind: HostileKind, speed: f32, health: u32, count: usize) -> Self {
        Self {
            spawns: vec![HostileSpawn { kind, speed, health }; count],
        }
    }

    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HostileSpawn> {
        self.spawns.get(index)
    }
}

/// The shipped three-wave roster
pub fn default_waves() -> Vec<Wave> {
    vec![
        Wave::uniform(HostileKind::Basic, 1.0, 100, 5),
        Wave::uniform(HostileKind::Fast, 1.5, 150, 7),
        Wave::uniform(HostileKind::Strong, 0.75, 200, 4),
    ]
}
