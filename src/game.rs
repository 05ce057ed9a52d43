//! Game loop driver
//!
//! Turns wall-clock frame time into fixed simulation ticks, routes player
//! input into level actions and draws the HUD and end screens.

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, TICK_MS};
use crate::renderer::{Anchor, Color, Surface};
use crate::settings::{Settings, SettingsError};
use crate::sim::{Level, LevelEvent, TowerKind};

/// Undrained events kept for the presentation layer; older ones are dropped
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Which screen the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    /// Every wave cleared
    Won,
    /// A hostile broke through
    Lost,
}

/// Player intent, already translated from raw device events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    SelectTower(TowerKind),
    /// Debug overlay of placement spots
    ToggleSpots,
    /// Primary click: build the selected kind here
    Place(Vec2),
    /// Secondary click: upgrade the tower under the pointer
    Upgrade(Vec2),
    Sell(Vec2),
}

impl InputCommand {
    /// Keyboard shortcuts: 1/2/3 pick a tower kind, space toggles spots
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(InputCommand::SelectTower(TowerKind::Basic)),
            '2' => Some(InputCommand::SelectTower(TowerKind::Sniper)),
            '3' => Some(InputCommand::SelectTower(TowerKind::Money)),
            ' ' => Some(InputCommand::ToggleSpots),
            _ => None,
        }
    }
}

/// Game instance holding all state
pub struct Game {
    level: Level,
    selected: TowerKind,
    /// Real time not yet consumed by ticks
    accumulator: f64,
    /// Simulation clock in milliseconds
    sim_time: f64,
    ticks: u64,
    screen: Screen,
    /// Events since the last `take_events`, newest `MAX_PENDING_EVENTS` only
    events: Vec<LevelEvent>,
}

impl Game {
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        Ok(Self::with_level(Level::new(settings, seed, 0)?))
    }

    pub fn with_level(level: Level) -> Self {
        let sim_time = level.clock_ms() as f64;
        Self {
            level,
            selected: TowerKind::Basic,
            accumulator: 0.0,
            sim_time,
            ticks: 0,
            screen: Screen::Playing,
            events: Vec::new(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected(&self) -> TowerKind {
        self.selected
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Feed one frame's worth of real time; returns the number of ticks run
    pub fn advance(&mut self, frame_ms: f64) -> u32 {
        // Clamp long stalls (tab switch, debugger)
        self.accumulator += frame_ms.clamp(0.0, 100.0);

        let mut substeps = 0;
        while self.accumulator >= TICK_MS && substeps < MAX_SUBSTEPS {
            if self.screen != Screen::Playing {
                self.accumulator = 0.0;
                break;
            }
            self.step();
            self.accumulator -= TICK_MS;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one simulation tick
    pub fn step(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }
        self.sim_time += TICK_MS;
        self.ticks += 1;
        self.level.update(self.sim_time as u64);
        self.collect_events();

        if self.level.is_game_over() {
            self.screen = Screen::Lost;
        } else if self.level.all_waves_complete() {
            self.screen = Screen::Won;
        }
    }

    fn collect_events(&mut self) {
        for event in self.level.drain_events() {
            log::trace!("{:?}", event);
            self.events.push(event);
        }
        if self.events.len() > MAX_PENDING_EVENTS {
            let excess = self.events.len() - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
        }
    }

    /// Events since the last call, oldest first (sound cues hook in here).
    /// Callers that never drain only see the most recent ones.
    pub fn take_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply one player command. Rejections are logged by the level and
    /// never change state.
    pub fn handle(&mut self, command: InputCommand) {
        if self.screen != Screen::Playing {
            return;
        }
        match command {
            InputCommand::SelectTower(kind) => {
                self.selected = kind;
                log::info!("Selected {} tower", kind);
            }
            InputCommand::ToggleSpots => {
                let shown = self.level.grid_mut().toggle_spots();
                log::info!("Show spots: {}", shown);
            }
            InputCommand::Place(pointer) => {
                let _ = self.level.attempt_place_tower(pointer, self.selected.as_str());
            }
            InputCommand::Upgrade(pointer) => {
                let _ = self.level.upgrade_tower_at(pointer);
            }
            InputCommand::Sell(pointer) => {
                let _ = self.level.sell_tower_at(pointer);
            }
        }
        self.collect_events();
    }

    /// Render the current frame
    pub fn draw(&self, surface: &mut dyn Surface, pointer: Vec2) {
        let settings = self.level.settings();
        let center = Vec2::new(settings.screen_width / 2.0, settings.screen_height / 2.0);

        if self.screen == Screen::Lost {
            surface.fill(Color::BLACK);
            surface.text("Game Over!", center, Anchor::Center, Color::LOSS);
            return;
        }

        surface.fill(Color::BACKGROUND);
        surface.sprite("game_background", center, 0.0);
        self.level.draw(surface, pointer);
        self.draw_hud(surface);

        if self.screen == Screen::Won {
            surface.text("You Win!", center, Anchor::Center, Color::WIN);
        }
    }

    fn draw_hud(&self, surface: &mut dyn Surface) {
        let lines = [
            format!("Money: ${}", self.level.money()),
            format!("Selected Tower: {}", self.selected),
            format!("Waves Left: {}", self.level.waves_left()),
            format!("Enemies Left: {}", self.level.hostiles().len()),
        ];
        for (i, line) in lines.iter().enumerate() {
            surface.text(line, Vec2::new(10.0, 10.0 + 30.0 * i as f32), Anchor::TopLeft, Color::WHITE);
        }
        // Row 130 belongs to the level's path label
        surface.text(
            &format!("Lives: {}", self.level.lives()),
            Vec2::new(10.0, 160.0),
            Anchor::TopLeft,
            Color::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::settings::PathSpec;
    use crate::sim::{HostileKind, Wave};

    fn short_path_game() -> Game {
        let settings = Settings {
            paths: vec![PathSpec {
                number: 3,
                waypoints: vec![Vec2::new(0.0, 10.0), Vec2::new(40.0, 10.0)],
            }],
            ..Settings::default()
        };
        let level = Level::with_waves(settings, vec![Wave::uniform(HostileKind::Basic, 2.0, 100, 1)], 5, 0)
            .expect("valid settings");
        Game::with_level(level)
    }

    #[test]
    fn test_from_key() {
        assert_eq!(InputCommand::from_key('2'), Some(InputCommand::SelectTower(TowerKind::Sniper)));
        assert_eq!(InputCommand::from_key(' '), Some(InputCommand::ToggleSpots));
        assert_eq!(InputCommand::from_key('x'), None);
    }

    #[test]
    fn test_fixed_timestep() {
        let mut game = Game::new(Settings::default(), 11).expect("valid settings");
        // Less than one tick: nothing happens yet
        assert_eq!(game.advance(10.0), 0);
        assert_eq!(game.advance(10.0), 1);
        assert_eq!(game.ticks(), 1);
        // A long stall is clamped to 100 ms of catch-up
        assert_eq!(game.advance(10_000.0), 6);
        assert_eq!(game.ticks(), 7);
    }

    #[test]
    fn test_place_and_economy_through_input() {
        let mut game = Game::new(Settings::default(), 11).expect("valid settings");
        let cell = Vec2::new(96.0, 224.0);

        game.handle(InputCommand::Place(cell));
        assert_eq!(game.level().money(), 400);

        // Same cell again: rejected, funds untouched
        game.handle(InputCommand::SelectTower(TowerKind::Money));
        game.handle(InputCommand::Place(cell));
        assert_eq!(game.level().money(), 400);
        assert_eq!(game.level().towers().len(), 1);

        // Different kind, free cell: accepted
        game.handle(InputCommand::Place(Vec2::new(160.0, 224.0)));
        assert_eq!(game.level().money(), 300);

        game.handle(InputCommand::Upgrade(cell));
        assert_eq!(game.level().money(), 250);
        game.handle(InputCommand::Sell(cell));
        assert_eq!(game.level().money(), 325);

        let events = game.take_events();
        assert!(events.iter().any(|e| matches!(e, LevelEvent::TowerUpgraded { level: 2, .. })));
        assert!(events.iter().any(|e| matches!(e, LevelEvent::TowerSold { refund: 75, .. })));
    }

    #[test]
    fn test_loss_stops_simulation() {
        let mut game = short_path_game();
        while game.screen() == Screen::Playing {
            game.step();
            assert!(game.ticks() < 100);
        }
        assert_eq!(game.screen(), Screen::Lost);

        let ticks = game.ticks();
        game.advance(50.0);
        assert_eq!(game.ticks(), ticks);

        let mut surface = RecordingSurface::new();
        game.draw(&mut surface, Vec2::ZERO);
        assert!(surface.has_text("Game Over!"));
        assert!(!surface.has_text("Money"));
    }

    #[test]
    fn test_undrained_events_are_bounded() {
        let settings = Settings {
            starting_money: 10_000,
            ..Settings::default()
        };
        // A parked hostile keeps the level running
        let waves = vec![Wave::uniform(HostileKind::Basic, 0.0, 100, 1)];
        let mut game = Game::with_level(Level::with_waves(settings, waves, 3, 0).expect("valid settings"));
        game.handle(InputCommand::SelectTower(TowerKind::Money));
        for spot in game.level().grid().spots().to_vec().into_iter().take(60) {
            game.handle(InputCommand::Place(spot));
        }
        assert_eq!(game.selected(), TowerKind::Money);

        // Sixty money towers each pay out every 3 s for 90 s
        for _ in 0..90 * 60 {
            game.step();
        }
        assert_eq!(game.screen(), Screen::Playing);
        let events = game.take_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert!(events.iter().all(|e| !matches!(e, LevelEvent::TowerPlaced { .. })));
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_hud() {
        let mut game = short_path_game();
        game.handle(InputCommand::ToggleSpots);
        let mut surface = RecordingSurface::new();
        game.draw(&mut surface, Vec2::ZERO);
        assert!(surface.has_text("Money: $500"));
        assert!(surface.has_text("Selected Tower: basic"));
        assert!(surface.has_text("Waves Left: 1"));
        assert!(surface.has_text("Enemies Left: 1"));
        assert!(surface.has_text("Lives: 20"));
        assert!(surface.has_text("Path: 3"));
        assert!(!surface.has_text("You Win!"));
    }
}
