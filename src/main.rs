//! Waypoint Defense headless runner
//!
//! Plays the simulation with a simple scripted player and reports how the
//! run ended. Usage: `waypoint-defense [seed] [settings.json]`

use std::fs;

use anyhow::{Context, Result};
use glam::Vec2;

use waypoint_defense::consts::TICK_MS;
use waypoint_defense::renderer::RecordingSurface;
use waypoint_defense::sim::LevelEvent;
use waypoint_defense::{Game, InputCommand, Screen, Settings};

/// Give up after this many simulated minutes
const MAX_MINUTES: u64 = 20;
/// The scripted player acts twice a second
const THINK_EVERY_TICKS: u64 = 30;
/// Build order, as number-row keys
const BUILD_KEYS: [char; 4] = ['1', '2', '1', '3'];

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("seed '{}' is not a number", raw))?,
        None => 7,
    };
    let settings = match args.next() {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            Settings::from_json(&json).with_context(|| format!("loading settings from {}", path))?
        }
        None => Settings::default(),
    };

    log::info!("Waypoint Defense (headless) starting, seed {}", seed);
    let mut game = Game::new(settings, seed)?;
    let sites = build_sites(&game);
    log::info!("Path {} leaves {} sites next to the road", game.level().path().number, sites.len());

    let mut player = Autoplayer { sites, built: 0 };
    let max_ticks = MAX_MINUTES * 60 * 60;
    let mut kills = 0;
    while game.screen() == Screen::Playing && game.ticks() < max_ticks {
        if game.ticks() % THINK_EVERY_TICKS == 0 {
            player.think(&mut game);
        }
        game.advance(TICK_MS);
        kills += game
            .take_events()
            .iter()
            .filter(|e| matches!(e, LevelEvent::HostileKilled { .. }))
            .count();
    }

    let mut surface = RecordingSurface::new();
    game.draw(&mut surface, Vec2::ZERO);
    log::debug!("Final frame: {} draw commands", surface.commands.len());

    let level = game.level();
    let outcome = match game.screen() {
        Screen::Won => "won",
        Screen::Lost => "lost",
        Screen::Playing => "timed out",
    };
    println!(
        "Run {} after {:.1}s: wave {}/{}, {} kills, {} towers, ${} left",
        outcome,
        game.ticks() as f64 * TICK_MS / 1000.0,
        level.current_wave() + 1,
        level.wave_count(),
        kills,
        level.towers().len(),
        level.money(),
    );
    Ok(())
}

/// Eligible cells within reach of the path, closest first
fn build_sites(game: &Game) -> Vec<Vec2> {
    let level = game.level();
    let waypoints = &level.path().waypoints;
    let mut sites: Vec<(f32, Vec2)> = level
        .grid()
        .spots()
        .iter()
        .map(|&spot| (distance_to_polyline(spot, waypoints), spot))
        .filter(|&(d, _)| d > level.settings().cell_size / 2.0 && d < 120.0)
        .collect();
    sites.sort_by(|a, b| a.0.total_cmp(&b.0));
    sites.into_iter().map(|(_, spot)| spot).collect()
}

fn distance_to_polyline(point: Vec2, points: &[Vec2]) -> f32 {
    if points.len() < 2 {
        return points.first().map_or(f32::INFINITY, |p| p.distance(point));
    }
    points
        .windows(2)
        .map(|seg| {
            let (a, b) = (seg[0], seg[1]);
            let ab = b - a;
            let t = if ab.length_squared() > 0.0 {
                ((point - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0)
            } else {
                0.0
            };
            point.distance(a + ab * t)
        })
        .fold(f32::INFINITY, f32::min)
}

/// Builds along the road in a fixed order, then spends spare money on upgrades
struct Autoplayer {
    sites: Vec<Vec2>,
    built: usize,
}

impl Autoplayer {
    fn think(&mut self, game: &mut Game) {
        let level = game.level();
        let money = level.money();

        if self.built < self.sites.len() && money >= level.settings().tower_cost {
            let key = BUILD_KEYS[self.built % BUILD_KEYS.len()];
            if let Some(select) = InputCommand::from_key(key) {
                game.handle(select);
            }
            game.handle(InputCommand::Place(self.sites[self.built]));
            self.built += 1;
            return;
        }

        // Cheapest shooting tower we can afford to level up
        let candidate = level
            .towers()
            .iter()
            .filter(|t| t.kind.targeting().is_some())
            .min_by_key(|t| t.level)
            .filter(|t| money >= t.upgrade_cost(level.settings()))
            .map(|t| t.pos);
        if let Some(pos) = candidate {
            game.handle(InputCommand::Upgrade(pos));
        }
    }
}
