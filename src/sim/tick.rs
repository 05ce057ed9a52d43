//! Fixed timestep simulation tick
//!
//! One call advances a level by one frame. The order is fixed: spawn,
//! resolve collisions (against last tick's positions), move hostiles, run
//! towers, move projectiles, drop the dead, then check wave completion.

use super::hostile::Advance;
use super::level::{Level, LevelEvent};
use super::projectile::Projectile;
use super::tower::TowerAction;

impl Level {
    /// Advance one tick; `now_ms` is the monotonic simulation clock
    pub fn update(&mut self, now_ms: u64) {
        tick(self, now_ms);
    }
}

/// Advance the level by one tick
pub fn tick(level: &mut Level, now_ms: u64) {
    level.clock_ms = now_ms;

    spawn_due(level, now_ms);
    resolve_collisions(level);
    advance_hostiles(level);
    run_towers(level, now_ms);
    for projectile in &mut level.projectiles {
        projectile.update(&level.settings);
    }

    level.hostiles.retain(|h| h.is_alive());
    level.projectiles.retain(|p| p.is_alive());

    check_wave_complete(level, now_ms);
}

fn spawn_due(level: &mut Level, now_ms: u64) {
    if level.wave_has_pending_spawns()
        && now_ms.saturating_sub(level.last_spawn_ms) > level.settings.spawn_delay_ms
    {
        level.spawn_next(now_ms);
    }
}

/// Every projectile damages every live hostile it overlaps, then is spent
fn resolve_collisions(level: &mut Level) {
    for projectile in level.projectiles.iter_mut().filter(|p| p.is_alive()) {
        let bounds = projectile.bounds();
        let mut hit = false;
        for hostile in level.hostiles.iter_mut().filter(|h| h.is_alive()) {
            if !bounds.overlaps(&hostile.bounds()) {
                continue;
            }
            hit = true;
            let killed = hostile.take_damage(projectile.damage);
            level.events.push(LevelEvent::HostileHit {
                id: hostile.id,
                damage: projectile.damage,
            });
            if killed {
                log::debug!("Hostile {} destroyed by projectile {}", hostile.id, projectile.id);
                level.events.push(LevelEvent::HostileKilled { id: hostile.id });
            }
        }
        if hit {
            projectile.consume();
        }
    }
}

fn advance_hostiles(level: &mut Level) {
    for hostile in level.hostiles.iter_mut() {
        if hostile.advance() != Advance::Breakthrough {
            continue;
        }
        level.lives = level.lives.saturating_sub(1);
        level.events.push(LevelEvent::Breakthrough { id: hostile.id });
        if !level.game_over {
            level.game_over = true;
            log::info!("Hostile {} broke through, game over", hostile.id);
            level.events.push(LevelEvent::GameOver);
        }
    }
}

fn run_towers(level: &mut Level, now_ms: u64) {
    let Level {
        towers,
        hostiles,
        projectiles,
        economy,
        settings,
        events,
        ids,
        ..
    } = level;

    for tower in towers.iter_mut() {
        match tower.update(now_ms, hostiles.as_slice(), economy, settings) {
            TowerAction::Idle => {}
            TowerAction::Fired(shot) => {
                let id = ids.next_id();
                projectiles.push(Projectile::new(
                    id,
                    tower.id,
                    shot.origin,
                    shot.target,
                    settings.projectile_speed,
                    shot.damage,
                ));
                log::debug!("Tower {} fired at hostile {}", tower.id, shot.target_id);
                events.push(LevelEvent::ProjectileFired {
                    tower: tower.id,
                    projectile: id,
                });
            }
            TowerAction::Paid(amount) => {
                log::debug!("Money generated: +${}", amount);
                events.push(LevelEvent::MoneyGenerated {
                    tower: tower.id,
                    amount,
                });
            }
        }
    }
}

/// A wave is done once it has released everything and nothing is alive
fn check_wave_complete(level: &mut Level, now_ms: u64) {
    if level.all_waves_complete || level.wave_has_pending_spawns() || !level.hostiles.is_empty() {
        return;
    }
    if level.current_wave + 1 < level.waves.len() {
        level.current_wave += 1;
        level.start_wave(now_ms);
    } else {
        level.all_waves_complete = true;
        log::info!("All {} waves complete", level.waves.len());
        level.events.push(LevelEvent::AllWavesComplete);
    }
}
