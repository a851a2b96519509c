//! Spawn and difficulty scheduling
//!
//! Two independent timers run while PLAYING: the difficulty timer advances
//! the stage table (spawn cadence shrinks, weights shift toward the heavier
//! variants), and the spawn timer emits one enemy per expiry at a random
//! screen edge.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, GameEvent, GameState, SoundEffect};
use crate::config::{DifficultyStage, EnemyStats, GameConfig};

/// Stats row for an enemy variant
pub fn enemy_stats<'a>(cfg: &'a GameConfig, kind: EnemyKind) -> &'a EnemyStats {
    match kind {
        EnemyKind::Circle => &cfg.enemy_circle,
        EnemyKind::Triangle => &cfg.enemy_triangle,
        EnemyKind::Square => &cfg.enemy_square,
    }
}

/// Map a uniform draw `r in [0,1)` onto the stage's weight partition.
///
/// Weights need not sum to 1; any remainder falls to Square.
pub fn pick_kind(stage: &DifficultyStage, r: f32) -> EnemyKind {
    if r < stage.circle_weight {
        EnemyKind::Circle
    } else if r < stage.circle_weight + stage.triangle_weight {
        EnemyKind::Triangle
    } else {
        EnemyKind::Square
    }
}

/// Advance both scheduler timers one tick
pub fn update_scheduler(state: &mut GameState, cfg: &GameConfig) {
    state.difficulty_timer += 1;
    let level_up_ticks = cfg.difficulty.level_up_interval_secs * cfg.game.fps;
    if state.difficulty_timer >= level_up_ticks {
        state.difficulty_timer = 0;
        if state.difficulty_level < cfg.max_difficulty_level() {
            state.difficulty_level += 1;
            let stage = cfg.stage(state.difficulty_level);
            state.spawn_delay = stage.spawn_delay;
            state.difficulty_flash = 1.0;
            let name = stage.name.clone();
            log::info!("difficulty up: level {} ({})", state.difficulty_level, name);
            state.push_sound(SoundEffect::DifficultyUp);
            state.push_event(GameEvent::StageBanner { name });
        }
    }

    state.spawn_timer += 1;
    if state.spawn_timer >= state.spawn_delay {
        state.spawn_timer = 0;
        let enemy = spawn_enemy(state, cfg);
        log::debug!(
            "spawned {:?} at ({:.0}, {:.0})",
            enemy.kind,
            enemy.aabb.pos.x,
            enemy.aabb.pos.y
        );
        state.enemies.push(enemy);
    }
}

/// Create one enemy just outside a random screen edge, variant chosen by the
/// active stage's weights, with the stage's damage overrides applied
pub fn spawn_enemy(state: &mut GameState, cfg: &GameConfig) -> Enemy {
    let stage = cfg.stage(state.difficulty_level);
    let roll: f32 = state.rng.random();
    let kind = pick_kind(stage, roll);
    let stats = enemy_stats(cfg, kind);
    let field = GameState::field(cfg);
    let size = stats.size;

    // 0=top, 1=right, 2=bottom, 3=left; offset by the enemy's own size so it
    // spawns fully off-screen
    let pos = match state.rng.random_range(0..4u32) {
        0 => Vec2::new(state.rng.random_range(0.0..field.x), -size),
        1 => Vec2::new(field.x, state.rng.random_range(0.0..field.y)),
        2 => Vec2::new(state.rng.random_range(0.0..field.x), field.y),
        _ => Vec2::new(-size, state.rng.random_range(0.0..field.y)),
    };

    let mut enemy = Enemy::new(kind, pos, stats, &mut state.rng);
    if let Some(damage) = stage.bullet_damage_override {
        enemy.bullet_damage = damage;
    }
    if let Some(damage) = stage.collision_damage_override {
        enemy.collision_damage = damage;
    }
    enemy
}
