//! Combat and pickup resolution
//!
//! Runs once per tick, strictly after all entity updates, in a fixed order:
//! player bullets vs enemies, enemy bullets vs player, enemy rams vs player,
//! pickups vs player. The order is a correctness requirement - bullets must
//! be evaluated against enemies before corpses are used for drop rolls, and
//! a game-over transition stops the remaining steps for that tick.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Enemy, EnemyKind, GameEvent, GamePhase, GameState, Particle, Pickup, PickupKind, ScorePopup,
    SoundEffect,
};
use crate::config::GameConfig;

/// Resolve all collisions and resulting state mutations for this tick
pub fn resolve(state: &mut GameState, cfg: &GameConfig) {
    player_bullets_vs_enemies(state, cfg);

    enemy_bullets_vs_player(state, cfg);
    if state.phase == GamePhase::GameOver {
        return;
    }

    enemies_vs_player(state, cfg);
    if state.phase == GamePhase::GameOver {
        return;
    }

    pickups_vs_player(state, cfg);
}

/// Step 1: each live player bullet against every live enemy. A bullet dies on
/// any intersection and damages every enemy it overlapped that tick.
fn player_bullets_vs_enemies(state: &mut GameState, cfg: &GameConfig) {
    let mut i = 0;
    while i < state.player_bullets.len() {
        let bullet_box = state.player_bullets[i].aabb;
        let damage = state.player_bullets[i].damage;
        let mut hit = false;
        let mut lethal = false;
        for enemy in state.enemies.iter_mut() {
            if enemy.health > 0 && bullet_box.intersects(&enemy.aabb) {
                hit = true;
                if enemy.take_damage(damage) {
                    lethal = true;
                }
            }
        }
        if hit {
            state.player_bullets.remove(i);
            if !lethal {
                state.push_sound(SoundEffect::Hit);
            }
        } else {
            i += 1;
        }
    }

    // Pull out the corpses, then run kill bookkeeping (score, energy, drops)
    // on each - drop rolls must not see enemies that died this step as alive
    let mut corpses = Vec::new();
    let mut i = 0;
    while i < state.enemies.len() {
        if state.enemies[i].health <= 0 {
            corpses.push(state.enemies.remove(i));
        } else {
            i += 1;
        }
    }
    for corpse in corpses {
        on_enemy_killed(state, cfg, corpse);
    }
}

/// Kill bookkeeping for one enemy destroyed by player fire; signalled exactly
/// once per enemy
fn on_enemy_killed(state: &mut GameState, cfg: &GameConfig, enemy: Enemy) {
    let center = enemy.aabb.center();
    let powered = state.player.powered_up;

    let gain = if powered {
        enemy.score_value * cfg.powerup.score_multiplier
    } else {
        enemy.score_value
    };
    state.score += gain;
    state.popups.push(ScorePopup {
        pos: center,
        amount: gain,
        life: cfg.effects.popup_life,
    });
    state.add_energy(enemy.energy_charge);

    log::debug!("{:?} destroyed, +{} (score {})", enemy.kind, gain, state.score);
    state.push_sound(SoundEffect::Explosion);
    spawn_explosion(state, cfg, center);
    shake(state, cfg);

    let mut drop_chance = enemy.health_pack_drop_chance;
    if powered {
        drop_chance *= cfg.powerup.drop_chance_multiplier;
    }
    if state.rng.random::<f32>() < drop_chance {
        state
            .pickups
            .push(Pickup::new(PickupKind::HealthPack, center, cfg));
    }

    // Squares are the one source of power-up pickups; pointless to drop one
    // while the buff is already running
    if enemy.kind == EnemyKind::Square
        && !powered
        && state.rng.random::<f32>() < cfg.powerup.drop_chance
    {
        state
            .pickups
            .push(Pickup::new(PickupKind::PowerUp, center, cfg));
    }
}

/// Step 2: sum and apply all enemy bullets overlapping the player.
/// While invincible the bullets still die, with no further effect.
fn enemy_bullets_vs_player(state: &mut GameState, cfg: &GameConfig) {
    let player_box = state.player.aabb;
    let mut total_damage = 0;
    state.enemy_bullets.retain(|bullet| {
        if bullet.aabb.intersects(&player_box) {
            total_damage += bullet.damage;
            false
        } else {
            true
        }
    });

    if total_damage > 0 && !state.player.invincible {
        hit_player(state, cfg, total_damage);
    }
}

/// Step 3: enemies ramming the player. Colliding enemies are destroyed
/// without kill rewards; while invincible nothing happens at all.
fn enemies_vs_player(state: &mut GameState, cfg: &GameConfig) {
    if state.player.invincible {
        return;
    }
    let player_box = state.player.aabb;
    let mut total_damage = 0;
    let mut impacts: Vec<Vec2> = Vec::new();
    state.enemies.retain(|enemy| {
        if enemy.aabb.intersects(&player_box) {
            total_damage += enemy.collision_damage;
            impacts.push(enemy.aabb.center());
            false
        } else {
            true
        }
    });

    if total_damage > 0 {
        for center in impacts {
            state.push_sound(SoundEffect::Explosion);
            spawn_explosion(state, cfg, center);
        }
        hit_player(state, cfg, total_damage);
    }
}

/// Step 4: pickups overlapping the player
fn pickups_vs_player(state: &mut GameState, cfg: &GameConfig) {
    let player_box = state.player.aabb;
    let mut collected = Vec::new();
    state.pickups.retain(|pickup| {
        if pickup.aabb.intersects(&player_box) {
            collected.push((pickup.kind, pickup.aabb.center()));
            false
        } else {
            true
        }
    });

    for (kind, center) in collected {
        match kind {
            PickupKind::HealthPack => {
                if state.player.health >= cfg.player.max_health {
                    // Already full: flat bonus score instead of healing
                    let bonus = cfg.health_pack.full_health_bonus;
                    state.score += bonus;
                    state.popups.push(ScorePopup {
                        pos: center,
                        amount: bonus,
                        life: cfg.effects.popup_life,
                    });
                } else {
                    state.player.heal(cfg.health_pack.heal_amount, cfg);
                }
                state.push_sound(SoundEffect::Heal);
            }
            PickupKind::PowerUp => {
                state.player.activate_powerup(cfg);
                state.push_sound(SoundEffect::PowerupActivate);
                log::info!("power-up pickup collected");
            }
        }
    }
}

/// Apply accumulated damage to the player with hit feedback; handles the
/// GAME_OVER transition on death
fn hit_player(state: &mut GameState, cfg: &GameConfig, damage: i32) {
    let dead = state.player.take_damage(damage, cfg);
    state.push_sound(SoundEffect::Hit);
    shake(state, cfg);
    if dead {
        game_over(state, cfg);
    }
}

fn game_over(state: &mut GameState, cfg: &GameConfig) {
    let score = state.score;
    let level = state.difficulty_level as u32;
    let ticks = state.time_ticks;
    state.highscores.add_score(score, level, ticks);
    state.phase = GamePhase::GameOver;
    state.push_sound(SoundEffect::GameOver);
    log::info!(
        "game over: score {} after {:.1}s (high score {})",
        score,
        state.play_time_secs(cfg),
        state.high_score()
    );
}

fn spawn_explosion(state: &mut GameState, cfg: &GameConfig, center: Vec2) {
    let fx = &cfg.effects;
    for _ in 0..fx.particle_count {
        let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
        let speed = state.rng.random_range(0.3..1.0) * fx.particle_speed;
        state.particles.push(Particle {
            pos: center,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: fx.particle_life,
        });
    }
}

fn shake(state: &mut GameState, cfg: &GameConfig) {
    state.screen_shake = cfg.effects.shake_magnitude;
    state.push_event(GameEvent::ScreenShake {
        magnitude: cfg.effects.shake_magnitude,
        duration: cfg.effects.shake_duration,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Aabb;
    use crate::sim::state::Bullet;

    fn setup() -> (GameConfig, GameState) {
        let cfg = GameConfig::default();
        let mut state = GameState::new(&cfg, 99);
        state.reset_run(&cfg);
        (cfg, state)
    }

    fn enemy_at(state: &mut GameState, cfg: &GameConfig, kind: EnemyKind, center: Vec2) -> usize {
        let stats = super::super::spawn::enemy_stats(cfg, kind);
        let mut enemy = Enemy::new(kind, Vec2::ZERO, stats, &mut state.rng);
        enemy.aabb = Aabb::from_center(center, enemy.aabb.size);
        state.enemies.push(enemy);
        state.enemies.len() - 1
    }

    #[test]
    fn bullet_dies_with_enemy_and_pays_out() {
        let (cfg, mut state) = setup();
        let center = Vec2::new(100.0, 100.0);
        let idx = enemy_at(&mut state, &cfg, EnemyKind::Circle, center);
        state.enemies[idx].health = 10;
        let charge = state.enemies[idx].energy_charge;
        let points = state.enemies[idx].score_value;
        state
            .player_bullets
            .push(Bullet::new(center, Vec2::ZERO, false, 10));

        resolve(&mut state, &cfg);

        assert!(state.player_bullets.is_empty());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, points);
        assert!((state.energy - charge).abs() < 1e-6);
        assert_eq!(state.popups.len(), 1);
        assert_eq!(state.popups[0].amount, points);
        assert!(!state.particles.is_empty());
        let events = state.take_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Explosion)));
    }

    #[test]
    fn non_lethal_hit_keeps_enemy() {
        let (cfg, mut state) = setup();
        let center = Vec2::new(100.0, 100.0);
        let idx = enemy_at(&mut state, &cfg, EnemyKind::Circle, center);
        let health = state.enemies[idx].health;
        state
            .player_bullets
            .push(Bullet::new(center, Vec2::ZERO, false, 10));

        resolve(&mut state, &cfg);

        assert!(state.player_bullets.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].health, health - 10);
        assert!(state.enemies[0].hit_flash > 0);
        assert_eq!(state.score, 0);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Hit)));
    }

    #[test]
    fn one_bullet_damages_every_overlapped_enemy() {
        let (cfg, mut state) = setup();
        let center = Vec2::new(100.0, 100.0);
        enemy_at(&mut state, &cfg, EnemyKind::Circle, center);
        enemy_at(&mut state, &cfg, EnemyKind::Circle, center + Vec2::new(4.0, 0.0));
        state
            .player_bullets
            .push(Bullet::new(center, Vec2::ZERO, false, 10));

        resolve(&mut state, &cfg);

        assert_eq!(state.player_bullets.len(), 0);
        for enemy in &state.enemies {
            assert_eq!(enemy.health, cfg.enemy_circle.health - 10);
        }
    }

    #[test]
    fn powered_kill_doubles_score() {
        let (cfg, mut state) = setup();
        state.player.activate_powerup(&cfg);
        let center = Vec2::new(100.0, 100.0);
        let idx = enemy_at(&mut state, &cfg, EnemyKind::Triangle, center);
        state.enemies[idx].health = 1;
        let points = state.enemies[idx].score_value;
        state
            .player_bullets
            .push(Bullet::new(center, Vec2::ZERO, false, 10));

        resolve(&mut state, &cfg);

        assert_eq!(state.score, points * cfg.powerup.score_multiplier);
    }

    #[test]
    fn enemy_bullets_vanish_harmlessly_while_invincible() {
        let (cfg, mut state) = setup();
        state.player.invincible = true;
        state.player.invincible_timer = 60;
        let health = state.player.health;
        let center = state.player.aabb.center();
        state
            .enemy_bullets
            .push(Bullet::new(center, Vec2::ZERO, true, 100));

        resolve(&mut state, &cfg);

        assert!(state.enemy_bullets.is_empty());
        assert_eq!(state.player.health, health);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn enemy_bullet_damage_is_summed() {
        let (cfg, mut state) = setup();
        let center = state.player.aabb.center();
        state.enemy_bullets.push(Bullet::new(center, Vec2::ZERO, true, 1));
        state.enemy_bullets.push(Bullet::new(center, Vec2::ZERO, true, 1));
        let health = state.player.health;

        resolve(&mut state, &cfg);

        assert_eq!(state.player.health, health - 2);
        assert!(state.player.invincible);
    }

    #[test]
    fn ramming_enemy_is_destroyed_without_rewards() {
        let (cfg, mut state) = setup();
        let center = state.player.aabb.center();
        enemy_at(&mut state, &cfg, EnemyKind::Circle, center);
        let health = state.player.health;

        resolve(&mut state, &cfg);

        assert!(state.enemies.is_empty());
        assert_eq!(state.player.health, health - cfg.enemy_circle.collision_damage);
        assert_eq!(state.score, 0);
        assert_eq!(state.energy, 0.0);
    }

    #[test]
    fn death_in_bullet_step_skips_ram_step() {
        let (cfg, mut state) = setup();
        state.player.health = 1;
        let center = state.player.aabb.center();
        state.enemy_bullets.push(Bullet::new(center, Vec2::ZERO, true, 1));
        // An enemy also overlaps; it must survive the tick untouched because
        // the lethal bullet ends resolution first
        enemy_at(&mut state, &cfg, EnemyKind::Circle, center);

        resolve(&mut state, &cfg);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn death_records_high_score_iff_greater() {
        let (cfg, mut state) = setup();
        state.highscores.add_score(500, 0, 0);
        state.score = 300;
        state.player.health = 1;
        let center = state.player.aabb.center();
        state.enemy_bullets.push(Bullet::new(center, Vec2::ZERO, true, 1));

        resolve(&mut state, &cfg);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score(), 500);

        // A better run raises it
        state.reset_run(&cfg);
        state.score = 800;
        state.player.health = 1;
        let center = state.player.aabb.center();
        state.enemy_bullets.push(Bullet::new(center, Vec2::ZERO, true, 1));
        resolve(&mut state, &cfg);
        assert_eq!(state.high_score(), 800);
    }

    #[test]
    fn health_pack_heals_when_hurt() {
        let (cfg, mut state) = setup();
        state.player.health = 1;
        let center = state.player.aabb.center();
        state
            .pickups
            .push(Pickup::new(PickupKind::HealthPack, center, &cfg));

        resolve(&mut state, &cfg);

        assert!(state.pickups.is_empty());
        assert_eq!(state.player.health, 1 + cfg.health_pack.heal_amount);
        assert_eq!(state.score, 0);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Heal)));
    }

    #[test]
    fn health_pack_at_full_health_pays_bonus_instead() {
        let (cfg, mut state) = setup();
        assert_eq!(state.player.health, cfg.player.max_health);
        let center = state.player.aabb.center();
        state
            .pickups
            .push(Pickup::new(PickupKind::HealthPack, center, &cfg));

        resolve(&mut state, &cfg);

        assert_eq!(state.player.health, cfg.player.max_health);
        assert_eq!(state.score, cfg.health_pack.full_health_bonus);
        assert_eq!(state.popups.len(), 1);
    }

    #[test]
    fn powerup_pickup_activates_immediately() {
        let (cfg, mut state) = setup();
        state.energy = 0.4;
        let center = state.player.aabb.center();
        state
            .pickups
            .push(Pickup::new(PickupKind::PowerUp, center, &cfg));

        resolve(&mut state, &cfg);

        assert!(state.player.powered_up);
        // Pickup activation does not spend banked energy
        assert!((state.energy - 0.4).abs() < 1e-6);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::PowerupActivate)));
    }

    #[test]
    fn health_pack_drop_respects_probability_extremes() {
        let (mut cfg, mut state) = setup();
        cfg.enemy_circle.health_pack_drop_chance = 1.0;
        let center = Vec2::new(100.0, 100.0);
        let idx = enemy_at(&mut state, &cfg, EnemyKind::Circle, center);
        state.enemies[idx].health = 1;
        state.enemies[idx].health_pack_drop_chance = 1.0;
        state
            .player_bullets
            .push(Bullet::new(center, Vec2::ZERO, false, 10));
        resolve(&mut state, &cfg);
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.pickups[0].kind, PickupKind::HealthPack);

        // Chance zero never drops
        let idx = enemy_at(&mut state, &cfg, EnemyKind::Circle, center);
        state.enemies[idx].health = 1;
        state.enemies[idx].health_pack_drop_chance = 0.0;
        state.pickups.clear();
        state
            .player_bullets
            .push(Bullet::new(center, Vec2::ZERO, false, 10));
        resolve(&mut state, &cfg);
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn square_kill_drops_powerup_pickup() {
        let (mut cfg, mut state) = setup();
        cfg.powerup.drop_chance = 1.0;
        let center = Vec2::new(100.0, 100.0);
        let idx = enemy_at(&mut state, &cfg, EnemyKind::Square, center);
        state.enemies[idx].health = 1;
        state.enemies[idx].health_pack_drop_chance = 0.0;
        state
            .player_bullets
            .push(Bullet::new(center, Vec2::ZERO, false, 10));

        resolve(&mut state, &cfg);

        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.pickups[0].kind, PickupKind::PowerUp);
    }

    #[test]
    fn no_powerup_drop_while_already_powered() {
        let (mut cfg, mut state) = setup();
        cfg.powerup.drop_chance = 1.0;
        state.player.activate_powerup(&cfg);
        let center = Vec2::new(100.0, 100.0);
        let idx = enemy_at(&mut state, &cfg, EnemyKind::Square, center);
        state.enemies[idx].health = 1;
        state.enemies[idx].health_pack_drop_chance = 0.0;
        state
            .player_bullets
            .push(Bullet::new(center, Vec2::ZERO, false, 10));

        resolve(&mut state, &cfg);

        assert!(state.enemies.is_empty());
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn powered_kill_multiplies_health_pack_chance() {
        let (cfg, mut state) = setup();
        // 0.5 base chance doubled by the powered multiplier: guaranteed drop
        assert_eq!(cfg.powerup.drop_chance_multiplier, 2.0);
        state.player.activate_powerup(&cfg);
        let center = Vec2::new(100.0, 100.0);
        let idx = enemy_at(&mut state, &cfg, EnemyKind::Circle, center);
        state.enemies[idx].health = 1;
        state.enemies[idx].health_pack_drop_chance = 0.5;
        state
            .player_bullets
            .push(Bullet::new(center, Vec2::ZERO, false, 10));

        resolve(&mut state, &cfg);

        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.pickups[0].kind, PickupKind::HealthPack);
    }
}
