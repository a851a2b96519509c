//! Fixed timestep simulation tick
//!
//! One call to [`tick`] advances the whole game by one logical frame:
//! state-machine dispatch, player input, the spawn scheduler, entity
//! updates, combat resolution, and the power-up economy, in that order.

use glam::Vec2;

use super::combat;
use super::spawn;
use super::state::{GamePhase, GameState, SoundEffect};
use crate::config::GameConfig;

/// Input snapshot for a single tick: pressed-state booleans only, no raw
/// event stream. Movement and aim are independent key sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,

    pub aim_left: bool,
    pub aim_right: bool,
    pub aim_up: bool,
    pub aim_down: bool,

    /// Discrete power-up activation action
    pub activate: bool,
    /// Start (menu) / continue (game over)
    pub start: bool,
}

impl TickInput {
    /// Raw movement key vector, components in {-1, 0, 1}
    pub fn move_vector(&self) -> Vec2 {
        key_axis(self.move_left, self.move_right, self.move_up, self.move_down)
    }

    /// Raw aim key vector, components in {-1, 0, 1}
    pub fn aim_vector(&self) -> Vec2 {
        key_axis(self.aim_left, self.aim_right, self.aim_up, self.aim_down)
    }
}

fn key_axis(left: bool, right: bool, up: bool, down: bool) -> Vec2 {
    let x = (right as i32 - left as i32) as f32;
    let y = (down as i32 - up as i32) as f32;
    Vec2::new(x, y)
}

/// Advance the game by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, cfg: &GameConfig) {
    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.reset_run(cfg);
                state.push_sound(SoundEffect::MenuSelect);
                state.push_sound(SoundEffect::MusicRestart);
            }
        }
        GamePhase::Playing => playing_tick(state, input, cfg),
        GamePhase::GameOver => {
            if input.start {
                state.phase = GamePhase::Menu;
                state.push_sound(SoundEffect::MenuSelect);
            }
        }
    }
}

fn playing_tick(state: &mut GameState, input: &TickInput, cfg: &GameConfig) {
    decay_feedback(state);
    state.time_ticks += 1;
    let field = GameState::field(cfg);

    // Player movement and fire
    state.player.update(input.move_vector(), field);
    let shots = state.player.shoot(input.aim_vector(), cfg);
    if !shots.is_empty() {
        state.push_sound(SoundEffect::Shoot);
        state.player_bullets.extend(shots);
    }

    // Spawn scheduling and difficulty escalation
    spawn::update_scheduler(state, cfg);

    // Enemies seek and fire
    let player_center = state.player.aabb.center();
    let GameState {
        ref mut enemies,
        ref mut rng,
        ..
    } = *state;
    let mut enemy_shots = Vec::new();
    for enemy in enemies.iter_mut() {
        enemy.update(player_center);
        if let Some(bullet) = enemy.shoot(player_center, rng) {
            enemy_shots.push(bullet);
        }
    }
    for bullet in enemy_shots {
        state.push_sound(SoundEffect::EnemyShoot);
        state.enemy_bullets.push(bullet);
    }

    // Projectiles move, then die the tick their box fully exits the field
    for bullet in &mut state.player_bullets {
        bullet.update();
    }
    state.player_bullets.retain(|b| !b.aabb.outside(field));
    for bullet in &mut state.enemy_bullets {
        bullet.update();
    }
    state.enemy_bullets.retain(|b| !b.aabb.outside(field));

    // Pickups drift and expire
    for pickup in &mut state.pickups {
        pickup.update();
    }
    state.pickups.retain(|p| p.lifetime > 0);

    // Ephemeral visuals
    let drag = cfg.effects.particle_drag;
    for particle in &mut state.particles {
        particle.update(drag);
    }
    state.particles.retain(|p| p.life > 0);
    let rise = cfg.effects.popup_rise;
    for popup in &mut state.popups {
        popup.update(rise);
    }
    state.popups.retain(|p| p.life > 0);

    // Collisions; may transition to GAME_OVER, which freezes the rest of
    // the tick
    combat::resolve(state, cfg);
    if state.phase != GamePhase::Playing {
        return;
    }

    update_powerup_economy(state, input, cfg);
}

/// Full-charge activation and the powered-up countdown
fn update_powerup_economy(state: &mut GameState, input: &TickInput, cfg: &GameConfig) {
    if input.activate && state.energy >= 1.0 && !state.player.powered_up {
        state.energy = 0.0;
        state.player.activate_powerup(cfg);
        state.push_sound(SoundEffect::PowerupActivate);
        log::info!("power-up activated for {}s", cfg.powerup.duration_secs);
    } else if state.player.powered_up {
        // Countdown starts the tick after activation so the buff holds for
        // the full configured duration
        state.player.powerup_timer = state.player.powerup_timer.saturating_sub(1);
        if state.player.powerup_timer == 0 {
            state.player.deactivate_powerup(cfg);
            log::debug!("power-up expired");
        }
    }
}

fn decay_feedback(state: &mut GameState) {
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }
    state.difficulty_flash *= 0.95;
    if state.difficulty_flash < 0.01 {
        state.difficulty_flash = 0.0;
    }
}
