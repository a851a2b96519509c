//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, every draw goes through the state's generator
//! - Fixed resolution order (bullets vs enemies, enemy fire vs player,
//!   rams vs player, pickups vs player)
//! - No rendering or platform dependencies

pub mod combat;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use rect::Aabb;
pub use spawn::{enemy_stats, pick_kind, spawn_enemy};
pub use state::{
    Bullet, Enemy, EnemyKind, GameEvent, GamePhase, GameState, Particle, Pickup, PickupKind,
    Player, ScorePopup, SoundEffect, BULLET_SIZE,
};
pub use tick::{tick, TickInput};
