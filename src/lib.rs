//! Neon Swarm - simulation core for a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, combat, game state)
//! - `config`: Data-driven game balance, loadable from JSON
//! - `highscores`: In-memory leaderboard
//!
//! The core never draws and never plays audio. A host drives it by calling
//! [`sim::tick`] once per frame with an input snapshot, then reads the entity
//! collections on [`sim::GameState`] for rendering and drains
//! [`sim::GameEvent`]s for sound playback.

pub mod config;
pub mod highscores;
pub mod sim;

pub use config::GameConfig;
pub use highscores::HighScores;

/// Engine constants that are not tunable through [`GameConfig`]
pub mod consts {
    /// Logical ticks per second the simulation is designed for
    pub const DEFAULT_FPS: u32 = 60;

    /// Default playfield dimensions (pixels)
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;
}
