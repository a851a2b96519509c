//! Game balance configuration
//!
//! Everything tunable lives here: player stats, per-enemy-type stats, the
//! difficulty stage table, power-up parameters, and feedback tuning. A config
//! is constructed once at startup (from JSON or [`Default`]) and passed by
//! reference into the simulation - there is no global config state.

use serde::{Deserialize, Serialize};

/// Playfield and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Playfield width in pixels
    pub width: f32,
    /// Playfield height in pixels
    pub height: f32,
    /// Logical ticks per second
    pub fps: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: crate::consts::DEFAULT_FIELD_WIDTH,
            height: crate::consts::DEFAULT_FIELD_HEIGHT,
            fps: crate::consts::DEFAULT_FPS,
        }
    }
}

/// Player tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: i32,
    /// Movement speed, pixels per tick
    pub speed: f32,
    /// Frames between shots
    pub shoot_delay: u32,
    /// Bullet speed, pixels per tick
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    /// Bounding box (width, height)
    pub width: f32,
    pub height: f32,
    /// Post-hit invincibility window, frames
    pub invincible_frames: u32,
    /// While invincible the ship is hidden every other interval of this
    /// many frames (renderer flicker)
    pub flicker_interval: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 3,
            speed: 5.0,
            shoot_delay: 10,
            bullet_speed: 10.0,
            bullet_damage: 10,
            width: 50.0,
            height: 40.0,
            invincible_frames: 90,
            flicker_interval: 4,
        }
    }
}

/// Stats for one enemy variant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    /// Bounding box edge length (enemies are square boxes)
    pub size: f32,
    pub health: i32,
    /// Seek speed, pixels per tick
    pub speed: f32,
    /// Shoot cooldown is re-drawn uniformly from this range, frames
    pub shoot_cooldown_min: u32,
    pub shoot_cooldown_max: u32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    /// Damage dealt by ramming the player
    pub collision_damage: i32,
    pub points: u64,
    /// Probability in [0,1] of dropping a health pack on death
    pub health_pack_drop_chance: f32,
    /// Energy added to the power-up meter per kill
    pub energy_charge: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        // Circle: slow, numerous, weak
        Self {
            size: 40.0,
            health: 30,
            speed: 1.0,
            shoot_cooldown_min: 120,
            shoot_cooldown_max: 240,
            bullet_speed: 3.0,
            bullet_damage: 1,
            collision_damage: 1,
            points: 10,
            health_pack_drop_chance: 0.05,
            energy_charge: 0.15,
        }
    }
}

impl EnemyStats {
    fn triangle() -> Self {
        // Triangle: fast flanker
        Self {
            size: 40.0,
            health: 20,
            speed: 3.0,
            shoot_cooldown_min: 30,
            shoot_cooldown_max: 60,
            bullet_speed: 4.0,
            bullet_damage: 1,
            collision_damage: 1,
            points: 20,
            health_pack_drop_chance: 0.1,
            energy_charge: 0.2,
        }
    }

    fn square() -> Self {
        // Square: slow tank
        Self {
            size: 50.0,
            health: 60,
            speed: 0.5,
            shoot_cooldown_min: 90,
            shoot_cooldown_max: 150,
            bullet_speed: 2.5,
            bullet_damage: 2,
            collision_damage: 2,
            points: 50,
            health_pack_drop_chance: 0.15,
            energy_charge: 0.3,
        }
    }
}

/// Health pack pickup tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthPackConfig {
    pub size: f32,
    pub heal_amount: i32,
    /// Downward drift, pixels per tick
    pub drift_speed: f32,
    pub lifetime_secs: u32,
    /// Frames per pulse-animation cycle
    pub pulse_interval: u32,
    /// Score awarded instead of healing when already at full health
    pub full_health_bonus: u64,
}

impl Default for HealthPackConfig {
    fn default() -> Self {
        Self {
            size: 24.0,
            heal_amount: 1,
            drift_speed: 0.5,
            lifetime_secs: 10,
            pulse_interval: 30,
            full_health_bonus: 25,
        }
    }
}

/// Power-up tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupConfig {
    pub duration_secs: u32,
    /// Shot cooldown divisor while powered
    pub fire_rate_multiplier: f32,
    /// Score multiplier for kills while powered
    pub score_multiplier: u64,
    /// Health pack drop chance multiplier while powered
    pub drop_chance_multiplier: f32,
    /// Chance a destroyed Square drops a power-up pickup
    pub drop_chance: f32,
    /// Lateral offset of the two side bullets in the spread shot
    pub spread_offset: f32,
}

impl Default for PowerupConfig {
    fn default() -> Self {
        Self {
            duration_secs: 6,
            fire_rate_multiplier: 2.0,
            score_multiplier: 2,
            drop_chance_multiplier: 2.0,
            drop_chance: 0.05,
            spread_offset: 12.0,
        }
    }
}

/// Visual feedback tuning (particles, screen shake, score popups)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Particles spawned per enemy explosion
    pub particle_count: u32,
    /// Particle lifetime, frames
    pub particle_life: u32,
    /// Initial particle speed, pixels per tick
    pub particle_speed: f32,
    /// Per-tick particle velocity decay factor
    pub particle_drag: f32,
    pub shake_magnitude: f32,
    pub shake_duration: u32,
    /// Score popup lifetime, frames
    pub popup_life: u32,
    /// Score popup upward float, pixels per tick
    pub popup_rise: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            particle_count: 12,
            particle_life: 30,
            particle_speed: 4.0,
            particle_drag: 0.92,
            shake_magnitude: 4.0,
            shake_duration: 10,
            popup_life: 45,
            popup_rise: 0.7,
        }
    }
}

/// One row of the difficulty table
///
/// Active for a contiguous span of `difficulty_level`; controls spawn cadence
/// and enemy-type weights. Weights need not sum to 1 - any remainder falls to
/// Square. Damage overrides are optional; absence means "use the enemy type's
/// own base damage".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyStage {
    pub name: String,
    /// Frames between spawns while this stage is active
    pub spawn_delay: u32,
    pub circle_weight: f32,
    pub triangle_weight: f32,
    pub square_weight: f32,
    #[serde(default)]
    pub bullet_damage_override: Option<i32>,
    #[serde(default)]
    pub collision_damage_override: Option<i32>,
}

impl DifficultyStage {
    fn new(name: &str, spawn_delay: u32, cw: f32, tw: f32, sw: f32) -> Self {
        Self {
            name: name.to_string(),
            spawn_delay,
            circle_weight: cw,
            triangle_weight: tw,
            square_weight: sw,
            bullet_damage_override: None,
            collision_damage_override: None,
        }
    }
}

/// Difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Seconds between difficulty level-ups
    pub level_up_interval_secs: u32,
    /// Stage table, index 0 first; the last stage holds forever
    pub stages: Vec<DifficultyStage>,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        let mut overrun = DifficultyStage::new("Overrun", 30, 0.3, 0.35, 0.35);
        overrun.bullet_damage_override = Some(2);
        overrun.collision_damage_override = Some(2);
        Self {
            level_up_interval_secs: 20,
            stages: vec![
                DifficultyStage::new("Warmup", 90, 0.8, 0.2, 0.0),
                DifficultyStage::new("Skirmish", 75, 0.65, 0.3, 0.05),
                DifficultyStage::new("Assault", 60, 0.5, 0.35, 0.15),
                DifficultyStage::new("Onslaught", 45, 0.4, 0.35, 0.25),
                overrun,
            ],
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game: FieldConfig,
    pub player: PlayerConfig,
    pub enemy_circle: EnemyStats,
    pub enemy_triangle: EnemyStats,
    pub enemy_square: EnemyStats,
    pub health_pack: HealthPackConfig,
    pub powerup: PowerupConfig,
    pub effects: EffectsConfig,
    pub difficulty: DifficultyConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game: FieldConfig::default(),
            player: PlayerConfig::default(),
            enemy_circle: EnemyStats::default(),
            enemy_triangle: EnemyStats::triangle(),
            enemy_square: EnemyStats::square(),
            health_pack: HealthPackConfig::default(),
            powerup: PowerupConfig::default(),
            effects: EffectsConfig::default(),
            difficulty: DifficultyConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON; missing sections fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Maximum reachable difficulty level (last stage index)
    pub fn max_difficulty_level(&self) -> usize {
        self.difficulty.stages.len().saturating_sub(1)
    }

    /// Stage for a difficulty level, clamped to the table
    pub fn stage(&self, level: usize) -> &DifficultyStage {
        let idx = level.min(self.max_difficulty_level());
        &self.difficulty.stages[idx]
    }
}
