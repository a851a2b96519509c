//! Game state and entity types
//!
//! Everything the simulation mutates lives here. Entities carry their own
//! per-tick behavior (`update`, `shoot`, `take_damage`) but return side
//! effects as data - no entity performs collision detection, audio, or
//! drawing itself.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Aabb;
use crate::config::{EnemyStats, GameConfig};
use crate::highscores::HighScores;

/// Bullet bounding box edge length
pub const BULLET_SIZE: f32 = 8.0;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for the start input
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for the continue input
    GameOver,
}

/// Named sound requests emitted by the core; playback is the host's job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Shoot,
    EnemyShoot,
    Hit,
    Heal,
    Explosion,
    PowerupActivate,
    DifficultyUp,
    GameOver,
    MenuSelect,
    MusicRestart,
}

/// Transient feedback requests, drained once per tick by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    ScreenShake { magnitude: f32, duration: u32 },
    StageBanner { name: String },
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub aabb: Aabb,
    pub speed: f32,
    pub health: i32,
    /// Frames until the next shot is allowed
    pub shoot_cooldown: u32,
    /// Cooldown reset value; reduced while powered up
    pub shoot_delay: u32,
    pub powered_up: bool,
    pub powerup_timer: u32,
    pub invincible: bool,
    pub invincible_timer: u32,
}

impl Player {
    pub fn new(center: Vec2, cfg: &GameConfig) -> Self {
        let p = &cfg.player;
        Self {
            aabb: Aabb::from_center(center, Vec2::new(p.width, p.height)),
            speed: p.speed,
            health: p.max_health,
            shoot_cooldown: 0,
            shoot_delay: p.shoot_delay,
            powered_up: false,
            powerup_timer: 0,
            invincible: false,
            invincible_timer: 0,
        }
    }

    /// Advance movement and timers one tick
    ///
    /// `move_dir` is the raw (-1/0/1, -1/0/1) key vector; diagonals are
    /// normalized before scaling by speed, and the result is clamped to the
    /// playfield.
    pub fn update(&mut self, move_dir: Vec2, field: Vec2) {
        let dir = normalize_key_vector(move_dir);
        self.aabb.pos += dir * self.speed;
        self.aabb.clamp_to(field);

        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }
        if self.invincible {
            self.invincible_timer = self.invincible_timer.saturating_sub(1);
            if self.invincible_timer == 0 {
                self.invincible = false;
            }
        }
    }

    /// Fire toward the raw aim key vector, if any aim key is held and the
    /// cooldown allows. Returns the spawned bullets: one centered shot, or a
    /// three-way spread while powered up.
    pub fn shoot(&mut self, aim_dir: Vec2, cfg: &GameConfig) -> Vec<Bullet> {
        if self.shoot_cooldown > 0 || aim_dir == Vec2::ZERO {
            return Vec::new();
        }
        let dir = normalize_key_vector(aim_dir);
        let vel = dir * cfg.player.bullet_speed;
        let center = self.aabb.center();
        let damage = cfg.player.bullet_damage;

        let mut bullets = vec![Bullet::new(center, vel, false, damage)];
        if self.powered_up {
            // Side shots offset perpendicular to the aim direction
            let perp = Vec2::new(-dir.y, dir.x) * cfg.powerup.spread_offset;
            bullets.push(Bullet::new(center + perp, vel, false, damage));
            bullets.push(Bullet::new(center - perp, vel, false, damage));
        }
        self.shoot_cooldown = self.shoot_delay;
        bullets
    }

    /// Apply damage; a no-op while the invincibility window is open.
    /// Returns true when health has reached zero.
    pub fn take_damage(&mut self, amount: i32, cfg: &GameConfig) -> bool {
        if self.invincible {
            return false;
        }
        self.health = (self.health - amount).max(0);
        if self.health > 0 {
            self.invincible = true;
            self.invincible_timer = cfg.player.invincible_frames;
        }
        self.health <= 0
    }

    /// Heal without exceeding the configured maximum
    pub fn heal(&mut self, amount: i32, cfg: &GameConfig) {
        self.health = (self.health + amount).min(cfg.player.max_health);
    }

    pub fn activate_powerup(&mut self, cfg: &GameConfig) {
        self.powered_up = true;
        self.powerup_timer = cfg.powerup.duration_secs * cfg.game.fps;
        let reduced = (cfg.player.shoot_delay as f32 / cfg.powerup.fire_rate_multiplier) as u32;
        self.shoot_delay = reduced.max(1);
    }

    pub fn deactivate_powerup(&mut self, cfg: &GameConfig) {
        self.powered_up = false;
        self.powerup_timer = 0;
        self.shoot_delay = cfg.player.shoot_delay;
    }

    /// Renderer flag: the ship flickers while invincible, hidden on a
    /// periodic frame pattern
    pub fn visible_this_frame(&self, cfg: &GameConfig) -> bool {
        if !self.invincible {
            return true;
        }
        let interval = cfg.player.flicker_interval.max(1);
        (self.invincible_timer / interval) % 2 == 0
    }
}

/// Normalize a (-1/0/1, -1/0/1) key vector so diagonals aren't faster
fn normalize_key_vector(v: Vec2) -> Vec2 {
    if v.x != 0.0 && v.y != 0.0 {
        v * std::f32::consts::FRAC_1_SQRT_2
    } else {
        v
    }
}

/// Enemy variants; all three seek-and-shoot, differing only by stats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Circle,
    Triangle,
    Square,
}

/// A seek-and-shoot enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub aabb: Aabb,
    pub speed: f32,
    pub health: i32,
    pub shoot_cooldown: u32,
    shoot_cooldown_min: u32,
    shoot_cooldown_max: u32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    pub collision_damage: i32,
    pub score_value: u64,
    pub health_pack_drop_chance: f32,
    pub energy_charge: f32,
    /// Frames of flash-white remaining after a hit (renderer flag)
    pub hit_flash: u32,
}

/// Frames an enemy flashes white after taking a hit
const HIT_FLASH_FRAMES: u32 = 6;

impl Enemy {
    /// Build an enemy of `kind` with its top-left at `pos`
    pub fn new(kind: EnemyKind, pos: Vec2, stats: &EnemyStats, rng: &mut Pcg32) -> Self {
        Self {
            kind,
            aabb: Aabb::new(pos, Vec2::splat(stats.size)),
            speed: stats.speed,
            health: stats.health,
            shoot_cooldown: draw_cooldown(rng, stats.shoot_cooldown_min, stats.shoot_cooldown_max),
            shoot_cooldown_min: stats.shoot_cooldown_min,
            shoot_cooldown_max: stats.shoot_cooldown_max,
            bullet_speed: stats.bullet_speed,
            bullet_damage: stats.bullet_damage,
            collision_damage: stats.collision_damage,
            score_value: stats.points,
            health_pack_drop_chance: stats.health_pack_drop_chance,
            energy_charge: stats.energy_charge,
            hit_flash: 0,
        }
    }

    /// Seek the player one tick; zero distance moves nothing (no NaN)
    pub fn update(&mut self, player_center: Vec2) {
        let to_player = player_center - self.aabb.center();
        let dist = to_player.length();
        if dist > 0.0 {
            self.aabb.pos += to_player / dist * self.speed;
        }
        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }
        if self.hit_flash > 0 {
            self.hit_flash -= 1;
        }
    }

    /// Fire one bullet toward the player when the cooldown has expired,
    /// then re-draw the cooldown from the variant's range
    pub fn shoot(&mut self, player_center: Vec2, rng: &mut Pcg32) -> Option<Bullet> {
        if self.shoot_cooldown > 0 {
            return None;
        }
        let center = self.aabb.center();
        let to_player = player_center - center;
        let dist = to_player.length();
        if dist == 0.0 {
            return None;
        }
        self.shoot_cooldown = draw_cooldown(rng, self.shoot_cooldown_min, self.shoot_cooldown_max);
        let vel = to_player / dist * self.bullet_speed;
        Some(Bullet::new(center, vel, true, self.bullet_damage))
    }

    /// Apply damage; returns true when this kills the enemy
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.hit_flash = HIT_FLASH_FRAMES;
        self.health <= 0
    }
}

fn draw_cooldown(rng: &mut Pcg32, min: u32, max: u32) -> u32 {
    if min >= max {
        min
    } else {
        rng.random_range(min..=max)
    }
}

/// A projectile; owned by the player or an enemy
#[derive(Debug, Clone)]
pub struct Bullet {
    pub aabb: Aabb,
    pub vel: Vec2,
    pub enemy_owned: bool,
    pub damage: i32,
}

impl Bullet {
    pub fn new(center: Vec2, vel: Vec2, enemy_owned: bool, damage: i32) -> Self {
        Self {
            aabb: Aabb::from_center(center, Vec2::splat(BULLET_SIZE)),
            vel,
            enemy_owned,
            damage,
        }
    }

    pub fn update(&mut self) {
        self.aabb.pos += self.vel;
    }
}

/// Pickup variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    HealthPack,
    PowerUp,
}

/// A drifting pickup with a limited lifetime
#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    pub aabb: Aabb,
    pub drift_speed: f32,
    /// Frames until despawn
    pub lifetime: u32,
    /// Pulse-animation phase counter (renderer flag)
    pub pulse: u32,
}

impl Pickup {
    pub fn new(kind: PickupKind, center: Vec2, cfg: &GameConfig) -> Self {
        let hp = &cfg.health_pack;
        Self {
            kind,
            aabb: Aabb::from_center(center, Vec2::splat(hp.size)),
            drift_speed: hp.drift_speed,
            lifetime: hp.lifetime_secs * cfg.game.fps,
            pulse: 0,
        }
    }

    pub fn update(&mut self) {
        self.aabb.pos.y += self.drift_speed;
        self.lifetime = self.lifetime.saturating_sub(1);
        self.pulse = self.pulse.wrapping_add(1);
    }

    /// Renderer flag: pickups alternate bright and dim every pulse interval
    pub fn pulse_bright(&self, cfg: &GameConfig) -> bool {
        let interval = cfg.health_pack.pulse_interval.max(1);
        (self.pulse / interval) % 2 == 0
    }
}

/// Explosion debris; purely visual
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames remaining
    pub life: u32,
}

impl Particle {
    pub fn update(&mut self, drag: f32) {
        self.pos += self.vel;
        self.vel *= drag;
        self.life = self.life.saturating_sub(1);
    }
}

/// Floating score text; purely visual
#[derive(Debug, Clone)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub amount: u64,
    /// Frames remaining
    pub life: u32,
}

impl ScorePopup {
    pub fn update(&mut self, rise: f32) {
        self.pos.y -= rise;
        self.life = self.life.saturating_sub(1);
    }
}

/// Complete game state; all entity collections are owned here and mutated
/// only by [`super::tick::tick`]
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    pub particles: Vec<Particle>,
    pub popups: Vec<ScorePopup>,

    pub score: u64,
    /// Power-up meter in [0, 1]
    pub energy: f32,
    /// Ticks elapsed in the current run
    pub time_ticks: u64,

    // Spawn & difficulty scheduler state
    pub spawn_timer: u32,
    pub spawn_delay: u32,
    pub difficulty_timer: u32,
    pub difficulty_level: usize,

    /// Decaying stage-change flash intensity (renderer flag)
    pub difficulty_flash: f32,
    /// Decaying screen shake magnitude (renderer flag)
    pub screen_shake: f32,

    pub highscores: HighScores,

    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh state in the MENU phase
    pub fn new(cfg: &GameConfig, seed: u64) -> Self {
        let field_center = Vec2::new(cfg.game.width, cfg.game.height) * 0.5;
        Self {
            phase: GamePhase::Menu,
            player: Player::new(field_center, cfg),
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            popups: Vec::new(),
            score: 0,
            energy: 0.0,
            time_ticks: 0,
            spawn_timer: 0,
            spawn_delay: cfg.stage(0).spawn_delay,
            difficulty_timer: 0,
            difficulty_level: 0,
            difficulty_flash: 0.0,
            screen_shake: 0.0,
            highscores: HighScores::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Reset for a new run and enter PLAYING: clear every entity collection,
    /// recreate the player at the field center, zero score / timers /
    /// difficulty / energy
    pub fn reset_run(&mut self, cfg: &GameConfig) {
        let field_center = Vec2::new(cfg.game.width, cfg.game.height) * 0.5;
        self.player = Player::new(field_center, cfg);
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.pickups.clear();
        self.particles.clear();
        self.popups.clear();
        self.score = 0;
        self.energy = 0.0;
        self.time_ticks = 0;
        self.spawn_timer = 0;
        self.spawn_delay = cfg.stage(0).spawn_delay;
        self.difficulty_timer = 0;
        self.difficulty_level = 0;
        self.difficulty_flash = 0.0;
        self.screen_shake = 0.0;
        self.phase = GamePhase::Playing;
        log::info!("run started (seed {})", self.seed);
    }

    /// Playfield dimensions as a vector
    pub fn field(cfg: &GameConfig) -> Vec2 {
        Vec2::new(cfg.game.width, cfg.game.height)
    }

    /// Add kill energy, clamped to the meter
    pub fn add_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).clamp(0.0, 1.0);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn push_sound(&mut self, sound: SoundEffect) {
        self.events.push(GameEvent::Sound(sound));
    }

    /// Drain the events queued since the last call; the host forwards sounds
    /// to its audio sink and feedback to its renderer
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- read-only telemetry for an external HUD ---

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.highscores.top_score().unwrap_or(0)
    }

    pub fn play_time_secs(&self, cfg: &GameConfig) -> f32 {
        self.time_ticks as f32 / cfg.game.fps.max(1) as f32
    }

    pub fn difficulty_level(&self) -> usize {
        self.difficulty_level
    }
}
