//! Eco Shooter - A top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, world, spawning, collisions, game state)
//! - `game`: Top-level screen state machine and high score persistence
//! - `assets`: Capability-checked asset loading with placeholders
//! - `renderer`: Read-only render snapshot for a drawing collaborator
//! - `platform`: Frame clock
//! - `persistence`: High score storage backends

pub mod assets;
pub mod audio;
pub mod autopilot;
pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::{Game, Screen, Trigger};
pub use highscores::HighScore;
pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (pixels)
    pub const WINDOW_WIDTH: f32 = 1280.0;
    pub const WINDOW_HEIGHT: f32 = 720.0;
    /// Default frame rate target
    pub const TARGET_FPS: u32 = 60;
    /// Largest step the clock will hand to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_SIZE: (u32, u32) = (64, 48);
    pub const PLAYER_SPEED: f32 = 360.0;
    pub const PLAYER_LIVES: u8 = 5;
    pub const PLAYER_START_Y_OFFSET: f32 = 100.0;
    pub const SHIELD_DURATION_MS: u64 = 5000;
    pub const SHOOT_COOLDOWN_MS: u64 = 400;
    pub const MIN_SHOOT_COOLDOWN_MS: u64 = 150;
    pub const SOLAR_COOLDOWN_CUT_MS: u64 = 80;

    /// Hazard ("pollution") defaults
    pub const HAZARD_SIZE: (u32, u32) = (64, 64);
    pub const HAZARD_BASE_INTERVAL_MS: u64 = 900;
    pub const HAZARD_INTERVAL_STEP_MS: u64 = 45;
    pub const HAZARD_MIN_INTERVAL_MS: u64 = 160;
    pub const HAZARD_SPEED_RANGE: (i32, i32) = (180, 300);
    pub const HAZARD_SPEED_PER_LEVEL: f32 = 30.0;
    pub const HAZARD_SPIN_RANGE: (i32, i32) = (-120, 120);
    pub const HAZARD_EXIT_MARGIN: f32 = 100.0;

    /// Collectible ("green item") defaults
    pub const COLLECTIBLE_SIZE: u32 = 40;
    pub const COLLECTIBLE_BASE_INTERVAL_MS: u64 = 3000;
    pub const COLLECTIBLE_INTERVAL_STEP_MS: u64 = 100;
    pub const COLLECTIBLE_MIN_INTERVAL_MS: u64 = 900;
    pub const COLLECTIBLE_BASE_CHANCE: f64 = 0.7;
    pub const COLLECTIBLE_CHANCE_STEP: f64 = 0.05;
    pub const COLLECTIBLE_MIN_CHANCE: f64 = 0.18;
    pub const COLLECTIBLE_SPEED_RANGE: (i32, i32) = (130, 230);
    pub const COLLECTIBLE_SPEED_PER_LEVEL: f32 = 10.0;
    pub const COLLECTIBLE_EXIT_MARGIN: f32 = 50.0;

    /// Horizontal spawn band and spawn height for falling objects
    pub const SPAWN_MARGIN_X: i32 = 40;
    pub const SPAWN_Y: f32 = -40.0;

    /// Projectiles
    pub const LASER_SIZE: (u32, u32) = (8, 28);
    pub const LASER_SPEED: f32 = 700.0;
    pub const BOSS_BULLET_SIZE: (u32, u32) = (12, 20);
    pub const BOSS_BULLET_SPEED: f32 = 360.0;

    /// Boss defaults
    pub const BOSS_SIZE: (u32, u32) = (260, 120);
    pub const BOSS_MAX_HEALTH: i32 = 40;
    /// Boss animation rate (frames/s, while patrolling)
    pub const BOSS_ANIM_FPS: f32 = 6.0;
    pub const BOSS_SPAWN_TOP: f32 = -150.0;
    pub const BOSS_ENTER_SPEED: f32 = 80.0;
    pub const BOSS_ENTERED_TOP: f32 = 40.0;
    pub const BOSS_PATROL_SPEED: f32 = 120.0;
    pub const BOSS_PATROL_MARGIN: f32 = 40.0;
    pub const BOSS_FIRE_INTERVAL_MS: u64 = 1200;
    pub const BOSS_FIRE_SPREAD: f32 = 40.0;
    pub const BOSS_HAZARD_BASE_INTERVAL_MS: u64 = 2000;
    pub const BOSS_HAZARD_INTERVAL_STEP_MS: u64 = 50;
    pub const BOSS_HAZARD_MIN_INTERVAL_MS: u64 = 600;
    pub const BOSS_SCORE_THRESHOLD: u64 = 200;
    pub const BOSS_DIFFICULTY_THRESHOLD: u32 = 2;

    /// Difficulty
    pub const DIFFICULTY_PERIOD_MS: u64 = 10_000;

    /// Scoring
    pub const HAZARD_HIT_PENALTY: u64 = 15;
    pub const COLLECTIBLE_SCORE: u64 = 20;
    pub const RECYCLING_BONUS: u64 = 10;
    pub const HAZARD_DESTROY_SCORE: u64 = 10;
    pub const BOSS_DEFEAT_SCORE: u64 = 500;
    pub const LASER_DAMAGE: i32 = 5;

    /// Explosion animation
    pub const EXPLOSION_FPS: f32 = 24.0;
    pub const EXPLOSION_FALLBACK_RATE: f32 = 10.0;
    pub const EXPLOSION_FALLBACK_SIZE: u32 = 40;

    /// Background star field
    pub const STAR_COUNT: usize = 30;
    pub const STAR_SPEED_RANGE: (i32, i32) = (10, 60);

    /// Mask alpha threshold (pixels with alpha above this are solid)
    pub const MASK_ALPHA_THRESHOLD: u8 = 127;
}

/// Top-left pixel of a sprite of `size` centered at `center`
#[inline]
pub fn top_left(center: Vec2, size: (u32, u32)) -> IVec2 {
    IVec2::new(
        (center.x - size.0 as f32 / 2.0).round() as i32,
        (center.y - size.1 as f32 / 2.0).round() as i32,
    )
}

/// Integer interval shrinking linearly with difficulty, floored at `min`
#[inline]
pub fn scaled_interval(base: u64, step: u64, level: u32, min: u64) -> u64 {
    base.saturating_sub(step * level as u64).max(min)
}
