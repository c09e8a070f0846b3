//! Entity model
//!
//! Passive data plus a per-type update rule. Positions are sprite centers in
//! play-area pixels (y grows downward). No entity refers to another; effects
//! between entities go through the world.

use std::rc::Rc;

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::mask::Mask;
use crate::consts::*;

/// Stable handle to an entity slot in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Entity type tag, one per typed collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Hazard,
    Collectible,
    Laser,
    BossBullet,
    Boss,
    Explosion,
}

/// Outcome of a per-frame update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    /// Entity asks to be removed (left the play area, animation finished)
    Expired,
}

/// Anything that takes part in mask collision
pub trait Body {
    fn center(&self) -> Vec2;
    fn mask(&self) -> &Mask;

    /// Top-left pixel of the sprite bounds
    fn top_left(&self) -> IVec2 {
        crate::top_left(self.center(), self.mask().size())
    }

    fn top(&self) -> f32 {
        self.center().y - self.mask().height() as f32 / 2.0
    }

    fn bottom(&self) -> f32 {
        self.center().y + self.mask().height() as f32 / 2.0
    }
}

/// Timed invulnerability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shield {
    pub active: bool,
    pub activated_ms: u64,
    pub duration_ms: u64,
}

/// Fire-rate gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gun {
    pub ready: bool,
    pub last_shot_ms: u64,
    pub cooldown_ms: u64,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Normalized movement direction (zero when idle)
    pub direction: Vec2,
    pub speed: f32,
    pub lives: u8,
    pub shield: Shield,
    pub gun: Gun,
    mask: Rc<Mask>,
}

impl Player {
    pub fn new(mask: Rc<Mask>) -> Self {
        Self {
            pos: Vec2::new(WINDOW_WIDTH / 2.0, WINDOW_HEIGHT - PLAYER_START_Y_OFFSET),
            direction: Vec2::ZERO,
            speed: PLAYER_SPEED,
            lives: PLAYER_LIVES,
            shield: Shield {
                active: false,
                activated_ms: 0,
                duration_ms: SHIELD_DURATION_MS,
            },
            gun: Gun {
                ready: true,
                last_shot_ms: 0,
                cooldown_ms: SHOOT_COOLDOWN_MS,
            },
            mask,
        }
    }

    /// Move along `direction`, stay inside the play area, expire timers
    pub fn update(&mut self, direction: Vec2, dt: f32, now_ms: u64) {
        self.direction = direction.normalize_or_zero();
        let mut pos = self.pos + self.direction * self.speed * dt;

        let half_w = (self.mask.width() / 2) as f32;
        let half_h = (self.mask.height() / 2) as f32;
        pos.x = pos.x.clamp(half_w, WINDOW_WIDTH - half_w);
        pos.y = pos.y.clamp(half_h, WINDOW_HEIGHT - half_h);
        self.pos = pos;

        if !self.gun.ready && now_ms.saturating_sub(self.gun.last_shot_ms) >= self.gun.cooldown_ms
        {
            self.gun.ready = true;
        }
        if self.shield.active
            && now_ms.saturating_sub(self.shield.activated_ms) >= self.shield.duration_ms
        {
            self.shield.active = false;
        }
    }

    #[inline]
    pub fn shield_active(&self) -> bool {
        self.shield.active
    }

    /// Turn the shield on; a repeated pickup restarts the full duration
    pub fn activate_shield(&mut self, now_ms: u64) {
        self.shield.active = true;
        self.shield.activated_ms = now_ms;
    }

    /// Shoot if the gate is open. Returns where the laser's bottom edge starts.
    pub fn try_fire(&mut self, now_ms: u64) -> Option<Vec2> {
        if !self.gun.ready {
            return None;
        }
        self.gun.ready = false;
        self.gun.last_shot_ms = now_ms;
        Some(Vec2::new(self.pos.x, self.top()))
    }

    /// Solar panel effect
    pub fn shorten_cooldown(&mut self) {
        self.gun.cooldown_ms = self
            .gun
            .cooldown_ms
            .saturating_sub(SOLAR_COOLDOWN_CUT_MS)
            .max(MIN_SHOOT_COOLDOWN_MS);
    }

    /// Take one hit; returns lives left (never below zero)
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}

impl Body for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn mask(&self) -> &Mask {
        &self.mask
    }
}

/// Falling, spinning pollution
#[derive(Debug, Clone)]
pub struct Hazard {
    pub pos: Vec2,
    /// Downward speed (px/s)
    pub speed: f32,
    /// Rotation (degrees, cosmetic)
    pub angle: f32,
    /// Angular velocity (degrees/s)
    pub spin: f32,
    base_mask: Rc<Mask>,
    mask: Mask,
}

impl Hazard {
    pub fn new(pos: Vec2, speed: f32, spin: f32, base_mask: Rc<Mask>) -> Self {
        let mask = (*base_mask).clone();
        Self {
            pos,
            speed,
            angle: 0.0,
            spin,
            base_mask,
            mask,
        }
    }

    /// Roll speed and spin for a hazard at `difficulty`
    pub fn random<R: Rng>(pos: Vec2, difficulty: u32, base_mask: Rc<Mask>, rng: &mut R) -> Self {
        let speed = rng.random_range(HAZARD_SPEED_RANGE.0..=HAZARD_SPEED_RANGE.1) as f32
            + difficulty as f32 * HAZARD_SPEED_PER_LEVEL;
        let spin = rng.random_range(HAZARD_SPIN_RANGE.0..=HAZARD_SPIN_RANGE.1) as f32;
        Self::new(pos, speed, spin, base_mask)
    }

    pub fn update(&mut self, dt: f32) -> Lifecycle {
        self.pos.y += self.speed * dt;
        if self.top() > WINDOW_HEIGHT + HAZARD_EXIT_MARGIN {
            return Lifecycle::Expired;
        }
        if self.spin != 0.0 {
            self.angle = (self.angle + self.spin * dt).rem_euclid(360.0);
            self.mask = self.base_mask.rotated(self.angle);
        }
        Lifecycle::Alive
    }
}

impl Body for Hazard {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn mask(&self) -> &Mask {
        &self.mask
    }
}

/// Pickup effect selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    ReusableBag,
    WaterBottle,
    Plant,
    RecyclingBin,
    SolarPanel,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 5] = [
        CollectibleKind::ReusableBag,
        CollectibleKind::WaterBottle,
        CollectibleKind::Plant,
        CollectibleKind::RecyclingBin,
        CollectibleKind::SolarPanel,
    ];

    /// Uniform pick among all kinds
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectibleKind::ReusableBag => "reusable_bag",
            CollectibleKind::WaterBottle => "water_bottle",
            CollectibleKind::Plant => "plant",
            CollectibleKind::RecyclingBin => "recycling_bin",
            CollectibleKind::SolarPanel => "solar_panel",
        }
    }
}

/// Falling beneficial item
#[derive(Debug, Clone)]
pub struct Collectible {
    pub pos: Vec2,
    pub speed: f32,
    pub kind: CollectibleKind,
    mask: Rc<Mask>,
}

impl Collectible {
    pub fn new(pos: Vec2, speed: f32, kind: CollectibleKind, mask: Rc<Mask>) -> Self {
        Self {
            pos,
            speed,
            kind,
            mask,
        }
    }

    /// Roll speed and kind for an item at `difficulty`
    pub fn random<R: Rng>(pos: Vec2, difficulty: u32, mask: Rc<Mask>, rng: &mut R) -> Self {
        let speed = rng.random_range(COLLECTIBLE_SPEED_RANGE.0..=COLLECTIBLE_SPEED_RANGE.1)
            as f32
            + difficulty as f32 * COLLECTIBLE_SPEED_PER_LEVEL;
        Self::new(pos, speed, CollectibleKind::random(rng), mask)
    }

    pub fn update(&mut self, dt: f32) -> Lifecycle {
        self.pos.y += self.speed * dt;
        if self.top() > WINDOW_HEIGHT + COLLECTIBLE_EXIT_MARGIN {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }
}

impl Body for Collectible {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn mask(&self) -> &Mask {
        &self.mask
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Boss,
}

/// Straight-flying shot
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    /// Vertical velocity (negative = up)
    pub vel_y: f32,
    pub owner: Owner,
    mask: Rc<Mask>,
}

impl Projectile {
    /// Player laser whose bottom edge sits at `muzzle`
    pub fn laser(muzzle: Vec2, mask: Rc<Mask>) -> Self {
        let pos = Vec2::new(muzzle.x, muzzle.y - mask.height() as f32 / 2.0);
        Self {
            pos,
            vel_y: -LASER_SPEED,
            owner: Owner::Player,
            mask,
        }
    }

    /// Boss bullet whose top edge sits at `muzzle`
    pub fn boss_bullet(muzzle: Vec2, mask: Rc<Mask>) -> Self {
        let pos = Vec2::new(muzzle.x, muzzle.y + mask.height() as f32 / 2.0);
        Self {
            pos,
            vel_y: BOSS_BULLET_SPEED,
            owner: Owner::Boss,
            mask,
        }
    }

    pub fn update(&mut self, dt: f32) -> Lifecycle {
        self.pos.y += self.vel_y * dt;
        let gone = match self.owner {
            Owner::Player => self.bottom() < 0.0,
            Owner::Boss => self.top() > WINDOW_HEIGHT,
        };
        if gone {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }
}

impl Body for Projectile {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn mask(&self) -> &Mask {
        &self.mask
    }
}

/// Short-lived explosion animation
#[derive(Debug, Clone)]
pub struct Explosion {
    pub pos: Vec2,
    /// Fractional animation frame
    pub frame: f32,
    /// Frames available (0 = placeholder, expires on a short timer)
    pub frame_count: usize,
}

impl Explosion {
    pub fn new(pos: Vec2, frame_count: usize) -> Self {
        Self {
            pos,
            frame: 0.0,
            frame_count,
        }
    }

    /// Frame to draw
    pub fn current_frame(&self) -> usize {
        (self.frame as usize).min(self.frame_count.saturating_sub(1))
    }

    pub fn update(&mut self, dt: f32) -> Lifecycle {
        if self.frame_count == 0 {
            self.frame += EXPLOSION_FALLBACK_RATE * dt;
            return if self.frame > 1.0 {
                Lifecycle::Expired
            } else {
                Lifecycle::Alive
            };
        }
        self.frame += EXPLOSION_FPS * dt;
        if self.frame < self.frame_count as f32 {
            Lifecycle::Alive
        } else {
            Lifecycle::Expired
        }
    }
}

/// Background star, wraps to the top when it falls off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
}

impl Star {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..=WINDOW_WIDTH),
                rng.random_range(0.0..=WINDOW_HEIGHT),
            ),
            speed: rng.random_range(STAR_SPEED_RANGE.0..=STAR_SPEED_RANGE.1) as f32,
            size: rng.random_range(1..=3) as f32,
        }
    }

    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        self.pos.y += self.speed * dt;
        if self.pos.y - self.size / 2.0 > WINDOW_HEIGHT {
            self.pos.y = -self.size / 2.0;
            self.pos.x = rng.random_range(0.0..=WINDOW_WIDTH);
        }
    }
}
