//! Per-sprite instance data for a GPU instance buffer

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::consts::*;
use crate::game::{Game, Screen};
use crate::sim::{Body, EntityKind, World};

/// Which sprite an instance shows
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Star = 0,
    Player = 1,
    Hazard = 2,
    /// `frame` holds the item kind index
    Collectible = 3,
    Laser = 4,
    BossBullet = 5,
    Boss = 6,
    Explosion = 7,
}

/// One sprite to draw
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Center in play-area pixels
    pub center: [f32; 2],
    /// Draw size in pixels (zero = the frame's native size)
    pub size: [f32; 2],
    pub tint: [f32; 4],
    /// Clockwise rotation (degrees)
    pub rotation: f32,
    pub sprite: u32,
    pub frame: u32,
    pub _pad: u32,
}

impl SpriteInstance {
    pub fn new(sprite: SpriteId, center: glam::Vec2, size: (u32, u32)) -> Self {
        Self {
            center: center.to_array(),
            size: [size.0 as f32, size.1 as f32],
            tint: colors::WHITE,
            rotation: 0.0,
            sprite: sprite as u32,
            frame: 0,
            _pad: 0,
        }
    }

    fn with_tint(mut self, tint: [f32; 4]) -> Self {
        self.tint = tint;
        self
    }

    fn with_frame(mut self, frame: u32) -> Self {
        self.frame = frame;
        self
    }

    fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }
}

/// Colors for game elements
pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SHIELD: [f32; 4] = [0.5, 1.0, 1.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.04, 0.04, 0.08, 1.0];
}

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub screen: Screen,
    pub paused: bool,
    pub score: u64,
    pub high_score: u64,
    pub lives: u8,
    pub difficulty: u32,
    /// Remaining boss health (0..=1) while a boss is alive
    pub boss_health: Option<f32>,
    pub shield: bool,
}

/// One frame's worth of presentation data
#[derive(Debug, Clone)]
pub struct Frame {
    pub instances: Vec<SpriteInstance>,
    pub hud: Hud,
}

/// Stars, then live entities in spawn order
fn instances(world: &World) -> Vec<SpriteInstance> {
    let mut out = Vec::with_capacity(world.stars.len() + world.entity_count());
    for star in &world.stars {
        let size = star.size as u32;
        out.push(SpriteInstance::new(SpriteId::Star, star.pos, (size, size)));
    }

    for (kind, id) in world.spawn_order() {
        let instance = match kind {
            EntityKind::Player => world.player.as_ref().map(|p| {
                let tint = if p.shield_active() {
                    colors::SHIELD
                } else {
                    colors::WHITE
                };
                SpriteInstance::new(SpriteId::Player, p.center(), PLAYER_SIZE).with_tint(tint)
            }),
            EntityKind::Hazard => world.hazards.get(id).map(|h| {
                SpriteInstance::new(SpriteId::Hazard, h.center(), HAZARD_SIZE)
                    .with_rotation(h.angle)
            }),
            EntityKind::Collectible => world.collectibles.get(id).map(|c| {
                let kind_index = c.kind as u32;
                SpriteInstance::new(
                    SpriteId::Collectible,
                    c.center(),
                    (COLLECTIBLE_SIZE, COLLECTIBLE_SIZE),
                )
                .with_frame(kind_index)
            }),
            EntityKind::Laser => world
                .lasers
                .get(id)
                .map(|l| SpriteInstance::new(SpriteId::Laser, l.center(), LASER_SIZE)),
            EntityKind::BossBullet => world
                .boss_bullets
                .get(id)
                .map(|b| SpriteInstance::new(SpriteId::BossBullet, b.center(), BOSS_BULLET_SIZE)),
            EntityKind::Boss => world
                .bosses
                .get(id)
                .map(|b| {
                    SpriteInstance::new(SpriteId::Boss, b.center(), BOSS_SIZE)
                        .with_frame(b.current_frame() as u32)
                }),
            EntityKind::Explosion => world.explosions.get(id).map(|e| {
                let size = if e.frame_count == 0 {
                    (EXPLOSION_FALLBACK_SIZE, EXPLOSION_FALLBACK_SIZE)
                } else {
                    (0, 0)
                };
                SpriteInstance::new(SpriteId::Explosion, e.pos, size)
                    .with_frame(e.current_frame() as u32)
            }),
        };
        out.extend(instance);
    }
    out
}

/// Build the presentation snapshot after a frame has run
pub fn snapshot(game: &Game) -> Frame {
    let world = game.world();
    let hud = Hud {
        screen: game.screen(),
        paused: game.paused(),
        score: game.score(),
        high_score: game.high_score(),
        lives: game.lives(),
        difficulty: game.difficulty(),
        boss_health: game.boss().map(|b| b.health_ratio()),
        shield: world.player.as_ref().is_some_and(|p| p.shield_active()),
    };
    Frame {
        instances: instances(world),
        hud,
    }
}
