//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes only from the `dt` handed to each frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order within each collection)
//! - No rendering, audio or platform dependencies

pub mod boss;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod mask;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use boss::{Boss, BossAttack, BossPhase, Cooldown};
pub use collision::{Outcome, collide, resolve};
pub use difficulty::Difficulty;
pub use entity::{
    Body, Collectible, CollectibleKind, EntityId, EntityKind, Explosion, Hazard, Lifecycle, Owner,
    Player, Projectile, Star,
};
pub use mask::Mask;
pub use spawn::SpawnController;
pub use state::{GameEvent, SimContext, Sprites};
pub use tick::{FrameInput, Simulation, tick};
pub use world::{Arena, World};
