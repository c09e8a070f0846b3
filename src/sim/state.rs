//! Simulation context and shared types
//!
//! Score, difficulty, the play clock and the RNG travel together in one
//! context that is passed explicitly to every simulation step.

use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::entity::CollectibleKind;
use super::mask::Mask;

/// Something the presentation layer may want to react to (sound, flashes, logs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LaserFired,
    Explosion { pos: Vec2 },
    ItemCollected { kind: CollectibleKind },
    ShieldRaised,
    PlayerHit { lives: u8 },
    BossSpawned,
    BossHit { health: i32 },
    BossDefeated,
    DifficultyRaised { level: u32 },
    GameOver { score: u64 },
    Victory { score: u64 },
    NewHighScore { score: u64 },
}

/// Collision masks for every sprite kind, plus explosion animation length
#[derive(Debug, Clone)]
pub struct Sprites {
    pub player: Rc<Mask>,
    pub hazard: Rc<Mask>,
    pub collectible: Rc<Mask>,
    pub laser: Rc<Mask>,
    pub boss_bullet: Rc<Mask>,
    pub boss: Rc<Mask>,
    /// Boss animation masks (empty: static boss)
    pub boss_frames: Vec<Rc<Mask>>,
    pub explosion_frames: usize,
}

impl Sprites {
    /// Solid rectangles at the standard sprite sizes
    #[cfg(test)]
    pub fn boxes() -> Self {
        use crate::consts::*;
        let rect = |(w, h): (u32, u32)| Rc::new(Mask::filled(w, h));
        Self {
            player: rect(PLAYER_SIZE),
            hazard: rect(HAZARD_SIZE),
            collectible: rect((COLLECTIBLE_SIZE, COLLECTIBLE_SIZE)),
            laser: rect(LASER_SIZE),
            boss_bullet: rect(BOSS_BULLET_SIZE),
            boss: rect(BOSS_SIZE),
            boss_frames: Vec::new(),
            explosion_frames: 0,
        }
    }
}

/// Per-run mutable counters shared by all simulation components
#[derive(Debug, Clone)]
pub struct SimContext {
    pub score: u64,
    pub difficulty: Difficulty,
    /// Unpaused play time (ms, fractional)
    clock_ms: f64,
    pub rng: Pcg32,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub sprites: Sprites,
}

impl SimContext {
    pub fn new(seed: u64, sprites: Sprites) -> Self {
        Self {
            score: 0,
            difficulty: Difficulty::new(),
            clock_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            sprites,
        }
    }

    /// Current play time in whole milliseconds
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.clock_ms as u64
    }

    /// Advance play time by `dt` seconds; returns whole milliseconds crossed
    pub fn advance_clock(&mut self, dt: f32) -> u64 {
        let before = self.now_ms();
        self.clock_ms += dt.max(0.0) as f64 * 1000.0;
        self.now_ms() - before
    }

    #[inline]
    pub fn difficulty_level(&self) -> u32 {
        self.difficulty.level()
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    /// Lose points, never below zero
    pub fn deduct_score(&mut self, points: u64) {
        self.score = self.score.saturating_sub(points);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a new run: zero score, difficulty and play clock
    pub fn reset(&mut self) {
        self.score = 0;
        self.difficulty.reset();
        self.clock_ms = 0.0;
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_floor() {
        let mut ctx = SimContext::new(1, Sprites::boxes());
        ctx.add_score(10);
        ctx.deduct_score(15);
        assert_eq!(ctx.score, 0);
    }

    #[test]
    fn test_clock_reports_whole_ms() {
        let mut ctx = SimContext::new(1, Sprites::boxes());
        let mut total = 0;
        for _ in 0..60 {
            total += ctx.advance_clock(1.0 / 60.0);
        }
        assert_eq!(total, ctx.now_ms());
        assert!((999..=1000).contains(&total));
    }

    #[test]
    fn test_reset_clears_run_state() {
        let mut ctx = SimContext::new(1, Sprites::boxes());
        ctx.add_score(300);
        ctx.advance_clock(25.0);
        ctx.difficulty.advance(25_000);
        ctx.emit(GameEvent::LaserFired);
        ctx.reset();
        assert_eq!(ctx.score, 0);
        assert_eq!(ctx.now_ms(), 0);
        assert_eq!(ctx.difficulty_level(), 0);
        assert!(ctx.events.is_empty());
    }
}
