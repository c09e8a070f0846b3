//! Boss behavior
//!
//! A small state machine: the boss descends until fully on screen
//! (`Entering`), then sweeps left and right (`Patrolling`). Firing and hazard
//! drops run on two independent cooldowns measured from the boss's spawn.

use std::rc::Rc;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Lifecycle};
use super::mask::Mask;
use crate::consts::*;

/// Boss movement phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Descending into the play area
    Entering,
    /// Horizontal oscillation with attacks
    Patrolling,
}

/// Elapsed-time gate on the simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    last_ms: u64,
}

impl Cooldown {
    pub fn starting_at(now_ms: u64) -> Self {
        Self { last_ms: now_ms }
    }

    /// Fire once `interval_ms` has passed since the last trigger
    pub fn ready(&mut self, now_ms: u64, interval_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_ms) >= interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// What the boss wants to add to the world this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BossAttack {
    /// Top-center points of new boss bullets
    pub bullets: Vec<Vec2>,
    /// Center of a new hazard dropped below the boss
    pub hazard: Option<Vec2>,
}

/// The final encounter
#[derive(Debug, Clone)]
pub struct Boss {
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub phase: BossPhase,
    /// Patrol direction: +1 right, -1 left
    pub heading: f32,
    pub fire: Cooldown,
    pub drop: Cooldown,
    mask: Rc<Mask>,
    /// Animation masks; empty for a static sprite
    frames: Vec<Rc<Mask>>,
    anim: f32,
}

impl Boss {
    /// New boss centered horizontally, above the visible area
    pub fn new(mask: Rc<Mask>, now_ms: u64) -> Self {
        let pos = Vec2::new(
            WINDOW_WIDTH / 2.0,
            BOSS_SPAWN_TOP + mask.height() as f32 / 2.0,
        );
        Self {
            pos,
            health: BOSS_MAX_HEALTH,
            max_health: BOSS_MAX_HEALTH,
            phase: BossPhase::Entering,
            heading: 1.0,
            fire: Cooldown::starting_at(now_ms),
            drop: Cooldown::starting_at(now_ms),
            mask,
            frames: Vec::new(),
            anim: 0.0,
        }
    }

    /// Animate through `frames` while patrolling, colliding with the shown frame
    pub fn with_frames(mut self, frames: Vec<Rc<Mask>>) -> Self {
        if let Some(first) = frames.first() {
            self.mask = first.clone();
        }
        self.frames = frames;
        self
    }

    /// Index of the animation frame on show
    pub fn current_frame(&self) -> usize {
        if self.frames.is_empty() {
            0
        } else {
            self.anim as usize % self.frames.len()
        }
    }

    /// Remaining health as 0..=1 (for a health bar)
    pub fn health_ratio(&self) -> f32 {
        (self.health.max(0) as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.mask.width() as f32 / 2.0
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.mask.width() as f32 / 2.0
    }

    /// Apply damage; returns true when the boss is destroyed
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.health <= 0
    }

    pub fn update(&mut self, dt: f32) -> Lifecycle {
        match self.phase {
            BossPhase::Entering => {
                self.pos.y += BOSS_ENTER_SPEED * dt;
                if self.top() >= BOSS_ENTERED_TOP {
                    self.phase = BossPhase::Patrolling;
                    log::debug!("Boss entered play area");
                }
            }
            BossPhase::Patrolling => {
                let half_w = self.mask.width() as f32 / 2.0;
                self.pos.x += self.heading * BOSS_PATROL_SPEED * dt;
                if self.left() <= BOSS_PATROL_MARGIN {
                    self.pos.x = BOSS_PATROL_MARGIN + half_w;
                    self.heading = -self.heading;
                }
                if self.right() >= WINDOW_WIDTH - BOSS_PATROL_MARGIN {
                    self.pos.x = WINDOW_WIDTH - BOSS_PATROL_MARGIN - half_w;
                    self.heading = -self.heading;
                }
                if !self.frames.is_empty() {
                    self.anim += BOSS_ANIM_FPS * dt;
                    self.mask = self.frames[self.current_frame()].clone();
                }
            }
        }
        Lifecycle::Alive
    }

    /// Run both attack cooldowns. They are independent: the same frame may
    /// yield a volley and a hazard drop.
    pub fn attack<R: Rng>(&mut self, now_ms: u64, difficulty: u32, rng: &mut R) -> BossAttack {
        let mut attack = BossAttack::default();
        let bottom = self.bottom();

        if self.fire.ready(now_ms, BOSS_FIRE_INTERVAL_MS) {
            attack.bullets = vec![
                Vec2::new(self.pos.x, bottom),
                Vec2::new(self.pos.x - BOSS_FIRE_SPREAD, bottom - 10.0),
                Vec2::new(self.pos.x + BOSS_FIRE_SPREAD, bottom - 10.0),
            ];
        }

        let drop_interval = crate::scaled_interval(
            BOSS_HAZARD_BASE_INTERVAL_MS,
            BOSS_HAZARD_INTERVAL_STEP_MS,
            difficulty,
            BOSS_HAZARD_MIN_INTERVAL_MS,
        );
        if self.drop.ready(now_ms, drop_interval) {
            let lo = self.left() as i32 + 20;
            let hi = (self.right() as i32 - 20).max(lo);
            let x = rng.random_range(lo..=hi) as f32;
            attack.hazard = Some(Vec2::new(x, bottom + 10.0));
        }

        attack
    }
}

impl Body for Boss {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn mask(&self) -> &Mask {
        &self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn boss(now_ms: u64) -> Boss {
        Boss::new(Rc::new(Mask::filled(BOSS_SIZE.0, BOSS_SIZE.1)), now_ms)
    }

    #[test]
    fn test_boss_spawns_above_screen() {
        let b = boss(0);
        assert_eq!(b.top(), BOSS_SPAWN_TOP);
        assert_eq!(b.phase, BossPhase::Entering);
        assert_eq!(b.health, BOSS_MAX_HEALTH);
    }

    #[test]
    fn test_boss_enters_then_patrols() {
        let mut b = boss(0);
        // 190px to travel at 80px/s
        for _ in 0..23 {
            b.update(0.1);
        }
        assert_eq!(b.phase, BossPhase::Entering);
        b.update(0.1);
        assert_eq!(b.phase, BossPhase::Patrolling);

        let x = b.pos.x;
        b.update(0.5);
        assert!((b.pos.x - (x + BOSS_PATROL_SPEED * 0.5)).abs() < 0.01);
    }

    #[test]
    fn test_boss_bounces_at_margins() {
        let mut b = boss(0);
        b.phase = BossPhase::Patrolling;
        b.update(100.0);
        assert_eq!(b.right(), WINDOW_WIDTH - BOSS_PATROL_MARGIN);
        assert_eq!(b.heading, -1.0);
        b.update(100.0);
        assert_eq!(b.left(), BOSS_PATROL_MARGIN);
        assert_eq!(b.heading, 1.0);
    }

    #[test]
    fn test_boss_volley_cadence() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut b = boss(1000);
        assert!(b.attack(1000 + 1199, 0, &mut rng).bullets.is_empty());
        let volley = b.attack(1000 + 1200, 0, &mut rng).bullets;
        assert_eq!(volley.len(), 3);
        assert_eq!(volley[0].x, b.pos.x);
        assert_eq!(volley[1].x, b.pos.x - 40.0);
        assert_eq!(volley[2].x, b.pos.x + 40.0);
        // Cooldown restarts from the volley
        assert!(b.attack(1000 + 2399, 0, &mut rng).bullets.is_empty());
        assert_eq!(b.attack(1000 + 2400, 0, &mut rng).bullets.len(), 3);
    }

    #[test]
    fn test_boss_hazard_drop_scales_with_difficulty() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut b = boss(0);
        // difficulty 10: max(600, 2000 - 500) = 1500ms
        assert!(b.attack(1499, 10, &mut rng).hazard.is_none());
        let drop = b.attack(1500, 10, &mut rng).hazard.expect("hazard drop");
        assert!(drop.x >= b.left() + 20.0 && drop.x <= b.right() - 20.0);
        assert_eq!(drop.y, b.bottom() + 10.0);

        // difficulty 40 hits the 600ms floor
        let mut b = boss(0);
        assert!(b.attack(600, 40, &mut rng).hazard.is_some());
    }

    #[test]
    fn test_boss_animates_while_patrolling() {
        let narrow = Rc::new(Mask::filled(200, BOSS_SIZE.1));
        let wide = Rc::new(Mask::filled(BOSS_SIZE.0, BOSS_SIZE.1));
        let mut b = boss(0).with_frames(vec![narrow, wide]);
        assert_eq!(b.mask().width(), 200);

        // No animation on the way in
        b.update(0.5);
        assert_eq!(b.phase, BossPhase::Entering);
        assert_eq!(b.current_frame(), 0);

        b.phase = BossPhase::Patrolling;
        b.pos.x = WINDOW_WIDTH / 2.0;
        // 6 frames/s: 0.2s lands on frame 1, whose mask is now the collider
        b.update(0.2);
        assert_eq!(b.current_frame(), 1);
        assert_eq!(b.mask().width(), BOSS_SIZE.0);
        b.update(0.2);
        assert_eq!(b.current_frame(), 0);
        assert_eq!(b.mask().width(), 200);
    }

    #[test]
    fn test_static_boss_keeps_frame_zero() {
        let mut b = boss(0);
        b.phase = BossPhase::Patrolling;
        b.update(1.0);
        assert_eq!(b.current_frame(), 0);
        assert_eq!(b.mask().width(), BOSS_SIZE.0);
    }

    #[test]
    fn test_boss_damage() {
        let mut b = boss(0);
        b.health = 10;
        assert!(!b.take_damage(LASER_DAMAGE));
        assert!(b.take_damage(LASER_DAMAGE));
        assert_eq!(b.health_ratio(), 0.0);
    }
}
