//! Spawn controller
//!
//! Decides when hazards, collectibles and the boss enter the world. Each
//! mechanism keeps its own last-trigger timestamp on the play clock, so
//! cadences never interfere with one another.

use glam::Vec2;
use rand::Rng;

use super::boss::Boss;
use super::entity::{Collectible, Hazard, Projectile};
use super::state::{GameEvent, SimContext};
use super::world::World;
use crate::consts::*;
use crate::scaled_interval;

/// Hazard spawn interval at a difficulty level (ms)
pub fn hazard_interval_ms(level: u32) -> u64 {
    scaled_interval(
        HAZARD_BASE_INTERVAL_MS,
        HAZARD_INTERVAL_STEP_MS,
        level,
        HAZARD_MIN_INTERVAL_MS,
    )
}

/// Collectible roll interval at a difficulty level (ms)
pub fn collectible_interval_ms(level: u32) -> u64 {
    scaled_interval(
        COLLECTIBLE_BASE_INTERVAL_MS,
        COLLECTIBLE_INTERVAL_STEP_MS,
        level,
        COLLECTIBLE_MIN_INTERVAL_MS,
    )
}

/// Probability that a collectible roll actually spawns one
pub fn collectible_chance(level: u32) -> f64 {
    (COLLECTIBLE_BASE_CHANCE - level as f64 * COLLECTIBLE_CHANCE_STEP).max(COLLECTIBLE_MIN_CHANCE)
}

/// Boss trigger condition
pub fn boss_due(score: u64, level: u32, boss_alive: bool) -> bool {
    score >= BOSS_SCORE_THRESHOLD && level >= BOSS_DIFFICULTY_THRESHOLD && !boss_alive
}

fn random_spawn_point<R: Rng>(rng: &mut R) -> Vec2 {
    let x = rng.random_range(SPAWN_MARGIN_X..=WINDOW_WIDTH as i32 - SPAWN_MARGIN_X);
    Vec2::new(x as f32, SPAWN_Y)
}

#[derive(Debug, Clone, Default)]
pub struct SpawnController {
    last_hazard_ms: u64,
    last_collectible_ms: u64,
    /// Boss appears at most once per run
    boss_spawned: bool,
}

impl SpawnController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    /// Restart all timers at the current play time
    pub fn reset(&mut self, now_ms: u64) {
        self.last_hazard_ms = now_ms;
        self.last_collectible_ms = now_ms;
        self.boss_spawned = false;
    }

    /// Run every spawn mechanism once for this frame
    pub fn step(&mut self, world: &mut World, ctx: &mut SimContext) {
        self.spawn_hazards(world, ctx);
        self.spawn_collectibles(world, ctx);
        self.spawn_boss(world, ctx);
        boss_attacks(world, ctx);
    }

    fn spawn_hazards(&mut self, world: &mut World, ctx: &mut SimContext) {
        let now = ctx.now_ms();
        let level = ctx.difficulty_level();
        if now.saturating_sub(self.last_hazard_ms) > hazard_interval_ms(level) {
            self.last_hazard_ms = now;
            let pos = random_spawn_point(&mut ctx.rng);
            let hazard = Hazard::random(pos, level, ctx.sprites.hazard.clone(), &mut ctx.rng);
            world.spawn_hazard(hazard);
        }
    }

    fn spawn_collectibles(&mut self, world: &mut World, ctx: &mut SimContext) {
        let now = ctx.now_ms();
        let level = ctx.difficulty_level();
        if now.saturating_sub(self.last_collectible_ms) > collectible_interval_ms(level) {
            self.last_collectible_ms = now;
            if ctx.rng.random_bool(collectible_chance(level)) {
                let pos = random_spawn_point(&mut ctx.rng);
                let item =
                    Collectible::random(pos, level, ctx.sprites.collectible.clone(), &mut ctx.rng);
                world.spawn_collectible(item);
            }
        }
    }

    fn spawn_boss(&mut self, world: &mut World, ctx: &mut SimContext) {
        if self.boss_spawned || !boss_due(ctx.score, ctx.difficulty_level(), world.boss_alive()) {
            return;
        }
        self.boss_spawned = true;
        let boss = Boss::new(ctx.sprites.boss.clone(), ctx.now_ms())
            .with_frames(ctx.sprites.boss_frames.clone());
        world.spawn_boss(boss);
        ctx.emit(GameEvent::BossSpawned);
        log::info!(
            "Boss spawned (score {}, difficulty {})",
            ctx.score,
            ctx.difficulty_level()
        );
    }
}

/// Let a live boss fire and drop hazards
fn boss_attacks(world: &mut World, ctx: &mut SimContext) {
    let now = ctx.now_ms();
    let level = ctx.difficulty_level();
    let mut attacks = Vec::new();
    for id in world.bosses.ids() {
        if let Some(boss) = world.bosses.get_mut(id) {
            attacks.push(boss.attack(now, level, &mut ctx.rng));
        }
    }

    for attack in attacks {
        for muzzle in attack.bullets {
            world.spawn_boss_bullet(Projectile::boss_bullet(
                muzzle,
                ctx.sprites.boss_bullet.clone(),
            ));
        }
        if let Some(pos) = attack.hazard {
            let hazard = Hazard::random(pos, level, ctx.sprites.hazard.clone(), &mut ctx.rng);
            world.spawn_hazard(hazard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Sprites;

    fn setup() -> (World, SimContext, SpawnController) {
        let mut ctx = SimContext::new(9, Sprites::boxes());
        let world = World::new(&mut ctx.rng);
        (world, ctx, SpawnController::new())
    }

    #[test]
    fn test_interval_formulas() {
        assert_eq!(hazard_interval_ms(0), 900);
        assert_eq!(hazard_interval_ms(10), 450);
        assert_eq!(hazard_interval_ms(20), 160);
        assert_eq!(collectible_interval_ms(0), 3000);
        assert_eq!(collectible_interval_ms(21), 900);
        assert!((collectible_chance(0) - 0.7).abs() < 1e-9);
        assert!((collectible_chance(4) - 0.5).abs() < 1e-9);
        assert!((collectible_chance(30) - 0.18).abs() < 1e-9);
    }

    #[test]
    fn test_boss_condition() {
        // Score alone is not enough
        assert!(!boss_due(250, 1, false));
        assert!(boss_due(250, 2, false));
        assert!(!boss_due(199, 5, false));
        assert!(!boss_due(250, 2, true));
    }

    #[test]
    fn test_one_hazard_per_interval() {
        let (mut world, mut ctx, mut spawner) = setup();
        ctx.advance_clock(0.9);
        spawner.step(&mut world, &mut ctx);
        assert_eq!(world.hazards.len(), 0);

        ctx.advance_clock(0.002);
        spawner.step(&mut world, &mut ctx);
        assert_eq!(world.hazards.len(), 1);
        // Timer restarted: nothing again right away
        spawner.step(&mut world, &mut ctx);
        assert_eq!(world.hazards.len(), 1);

        let (_, hazard) = world.hazards.iter().next().expect("hazard");
        assert_eq!(hazard.pos.y, SPAWN_Y);
        assert!(hazard.pos.x >= 40.0 && hazard.pos.x <= WINDOW_WIDTH - 40.0);
        assert!(hazard.speed >= 180.0 && hazard.speed <= 300.0);
    }

    #[test]
    fn test_hazard_speed_scales_with_difficulty() {
        let (mut world, mut ctx, mut spawner) = setup();
        ctx.difficulty.advance(50_000);
        ctx.advance_clock(1.0);
        spawner.step(&mut world, &mut ctx);
        let (_, hazard) = world.hazards.iter().next().expect("hazard");
        assert!(hazard.speed >= 180.0 + 150.0 && hazard.speed <= 300.0 + 150.0);
    }

    #[test]
    fn test_collectibles_spawn_at_roughly_the_chance() {
        let (mut world, mut ctx, mut spawner) = setup();
        let rolls = 400;
        for _ in 0..rolls {
            ctx.advance_clock(3.01);
            spawner.step(&mut world, &mut ctx);
        }
        let spawned = world.collectibles.len() as f64;
        let ratio = spawned / rolls as f64;
        assert!((0.6..0.8).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_boss_spawns_once_per_run() {
        let (mut world, mut ctx, mut spawner) = setup();
        ctx.score = 250;
        ctx.difficulty.advance(10_000);
        spawner.step(&mut world, &mut ctx);
        assert!(!world.boss_alive());

        ctx.difficulty.advance(10_000);
        spawner.step(&mut world, &mut ctx);
        assert!(world.boss_alive());
        assert_eq!(ctx.events, vec![GameEvent::BossSpawned]);

        // Even after it is gone, no second boss this run
        let (id, _) = world.boss().expect("boss");
        world.bosses.kill(id);
        world.compact();
        spawner.step(&mut world, &mut ctx);
        assert!(!world.boss_alive());

        spawner.reset(ctx.now_ms());
        spawner.step(&mut world, &mut ctx);
        assert!(world.boss_alive());
    }

    #[test]
    fn test_live_boss_attacks_on_its_own_timers() {
        let (mut world, mut ctx, mut spawner) = setup();
        ctx.score = 500;
        ctx.difficulty.advance(20_000);
        spawner.step(&mut world, &mut ctx);
        assert!(world.boss_alive());

        // Hazard spawn timer is unrelated to the boss cadence: skip it
        ctx.advance_clock(1.2);
        spawner.last_hazard_ms = ctx.now_ms();
        spawner.step(&mut world, &mut ctx);
        assert_eq!(world.boss_bullets.len(), 3);
        assert_eq!(world.hazards.len(), 0);

        // max(600, 2000 - 2*50) = 1900ms for the drop
        ctx.advance_clock(0.7);
        spawner.last_hazard_ms = ctx.now_ms();
        spawner.step(&mut world, &mut ctx);
        assert_eq!(world.hazards.len(), 1);
    }
}
