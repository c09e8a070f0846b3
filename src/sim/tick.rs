//! Frame step
//!
//! Advances one live, unpaused frame of play. The caller decides whether a
//! frame should run at all (screen, pause); this module only knows how.

use glam::Vec2;

use super::collision::{self, Outcome};
use super::entity::{Player, Projectile};
use super::spawn::SpawnController;
use super::state::{GameEvent, SimContext, Sprites};
use super::world::World;

/// Input for one frame. Movement keys are held states; everything else is a
/// press edge seen on one frame only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire pressed (ignored while the gun cools down)
    pub fire: bool,
    pub pause: bool,
    pub confirm: bool,
    pub back: bool,
    pub quit: bool,
    /// Pointer position in play-area pixels
    pub pointer: Option<Vec2>,
    /// Primary button pressed this frame
    pub pointer_pressed: bool,
}

impl FrameInput {
    /// Net movement direction; opposite keys cancel
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| pos as i32 as f32 - neg as i32 as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Everything a run mutates, bundled
#[derive(Debug, Clone)]
pub struct Simulation {
    pub world: World,
    pub ctx: SimContext,
    pub spawner: SpawnController,
}

impl Simulation {
    /// Star field only; call `reset` to start a run
    pub fn new(seed: u64, sprites: Sprites) -> Self {
        let mut ctx = SimContext::new(seed, sprites);
        let world = World::new(&mut ctx.rng);
        Self {
            world,
            ctx,
            spawner: SpawnController::new(),
        }
    }

    /// Fresh run: new player, empty world, zeroed counters and timers
    pub fn reset(&mut self) {
        self.ctx.reset();
        self.world.reset(Player::new(self.ctx.sprites.player.clone()));
        self.spawner.reset(self.ctx.now_ms());
    }

    /// Drop the run's entities when leaving play
    pub fn clear(&mut self) {
        self.world.clear();
    }

    pub fn lives(&self) -> u8 {
        self.world.player.as_ref().map_or(0, |p| p.lives)
    }
}

/// Advance one frame of play
pub fn tick(sim: &mut Simulation, input: &FrameInput, dt: f32) -> Outcome {
    let Simulation {
        world,
        ctx,
        spawner,
    } = sim;

    let elapsed_ms = ctx.advance_clock(dt);
    if ctx.difficulty.advance(elapsed_ms) > 0 {
        let level = ctx.difficulty_level();
        ctx.emit(GameEvent::DifficultyRaised { level });
        log::debug!("Difficulty raised to {level}");
    }

    spawner.step(world, ctx);
    world.update_all(dt, input.direction(), ctx);

    // After the move so the shot leaves from where the ship is drawn
    if input.fire {
        let now = ctx.now_ms();
        if let Some(muzzle) = world.player.as_mut().and_then(|p| p.try_fire(now)) {
            world.spawn_laser(Projectile::laser(muzzle, ctx.sprites.laser.clone()));
            ctx.emit(GameEvent::LaserFired);
        }
    }

    collision::resolve(world, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn running(seed: u64) -> Simulation {
        let mut sim = Simulation::new(seed, Sprites::boxes());
        sim.reset();
        sim
    }

    #[test]
    fn test_direction_cancels_opposites() {
        let input = FrameInput {
            left: true,
            right: true,
            up: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(0.0, -1.0));
        assert_eq!(FrameInput::default().direction(), Vec2::ZERO);
    }

    #[test]
    fn test_difficulty_follows_play_clock() {
        let mut sim = running(3);
        for _ in 0..100 {
            tick(&mut sim, &FrameInput::default(), 0.1);
        }
        assert_eq!(sim.ctx.difficulty_level(), 1);
        assert!(
            sim.ctx
                .events
                .contains(&GameEvent::DifficultyRaised { level: 1 })
        );
    }

    #[test]
    fn test_held_fire_respects_cooldown() {
        let mut sim = running(3);
        let fire = FrameInput {
            fire: true,
            ..Default::default()
        };
        // Fire pressed on every frame for one second, 400ms gate
        for _ in 0..60 {
            tick(&mut sim, &fire, 1.0 / 60.0);
        }
        let shots = sim
            .ctx
            .events
            .iter()
            .filter(|e| **e == GameEvent::LaserFired)
            .count();
        assert_eq!(shots, 3);
    }

    #[test]
    fn test_laser_leaves_from_ship_nose() {
        let mut sim = running(3);
        let fire = FrameInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut sim, &fire, 0.0);
        let (_, laser) = sim.world.lasers.iter().next().expect("laser");
        let player = sim.world.player.as_ref().expect("player");
        let nose = player.pos.y - PLAYER_SIZE.1 as f32 / 2.0;
        assert_eq!(laser.pos.y + LASER_SIZE.1 as f32 / 2.0, nose);
    }

    #[test]
    fn test_reset_starts_clean_run() {
        let mut sim = running(8);
        for _ in 0..300 {
            tick(&mut sim, &FrameInput::default(), 0.05);
        }
        sim.reset();
        assert_eq!(sim.ctx.now_ms(), 0);
        assert_eq!(sim.ctx.score, 0);
        assert_eq!(sim.world.entity_count(), 1);
        assert_eq!(sim.lives(), PLAYER_LIVES);
    }

    proptest! {
        #[test]
        fn prop_same_seed_same_run(seed in any::<u64>(), frames in 1usize..240) {
            let mut a = running(seed);
            let mut b = running(seed);
            let input = FrameInput { fire: true, left: true, ..Default::default() };
            for _ in 0..frames {
                let oa = tick(&mut a, &input, 1.0 / 30.0);
                let ob = tick(&mut b, &input, 1.0 / 30.0);
                prop_assert_eq!(oa, ob);
            }
            prop_assert_eq!(a.ctx.score, b.ctx.score);
            prop_assert_eq!(a.lives(), b.lives());
            prop_assert_eq!(a.world.entity_count(), b.world.entity_count());
            prop_assert_eq!(a.ctx.events, b.ctx.events);
        }
    }
}
