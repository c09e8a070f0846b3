//! Collision resolution
//!
//! One pass per entity pairing, always in the same order. A pass that ends
//! the run (player out of lives, boss destroyed) stops the remaining passes
//! for the frame, so nothing scores after the deciding hit.

use super::entity::{Body, CollectibleKind, EntityId};
use super::state::{GameEvent, SimContext};
use super::world::World;
use crate::consts::*;

/// How the frame's collisions ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Play continues
    Continue,
    /// Player ran out of lives
    PlayerDestroyed,
    /// Boss health reached zero
    BossDefeated,
}

/// Bounding-box pre-check, then exact mask overlap
pub fn collide(a: &impl Body, b: &impl Body) -> bool {
    let (a_tl, b_tl) = (a.top_left(), b.top_left());
    let (a_w, a_h) = a.mask().size();
    let (b_w, b_h) = b.mask().size();

    let boxes_touch = a_tl.x < b_tl.x + b_w as i32
        && b_tl.x < a_tl.x + a_w as i32
        && a_tl.y < b_tl.y + b_h as i32
        && b_tl.y < a_tl.y + a_h as i32;

    boxes_touch && a.mask().overlaps(b.mask(), b_tl - a_tl)
}

/// Resolve every collision for one frame
pub fn resolve(world: &mut World, ctx: &mut SimContext) -> Outcome {
    let outcome = run_passes(world, ctx);
    world.compact();
    outcome
}

fn run_passes(world: &mut World, ctx: &mut SimContext) -> Outcome {
    let passes: [fn(&mut World, &mut SimContext) -> Outcome; 5] = [
        player_vs_hazards,
        player_vs_collectibles,
        player_vs_boss_bullets,
        lasers_vs_boss,
        lasers_vs_hazards,
    ];
    for pass in passes {
        let outcome = pass(world, ctx);
        if outcome != Outcome::Continue {
            return outcome;
        }
    }
    Outcome::Continue
}

fn explode(world: &mut World, ctx: &mut SimContext, pos: glam::Vec2) {
    world.spawn_explosion(pos, ctx.sprites.explosion_frames);
    ctx.emit(GameEvent::Explosion { pos });
}

/// Take a hit; true when that was the last life
fn hurt_player(world: &mut World, ctx: &mut SimContext) -> bool {
    let Some(player) = world.player.as_mut() else {
        return false;
    };
    let lives = player.lose_life();
    ctx.emit(GameEvent::PlayerHit { lives });
    lives == 0
}

fn player_vs_hazards(world: &mut World, ctx: &mut SimContext) -> Outcome {
    let Some(player) = world.player.as_ref() else {
        return Outcome::Continue;
    };
    if player.shield_active() {
        return Outcome::Continue;
    }
    let hits: Vec<EntityId> = world
        .hazards
        .iter()
        .filter(|(_, h)| collide(player, *h))
        .map(|(id, _)| id)
        .collect();

    for id in hits {
        let Some(pos) = world.hazards.get(id).map(|h| h.pos) else {
            continue;
        };
        world.hazards.kill(id);
        explode(world, ctx, pos);
        ctx.deduct_score(HAZARD_HIT_PENALTY);
        if hurt_player(world, ctx) {
            return Outcome::PlayerDestroyed;
        }
    }
    Outcome::Continue
}

fn player_vs_collectibles(world: &mut World, ctx: &mut SimContext) -> Outcome {
    let Some(player) = world.player.as_ref() else {
        return Outcome::Continue;
    };
    let hits: Vec<(EntityId, CollectibleKind)> = world
        .collectibles
        .iter()
        .filter(|(_, c)| collide(player, *c))
        .map(|(id, c)| (id, c.kind))
        .collect();

    let now = ctx.now_ms();
    for (id, kind) in hits {
        world.collectibles.kill(id);
        ctx.add_score(COLLECTIBLE_SCORE);
        ctx.emit(GameEvent::ItemCollected { kind });

        let Some(player) = world.player.as_mut() else {
            continue;
        };
        match kind {
            CollectibleKind::Plant => {
                player.activate_shield(now);
                ctx.emit(GameEvent::ShieldRaised);
            }
            CollectibleKind::SolarPanel => player.shorten_cooldown(),
            CollectibleKind::RecyclingBin => ctx.add_score(RECYCLING_BONUS),
            CollectibleKind::ReusableBag | CollectibleKind::WaterBottle => {}
        }
    }
    Outcome::Continue
}

/// Every touching bullet is consumed; the player loses one life for the volley
fn player_vs_boss_bullets(world: &mut World, ctx: &mut SimContext) -> Outcome {
    let Some(player) = world.player.as_ref() else {
        return Outcome::Continue;
    };
    if player.shield_active() {
        return Outcome::Continue;
    }
    let player_pos = player.pos;
    let hits: Vec<EntityId> = world
        .boss_bullets
        .iter()
        .filter(|(_, b)| collide(player, *b))
        .map(|(id, _)| id)
        .collect();
    if hits.is_empty() {
        return Outcome::Continue;
    }

    for id in hits {
        world.boss_bullets.kill(id);
    }
    explode(world, ctx, player_pos);
    if hurt_player(world, ctx) {
        Outcome::PlayerDestroyed
    } else {
        Outcome::Continue
    }
}

fn lasers_vs_boss(world: &mut World, ctx: &mut SimContext) -> Outcome {
    let Some((boss_id, _)) = world.boss() else {
        return Outcome::Continue;
    };

    for laser_id in world.lasers.ids() {
        let (Some(laser), Some(boss)) = (world.lasers.get(laser_id), world.bosses.get(boss_id))
        else {
            continue;
        };
        if !collide(laser, boss) {
            continue;
        }
        let laser_pos = laser.pos;
        world.lasers.kill(laser_id);
        explode(world, ctx, laser_pos);

        let Some(boss) = world.bosses.get_mut(boss_id) else {
            continue;
        };
        let destroyed = boss.take_damage(LASER_DAMAGE);
        let (boss_pos, health) = (boss.pos, boss.health);
        ctx.emit(GameEvent::BossHit { health });

        if destroyed {
            world.bosses.kill(boss_id);
            explode(world, ctx, boss_pos);
            ctx.add_score(BOSS_DEFEAT_SCORE);
            ctx.emit(GameEvent::BossDefeated);
            log::info!("Boss defeated (score {})", ctx.score);
            return Outcome::BossDefeated;
        }
    }
    Outcome::Continue
}

fn lasers_vs_hazards(world: &mut World, ctx: &mut SimContext) -> Outcome {
    for laser_id in world.lasers.ids() {
        let Some(laser) = world.lasers.get(laser_id) else {
            continue;
        };
        let target = world
            .hazards
            .iter()
            .find(|(_, h)| collide(laser, *h))
            .map(|(id, h)| (id, h.pos));

        if let Some((hazard_id, pos)) = target {
            world.hazards.kill(hazard_id);
            world.lasers.kill(laser_id);
            explode(world, ctx, pos);
            ctx.add_score(HAZARD_DESTROY_SCORE);
        }
    }
    Outcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::boss::Boss;
    use crate::sim::entity::{Collectible, Hazard, Player, Projectile};
    use crate::sim::state::Sprites;
    use glam::Vec2;
    use proptest::prelude::*;

    fn setup() -> (World, SimContext) {
        let mut ctx = SimContext::new(5, Sprites::boxes());
        let mut world = World::new(&mut ctx.rng);
        world.reset(Player::new(ctx.sprites.player.clone()));
        (world, ctx)
    }

    fn player_pos(world: &World) -> Vec2 {
        world.player.as_ref().map(|p| p.pos).unwrap_or_default()
    }

    fn hazard_at(world: &mut World, ctx: &SimContext, pos: Vec2) -> EntityId {
        world.spawn_hazard(Hazard::new(pos, 0.0, 0.0, ctx.sprites.hazard.clone()))
    }

    fn item_at(world: &mut World, ctx: &SimContext, pos: Vec2, kind: CollectibleKind) -> EntityId {
        world.spawn_collectible(Collectible::new(
            pos,
            0.0,
            kind,
            ctx.sprites.collectible.clone(),
        ))
    }

    fn set_lives(world: &mut World, lives: u8) {
        if let Some(p) = world.player.as_mut() {
            p.lives = lives;
        }
    }

    #[test]
    fn test_collide_needs_opaque_overlap() {
        use crate::sim::mask::Mask;
        use std::rc::Rc;
        // Hollow square: box overlaps the dot, pixels don't
        let hollow = Rc::new(Mask::from_fn(40, 40, |x, y| {
            x < 2 || y < 2 || x >= 38 || y >= 38
        }));
        let ring = Collectible::new(Vec2::new(100.0, 100.0), 0.0, CollectibleKind::Plant, hollow);
        let dot = Projectile::laser(Vec2::new(100.0, 104.0), Rc::new(Mask::filled(4, 4)));
        assert!(!collide(&ring, &dot));
        let edge = Projectile::laser(Vec2::new(81.0, 104.0), Rc::new(Mask::filled(4, 4)));
        assert!(collide(&ring, &edge));
    }

    #[test]
    fn test_last_life_hazard_ends_run() {
        let (mut world, mut ctx) = setup();
        set_lives(&mut world, 1);
        ctx.score = 40;
        let pos = player_pos(&world);
        let hazard = hazard_at(&mut world, &ctx, pos);
        // Second hazard would cost more, but the run is already over
        hazard_at(&mut world, &ctx, pos + Vec2::new(5.0, 0.0));

        assert_eq!(resolve(&mut world, &mut ctx), Outcome::PlayerDestroyed);
        assert_eq!(world.player.as_ref().map(|p| p.lives), Some(0));
        assert!(!world.hazards.is_alive(hazard));
        assert_eq!(world.hazards.len(), 1);
        assert_eq!(ctx.score, 25);
        let (_, boom) = world.explosions.iter().next().expect("explosion");
        assert_eq!(boom.pos, pos);
    }

    #[test]
    fn test_hazard_hits_each_cost_a_life_and_points() {
        let (mut world, mut ctx) = setup();
        ctx.score = 20;
        let pos = player_pos(&world);
        hazard_at(&mut world, &ctx, pos);
        hazard_at(&mut world, &ctx, pos + Vec2::new(10.0, 0.0));

        assert_eq!(resolve(&mut world, &mut ctx), Outcome::Continue);
        assert_eq!(world.player.as_ref().map(|p| p.lives), Some(PLAYER_LIVES - 2));
        assert_eq!(ctx.score, 0);
        assert_eq!(world.hazards.len(), 0);
        assert_eq!(world.explosions.len(), 2);
    }

    #[test]
    fn test_shield_blocks_hazards_and_bullets() {
        let (mut world, mut ctx) = setup();
        if let Some(p) = world.player.as_mut() {
            p.activate_shield(0);
        }
        let pos = player_pos(&world);
        hazard_at(&mut world, &ctx, pos);
        world.spawn_boss_bullet(Projectile::boss_bullet(pos, ctx.sprites.boss_bullet.clone()));

        assert_eq!(resolve(&mut world, &mut ctx), Outcome::Continue);
        assert_eq!(world.player.as_ref().map(|p| p.lives), Some(PLAYER_LIVES));
        assert_eq!(world.hazards.len(), 1);
        assert_eq!(world.boss_bullets.len(), 1);
    }

    #[test]
    fn test_recycling_bin_bonus() {
        let (mut world, mut ctx) = setup();
        ctx.score = 100;
        let pos = player_pos(&world);
        let item = item_at(&mut world, &ctx, pos, CollectibleKind::RecyclingBin);
        resolve(&mut world, &mut ctx);
        assert_eq!(ctx.score, 130);
        assert!(!world.collectibles.is_alive(item));
    }

    #[test]
    fn test_plain_items_score_twenty() {
        let (mut world, mut ctx) = setup();
        let pos = player_pos(&world);
        item_at(&mut world, &ctx, pos, CollectibleKind::ReusableBag);
        item_at(&mut world, &ctx, pos, CollectibleKind::WaterBottle);
        resolve(&mut world, &mut ctx);
        assert_eq!(ctx.score, 40);
    }

    #[test]
    fn test_plant_restarts_shield() {
        let (mut world, mut ctx) = setup();
        let pos = player_pos(&world);
        if let Some(p) = world.player.as_mut() {
            p.activate_shield(0);
        }
        ctx.advance_clock(3.0);
        item_at(&mut world, &ctx, pos, CollectibleKind::Plant);
        resolve(&mut world, &mut ctx);

        let shield = world.player.as_ref().map(|p| p.shield).expect("player");
        assert!(shield.active);
        assert_eq!(shield.activated_ms, 3000);
        assert_eq!(shield.duration_ms, SHIELD_DURATION_MS);
    }

    #[test]
    fn test_solar_panel_cuts_cooldown() {
        let (mut world, mut ctx) = setup();
        let pos = player_pos(&world);
        item_at(&mut world, &ctx, pos, CollectibleKind::SolarPanel);
        resolve(&mut world, &mut ctx);
        let cooldown = world.player.as_ref().map(|p| p.gun.cooldown_ms);
        assert_eq!(cooldown, Some(SHOOT_COOLDOWN_MS - SOLAR_COOLDOWN_CUT_MS));
    }

    #[test]
    fn test_boss_volley_costs_one_life() {
        let (mut world, mut ctx) = setup();
        let pos = player_pos(&world);
        for dx in [-10.0, 0.0, 10.0] {
            world.spawn_boss_bullet(Projectile::boss_bullet(
                pos + Vec2::new(dx, -5.0),
                ctx.sprites.boss_bullet.clone(),
            ));
        }
        assert_eq!(resolve(&mut world, &mut ctx), Outcome::Continue);
        assert_eq!(world.boss_bullets.len(), 0);
        assert_eq!(world.player.as_ref().map(|p| p.lives), Some(PLAYER_LIVES - 1));
        let (_, boom) = world.explosions.iter().next().expect("explosion");
        assert_eq!(boom.pos, pos);
    }

    #[test]
    fn test_boss_final_hit_wins() {
        let (mut world, mut ctx) = setup();
        let mut boss = Boss::new(ctx.sprites.boss.clone(), 0);
        boss.pos = Vec2::new(640.0, 200.0);
        boss.health = 5;
        world.spawn_boss(boss);
        let laser = world.spawn_laser(Projectile::laser(
            Vec2::new(640.0, 250.0),
            ctx.sprites.laser.clone(),
        ));
        // A hazard under a second laser must not score once the boss is down
        hazard_at(&mut world, &ctx, Vec2::new(100.0, 400.0));
        world.spawn_laser(Projectile::laser(
            Vec2::new(100.0, 420.0),
            ctx.sprites.laser.clone(),
        ));
        ctx.score = 300;

        assert_eq!(resolve(&mut world, &mut ctx), Outcome::BossDefeated);
        assert!(!world.boss_alive());
        assert!(!world.lasers.is_alive(laser));
        assert_eq!(ctx.score, 800);
        assert_eq!(world.hazards.len(), 1);
        assert!(world.explosions.iter().any(|(_, e)| e.pos == Vec2::new(640.0, 200.0)));
    }

    #[test]
    fn test_laser_damages_boss_and_stops() {
        let (mut world, mut ctx) = setup();
        let mut boss = Boss::new(ctx.sprites.boss.clone(), 0);
        boss.pos = Vec2::new(640.0, 200.0);
        let boss_id = world.spawn_boss(boss);
        // Hazard overlapping the boss: the laser is spent on the boss
        hazard_at(&mut world, &ctx, Vec2::new(640.0, 240.0));
        world.spawn_laser(Projectile::laser(
            Vec2::new(640.0, 250.0),
            ctx.sprites.laser.clone(),
        ));

        assert_eq!(resolve(&mut world, &mut ctx), Outcome::Continue);
        assert_eq!(world.bosses.get(boss_id).map(|b| b.health), Some(BOSS_MAX_HEALTH - 5));
        assert_eq!(world.hazards.len(), 1);
        assert_eq!(world.lasers.len(), 0);
        assert_eq!(ctx.score, 0);
    }

    #[test]
    fn test_laser_consumes_one_hazard() {
        let (mut world, mut ctx) = setup();
        hazard_at(&mut world, &ctx, Vec2::new(300.0, 300.0));
        hazard_at(&mut world, &ctx, Vec2::new(300.0, 310.0));
        world.spawn_laser(Projectile::laser(
            Vec2::new(300.0, 320.0),
            ctx.sprites.laser.clone(),
        ));
        resolve(&mut world, &mut ctx);
        assert_eq!(world.hazards.len(), 1);
        assert_eq!(world.lasers.len(), 0);
        assert_eq!(ctx.score, 10);
    }

    proptest! {
        #[test]
        fn prop_lives_and_score_stay_in_bounds(
            lives in 0u8..=PLAYER_LIVES,
            score in 0u64..100,
            hazards in proptest::collection::vec((-60.0f32..60.0, -60.0f32..60.0), 0..12),
            bullets in proptest::collection::vec((-40.0f32..40.0, -40.0f32..40.0), 0..6),
        ) {
            let (mut world, mut ctx) = setup();
            set_lives(&mut world, lives);
            ctx.score = score;
            let pos = player_pos(&world);
            for (dx, dy) in hazards {
                hazard_at(&mut world, &ctx, pos + Vec2::new(dx, dy));
            }
            for (dx, dy) in bullets {
                world.spawn_boss_bullet(Projectile::boss_bullet(
                    pos + Vec2::new(dx, dy),
                    ctx.sprites.boss_bullet.clone(),
                ));
            }
            let outcome = resolve(&mut world, &mut ctx);
            let after = world.player.as_ref().map(|p| p.lives).unwrap_or(0);
            prop_assert!(after <= lives);
            prop_assert!(after <= PLAYER_LIVES);
            prop_assert!(ctx.score <= score);
            if outcome == Outcome::PlayerDestroyed {
                prop_assert_eq!(after, 0);
            }
        }
    }
}
