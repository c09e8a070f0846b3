//! Demo-mode autopilot
//!
//! Produces the input a simple player would: dodge whatever is about to land
//! on the ship, otherwise drift toward a pickup or line up a shot, and keep
//! firing. It reads the game only through its public accessors.

use glam::Vec2;

use crate::game::{Game, Screen};
use crate::sim::{Body, FrameInput, World};

/// Horizontal reach of a threat (px either side of the ship's center)
const THREAT_HALF_WIDTH: f32 = 80.0;
/// How far above the ship a falling object counts as a threat (px)
const THREAT_LOOKAHEAD: f32 = 260.0;
/// Close enough to a target column to stop moving (px)
const DEADZONE: f32 = 6.0;

/// Input for the current frame
pub fn drive(game: &Game) -> FrameInput {
    match game.screen() {
        Screen::MainMenu | Screen::GameOver | Screen::Win => FrameInput {
            confirm: true,
            ..Default::default()
        },
        Screen::Instructions => FrameInput {
            back: true,
            ..Default::default()
        },
        Screen::Playing => play(game.world()),
    }
}

fn play(world: &World) -> FrameInput {
    let mut input = FrameInput {
        fire: true,
        ..Default::default()
    };
    let Some(player) = world.player.as_ref() else {
        return input;
    };
    let ship = player.center();

    let target_x = match nearest_threat(world, ship) {
        Some(threat) => dodge_column(ship.x, threat.x),
        None => goal_column(world, ship).unwrap_or(ship.x),
    };

    let dx = target_x - ship.x;
    input.left = dx < -DEADZONE;
    input.right = dx > DEADZONE;
    input
}

/// Closest falling object about to reach the ship
fn nearest_threat(world: &World, ship: Vec2) -> Option<Vec2> {
    let hazards = world.hazards.iter().map(|(_, h)| h.center());
    let bullets = world.boss_bullets.iter().map(|(_, b)| b.center());
    hazards
        .chain(bullets)
        .filter(|p| {
            let above = ship.y - p.y;
            (ship.x - p.x).abs() < THREAT_HALF_WIDTH && (-30.0..THREAT_LOOKAHEAD).contains(&above)
        })
        .min_by(|a, b| a.distance_squared(ship).total_cmp(&b.distance_squared(ship)))
}

/// Column two threat-widths clear of the threat, on the side the ship is already on
fn dodge_column(ship_x: f32, threat_x: f32) -> f32 {
    let away = if ship_x > threat_x {
        1.0
    } else if ship_x < threat_x {
        -1.0
    } else if ship_x < crate::consts::WINDOW_WIDTH / 2.0 {
        1.0
    } else {
        -1.0
    };
    ship_x + away * THREAT_HALF_WIDTH * 2.0
}

/// Nearest pickup, else the boss, else the lowest hazard
fn goal_column(world: &World, ship: Vec2) -> Option<f32> {
    let pickup = world
        .collectibles
        .iter()
        .map(|(_, c)| c.center())
        .min_by(|a, b| a.distance_squared(ship).total_cmp(&b.distance_squared(ship)));
    if let Some(p) = pickup {
        return Some(p.x);
    }
    if let Some((_, boss)) = world.boss() {
        return Some(boss.center().x);
    }
    world
        .hazards
        .iter()
        .map(|(_, h)| h.center())
        .filter(|p| p.y < ship.y)
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .map(|p| p.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScore;
    use crate::persistence::MemoryStore;
    use crate::sim::{Collectible, CollectibleKind, Hazard, Player, Sprites};
    use crate::Trigger;

    fn world_with_player() -> (World, Sprites, Vec2) {
        let sprites = Sprites::boxes();
        let mut world = World::default();
        world.reset(Player::new(sprites.player.clone()));
        let ship = world.player.as_ref().map(|p| p.pos).unwrap_or_default();
        (world, sprites, ship)
    }

    #[test]
    fn test_menus_are_clicked_through() {
        let mut game = Game::new(1, Sprites::boxes(), HighScore::load(MemoryStore::new()));
        assert!(drive(&game).confirm);
        game.handle(Trigger::ShowHelp);
        assert!(drive(&game).back);
        game.handle(Trigger::Back);
        game.handle(Trigger::Start);
        assert!(drive(&game).fire);
    }

    #[test]
    fn test_dodges_hazard_overhead() {
        let (mut world, sprites, ship) = world_with_player();
        world.spawn_hazard(Hazard::new(
            ship + Vec2::new(-20.0, -120.0),
            200.0,
            0.0,
            sprites.hazard.clone(),
        ));
        let input = play(&world);
        assert!(input.right && !input.left);
    }

    #[test]
    fn test_ignores_hazard_far_to_the_side() {
        let (mut world, sprites, ship) = world_with_player();
        world.spawn_hazard(Hazard::new(
            ship + Vec2::new(300.0, -100.0),
            200.0,
            0.0,
            sprites.hazard.clone(),
        ));
        let input = play(&world);
        // Lines up under it to shoot instead
        assert!(input.right);
        assert!(input.fire);
    }

    #[test]
    fn test_heads_for_pickup_when_safe() {
        let (mut world, sprites, ship) = world_with_player();
        world.spawn_collectible(Collectible::new(
            ship + Vec2::new(-200.0, -300.0),
            150.0,
            CollectibleKind::Plant,
            sprites.collectible.clone(),
        ));
        let input = play(&world);
        assert!(input.left && !input.right);
    }

    #[test]
    fn test_idle_when_nothing_around() {
        let (world, _, _) = world_with_player();
        let input = play(&world);
        assert!(!input.left && !input.right);
        assert_eq!(input.direction(), Vec2::ZERO);
    }
}
