//! Entity manager
//!
//! Every live entity sits in a slot of a typed arena. Updates and collisions
//! only flag slots dead; `compact` drops them once the pass is over, so no
//! collection is mutated while it is being walked.

use glam::Vec2;
use rand::Rng;

use super::boss::Boss;
use super::entity::{
    Collectible, EntityId, EntityKind, Explosion, Hazard, Lifecycle, Player, Projectile, Star,
};
use super::state::SimContext;
use crate::consts::STAR_COUNT;

#[derive(Debug, Clone)]
struct Slot<T> {
    id: EntityId,
    alive: bool,
    value: T,
}

/// Insertion-ordered slots of one entity type
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Arena<T> {
    fn insert(&mut self, id: EntityId, value: T) {
        self.slots.push(Slot {
            id,
            alive: true,
            value,
        });
    }

    /// Live entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .filter(|s| s.alive)
            .map(|s| (s.id, &s.value))
    }

    /// Ids of live entities, snapshotted (safe to hold across kills)
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots
            .iter()
            .find(|s| s.alive && s.id == id)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .find(|s| s.alive && s.id == id)
            .map(|s| &mut s.value)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Flag dead. Returns false if it already was.
    pub fn kill(&mut self, id: EntityId) -> bool {
        match self.slots.iter_mut().find(|s| s.alive && s.id == id) {
            Some(slot) => {
                slot.alive = false;
                true
            }
            None => false,
        }
    }

    /// Run `step` over the slots that existed when the pass began
    fn update_each(&mut self, mut step: impl FnMut(&mut T) -> Lifecycle) {
        let len = self.slots.len();
        for slot in &mut self.slots[..len] {
            if slot.alive && step(&mut slot.value) == Lifecycle::Expired {
                slot.alive = false;
            }
        }
    }

    fn compact(&mut self) {
        self.slots.retain(|s| s.alive);
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Owns all entities
#[derive(Debug, Clone, Default)]
pub struct World {
    pub player: Option<Player>,
    pub hazards: Arena<Hazard>,
    pub collectibles: Arena<Collectible>,
    pub lasers: Arena<Projectile>,
    pub boss_bullets: Arena<Projectile>,
    pub bosses: Arena<Boss>,
    pub explosions: Arena<Explosion>,
    pub stars: Vec<Star>,
    /// Spawn order across all collections (bulk draw order)
    all: Vec<(EntityKind, EntityId)>,
    next_id: u32,
}

impl World {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut world = Self::default();
        world.stars = (0..STAR_COUNT).map(|_| Star::random(rng)).collect();
        world
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn track(&mut self, kind: EntityKind) -> EntityId {
        let id = self.next_entity_id();
        self.all.push((kind, id));
        id
    }

    pub fn spawn_hazard(&mut self, hazard: Hazard) -> EntityId {
        let id = self.track(EntityKind::Hazard);
        self.hazards.insert(id, hazard);
        id
    }

    pub fn spawn_collectible(&mut self, item: Collectible) -> EntityId {
        let id = self.track(EntityKind::Collectible);
        self.collectibles.insert(id, item);
        id
    }

    pub fn spawn_laser(&mut self, laser: Projectile) -> EntityId {
        let id = self.track(EntityKind::Laser);
        self.lasers.insert(id, laser);
        id
    }

    pub fn spawn_boss_bullet(&mut self, bullet: Projectile) -> EntityId {
        let id = self.track(EntityKind::BossBullet);
        self.boss_bullets.insert(id, bullet);
        id
    }

    pub fn spawn_boss(&mut self, boss: Boss) -> EntityId {
        let id = self.track(EntityKind::Boss);
        self.bosses.insert(id, boss);
        id
    }

    pub fn spawn_explosion(&mut self, pos: Vec2, frame_count: usize) -> EntityId {
        let id = self.track(EntityKind::Explosion);
        self.explosions.insert(id, Explosion::new(pos, frame_count));
        id
    }

    /// The live boss, if any
    pub fn boss(&self) -> Option<(EntityId, &Boss)> {
        self.bosses.iter().next()
    }

    pub fn boss_alive(&self) -> bool {
        !self.bosses.is_empty()
    }

    /// Live entities in spawn order
    pub fn spawn_order(&self) -> impl Iterator<Item = (EntityKind, EntityId)> + '_ {
        self.all.iter().copied().filter(|&(kind, id)| match kind {
            EntityKind::Player => self.player.is_some(),
            EntityKind::Hazard => self.hazards.is_alive(id),
            EntityKind::Collectible => self.collectibles.is_alive(id),
            EntityKind::Laser => self.lasers.is_alive(id),
            EntityKind::BossBullet => self.boss_bullets.is_alive(id),
            EntityKind::Boss => self.bosses.is_alive(id),
            EntityKind::Explosion => self.explosions.is_alive(id),
        })
    }

    /// Total live entities, player included
    pub fn entity_count(&self) -> usize {
        self.player.iter().count()
            + self.hazards.len()
            + self.collectibles.len()
            + self.lasers.len()
            + self.boss_bullets.len()
            + self.bosses.len()
            + self.explosions.len()
    }

    /// Advance every entity one frame, then drop the ones that expired
    pub fn update_all(&mut self, dt: f32, direction: Vec2, ctx: &mut SimContext) {
        let now = ctx.now_ms();
        if let Some(player) = self.player.as_mut() {
            player.update(direction, dt, now);
        }
        for star in &mut self.stars {
            star.update(dt, &mut ctx.rng);
        }

        self.hazards.update_each(|h| h.update(dt));
        self.collectibles.update_each(|c| c.update(dt));
        self.lasers.update_each(|p| p.update(dt));
        self.boss_bullets.update_each(|p| p.update(dt));
        self.bosses.update_each(|b| b.update(dt));
        self.explosions.update_each(|e| e.update(dt));

        self.compact();
    }

    /// Remove every slot flagged dead
    pub fn compact(&mut self) {
        self.hazards.compact();
        self.collectibles.compact();
        self.lasers.compact();
        self.boss_bullets.compact();
        self.bosses.compact();
        self.explosions.compact();

        let (hazards, collectibles, lasers, bullets, bosses, explosions) = (
            &self.hazards,
            &self.collectibles,
            &self.lasers,
            &self.boss_bullets,
            &self.bosses,
            &self.explosions,
        );
        let has_player = self.player.is_some();
        self.all.retain(|&(kind, id)| match kind {
            EntityKind::Player => has_player,
            EntityKind::Hazard => hazards.is_alive(id),
            EntityKind::Collectible => collectibles.is_alive(id),
            EntityKind::Laser => lasers.is_alive(id),
            EntityKind::BossBullet => bullets.is_alive(id),
            EntityKind::Boss => bosses.is_alive(id),
            EntityKind::Explosion => explosions.is_alive(id),
        });
    }

    /// Drop every entity, player included. Stars stay.
    pub fn clear(&mut self) {
        self.player = None;
        self.hazards.clear();
        self.collectibles.clear();
        self.lasers.clear();
        self.boss_bullets.clear();
        self.bosses.clear();
        self.explosions.clear();
        self.all.clear();
    }

    /// Destroy the player, leaving the rest of the scene in place
    pub fn remove_player(&mut self) {
        self.player = None;
        self.all.retain(|&(kind, _)| kind != EntityKind::Player);
    }

    /// Clear everything but the star field and install a fresh player
    pub fn reset(&mut self, player: Player) {
        self.clear();
        self.player = Some(player);
        let id = self.next_entity_id();
        self.all.push((EntityKind::Player, id));
    }
}
