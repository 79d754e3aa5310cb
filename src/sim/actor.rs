//! The actor model
//!
//! One [`Actor`] struct carries the state every entity shares; the
//! [`ActorKind`] variant holds what only some entities need. Behaviour that
//! needs the rest of the world (touch, damage, die, spawn) lives on `World`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::nanobot::NanoBot;
use super::projectile::Projectile;
use super::species::{Category, Species};

/// Stable identifier of an actor within one world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Variant state on top of the shared actor fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActorKind {
    /// Atoms, diatomics and greenhouse gases
    Chemical,
    /// Free radical molecule (seeks players)
    FreeRadical,
    /// Static pole or repel point
    Field,
    Projectile(Projectile),
    NanoBot(Box<NanoBot>),
}

/// A simulated entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub species: Species,
    pub pos: Vec2,
    /// Position at the start of the current tick
    #[serde(skip)]
    pub last_pos: Vec2,
    pub vel: Vec2,
    /// Facing (radians)
    pub rotation: f32,
    /// Angular velocity (radians/sec)
    pub spin: f32,
    pub mass: f32,
    /// Physical collision radius
    pub radius: f32,
    /// Influence radius, larger than `radius`
    pub collision_radius: f32,
    pub life: f32,
    pub max_speed: f32,
    pub dead: bool,
    pub collidable: bool,
    pub collided_this_frame: bool,
    /// Last meaningful heading (unit vector)
    pub direction: Vec2,
    pub kind: ActorKind,
}

impl Actor {
    /// A new, not yet spawned actor with species defaults
    pub fn new(id: ActorId, species: Species, scale: f32) -> Self {
        let info = species.info();
        let kind = match info.category {
            Category::FreeRadical => ActorKind::FreeRadical,
            Category::Field => ActorKind::Field,
            _ => ActorKind::Chemical,
        };
        Self {
            id,
            species,
            pos: Vec2::ZERO,
            last_pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
            spin: 0.0,
            mass: info.mass,
            radius: info.radius * scale,
            collision_radius: info.field_radius * scale,
            life: info.life,
            max_speed: info.max_speed * scale,
            dead: true,
            collidable: info.category != Category::Field,
            collided_this_frame: false,
            direction: Vec2::X,
            kind,
        }
    }

    /// A new player avatar for `slot`
    pub fn new_nanobot(id: ActorId, slot: usize, scale: f32) -> Self {
        let mut actor = Self::new(id, Species::NanoBot, scale);
        actor.kind = ActorKind::NanoBot(Box::new(NanoBot::new(slot)));
        actor
    }

    /// A new projectile fired by `owner`
    pub fn new_projectile(id: ActorId, projectile: Projectile, scale: f32) -> Self {
        let mut actor = Self::new(id, projectile.kind.species(), scale);
        actor.kind = ActorKind::Projectile(projectile);
        actor
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.species.category()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Alive and taking part in collisions
    #[inline]
    pub fn is_solid(&self) -> bool {
        !self.dead && self.collidable
    }

    pub fn nanobot(&self) -> Option<&NanoBot> {
        match &self.kind {
            ActorKind::NanoBot(bot) => Some(bot.as_ref()),
            _ => None,
        }
    }

    pub fn nanobot_mut(&mut self) -> Option<&mut NanoBot> {
        match &mut self.kind {
            ActorKind::NanoBot(bot) => Some(bot.as_mut()),
            _ => None,
        }
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            ActorKind::Projectile(p) => Some(p),
            _ => None,
        }
    }

    pub fn projectile_mut(&mut self) -> Option<&mut Projectile> {
        match &mut self.kind {
            ActorKind::Projectile(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this is a NanoBot currently in the match
    pub fn is_playing(&self) -> bool {
        self.nanobot().is_some_and(|bot| bot.playing)
    }

    /// Base per-tick reset shared by all actors
    pub fn begin_frame(&mut self) {
        self.collided_this_frame = false;
        self.last_pos = self.pos;
    }

    /// Free drift: spin, speed clamp and heading bookkeeping
    pub fn drift(&mut self, dt: f32) {
        self.rotation += self.spin * dt;
        self.clamp_speed();
        self.track_heading();
    }

    /// Keep speed within `max_speed` (zero means unlimited)
    pub fn clamp_speed(&mut self) {
        if self.max_speed > 0.0 {
            self.vel = self.vel.clamp_length_max(self.max_speed);
        }
    }

    /// Record the current travel direction when moving
    pub fn track_heading(&mut self) {
        if let Some(dir) = self.vel.try_normalize() {
            self.direction = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_actor_starts_dead() {
        let actor = Actor::new(ActorId(1), Species::Oxygen, 1.0);
        assert!(actor.dead);
        assert!(actor.collidable);
        assert!(matches!(actor.kind, ActorKind::Chemical));
    }

    #[test]
    fn test_scale_applies_to_radius_and_speed() {
        let actor = Actor::new(ActorId(1), Species::Carbon, 0.5);
        assert!((actor.radius - 6.0).abs() < 1e-5);
        assert!((actor.max_speed - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_fields_do_not_collide() {
        let actor = Actor::new(ActorId(3), Species::RepelPoint, 1.0);
        assert!(!actor.collidable);
        assert!(matches!(actor.kind, ActorKind::Field));
    }

    #[test]
    fn test_drift_clamps_and_tracks_heading() {
        let mut actor = Actor::new(ActorId(1), Species::Hydrogen, 1.0);
        actor.vel = Vec2::new(0.0, -1000.0);
        actor.spin = 2.0;
        actor.drift(0.5);
        assert!((actor.vel.length() - actor.max_speed).abs() < 1e-3);
        assert!((actor.direction - Vec2::NEG_Y).length() < 1e-5);
        assert!((actor.rotation - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_begin_frame_resets_collision_flag() {
        let mut actor = Actor::new(ActorId(1), Species::Water, 1.0);
        actor.collided_this_frame = true;
        actor.pos = Vec2::new(5.0, 6.0);
        actor.begin_frame();
        assert!(!actor.collided_this_frame);
        assert_eq!(actor.last_pos, actor.pos);
    }
}
