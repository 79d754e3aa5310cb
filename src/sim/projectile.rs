//! Projectiles fired by NanoBots
//!
//! Atomic mole pellets are spent on the first thing they hit. Ozone shells
//! detonate, dealing splash damage around the impact point.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId};
use super::particles::ParticleBurst;
use super::species::{Category, Species};
use super::state::World;
use crate::angle_of;
use crate::audio::Cue;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Carbon pellet from the blast spread
    AtomicMole,
    /// Explosive shell from the ozone volley
    OzoneShell,
}

impl ProjectileKind {
    pub fn species(self) -> Species {
        match self {
            ProjectileKind::AtomicMole => Species::AtomicMole,
            ProjectileKind::OzoneShell => Species::OzoneShell,
        }
    }

    /// Muzzle speed (unscaled)
    pub fn speed(self) -> f32 {
        match self {
            ProjectileKind::AtomicMole => MOLE_SPEED,
            ProjectileKind::OzoneShell => OZONE_SPEED,
        }
    }

    /// Splash radius (unscaled) and damage; zero damage for no splash
    pub fn splash(self) -> (f32, f32) {
        match self {
            ProjectileKind::AtomicMole => (0.0, 0.0),
            ProjectileKind::OzoneShell => (OZONE_SPLASH_RADIUS, OZONE_SPLASH_DAMAGE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    /// The NanoBot that fired it; never hit by its own shot
    pub owner: ActorId,
    /// Seconds left before it expires
    pub duration: f32,
    /// Damage on a direct hit
    pub damage: f32,
    pub explodes_on_impact: bool,
}

impl Projectile {
    pub fn new(kind: ProjectileKind, owner: ActorId) -> Self {
        let (duration, damage, explodes_on_impact) = match kind {
            ProjectileKind::AtomicMole => (MOLE_DURATION, MOLE_DAMAGE, false),
            ProjectileKind::OzoneShell => (OZONE_DURATION, OZONE_DAMAGE, true),
        };
        Self {
            kind,
            owner,
            duration,
            damage,
            explodes_on_impact,
        }
    }
}

impl World {
    /// Launch a projectile owned by `owner`
    pub fn fire_projectile(
        &mut self,
        kind: ProjectileKind,
        owner: ActorId,
        pos: Vec2,
        vel: Vec2,
    ) -> ActorId {
        let id = self.next_actor_id();
        let mut actor = Actor::new_projectile(id, Projectile::new(kind, owner), self.config.scale);
        actor.pos = pos;
        self.add(actor, false);
        if let Some(actor) = self.actor_mut(id) {
            actor.vel = vel;
            actor.track_heading();
            actor.rotation = angle_of(actor.direction);
        }
        id
    }

    pub(crate) fn update_projectile(&mut self, idx: usize, dt: f32) {
        let actor = &mut self.actors[idx];
        let Some(projectile) = actor.projectile_mut() else {
            return;
        };
        projectile.duration -= dt;
        let expired = projectile.duration <= 0.0;
        actor.track_heading();
        actor.rotation = angle_of(actor.direction);
        if expired {
            self.spend_projectile(idx, None);
        }
    }

    pub(crate) fn projectile_touch(&mut self, idx: usize, other: usize) -> bool {
        let Some(projectile) = self.actors[idx].projectile() else {
            return false;
        };
        let (owner, damage) = (projectile.owner, projectile.damage);
        let (id, vel, mass) = (self.actors[idx].id, self.actors[idx].vel, self.actors[idx].mass);
        let target = &self.actors[other];
        if target.id == owner {
            return false;
        }

        match target.category() {
            Category::Projectile | Category::Field => return false,
            Category::Player | Category::FreeRadical => {
                self.damage_at(other, Some(id), damage);
            }
            Category::Diatomic | Category::GreenhouseGas => {
                self.unbond_at(other);
            }
            Category::Atom => {
                let target = &mut self.actors[other];
                if target.mass > 0.0 {
                    target.vel += vel * mass / target.mass;
                }
            }
        }
        self.spend_projectile(idx, Some(other));
        true
    }

    /// Remove a projectile, detonating it if it explodes
    ///
    /// `direct` is the actor already hit, which splash damage skips.
    fn spend_projectile(&mut self, idx: usize, direct: Option<usize>) {
        let actor = &self.actors[idx];
        let Some(projectile) = actor.projectile() else {
            return;
        };
        let (kind, explodes) = (projectile.kind, projectile.explodes_on_impact);
        let (id, pos, vel) = (actor.id, actor.pos, actor.vel);
        let scale = self.config.scale;
        let colors = kind.species().colors();
        self.base_die(idx);

        if !explodes {
            self.emit(ParticleBurst::sparks(pos, vel * 0.1, colors, scale));
            self.play(Cue::ExplosionSmall);
            return;
        }

        self.emit(ParticleBurst::explosion(pos, Vec2::ZERO, colors, scale));
        self.play(Cue::ExplosionMedium);

        let (radius, damage) = kind.splash();
        if damage <= 0.0 {
            return;
        }
        let radius = radius * scale;
        let victims: Vec<usize> = self
            .actors
            .iter()
            .enumerate()
            .filter(|&(j, target)| {
                Some(j) != direct
                    && target.is_alive()
                    && matches!(target.category(), Category::Player | Category::FreeRadical)
                    && target.pos.distance(pos) < radius + target.radius
            })
            .map(|(j, _)| j)
            .collect();
        for j in victims {
            self.damage_at(j, Some(id), damage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ArenaConfig;

    fn world() -> World {
        World::new(ArenaConfig::empty(800.0, 600.0), 4).unwrap()
    }

    /// Put slot 0 in the match, alive and past its spawn protection
    fn live_bot(world: &mut World, pos: Vec2) -> ActorId {
        let id = world.nanobot_id(0).unwrap();
        let actor = world.actor_mut(id).unwrap();
        actor.pos = pos;
        actor.nanobot_mut().unwrap().playing = true;
        world.respawn(id, false).unwrap();
        world.actor_mut(id).unwrap().nanobot_mut().unwrap().safe_timer = 0.0;
        id
    }

    #[test]
    fn test_pellet_hurts_radical_and_is_spent() {
        let mut world = world();
        let radical = world.spawn_species(Species::NitricOxide, Vec2::new(200.0, 200.0), Vec2::ZERO);
        let life = world.actor(radical).unwrap().life;
        let shot = world.fire_projectile(
            ProjectileKind::AtomicMole,
            ActorId(1),
            Vec2::new(170.0, 200.0),
            Vec2::new(300.0, 0.0),
        );

        // The radical's side sees a spent shot and refuses
        assert!(!world.touch(shot, radical).unwrap());

        assert!(world.actor(shot).unwrap().dead);
        assert!((world.actor(radical).unwrap().life - (life - MOLE_DAMAGE)).abs() < 1e-4);
    }

    #[test]
    fn test_radical_killed_by_pellet_splits() {
        let mut world = world();
        let radical = world.spawn_species(Species::NitricOxide, Vec2::new(200.0, 200.0), Vec2::ZERO);
        world.actor_mut(radical).unwrap().life = MOLE_DAMAGE * 0.5;
        let shot = world.fire_projectile(
            ProjectileKind::AtomicMole,
            ActorId(1),
            Vec2::new(170.0, 200.0),
            Vec2::new(300.0, 0.0),
        );

        world.touch(shot, radical).unwrap();

        assert!(world.actor(radical).unwrap().dead);
        assert_eq!(world.count_species(Species::Nitrogen), 1);
        assert_eq!(world.count_species(Species::Oxygen), 1);
    }

    #[test]
    fn test_owner_is_never_hit() {
        let mut world = world();
        let bot = live_bot(&mut world, Vec2::new(300.0, 300.0));
        let shot = world.fire_projectile(
            ProjectileKind::OzoneShell,
            bot,
            Vec2::new(320.0, 300.0),
            Vec2::new(200.0, 0.0),
        );
        assert!(!world.touch(shot, bot).unwrap());
        assert!(world.actor(shot).unwrap().is_alive());
    }

    #[test]
    fn test_shell_splits_greenhouse_gas() {
        let mut world = world();
        let gas = world.spawn_species(Species::CarbonDioxide, Vec2::new(400.0, 300.0), Vec2::ZERO);
        let shot = world.fire_projectile(
            ProjectileKind::OzoneShell,
            ActorId(1),
            Vec2::new(370.0, 300.0),
            Vec2::new(200.0, 0.0),
        );
        world.touch(shot, gas).unwrap();
        assert!(world.actor(gas).unwrap().dead);
        assert_eq!(world.count_species(Species::OxygenTwo), 1);
        assert_eq!(world.count_species(Species::Carbon), 1);
    }

    #[test]
    fn test_shell_splash_reaches_nearby_bot() {
        let mut world = world();
        let bot = live_bot(&mut world, Vec2::new(400.0, 340.0));
        let gas = world.spawn_species(Species::Water, Vec2::new(400.0, 300.0), Vec2::ZERO);
        let shot = world.fire_projectile(
            ProjectileKind::OzoneShell,
            ActorId(999),
            Vec2::new(375.0, 300.0),
            Vec2::new(200.0, 0.0),
        );
        world.touch(shot, gas).unwrap();
        let shield = world.actor(bot).unwrap().nanobot().unwrap().shield;
        assert!(shield < NANOBOT_MAX_SHIELD);
    }

    #[test]
    fn test_pellet_knocks_atoms() {
        let mut world = world();
        let atom = world.spawn_species(Species::Hydrogen, Vec2::new(200.0, 200.0), Vec2::ZERO);
        let shot = world.fire_projectile(
            ProjectileKind::AtomicMole,
            ActorId(1),
            Vec2::new(185.0, 200.0),
            Vec2::new(100.0, 0.0),
        );
        world.touch(shot, atom).unwrap();
        assert!(world.actor(atom).unwrap().vel.x > 0.0);
    }

    #[test]
    fn test_projectile_expires() {
        let mut world = world();
        let shot = world.fire_projectile(
            ProjectileKind::AtomicMole,
            ActorId(1),
            Vec2::new(400.0, 300.0),
            Vec2::ZERO,
        );
        let idx = world.index_of(shot).unwrap();
        world.update_projectile(idx, MOLE_DURATION + 0.01);
        assert!(world.actor(shot).unwrap().dead);
    }

    #[test]
    fn test_projectile_leaving_arena_dies() {
        let mut world = world();
        let shot = world.fire_projectile(
            ProjectileKind::AtomicMole,
            ActorId(1),
            Vec2::new(798.0, 300.0),
            Vec2::new(480.0, 0.0),
        );
        world.move_world(1.0 / 60.0);
        assert!(world.actor(shot).unwrap().dead);
    }
}
