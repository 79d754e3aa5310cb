//! Collision detection and response
//!
//! Each live actor sweeps its movement for the tick against every other solid
//! actor, resolves only the nearest contact through `touch_at`, and exchanges
//! momentum along the contact normal when both sides accept.

use glam::Vec2;

use super::geometry::sweep_circles;
use super::species::Category;
use super::state::World;
use crate::audio::Cue;
use crate::consts::MIN_MOVEMENT;

/// One potential contact found by a swept test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Distance travelled along the movement before contact
    pub distance: f32,
    /// Contact normal, from the mover toward `other`
    pub normal: Vec2,
    /// Registry index of the other actor
    pub other: usize,
}

/// 1-D elastic exchange along `normal`; tangential components pass through
///
/// Returns `None` when either mass is zero or negative (immovable).
pub fn adjust_velocities(
    v1: Vec2,
    m1: f32,
    v2: Vec2,
    m2: f32,
    normal: Vec2,
) -> Option<(Vec2, Vec2)> {
    if m1 <= 0.0 || m2 <= 0.0 {
        return None;
    }
    let u1 = v1.dot(normal);
    let u2 = v2.dot(normal);
    let total = m1 + m2;
    let w1 = (u1 * (m1 - m2) + 2.0 * m2 * u2) / total;
    let w2 = (u2 * (m2 - m1) + 2.0 * m1 * u1) / total;
    Some((v1 + (w1 - u1) * normal, v2 + (w2 - u2) * normal))
}

impl World {
    /// Swept contacts of actor `idx` moving by `movement`, unsorted
    pub(crate) fn collide(&self, idx: usize, movement: Vec2) -> Vec<CollisionResult> {
        let me = &self.actors[idx];
        self.actors
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != idx && other.is_solid())
            .filter_map(|(j, other)| {
                sweep_circles(me.pos, me.radius, movement, other.pos, other.radius).map(
                    |(distance, normal)| CollisionResult {
                        distance,
                        normal,
                        other: j,
                    },
                )
            })
            .collect()
    }

    /// Resolve the nearest contact of this tick's movement
    ///
    /// Returns the movement still to apply: unchanged when nothing was hit or
    /// the contact was refused, zero when the contact was accepted.
    pub(crate) fn move_and_collide(&mut self, idx: usize, movement: Vec2) -> Vec2 {
        if !self.actors[idx].collidable || movement.length() < MIN_MOVEMENT {
            return movement;
        }

        let mut hits = self.collide(idx, movement);
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let Some(hit) = hits.first().copied() else {
            return movement;
        };
        let other = hit.other;

        // Both sides always hear about the contact
        let first = self.touch_at(idx, other);
        let second = self.touch_at(other, idx);
        if !(first && second) {
            return movement;
        }

        let (a, b) = (&self.actors[idx], &self.actors[other]);
        let involves_player = a.category() == Category::Player || b.category() == Category::Player;
        if a.is_alive() && b.is_alive() {
            if let Some((va, vb)) = adjust_velocities(a.vel, a.mass, b.vel, b.mass, hit.normal) {
                log::trace!(
                    "{:?} bounced off {:?} at distance {:.2}",
                    a.species,
                    b.species,
                    hit.distance
                );
                self.actors[idx].vel = va;
                self.actors[other].vel = vb;
                if involves_player {
                    self.play(Cue::AsteroidTouch);
                }
            }
        }
        self.actors[idx].collided_this_frame = true;
        self.actors[other].collided_this_frame = true;
        Vec2::ZERO
    }

    /// Move every live actor by its velocity, resolving contacts on the way
    ///
    /// Actors spawned during the pass are appended and wait for the next tick.
    pub(crate) fn move_world(&mut self, dt: f32) {
        let count = self.actors.len();
        for idx in 0..count {
            if self.actors[idx].dead {
                continue;
            }
            let mut movement = self.actors[idx].vel * dt;
            if !self.actors[idx].collided_this_frame {
                movement = self.move_and_collide(idx, movement);
            }
            if self.actors[idx].dead {
                continue;
            }
            self.actors[idx].pos += movement;
            self.confine(idx);
        }
    }

    /// Bounce off the arena walls; projectiles that leave the arena expire
    fn confine(&mut self, idx: usize) {
        let (min, max) = self.config.bounds();
        if self.actors[idx].category() == Category::Projectile {
            if !self.config.contains(self.actors[idx].pos) {
                self.base_die(idx);
            }
            return;
        }

        let actor = &mut self.actors[idx];
        let r = actor.radius;
        if actor.pos.x < min.x + r {
            actor.pos.x = min.x + r;
            actor.vel.x = actor.vel.x.abs();
        } else if actor.pos.x > max.x - r {
            actor.pos.x = max.x - r;
            actor.vel.x = -actor.vel.x.abs();
        }
        if actor.pos.y < min.y + r {
            actor.pos.y = min.y + r;
            actor.vel.y = actor.vel.y.abs();
        } else if actor.pos.y > max.y - r {
            actor.pos.y = max.y - r;
            actor.vel.y = -actor.vel.y.abs();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ArenaConfig;
    use crate::sim::species::Species;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn world() -> World {
        World::new(ArenaConfig::empty(800.0, 600.0), 21).unwrap()
    }

    #[test]
    fn test_equal_masses_swap_normal_velocity() {
        let (a, b) = adjust_velocities(
            Vec2::new(5.0, 2.0),
            1.0,
            Vec2::new(-3.0, 0.0),
            1.0,
            Vec2::X,
        )
        .unwrap();
        assert!((a - Vec2::new(-3.0, 2.0)).length() < 1e-5);
        assert!((b - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_immovable_mass_is_skipped() {
        assert!(adjust_velocities(Vec2::X, 1.0, Vec2::ZERO, 0.0, Vec2::X).is_none());
        assert!(adjust_velocities(Vec2::X, -2.0, Vec2::ZERO, 1.0, Vec2::X).is_none());
    }

    #[test]
    fn test_head_on_carbons_bounce() {
        let mut world = world();
        let a = world.spawn_species(Species::Carbon, Vec2::new(100.0, 100.0), Vec2::new(60.0, 0.0));
        let b = world.spawn_species(Species::Carbon, Vec2::new(124.5, 100.0), Vec2::new(-60.0, 0.0));

        world.move_world(DT);

        let (a, b) = (world.actor(a).unwrap(), world.actor(b).unwrap());
        assert!((a.vel - Vec2::new(-60.0, 0.0)).length() < 1e-3);
        assert!((b.vel - Vec2::new(60.0, 0.0)).length() < 1e-3);
        assert_eq!(a.pos, Vec2::new(100.0, 100.0));
        assert!(a.collided_this_frame && b.collided_this_frame);
    }

    #[test]
    fn test_nearest_contact_only() {
        let mut world = world();
        let mover = world.spawn_species(Species::Carbon, Vec2::new(100.0, 100.0), Vec2::new(600.0, 0.0));
        let near = world.spawn_species(Species::Fluorine, Vec2::new(125.0, 100.0), Vec2::ZERO);
        let far = world.spawn_species(Species::Bromine, Vec2::new(135.0, 100.0), Vec2::ZERO);

        let idx = world.index_of(mover).unwrap();
        let hits = world.collide(idx, Vec2::new(10.0, 0.0));
        assert_eq!(hits.len(), 2);

        world.move_and_collide(idx, Vec2::new(10.0, 0.0));
        assert!(world.actor(near).unwrap().vel.x > 0.0);
        assert_eq!(world.actor(far).unwrap().vel, Vec2::ZERO);
    }

    #[test]
    fn test_fields_are_not_hit() {
        let mut world = world();
        let mover = world.spawn_species(Species::Carbon, Vec2::new(100.0, 100.0), Vec2::new(60.0, 0.0));
        world.spawn_species(Species::RepelPoint, Vec2::new(120.0, 100.0), Vec2::ZERO);
        let idx = world.index_of(mover).unwrap();
        assert!(world.collide(idx, Vec2::new(5.0, 0.0)).is_empty());
    }

    #[test]
    fn test_walls_reflect() {
        let mut world = world();
        let id = world.spawn_species(Species::Oxygen, Vec2::new(5.0, 300.0), Vec2::new(-90.0, 0.0));
        world.move_world(DT);
        let actor = world.actor(id).unwrap();
        assert!(actor.vel.x > 0.0);
        assert!((actor.pos.x - actor.radius).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn proptest_elastic_exchange_conserves_momentum_and_energy(
            v1x in -300.0f32..300.0, v1y in -300.0f32..300.0,
            v2x in -300.0f32..300.0, v2y in -300.0f32..300.0,
            m1 in 0.5f32..20.0, m2 in 0.5f32..20.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let (v1, v2) = (Vec2::new(v1x, v1y), Vec2::new(v2x, v2y));
            let normal = Vec2::from_angle(angle);
            let (w1, w2) = adjust_velocities(v1, m1, v2, m2, normal).unwrap();

            let before = v1 * m1 + v2 * m2;
            let after = w1 * m1 + w2 * m2;
            prop_assert!((before - after).length() <= 1e-2 * (1.0 + before.length()));

            let e_before = 0.5 * (m1 * v1.length_squared() + m2 * v2.length_squared());
            let e_after = 0.5 * (m1 * w1.length_squared() + m2 * w2.length_squared());
            prop_assert!((e_before - e_after).abs() <= 1e-3 * (1.0 + e_before));
        }
    }
}
