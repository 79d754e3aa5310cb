//! Bonding ledger
//!
//! Two protocols combine and split molecules:
//! - same-element pairs (O+O, H+H, N+N) are counted through a per-element
//!   [`BondCounter`]; the pair bonds when both sides of one collision have
//!   touched
//! - everything else bonds or splits directly from a position, velocity and
//!   heading, using the recipes in `species`

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use super::particles::ParticleBurst;
use super::species::{PRIMARY_VELOCITY_SCALE, SECONDARY_VELOCITY_SCALE, Species};
use super::state::{SimError, World};
use crate::audio::Cue;

/// Touches counted toward one same-element bond
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondCounter {
    pub count: u32,
    /// The colliding pair being counted (lower id first)
    pub pair: Option<(ActorId, ActorId)>,
}

/// Per-element counters for the diatomic-forming elements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BondLedger {
    pub oxygen: BondCounter,
    pub hydrogen: BondCounter,
    pub nitrogen: BondCounter,
    /// Same-element bonds completed so far
    pub completed: u64,
}

impl BondLedger {
    /// Current count for an element (0 for elements without a counter)
    pub fn count(&self, element: Species) -> u32 {
        self.entry(element).map_or(0, |entry| entry.count)
    }

    fn entry(&self, element: Species) -> Option<&BondCounter> {
        match element {
            Species::Oxygen => Some(&self.oxygen),
            Species::Hydrogen => Some(&self.hydrogen),
            Species::Nitrogen => Some(&self.nitrogen),
            _ => None,
        }
    }

    fn entry_mut(&mut self, element: Species) -> Option<&mut BondCounter> {
        match element {
            Species::Oxygen => Some(&mut self.oxygen),
            Species::Hydrogen => Some(&mut self.hydrogen),
            Species::Nitrogen => Some(&mut self.nitrogen),
            _ => None,
        }
    }

    /// Count `count` touches between `a` and `b`. Returns true exactly when
    /// the counter reaches 2, after which it resets.
    ///
    /// A touch from a different pair restarts the counter for that pair, so
    /// unrelated collisions of the same element never bond with each other.
    pub fn register(&mut self, element: Species, a: ActorId, b: ActorId, count: u32) -> bool {
        let Some(entry) = self.entry_mut(element) else {
            return false;
        };
        let pair = if a <= b { (a, b) } else { (b, a) };
        if entry.pair != Some(pair) {
            *entry = BondCounter {
                count: 0,
                pair: Some(pair),
            };
        }
        entry.count += count;

        match entry.count.cmp(&2) {
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => {
                *entry = BondCounter::default();
                self.completed += 1;
                true
            }
            std::cmp::Ordering::Greater => {
                *entry = BondCounter::default();
                false
            }
        }
    }
}

impl World {
    /// Count one side of a same-element touch; bonds the pair on the second
    pub(crate) fn bond_same_element(&mut self, idx: usize, other: usize, count: u32) -> bool {
        let element = self.actors[idx].species;
        let Some(product) = element.same_element_product() else {
            return false;
        };
        let (a, b) = (self.actors[idx].id, self.actors[other].id);
        if !self.bonds.register(element, a, b, count) {
            return false;
        }
        self.bond_pair(idx, other, product);
        true
    }

    /// Count touches between two atoms of `element`; `Ok(true)` once they bond
    fn bond_counted(
        &mut self,
        element: Species,
        a: ActorId,
        b: ActorId,
        count: u32,
    ) -> Result<bool, SimError> {
        let ia = self.index_of(a).ok_or(SimError::UnknownActor(a))?;
        let ib = self.index_of(b).ok_or(SimError::UnknownActor(b))?;
        let (first, second) = (&self.actors[ia], &self.actors[ib]);
        if ia == ib || first.dead || second.dead {
            return Ok(false);
        }
        if first.species != element || second.species != element {
            return Ok(false);
        }
        Ok(self.bond_same_element(ia, ib, count))
    }

    /// Two oxygen atoms into OxygenTwo
    pub fn bond_oxygen_two(&mut self, a: ActorId, b: ActorId, count: u32) -> Result<bool, SimError> {
        self.bond_counted(Species::Oxygen, a, b, count)
    }

    /// Two hydrogen atoms into Deuterium
    pub fn bond_deuterium(&mut self, a: ActorId, b: ActorId, count: u32) -> Result<bool, SimError> {
        self.bond_counted(Species::Hydrogen, a, b, count)
    }

    /// Two nitrogen atoms into NitrogenTwo
    pub fn bond_nitrogen_two(&mut self, a: ActorId, b: ActorId, count: u32) -> Result<bool, SimError> {
        self.bond_counted(Species::Nitrogen, a, b, count)
    }

    /// Replace two actors with `product` at their midpoint
    pub(crate) fn bond_pair(&mut self, idx: usize, other: usize, product: Species) -> ActorId {
        let (a, b) = (&self.actors[idx], &self.actors[other]);
        let pos = (a.pos + b.pos) * 0.5;
        let vel = (a.vel + b.vel) * 0.5;
        let dir = (a.direction + b.direction)
            .try_normalize()
            .unwrap_or(a.direction);
        let formulas = (a.species.info().formula, b.species.info().formula);

        self.base_die(idx);
        self.base_die(other);
        let id = self.bond(product, pos, vel, dir);
        log::debug!(
            "{} + {} -> {} at ({:.0}, {:.0})",
            formulas.0,
            formulas.1,
            product.info().formula,
            pos.x,
            pos.y
        );
        id
    }

    /// Spawn a compound directly from a position, velocity and heading
    pub fn bond(&mut self, product: Species, pos: Vec2, vel: Vec2, dir: Vec2) -> ActorId {
        let id = self.spawn_species(product, pos, vel);
        if let Some(actor) = self.actor_mut(id) {
            actor.direction = dir;
        }
        let scale = self.config.scale;
        self.emit(ParticleBurst::bond_flash(pos, vel, product.colors(), scale));
        self.play(Cue::Bond);
        id
    }

    /// Spawn the decay products of `species` from an impact point
    ///
    /// The primary fragment stays at `pos` with half the velocity; the
    /// secondary starts at the recipe offset with double the velocity.
    pub fn unbond_fragments(
        &mut self,
        species: Species,
        pos: Vec2,
        vel: Vec2,
        dir: Vec2,
    ) -> Option<(ActorId, ActorId)> {
        let recipe = species.unbond_recipe()?;
        let scale = self.config.scale;

        let first = self.spawn_species(recipe.primary, pos, vel * PRIMARY_VELOCITY_SCALE);
        let second = self.spawn_species(
            recipe.secondary,
            pos + recipe.offset * scale,
            vel * SECONDARY_VELOCITY_SCALE,
        );
        for id in [first, second] {
            if let Some(actor) = self.actor_mut(id) {
                actor.direction = dir;
            }
        }

        self.emit(ParticleBurst::explosion(pos, vel, species.colors(), scale));
        self.play(Cue::Unbond);
        log::debug!(
            "{} -> {} + {}",
            species.info().formula,
            recipe.primary.info().formula,
            recipe.secondary.info().formula
        );
        Some((first, second))
    }

    /// Destroy a compound and spawn its fragments
    pub(crate) fn unbond_at(&mut self, idx: usize) -> Option<(ActorId, ActorId)> {
        let actor = &self.actors[idx];
        if actor.dead || actor.species.unbond_recipe().is_none() {
            return None;
        }
        let (species, pos, vel, dir) = (actor.species, actor.pos, actor.vel, actor.direction);
        self.base_die(idx);
        self.unbond_fragments(species, pos, vel, dir)
    }

    /// Split a compound by id; `Ok(None)` for actors with nothing to split
    pub fn unbond(&mut self, id: ActorId) -> Result<Option<(ActorId, ActorId)>, SimError> {
        let idx = self.index_of(id).ok_or(SimError::UnknownActor(id))?;
        Ok(self.unbond_at(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ArenaConfig;
    use crate::sim::particles::BurstRecorder;
    use crate::sim::species::Category;

    fn world() -> World {
        World::new(ArenaConfig::empty(800.0, 600.0), 11).unwrap()
    }

    #[test]
    fn test_counter_bonds_on_second_touch() {
        let mut ledger = BondLedger::default();
        let (a, b) = (ActorId(1), ActorId(2));
        assert!(!ledger.register(Species::Oxygen, a, b, 1));
        assert_eq!(ledger.count(Species::Oxygen), 1);
        assert!(ledger.register(Species::Oxygen, b, a, 1));
        assert_eq!(ledger.count(Species::Oxygen), 0);
        assert_eq!(ledger.completed, 1);
    }

    #[test]
    fn test_counter_ignores_elements_without_diatomic() {
        let mut ledger = BondLedger::default();
        assert!(!ledger.register(Species::Carbon, ActorId(1), ActorId(2), 2));
        assert_eq!(ledger.count(Species::Carbon), 0);
    }

    #[test]
    fn test_unrelated_pairs_do_not_cross_bond() {
        let mut ledger = BondLedger::default();
        assert!(!ledger.register(Species::Oxygen, ActorId(1), ActorId(2), 1));
        // A different oxygen pair restarts the count instead of completing it
        assert!(!ledger.register(Species::Oxygen, ActorId(3), ActorId(4), 1));
        assert_eq!(ledger.count(Species::Oxygen), 1);
        assert_eq!(ledger.oxygen.pair, Some((ActorId(3), ActorId(4))));
    }

    #[test]
    fn test_counter_overshoot_resets_without_bond() {
        let mut ledger = BondLedger::default();
        assert!(!ledger.register(Species::Nitrogen, ActorId(1), ActorId(2), 1));
        assert!(!ledger.register(Species::Nitrogen, ActorId(1), ActorId(2), 2));
        assert_eq!(ledger.count(Species::Nitrogen), 0);
    }

    #[test]
    fn test_oxygen_pair_touch_forms_oxygen_two() {
        let recorder = BurstRecorder::new();
        let mut world = world().with_particle_sink(recorder.clone());
        let a = world.spawn_species(Species::Oxygen, Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0));
        let b = world.spawn_species(Species::Oxygen, Vec2::new(124.0, 100.0), Vec2::new(-4.0, 0.0));

        world.touch(a, b).unwrap();

        assert!(world.actor(a).unwrap().dead);
        assert!(world.actor(b).unwrap().dead);
        assert_eq!(world.count_species(Species::OxygenTwo), 1);
        let product = world
            .live_actors()
            .find(|actor| actor.species == Species::OxygenTwo)
            .unwrap();
        assert_eq!(product.pos, Vec2::new(112.0, 100.0));
        assert_eq!(product.vel, Vec2::new(3.0, 0.0));
        assert_eq!(recorder.len(), 1);
        assert_eq!(world.bond_ledger().count(Species::Oxygen), 0);
    }

    #[test]
    fn test_oxygen_touching_other_element_leaves_counter_alone() {
        let mut world = world();
        let o = world.spawn_species(Species::Oxygen, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let n = world.spawn_species(Species::Fluorine, Vec2::new(120.0, 100.0), Vec2::ZERO);
        world.touch(o, n).unwrap();
        assert_eq!(world.bond_ledger().count(Species::Oxygen), 0);
        assert!(world.actor(o).unwrap().is_alive());
    }

    #[test]
    fn test_named_wrappers_check_element() {
        let mut world = world();
        let h1 = world.spawn_species(Species::Hydrogen, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let h2 = world.spawn_species(Species::Hydrogen, Vec2::new(116.0, 100.0), Vec2::ZERO);
        assert!(!world.bond_nitrogen_two(h1, h2, 2).unwrap());
        assert!(world.bond_deuterium(h1, h2, 2).unwrap());
        assert_eq!(world.count_species(Species::Deuterium), 1);
        assert!(world.bond_oxygen_two(h1, ActorId(9999), 1).is_err());
    }

    #[test]
    fn test_carbon_dioxide_unbond() {
        let mut world = world();
        let pos = Vec2::new(300.0, 200.0);
        let vel = Vec2::new(20.0, -10.0);
        let co2 = world.spawn_species(Species::CarbonDioxide, pos, vel);

        let (first, second) = world.unbond(co2).unwrap().unwrap();

        assert!(world.actor(co2).unwrap().dead);
        let o2 = world.actor(first).unwrap();
        assert_eq!(o2.species, Species::OxygenTwo);
        assert_eq!(o2.pos, pos);
        assert_eq!(o2.vel, vel * 0.5);
        let carbon = world.actor(second).unwrap();
        assert_eq!(carbon.species, Species::Carbon);
        let recipe = Species::CarbonDioxide.unbond_recipe().unwrap();
        assert_eq!(carbon.pos, pos + recipe.offset);
        assert_eq!(carbon.vel, vel * 2.0);
        assert_eq!(world.count_species(Species::OxygenTwo), 1);
        assert_eq!(world.count_species(Species::Carbon), 1);
    }

    #[test]
    fn test_atoms_cannot_unbond() {
        let mut world = world();
        let h = world.spawn_species(Species::Hydrogen, Vec2::new(50.0, 50.0), Vec2::ZERO);
        assert_eq!(world.unbond(h).unwrap(), None);
        assert!(world.actor(h).unwrap().is_alive());
    }

    #[test]
    fn test_bond_factory_spawns_with_heading() {
        let mut world = world();
        let id = world.bond(Species::Methane, Vec2::new(10.0, 20.0), Vec2::ZERO, Vec2::Y);
        let actor = world.actor(id).unwrap();
        assert_eq!(actor.category(), Category::GreenhouseGas);
        assert_eq!(actor.direction, Vec2::Y);
    }
}
