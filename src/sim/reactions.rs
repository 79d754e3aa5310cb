//! Chemistry on contact
//!
//! `touch_at` is the single dispatch point for "this actor was hit by that
//! one". Chemicals consult the reaction table; players, projectiles and
//! fields have their own handlers.

use super::actor::ActorKind;
use super::species::{Category, Species};
use super::state::World;

/// Outcome of two chemicals meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Same-element pair, counted through the bond ledger
    Pair { product: Species },
    /// Both reactants are replaced by `product`
    Bond { product: Species },
    /// `victim` breaks apart; the catalyst survives
    Catalyze { victim: Species },
    /// Plain elastic bounce
    Bounce,
}

/// Direct bonds: (reactant, reactant, product)
const BONDS: &[(Species, Species, Species)] = &[
    (Species::Oxygen, Species::OxygenTwo, Species::Ozone),
    (Species::Carbon, Species::OxygenTwo, Species::CarbonDioxide),
    (Species::Oxygen, Species::Hydrogen, Species::Hydroxyl),
    (Species::Nitrogen, Species::Oxygen, Species::NitricOxide),
    (Species::Hydroxyl, Species::Hydrogen, Species::Water),
    (Species::Carbon, Species::Deuterium, Species::Methylene),
    (Species::Methylene, Species::Deuterium, Species::Methane),
    (Species::NitrogenTwo, Species::Oxygen, Species::NitrousOxide),
    (Species::Methylene, Species::Fluorine, Species::Cfc1),
    (Species::Methylene, Species::Bromine, Species::Cfc2),
];

/// Ozone-depleting catalysts: (catalyst, victim)
const CATALYSTS: &[(Species, Species)] = &[
    (Species::Chlorine, Species::Ozone),
    (Species::NitricOxide, Species::Ozone),
    (Species::Cfc1, Species::Ozone),
    (Species::Cfc2, Species::Ozone),
];

impl Reaction {
    /// Look up what happens when `a` meets `b` (order does not matter)
    pub fn between(a: Species, b: Species) -> Reaction {
        if a == b {
            if let Some(product) = a.same_element_product() {
                return Reaction::Pair { product };
            }
        }
        for &(x, y, product) in BONDS {
            if (a, b) == (x, y) || (a, b) == (y, x) {
                return Reaction::Bond { product };
            }
        }
        for &(catalyst, victim) in CATALYSTS {
            if (a, b) == (catalyst, victim) || (a, b) == (victim, catalyst) {
                return Reaction::Catalyze { victim };
            }
        }
        Reaction::Bounce
    }
}

impl World {
    /// One side of a touch; returns whether `idx` accepts the contact
    pub(crate) fn touch_at(&mut self, idx: usize, other: usize) -> bool {
        if idx == other || self.actors[idx].dead || self.actors[other].dead {
            return false;
        }
        match self.actors[idx].kind {
            ActorKind::NanoBot(_) => self.nanobot_touch(idx, other),
            ActorKind::Projectile(_) => self.projectile_touch(idx, other),
            ActorKind::Field => false,
            ActorKind::Chemical | ActorKind::FreeRadical => self.chemical_touch(idx, other),
        }
    }

    fn chemical_touch(&mut self, idx: usize, other: usize) -> bool {
        let me = self.actors[idx].species;
        let them = self.actors[other].species;

        match them.category() {
            Category::Player => {
                let damage = me.info().touch_damage;
                if damage > 0.0 {
                    let source = Some(self.actors[idx].id);
                    self.damage_at(other, source, damage);
                }
                true
            }
            Category::Field => false,
            // Projectiles resolve the hit from their own side
            Category::Projectile => true,
            _ => match Reaction::between(me, them) {
                Reaction::Pair { .. } => {
                    self.bond_same_element(idx, other, 1);
                    true
                }
                Reaction::Bond { product } => {
                    self.bond_pair(idx, other, product);
                    true
                }
                Reaction::Catalyze { victim } => {
                    let target = if me == victim { idx } else { other };
                    self.unbond_at(target);
                    true
                }
                Reaction::Bounce => true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Cue, CueRecorder};
    use crate::settings::ArenaConfig;
    use glam::Vec2;

    fn world() -> World {
        World::new(ArenaConfig::empty(800.0, 600.0), 5).unwrap()
    }

    #[test]
    fn test_table_is_symmetric() {
        assert_eq!(
            Reaction::between(Species::Carbon, Species::OxygenTwo),
            Reaction::between(Species::OxygenTwo, Species::Carbon)
        );
        assert_eq!(
            Reaction::between(Species::Ozone, Species::Chlorine),
            Reaction::Catalyze {
                victim: Species::Ozone
            }
        );
    }

    #[test]
    fn test_same_element_pairs() {
        assert_eq!(
            Reaction::between(Species::Hydrogen, Species::Hydrogen),
            Reaction::Pair {
                product: Species::Deuterium
            }
        );
        assert_eq!(
            Reaction::between(Species::Carbon, Species::Carbon),
            Reaction::Bounce
        );
    }

    #[test]
    fn test_direct_bond_replaces_reactants() {
        let audio = CueRecorder::new();
        let mut world = world().with_audio(audio.clone());
        let c = world.spawn_species(Species::Carbon, Vec2::new(200.0, 200.0), Vec2::ZERO);
        let o2 = world.spawn_species(Species::OxygenTwo, Vec2::new(228.0, 200.0), Vec2::ZERO);

        world.touch(c, o2).unwrap();

        assert!(world.actor(c).unwrap().dead);
        assert!(world.actor(o2).unwrap().dead);
        assert_eq!(world.count_species(Species::CarbonDioxide), 1);
        assert_eq!(audio.count(Cue::Bond), 1);
    }

    #[test]
    fn test_chlorine_breaks_ozone_and_survives() {
        let mut world = world();
        let cl = world.spawn_species(Species::Chlorine, Vec2::new(200.0, 200.0), Vec2::ZERO);
        let o3 = world.spawn_species(Species::Ozone, Vec2::new(236.0, 200.0), Vec2::ZERO);

        world.touch(cl, o3).unwrap();

        assert!(world.actor(cl).unwrap().is_alive());
        assert!(world.actor(o3).unwrap().dead);
        assert_eq!(world.count_species(Species::OxygenTwo), 1);
        assert_eq!(world.count_species(Species::Oxygen), 1);
    }

    #[test]
    fn test_touch_with_dead_actor_is_rejected() {
        let mut world = world();
        let a = world.spawn_species(Species::Carbon, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let b = world.spawn_species(Species::Fluorine, Vec2::new(120.0, 100.0), Vec2::ZERO);
        world.kill(b, None).unwrap();
        assert!(!world.touch(a, b).unwrap());
    }

    #[test]
    fn test_inert_pair_bounces() {
        let mut world = world();
        let a = world.spawn_species(Species::Water, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let b = world.spawn_species(Species::Methane, Vec2::new(140.0, 100.0), Vec2::ZERO);
        assert!(world.touch(a, b).unwrap());
        assert!(world.actor(a).unwrap().is_alive());
        assert!(world.actor(b).unwrap().is_alive());
    }
}
