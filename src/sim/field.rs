//! Attractor and repulsor fields
//!
//! Poles, repel points and a charged NanoBot all push nearby actors the same
//! way: a linear falloff from the source out to its influence radius, with a
//! per-category polarity table deciding who is pulled and who is pushed.

use glam::Vec2;

use super::geometry::direction_or;
use super::species::{Category, Species};
use super::state::World;
use crate::consts::{POLE_STRENGTH, REPEL_STRENGTH};

/// How a field treats one category of actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub category: Category,
    /// +1 pushes away from the source, -1 pulls toward it
    pub polarity: f32,
}

const fn push(category: Category) -> FieldRule {
    FieldRule {
        category,
        polarity: 1.0,
    }
}

const fn pull(category: Category) -> FieldRule {
    FieldRule {
        category,
        polarity: -1.0,
    }
}

pub const NEGATIVE_CHARGE_RULES: &[FieldRule] = &[
    push(Category::GreenhouseGas),
    push(Category::FreeRadical),
    push(Category::Player),
];

pub const POSITIVE_CHARGE_RULES: &[FieldRule] = &[
    pull(Category::Atom),
    pull(Category::Diatomic),
    pull(Category::FreeRadical),
    push(Category::GreenhouseGas),
];

pub const POSITIVE_POLE_RULES: &[FieldRule] = &[pull(Category::Atom), pull(Category::Diatomic)];

pub const NEGATIVE_POLE_RULES: &[FieldRule] =
    &[push(Category::GreenhouseGas), push(Category::FreeRadical)];

pub const REPEL_POINT_RULES: &[FieldRule] = &[
    push(Category::Atom),
    push(Category::Diatomic),
    push(Category::GreenhouseGas),
    push(Category::FreeRadical),
    push(Category::Projectile),
    push(Category::Player),
];

/// Rules and unscaled strength of a static field species
pub fn field_rules(species: Species) -> Option<(&'static [FieldRule], f32)> {
    match species {
        Species::PositivePole => Some((POSITIVE_POLE_RULES, POLE_STRENGTH)),
        Species::NegativePole => Some((NEGATIVE_POLE_RULES, POLE_STRENGTH)),
        Species::RepelPoint => Some((REPEL_POINT_RULES, REPEL_STRENGTH)),
        _ => None,
    }
}

impl World {
    /// Push or pull every live actor within `radius` of `source`
    ///
    /// Actors with no matching rule, no mass or no collision are left alone.
    /// Returns how many actors were affected.
    pub(crate) fn apply_field(
        &mut self,
        source: usize,
        radius: f32,
        strength: f32,
        rules: &[FieldRule],
        dt: f32,
    ) -> usize {
        let center = self.actors[source].pos;
        let mut affected = 0;
        for (j, target) in self.actors.iter_mut().enumerate() {
            if j == source || !target.is_solid() || target.mass <= 0.0 {
                continue;
            }
            let category = target.category();
            let Some(rule) = rules.iter().find(|rule| rule.category == category) else {
                continue;
            };
            let distance = target.pos.distance(center);
            if distance >= radius {
                continue;
            }
            let dir = direction_or(center, target.pos, Vec2::X);
            let falloff = 1.0 - distance / radius;
            target.vel += dir * rule.polarity * strength * falloff * dt;
            affected += 1;
        }
        affected
    }

    /// Per-tick update of a static field actor
    pub(crate) fn update_field(&mut self, idx: usize, dt: f32) {
        let Some((rules, strength)) = field_rules(self.actors[idx].species) else {
            return;
        };
        let radius = self.actors[idx].collision_radius;
        let strength = strength * self.config.scale;
        self.actors[idx].rotation += self.actors[idx].spin * dt;
        self.apply_field(idx, radius, strength, rules, dt);
    }
}
