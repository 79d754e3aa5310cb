//! Species catalogue
//!
//! Every actor carries a [`Species`] tag. Physical constants, categories,
//! particle palettes and decay recipes are looked up here instead of being
//! spread over per-type code.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particles::Color;
use crate::consts::*;

/// Broad family an actor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Atom,
    Diatomic,
    GreenhouseGas,
    FreeRadical,
    Field,
    Projectile,
    Player,
}

/// Concrete actor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    // Atoms
    Hydrogen,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Chlorine,
    Bromine,
    // Diatomic and joint molecules
    OxygenTwo,
    NitrogenTwo,
    Deuterium,
    Methylene,
    // Greenhouse gases
    Water,
    CarbonDioxide,
    NitrousOxide,
    Methane,
    Ozone,
    // Free radicals
    NitricOxide,
    Hydroxyl,
    Cfc1,
    Cfc2,
    // Field actors
    PositivePole,
    NegativePole,
    RepelPoint,
    // Projectiles
    AtomicMole,
    OzoneShell,
    // Player
    NanoBot,
}

/// Static properties of a species (unscaled)
#[derive(Debug, Clone, Copy)]
pub struct SpeciesInfo {
    pub name: &'static str,
    pub formula: &'static str,
    pub category: Category,
    /// Physical collision radius
    pub radius: f32,
    /// Zero or less means immovable by impulses
    pub mass: f32,
    /// Influence radius (fields, charge)
    pub field_radius: f32,
    pub life: f32,
    pub max_speed: f32,
    /// Largest random spin given at spawn (radians/sec)
    pub max_spin: f32,
    /// Damage dealt to a NanoBot on contact
    pub touch_damage: f32,
    pub colors: &'static [Color],
}

/// How a compound breaks apart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnbondRecipe {
    /// Spawned at the impact point with half velocity
    pub primary: Species,
    /// Spawned at `offset` from the impact point with double velocity
    pub secondary: Species,
    /// Unscaled offset of the secondary fragment
    pub offset: Vec2,
}

/// Velocity multiplier for the fragment left at the impact point
pub const PRIMARY_VELOCITY_SCALE: f32 = 0.5;
/// Velocity multiplier for the offset fragment
pub const SECONDARY_VELOCITY_SCALE: f32 = 2.0;

const H_COLORS: &[Color] = &[Color::WHITE, Color::SKY];
const C_COLORS: &[Color] = &[Color::GRAY, Color::CHARCOAL];
const N_COLORS: &[Color] = &[Color::BLUE, Color::SKY];
const O_COLORS: &[Color] = &[Color::RED, Color::ORANGE];
const F_COLORS: &[Color] = &[Color::PALE_GREEN, Color::YELLOW];
const CL_COLORS: &[Color] = &[Color::GREEN, Color::PALE_GREEN];
const BR_COLORS: &[Color] = &[Color::BROWN, Color::RED];
const GREENHOUSE_COLORS: &[Color] = &[Color::ORANGE, Color::YELLOW, Color::WHITE];
const RADICAL_COLORS: &[Color] = &[Color::MAGENTA, Color::PURPLE];
const FIELD_COLORS: &[Color] = &[Color::CYAN];
const PLAYER_COLORS: &[Color] = &[Color::WHITE, Color::CYAN, Color::YELLOW];

#[allow(clippy::too_many_arguments)]
const fn chem(
    name: &'static str,
    formula: &'static str,
    category: Category,
    radius: f32,
    mass: f32,
    max_speed: f32,
    touch_damage: f32,
    colors: &'static [Color],
) -> SpeciesInfo {
    let life = match category {
        Category::FreeRadical => 24.0,
        _ => 1.0,
    };
    SpeciesInfo {
        name,
        formula,
        category,
        radius,
        mass,
        field_radius: radius * 2.0,
        life,
        max_speed,
        max_spin: 1.5,
        touch_damage,
        colors,
    }
}

const fn field(name: &'static str, field_radius: f32) -> SpeciesInfo {
    SpeciesInfo {
        name,
        formula: "",
        category: Category::Field,
        radius: 16.0,
        mass: 0.0,
        field_radius,
        life: 1.0,
        max_speed: 0.0,
        max_spin: 0.6,
        touch_damage: 0.0,
        colors: FIELD_COLORS,
    }
}

const fn shot(name: &'static str, radius: f32, mass: f32, max_speed: f32) -> SpeciesInfo {
    SpeciesInfo {
        name,
        formula: "",
        category: Category::Projectile,
        radius,
        mass,
        field_radius: radius,
        life: 1.0,
        max_speed,
        max_spin: 0.0,
        touch_damage: 0.0,
        colors: O_COLORS,
    }
}

impl Species {
    pub const ATOMS: [Species; 7] = [
        Species::Hydrogen,
        Species::Carbon,
        Species::Nitrogen,
        Species::Oxygen,
        Species::Fluorine,
        Species::Chlorine,
        Species::Bromine,
    ];

    pub const GREENHOUSE_GASES: [Species; 5] = [
        Species::Water,
        Species::CarbonDioxide,
        Species::NitrousOxide,
        Species::Methane,
        Species::Ozone,
    ];

    pub const FREE_RADICALS: [Species; 4] = [
        Species::NitricOxide,
        Species::Hydroxyl,
        Species::Cfc1,
        Species::Cfc2,
    ];

    /// Relative mix of atoms in the opening population
    pub const STARTING_ATOMS: [Species; 11] = [
        Species::Oxygen,
        Species::Oxygen,
        Species::Oxygen,
        Species::Carbon,
        Species::Carbon,
        Species::Hydrogen,
        Species::Hydrogen,
        Species::Hydrogen,
        Species::Nitrogen,
        Species::Fluorine,
        Species::Chlorine,
    ];

    pub fn info(self) -> SpeciesInfo {
        use Category::*;
        match self {
            Species::Hydrogen => chem("Hydrogen", "H", Atom, 8.0, 1.0, 120.0, 0.0, H_COLORS),
            Species::Carbon => chem("Carbon", "C", Atom, 12.0, 3.0, 100.0, 0.0, C_COLORS),
            Species::Nitrogen => chem("Nitrogen", "N", Atom, 12.0, 3.5, 100.0, 0.0, N_COLORS),
            Species::Oxygen => chem("Oxygen", "O", Atom, 12.0, 4.0, 100.0, 0.0, O_COLORS),
            Species::Fluorine => chem("Fluorine", "F", Atom, 10.0, 4.5, 110.0, 0.0, F_COLORS),
            Species::Chlorine => chem("Chlorine", "Cl", Atom, 14.0, 6.0, 90.0, 0.0, CL_COLORS),
            Species::Bromine => chem("Bromine", "Br", Atom, 16.0, 8.0, 80.0, 0.0, BR_COLORS),

            Species::OxygenTwo => chem("Oxygen Two", "O2", Diatomic, 18.0, 8.0, 90.0, 0.0, O_COLORS),
            Species::NitrogenTwo => {
                chem("Nitrogen Two", "N2", Diatomic, 18.0, 7.0, 90.0, 0.0, N_COLORS)
            }
            Species::Deuterium => chem("Deuterium", "H2", Diatomic, 14.0, 2.0, 110.0, 0.0, H_COLORS),
            Species::Methylene => chem("Methylene", "CH2", Diatomic, 18.0, 5.0, 90.0, 0.0, C_COLORS),

            Species::Water => {
                chem("Water", "H2O", GreenhouseGas, 18.0, 5.0, 80.0, 0.0, GREENHOUSE_COLORS)
            }
            Species::CarbonDioxide => chem(
                "Carbon Dioxide",
                "CO2",
                GreenhouseGas,
                24.0,
                11.0,
                70.0,
                0.0,
                GREENHOUSE_COLORS,
            ),
            Species::NitrousOxide => chem(
                "Nitrous Oxide",
                "N2O",
                GreenhouseGas,
                24.0,
                11.0,
                70.0,
                0.0,
                GREENHOUSE_COLORS,
            ),
            Species::Methane => {
                chem("Methane", "CH4", GreenhouseGas, 22.0, 4.0, 75.0, 0.0, GREENHOUSE_COLORS)
            }
            Species::Ozone => {
                chem("Ozone", "O3", GreenhouseGas, 24.0, 12.0, 70.0, 0.0, GREENHOUSE_COLORS)
            }

            Species::NitricOxide => {
                chem("Nitric Oxide", "NO", FreeRadical, 18.0, 7.5, 110.0, 10.0, RADICAL_COLORS)
            }
            Species::Hydroxyl => {
                chem("Hydroxyl", "OH", FreeRadical, 16.0, 5.0, 120.0, 8.0, RADICAL_COLORS)
            }
            Species::Cfc1 => chem("CFC-1", "CH2F", FreeRadical, 26.0, 14.0, 95.0, 15.0, RADICAL_COLORS),
            Species::Cfc2 => {
                chem("CFC-2", "CH2Br", FreeRadical, 26.0, 15.0, 90.0, 20.0, RADICAL_COLORS)
            }

            Species::PositivePole => field("Positive Pole", POLE_FIELD_RADIUS),
            Species::NegativePole => field("Negative Pole", POLE_FIELD_RADIUS),
            Species::RepelPoint => field("Repel Point", REPEL_FIELD_RADIUS),

            Species::AtomicMole => shot("Atomic Mole", 5.0, 1.0, MOLE_SPEED * 2.0),
            Species::OzoneShell => shot("Ozone Shell", 8.0, 3.0, OZONE_SPEED * 2.0),

            Species::NanoBot => SpeciesInfo {
                name: "NanoBot",
                formula: "",
                category: Category::Player,
                radius: NANOBOT_RADIUS,
                mass: NANOBOT_MASS,
                field_radius: NANOBOT_FIELD_RADIUS,
                life: NANOBOT_MAX_LIFE,
                max_speed: NANOBOT_MAX_SPEED,
                max_spin: 0.0,
                touch_damage: 0.0,
                colors: PLAYER_COLORS,
            },
        }
    }

    #[inline]
    pub fn category(self) -> Category {
        self.info().category
    }

    #[inline]
    pub fn colors(self) -> &'static [Color] {
        self.info().colors
    }

    /// Decomposition products for compounds; `None` for atoms and non-chemicals
    pub fn unbond_recipe(self) -> Option<UnbondRecipe> {
        let (primary, secondary, offset) = match self {
            Species::OxygenTwo => (Species::Oxygen, Species::Oxygen, Vec2::new(26.0, 0.0)),
            Species::NitrogenTwo => (Species::Nitrogen, Species::Nitrogen, Vec2::new(26.0, 0.0)),
            Species::Deuterium => (Species::Hydrogen, Species::Hydrogen, Vec2::new(18.0, 0.0)),
            Species::Methylene => (Species::Carbon, Species::Deuterium, Vec2::new(0.0, 28.0)),
            Species::Water => (Species::Hydroxyl, Species::Hydrogen, Vec2::new(0.0, 26.0)),
            Species::CarbonDioxide => (Species::OxygenTwo, Species::Carbon, Vec2::new(32.0, 0.0)),
            Species::NitrousOxide => (Species::NitrogenTwo, Species::Oxygen, Vec2::new(32.0, 0.0)),
            Species::Methane => (Species::Methylene, Species::Deuterium, Vec2::new(0.0, 34.0)),
            Species::Ozone => (Species::OxygenTwo, Species::Oxygen, Vec2::new(32.0, 0.0)),
            Species::NitricOxide => (Species::Nitrogen, Species::Oxygen, Vec2::new(26.0, 0.0)),
            Species::Hydroxyl => (Species::Oxygen, Species::Hydrogen, Vec2::new(22.0, 0.0)),
            Species::Cfc1 => (Species::Methylene, Species::Fluorine, Vec2::new(0.0, -30.0)),
            Species::Cfc2 => (Species::Methylene, Species::Bromine, Vec2::new(0.0, -36.0)),
            _ => return None,
        };
        Some(UnbondRecipe {
            primary,
            secondary,
            offset,
        })
    }

    /// Diatomic formed when two atoms of this element meet
    pub fn same_element_product(self) -> Option<Species> {
        match self {
            Species::Oxygen => Some(Species::OxygenTwo),
            Species::Hydrogen => Some(Species::Deuterium),
            Species::Nitrogen => Some(Species::NitrogenTwo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_match_lists() {
        for species in Species::ATOMS {
            assert_eq!(species.category(), Category::Atom);
        }
        for species in Species::GREENHOUSE_GASES {
            assert_eq!(species.category(), Category::GreenhouseGas);
        }
        for species in Species::FREE_RADICALS {
            assert_eq!(species.category(), Category::FreeRadical);
        }
    }

    #[test]
    fn test_every_compound_has_recipe() {
        let compounds = [
            Species::OxygenTwo,
            Species::NitrogenTwo,
            Species::Deuterium,
            Species::Methylene,
        ]
        .into_iter()
        .chain(Species::GREENHOUSE_GASES)
        .chain(Species::FREE_RADICALS);
        for species in compounds {
            assert!(species.unbond_recipe().is_some(), "{species:?} has no recipe");
        }
        for species in Species::ATOMS {
            assert!(species.unbond_recipe().is_none());
        }
    }

    #[test]
    fn test_fragment_offsets_clear_each_other() {
        let compounds = Species::GREENHOUSE_GASES
            .into_iter()
            .chain(Species::FREE_RADICALS)
            .chain([Species::OxygenTwo, Species::Methylene]);
        for species in compounds {
            let recipe = species.unbond_recipe().unwrap();
            let reach = recipe.primary.info().radius + recipe.secondary.info().radius;
            assert!(
                recipe.offset.length() >= reach * 0.75,
                "{species:?} fragments start buried in each other"
            );
        }
    }

    #[test]
    fn test_fields_are_immovable() {
        for species in [Species::PositivePole, Species::NegativePole, Species::RepelPoint] {
            assert!(species.info().mass <= 0.0);
        }
    }

    #[test]
    fn test_only_radicals_hurt_on_touch() {
        assert!(Species::Cfc2.info().touch_damage > 0.0);
        assert_eq!(Species::Ozone.info().touch_damage, 0.0);
    }
}
