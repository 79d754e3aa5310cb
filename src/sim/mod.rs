//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (registry insertion order)
//! - No rendering, audio or platform dependencies beyond the collaborator traits

pub mod actor;
pub mod bonding;
pub mod collision;
pub mod field;
pub mod geometry;
pub mod input;
pub mod nanobot;
pub mod particles;
pub mod projectile;
pub mod reactions;
pub mod snapshot;
pub mod spawner;
pub mod species;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorId, ActorKind};
pub use bonding::{BondCounter, BondLedger};
pub use collision::{CollisionResult, adjust_velocities};
pub use field::FieldRule;
pub use input::InputIntent;
pub use nanobot::{AmmoKind, ChargeMode, NanoBot, Pickup, pickup_for};
pub use particles::{
    Atmosphere, BurstRecorder, Color, NullParticles, ParticleBurst, ParticleSink, ParticleSystem,
    StillAtmosphere,
};
pub use projectile::{Projectile, ProjectileKind};
pub use reactions::Reaction;
pub use snapshot::WorldSnapshot;
pub use spawner::{WaveKind, WaveTimers};
pub use species::{Category, Species, SpeciesInfo, UnbondRecipe};
pub use state::{SimError, World};
pub use tick::FixedStep;
