//! Nano Battle - a top-down multiplayer chemistry battle
//!
//! Core modules:
//! - `sim`: Simulation world (actors, collisions, bonding, NanoBots)
//! - `settings`: Arena configuration
//! - `audio`: Audio cue boundary
//! - `scoreboard`: Match standings

pub mod audio;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, Cue};
pub use scoreboard::{Scoreboard, Standing};
pub use settings::{ArenaConfig, ConfigError, FieldKind, FieldPlacement};
pub use sim::{InputIntent, SimError, World};

use glam::Vec2;

/// Game configuration constants (unscaled arena units)
pub mod consts {
    /// Fixed simulation timestep for hosts that step at a constant rate
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Fixed number of player slots
    pub const MAX_PLAYERS: usize = 4;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;
    /// Inset of the spawn-safe rectangle from the outer bounds
    pub const SAFE_INSET: f32 = 64.0;

    /// Spawn-point search radius fudge factors
    pub const PLAYER_SPAWN_FUDGE: f32 = 2.0;
    pub const ACTOR_SPAWN_FUDGE: f32 = 1.1;
    /// Rejection-sampling budget for the spawn-point search
    pub const SPAWN_SEARCH_ATTEMPTS: u32 = 64;

    /// Wave timers (seconds) and live-count ceilings
    pub const FREE_RADICAL_INTERVAL: f32 = 12.0;
    pub const GREENHOUSE_INTERVAL: f32 = 5.0;
    pub const FREE_RADICAL_CAP: usize = 3;
    pub const GREENHOUSE_CAP: usize = 15;
    /// Speed of wave-spawned molecules heading into the arena
    pub const WAVE_ENTRY_SPEED: f32 = 60.0;
    /// Random jitter around a wave gate
    pub const WAVE_GATE_JITTER: f32 = 24.0;

    /// Atoms placed at world construction
    pub const INITIAL_ATOMS: usize = 24;
    /// Random drift speed given to freshly placed atoms
    pub const ATOM_DRIFT_SPEED: f32 = 40.0;

    /// Distance below which two positions count as coincident
    pub const COINCIDENT_EPSILON: f32 = 1e-4;
    /// Movement shorter than this is not collision-tested
    pub const MIN_MOVEMENT: f32 = 1e-5;

    // === NanoBot ===
    pub const NANOBOT_RADIUS: f32 = 20.0;
    pub const NANOBOT_MASS: f32 = 10.0;
    /// Reach of the charge field
    pub const NANOBOT_FIELD_RADIUS: f32 = 140.0;
    pub const NANOBOT_ACCELERATION: f32 = 900.0;
    pub const NANOBOT_MAX_SPEED: f32 = 260.0;
    /// Fraction of velocity kept per second when there is no thrust
    pub const NANOBOT_DRAG: f32 = 0.15;
    pub const NANOBOT_MAX_LIFE: f32 = 100.0;
    pub const NANOBOT_MAX_SHIELD: f32 = 100.0;
    pub const SHIELD_REGEN_RATE: f32 = 25.0;
    pub const SHIELD_REGEN_DELAY: f32 = 2.0;
    pub const SAFE_TIME: f32 = 2.0;
    pub const RESPAWN_TIME: f32 = 3.0;
    /// Hold durations for join and leave
    pub const JOIN_HOLD_TIME: f32 = 0.5;
    pub const LEAVE_HOLD_TIME: f32 = 2.0;
    pub const MAX_OXYGEN_AMMO: u32 = 10;
    pub const MAX_CARBON_AMMO: u32 = 10;
    pub const MAX_HYDROGEN_AMMO: u32 = 10;
    pub const STARTING_AMMO: u32 = 3;
    pub const FIRE_COOLDOWN: f32 = 0.2;
    /// Charge field strength (acceleration at the field centre)
    pub const CHARGE_FIELD_STRENGTH: f32 = 320.0;
    pub const HYDROGEN_BOOST_SPEED: f32 = 320.0;
    /// Rumble intensity decay per second
    pub const RUMBLE_DECAY: f32 = 3.0;
    /// Time after a hydrogen boost during which the speed cap is lifted
    pub const BOOST_GRACE: f32 = 0.4;

    // === Projectiles ===
    pub const MOLE_PELLETS: usize = 3;
    pub const MOLE_SPREAD: f32 = 0.18;
    pub const MOLE_SPEED: f32 = 480.0;
    pub const MOLE_DAMAGE: f32 = 12.0;
    pub const MOLE_DURATION: f32 = 1.1;
    pub const OZONE_SHELLS: usize = 3;
    pub const OZONE_SPREAD: f32 = 0.35;
    pub const OZONE_SPEED: f32 = 340.0;
    pub const OZONE_DAMAGE: f32 = 30.0;
    pub const OZONE_DURATION: f32 = 1.6;
    pub const OZONE_SPLASH_RADIUS: f32 = 48.0;
    pub const OZONE_SPLASH_DAMAGE: f32 = 15.0;

    // === Free radicals ===
    pub const RADICAL_SEEK_RANGE: f32 = 420.0;
    pub const RADICAL_ACCELERATION: f32 = 70.0;

    // === Field actors ===
    pub const POLE_FIELD_RADIUS: f32 = 180.0;
    pub const POLE_STRENGTH: f32 = 140.0;
    pub const REPEL_FIELD_RADIUS: f32 = 120.0;
    pub const REPEL_STRENGTH: f32 = 260.0;
}

/// Heading angle of a vector (radians)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector pointing along `theta`
#[inline]
pub fn from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Rotate a vector by `theta` radians
#[inline]
pub fn rotate(v: Vec2, theta: f32) -> Vec2 {
    Vec2::from_angle(theta).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_round_trip() {
        let theta = 0.75;
        assert!((angle_of(from_angle(theta)) - theta).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::X, std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 1.0).abs() < 1e-5);
    }
}
