//! Audio cue boundary
//!
//! The simulation only names the cues it wants played. Playback lives with
//! the host behind the [`AudioManager`] trait.

use std::cell::RefCell;
use std::rc::Rc;

/// Logical sound cues raised by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Two actors bounced off each other
    AsteroidTouch,
    /// Atoms combined into a molecule
    Bond,
    /// A molecule broke apart
    Unbond,
    /// A NanoBot absorbed an atom or molecule
    Collect,
    /// Projectile fizzled or burst
    ExplosionSmall,
    /// Ozone shell detonation
    ExplosionMedium,
    /// NanoBot destroyed
    ExplosionLarge,
    /// NanoBot took damage
    PlayerHit,
    /// NanoBot shield broke
    ShieldDown,
    /// NanoBot (re)entered the arena
    PlayerSpawn,
    /// Player joined the match
    PlayerJoin,
    /// Player left the match
    PlayerLeave,
    /// Carbon pellet spread fired
    AtomicMoleBlast,
    /// Hydrogen thrust fired
    HydrogenBoost,
    /// Ozone volley fired
    OzoneVolley,
    /// Free-radical wave arrived
    FreeRadicalWave,
    /// Greenhouse-gas wave arrived
    GreenhouseWave,
}

impl Cue {
    /// Cue name as known to the host's sound bank
    pub fn name(&self) -> &'static str {
        match self {
            Cue::AsteroidTouch => "asteroidTouch",
            Cue::Bond => "bond",
            Cue::Unbond => "unbond",
            Cue::Collect => "collect",
            Cue::ExplosionSmall => "explosionSmall",
            Cue::ExplosionMedium => "explosionMedium",
            Cue::ExplosionLarge => "explosionLarge",
            Cue::PlayerHit => "playerHit",
            Cue::ShieldDown => "shieldDown",
            Cue::PlayerSpawn => "playerSpawn",
            Cue::PlayerJoin => "playerJoin",
            Cue::PlayerLeave => "playerLeave",
            Cue::AtomicMoleBlast => "atomicMoleBlast",
            Cue::HydrogenBoost => "hydrogenBoost",
            Cue::OzoneVolley => "ozoneVolley",
            Cue::FreeRadicalWave => "freeRadicalWave",
            Cue::GreenhouseWave => "greenhouseWave",
        }
    }
}

/// Fire-and-forget cue playback
///
/// Failures stay inside the implementation; the simulation never hears back.
pub trait AudioManager {
    fn play_cue(&mut self, name: &str);
}

/// Drops every cue
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioManager for SilentAudio {
    fn play_cue(&mut self, _name: &str) {}
}

/// Records cue names into a shared list
#[derive(Debug, Clone, Default)]
pub struct CueRecorder {
    cues: Rc<RefCell<Vec<String>>>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, oldest first
    pub fn played(&self) -> Vec<String> {
        self.cues.borrow().clone()
    }

    /// Number of times a cue was played
    pub fn count(&self, cue: Cue) -> usize {
        self.cues
            .borrow()
            .iter()
            .filter(|name| name.as_str() == cue.name())
            .count()
    }

    pub fn clear(&self) {
        self.cues.borrow_mut().clear();
    }
}

impl AudioManager for CueRecorder {
    fn play_cue(&mut self, name: &str) {
        self.cues.borrow_mut().push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_shares_log_between_clones() {
        let recorder = CueRecorder::new();
        let mut handle = recorder.clone();
        handle.play_cue(Cue::Bond.name());
        handle.play_cue(Cue::Bond.name());
        handle.play_cue(Cue::Unbond.name());

        assert_eq!(recorder.count(Cue::Bond), 2);
        assert_eq!(recorder.count(Cue::Unbond), 1);
        assert_eq!(recorder.played()[2], "unbond");
    }

    #[test]
    fn test_cue_names_are_camel_case() {
        assert_eq!(Cue::ExplosionMedium.name(), "explosionMedium");
        assert_eq!(Cue::PlayerSpawn.name(), "playerSpawn");
        assert_eq!(Cue::AsteroidTouch.name(), "asteroidTouch");
    }
}
