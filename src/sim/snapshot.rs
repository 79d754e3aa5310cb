//! Serializable view of the world
//!
//! Hosts render from snapshots and tests diff them; the live `World` keeps
//! its collaborators and RNG private.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::state::World;
use crate::scoreboard::Scoreboard;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub focus: Vec2,
    /// Live actors in registry order
    pub actors: Vec<Actor>,
    pub standings: Scoreboard,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl World {
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.time_ticks,
            focus: self.focus,
            actors: self.live_actors().cloned().collect(),
            standings: self.standings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_PLAYERS;
    use crate::settings::ArenaConfig;
    use crate::sim::species::Species;

    #[test]
    fn test_snapshot_lists_live_actors() {
        let mut world = World::new(ArenaConfig::empty(640.0, 480.0), 1).unwrap();
        world.spawn_species(Species::Ozone, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let snapshot = world.snapshot();
        assert_eq!(snapshot.actors.len(), 1);
        assert_eq!(snapshot.standings.len(), MAX_PLAYERS);
    }

    #[test]
    fn test_snapshot_json() {
        let world = World::new(ArenaConfig::empty(640.0, 480.0), 1).unwrap();
        let json = world.snapshot().to_json().unwrap();
        let parsed: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.tick, 0);
        assert_eq!(parsed.focus, Vec2::new(320.0, 240.0));
    }
}
