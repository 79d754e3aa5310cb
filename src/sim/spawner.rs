//! Spawn placement and hazard waves
//!
//! Two timers feed the arena: free radicals and greenhouse gases arrive
//! through gates on the edges of the safe rectangle while their live count
//! is under the cap. Randomly placed actors use a bounded rejection search
//! inside the safe rectangle.

use glam::Vec2;
use rand::Rng;

use super::actor::ActorId;
use super::geometry::{circles_overlap, direction_or, point_in_rect};
use super::species::{Category, Species};
use super::state::{SimError, World};
use crate::audio::Cue;
use crate::consts::*;
use crate::settings::ArenaConfig;

/// Seconds until the next wave of each kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveTimers {
    pub free_radical: f32,
    pub greenhouse: f32,
}

impl WaveTimers {
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            free_radical: config.free_radical_interval,
            greenhouse: config.greenhouse_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveKind {
    FreeRadical,
    Greenhouse,
}

impl WaveKind {
    pub fn category(self) -> Category {
        match self {
            WaveKind::FreeRadical => Category::FreeRadical,
            WaveKind::Greenhouse => Category::GreenhouseGas,
        }
    }

    pub fn roster(self) -> &'static [Species] {
        match self {
            WaveKind::FreeRadical => &Species::FREE_RADICALS,
            WaveKind::Greenhouse => &Species::GREENHOUSE_GASES,
        }
    }

    fn cue(self) -> Cue {
        match self {
            WaveKind::FreeRadical => Cue::FreeRadicalWave,
            WaveKind::Greenhouse => Cue::GreenhouseWave,
        }
    }
}

impl World {
    /// Random point in the safe rectangle where actor `idx` overlaps nobody
    ///
    /// The search radius is inflated (more for players) and the rectangle is
    /// shrunk by it, so the result always keeps the actor inside. After the
    /// attempt budget runs out the last sample is used anyway.
    pub(crate) fn find_spawn_point(&mut self, idx: usize) -> Vec2 {
        let actor = &self.actors[idx];
        let fudge = if actor.category() == Category::Player {
            PLAYER_SPAWN_FUDGE
        } else {
            ACTOR_SPAWN_FUDGE
        };
        let radius = actor.radius * fudge;
        let (collidable, species) = (actor.collidable, actor.species);

        let (mut min, mut max) = self.config.safe_rect();
        min += Vec2::splat(radius);
        max -= Vec2::splat(radius);
        if min.x > max.x {
            let mid = (min.x + max.x) * 0.5;
            (min.x, max.x) = (mid, mid);
        }
        if min.y > max.y {
            let mid = (min.y + max.y) * 0.5;
            (min.y, max.y) = (mid, mid);
        }

        let attempts = self.config.spawn_search_attempts;
        let mut candidate = (min + max) * 0.5;
        for _ in 0..attempts {
            let t = Vec2::new(self.random_unit(), self.random_unit());
            candidate = point_in_rect(min, max, t);
            if !collidable {
                return candidate;
            }
            let blocked = self.actors.iter().enumerate().any(|(j, other)| {
                j != idx && other.is_solid() && circles_overlap(candidate, radius, other.pos, other.radius)
            });
            if !blocked {
                return candidate;
            }
        }
        log::warn!(
            "No clear spawn point for {:?} after {} attempts; placing it anyway",
            species,
            attempts
        );
        candidate
    }

    /// Spawn-point search for a registered actor
    pub fn spawn_point_for(&mut self, id: ActorId) -> Result<Vec2, SimError> {
        let idx = self.index_of(id).ok_or(SimError::UnknownActor(id))?;
        Ok(self.find_spawn_point(idx))
    }

    /// Count the wave timers down and release any wave that is due
    pub(crate) fn update_waves(&mut self, dt: f32) {
        self.waves.free_radical -= dt;
        if self.waves.free_radical <= 0.0 {
            self.waves.free_radical = self.config.free_radical_interval;
            self.spawn_wave(WaveKind::FreeRadical);
        }
        self.waves.greenhouse -= dt;
        if self.waves.greenhouse <= 0.0 {
            self.waves.greenhouse = self.config.greenhouse_interval;
            self.spawn_wave(WaveKind::Greenhouse);
        }
    }

    /// Send one molecule in through a random gate unless the kind is at its cap
    pub fn spawn_wave(&mut self, kind: WaveKind) -> Option<ActorId> {
        let cap = match kind {
            WaveKind::FreeRadical => self.config.free_radical_cap,
            WaveKind::Greenhouse => self.config.greenhouse_cap,
        };
        let live = self.live_count(kind.category());
        if live >= cap {
            log::debug!("{:?} wave skipped: {} live, cap {}", kind, live, cap);
            return None;
        }

        let roster = kind.roster();
        let species = roster[self.rng.random_range(0..roster.len())];
        let gates = self.wave_gates();
        let gate = gates[self.rng.random_range(0..gates.len())];
        let scale = self.config.scale;
        let jitter = Vec2::new(
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
        ) * WAVE_GATE_JITTER
            * scale;
        let pos = gate + jitter;
        let heading = direction_or(pos, self.config.center(), Vec2::X);
        let id = self.spawn_species(species, pos, heading * WAVE_ENTRY_SPEED * scale);

        self.play(kind.cue());
        log::info!(
            "{} entered the arena ({} of {})",
            species.info().name,
            live + 1,
            cap
        );
        Some(id)
    }

    /// Midpoints of the safe rectangle's edges
    fn wave_gates(&self) -> [Vec2; 4] {
        let (min, max) = self.config.safe_rect();
        let mid = (min + max) * 0.5;
        [
            Vec2::new(mid.x, min.y),
            Vec2::new(max.x, mid.y),
            Vec2::new(mid.x, max.y),
            Vec2::new(min.x, mid.y),
        ]
    }
}
