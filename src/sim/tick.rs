//! Fixed timestep simulation tick
//!
//! One call to [`World::update`] runs the whole pipeline in a fixed order:
//! inputs, per-actor updates, movement and collisions, particle systems,
//! camera focus, hazard waves and finally deferred removal.

use glam::Vec2;

use super::actor::{Actor, ActorKind};
use super::geometry::direction_or;
use super::input::InputIntent;
use super::state::World;
use crate::consts::*;

impl World {
    /// Advance the world by one tick
    ///
    /// `inputs` is indexed by player slot; missing slots get an idle intent.
    pub fn update(&mut self, inputs: &[InputIntent], dt: f32) {
        self.time_ticks += 1;

        for slot in 0..MAX_PLAYERS {
            let input = inputs.get(slot).copied().unwrap_or_default();
            let id = self.nanobots[slot];
            if let Some(bot) = self.actor_mut(id).and_then(Actor::nanobot_mut) {
                bot.input = input;
            }
        }

        self.update_actors(dt);
        self.move_world(dt);
        self.update_particles(dt);
        self.update_focus();
        self.update_waves(dt);
        self.collect();
    }

    /// Per-actor behaviour. Actors added during the pass wait for the next tick.
    fn update_actors(&mut self, dt: f32) {
        let count = self.actors.len();
        for idx in 0..count {
            self.actors[idx].begin_frame();
            match self.actors[idx].kind {
                // Idle and respawning bots still track their hold timers
                ActorKind::NanoBot(_) => self.update_nanobot(idx, dt),
                _ if self.actors[idx].dead => {}
                ActorKind::Projectile(_) => self.update_projectile(idx, dt),
                ActorKind::Field => self.update_field(idx, dt),
                ActorKind::FreeRadical => self.update_radical(idx, dt),
                ActorKind::Chemical => self.actors[idx].drift(dt),
            }
        }
    }

    /// Free radicals home in on the nearest player in range
    fn update_radical(&mut self, idx: usize, dt: f32) {
        let scale = self.config.scale;
        let pos = self.actors[idx].pos;
        let range = RADICAL_SEEK_RANGE * scale;
        let target = self
            .actors
            .iter()
            .filter(|a| a.is_playing() && a.is_alive())
            .map(|a| a.pos)
            .filter(|p| p.distance(pos) <= range)
            .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)));

        let actor = &mut self.actors[idx];
        if let Some(target) = target {
            let dir = direction_or(pos, target, actor.direction);
            actor.vel += dir * RADICAL_ACCELERATION * scale * dt;
        }
        actor.drift(dt);
    }

    fn update_particles(&mut self, dt: f32) {
        for system in &mut self.particle_systems {
            system.update(dt);
        }
    }

    /// Centroid of the live players, or the arena centre
    fn update_focus(&mut self) {
        let (sum, count) = self
            .actors
            .iter()
            .filter(|a| a.is_playing() && a.is_alive())
            .fold((Vec2::ZERO, 0u32), |(sum, n), a| (sum + a.pos, n + 1));
        let target = if count > 0 {
            sum / count as f32
        } else {
            self.config.center()
        };
        self.refocus(target);
    }
}

/// Fixed-timestep driver for hosts running at a variable frame rate
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many `SIM_DT` ticks as the frame time allows, up to
    /// `MAX_SUBSTEPS`. Fire buttons are cleared after the first tick.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, world: &mut World, inputs: &mut [InputIntent], frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            world.update(inputs, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for input in inputs.iter_mut() {
                input.fire_blast = false;
                input.fire_boost = false;
                input.fire_special = false;
            }
        }
        substeps
    }

    /// Leftover time not yet simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}
