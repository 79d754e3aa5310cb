//! World state and actor lifecycle
//!
//! The world owns every actor. Removal is deferred: `Die` marks an actor dead
//! and queues its id on the garbage list, and `collect` compacts the registry
//! once the tick has finished iterating.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::actor::{Actor, ActorId, ActorKind};
use super::bonding::BondLedger;
use super::nanobot::NanoBot;
use super::particles::{
    Atmosphere, NullParticles, ParticleBurst, ParticleSink, ParticleSystem, StillAtmosphere,
};
use super::spawner::WaveTimers;
use super::species::{Category, Species};
use crate::audio::{AudioManager, Cue, SilentAudio};
use crate::consts::*;
use crate::settings::{ArenaConfig, ConfigError, FieldKind};
use crate::{from_angle, scoreboard::Scoreboard};

/// Errors surfaced by the public world API
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid arena config: {0}")]
    Config(#[from] ConfigError),

    #[error("no actor with id {0:?}")]
    UnknownActor(ActorId),

    #[error("player slot {0} out of range")]
    InvalidSlot(usize),
}

/// The simulation root
pub struct World {
    pub(crate) config: ArenaConfig,
    /// Live registry in insertion (id) order
    pub(crate) actors: Vec<Actor>,
    /// Ids of dead actors awaiting removal
    pub(crate) garbage: Vec<ActorId>,
    pub(crate) particle_systems: Vec<ParticleSystem>,
    /// Permanent NanoBot per player slot
    pub(crate) nanobots: [ActorId; MAX_PLAYERS],
    pub(crate) bonds: BondLedger,
    pub(crate) waves: WaveTimers,
    pub(crate) rng: Pcg32,
    /// Centroid of the active players
    pub(crate) focus: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
    audio: Box<dyn AudioManager>,
    particles: Box<dyn ParticleSink>,
    atmosphere: Box<dyn Atmosphere>,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("time_ticks", &self.time_ticks)
            .field("actors", &self.actors.len())
            .field("garbage", &self.garbage.len())
            .field("particle_systems", &self.particle_systems.len())
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Build a world, place its NanoBots, fields and opening atoms
    pub fn new(config: ArenaConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;

        let waves = WaveTimers::new(&config);
        let focus = config.center();
        let mut world = Self {
            config,
            actors: Vec::new(),
            garbage: Vec::new(),
            particle_systems: Vec::new(),
            nanobots: [ActorId(0); MAX_PLAYERS],
            bonds: BondLedger::default(),
            waves,
            rng: Pcg32::seed_from_u64(seed),
            focus,
            time_ticks: 0,
            next_id: 1,
            audio: Box::new(SilentAudio),
            particles: Box::new(NullParticles),
            atmosphere: Box::new(StillAtmosphere),
        };

        for slot in 0..MAX_PLAYERS {
            let id = world.next_actor_id();
            let mut bot = Actor::new_nanobot(id, slot, world.config.scale);
            bot.pos = world.config.center();
            world.actors.push(bot);
            world.nanobots[slot] = id;
        }

        let placements = world.config.fields.clone();
        for placement in placements {
            let pos = placement.pos * world.config.scale;
            world.spawn_field(placement.kind, pos);
        }

        world.populate();
        log::info!(
            "World ready: {}x{} arena, {} actors",
            world.config.width,
            world.config.height,
            world.actors.len()
        );
        Ok(world)
    }

    pub fn with_audio(mut self, audio: impl AudioManager + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_particle_sink(mut self, sink: impl ParticleSink + 'static) -> Self {
        self.particles = Box::new(sink);
        self
    }

    pub fn with_atmosphere(mut self, atmosphere: impl Atmosphere + 'static) -> Self {
        self.atmosphere = Box::new(atmosphere);
        self
    }

    // === Queries ===

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// All registered actors, including dead ones awaiting collection
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Registered actors that are alive
    pub fn live_actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| a.is_alive())
    }

    pub fn index_of(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|a| a.id == id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    /// NanoBot actor for a player slot
    pub fn nanobot_actor(&self, slot: usize) -> Option<&Actor> {
        let id = *self.nanobots.get(slot)?;
        self.actor(id)
    }

    pub fn nanobot_actor_mut(&mut self, slot: usize) -> Option<&mut Actor> {
        let id = *self.nanobots.get(slot)?;
        self.actor_mut(id)
    }

    pub fn nanobot(&self, slot: usize) -> Option<&NanoBot> {
        self.nanobot_actor(slot).and_then(Actor::nanobot)
    }

    pub fn nanobot_id(&self, slot: usize) -> Result<ActorId, SimError> {
        self.nanobots
            .get(slot)
            .copied()
            .ok_or(SimError::InvalidSlot(slot))
    }

    /// Live actors of one category
    pub fn live_count(&self, category: Category) -> usize {
        self.live_actors()
            .filter(|a| a.category() == category)
            .count()
    }

    /// Live actors of one species
    pub fn count_species(&self, species: Species) -> usize {
        self.live_actors().filter(|a| a.species == species).count()
    }

    /// Particle systems still fading out
    pub fn particle_systems(&self) -> &[ParticleSystem] {
        &self.particle_systems
    }

    /// Centroid of the active players (arena centre when nobody plays)
    pub fn focus_point(&self) -> Vec2 {
        self.focus
    }

    /// Ids queued for removal at the end of the tick
    pub fn pending_removals(&self) -> &[ActorId] {
        &self.garbage
    }

    pub fn bond_ledger(&self) -> &BondLedger {
        &self.bonds
    }

    /// Current ranking of the player slots
    pub fn standings(&self) -> Scoreboard {
        Scoreboard::from_bots(self.nanobots.iter().filter_map(|&id| self.actor(id)?.nanobot()))
    }

    // === Construction ===

    /// Allocate a new actor id
    pub fn next_actor_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    /// A detached, not yet spawned actor of `species`
    pub fn create(&mut self, species: Species) -> Actor {
        let id = self.next_actor_id();
        Actor::new(id, species, self.config.scale)
    }

    /// Register a detached actor and spawn it
    pub fn add(&mut self, actor: Actor, find_spawn_point: bool) -> ActorId {
        let id = actor.id;
        let idx = match self.index_of(id) {
            Some(idx) => idx,
            None => {
                self.actors.push(actor);
                self.actors.len() - 1
            }
        };
        self.spawn_at(idx, find_spawn_point);
        id
    }

    /// Spawn a species at a given place with a given velocity
    pub fn spawn_species(&mut self, species: Species, pos: Vec2, vel: Vec2) -> ActorId {
        let mut actor = self.create(species);
        actor.pos = pos;
        let max_spin = species.info().max_spin;
        if max_spin > 0.0 {
            actor.spin = self.rng.random_range(-max_spin..=max_spin);
        }
        let id = self.add(actor, false);
        if let Some(actor) = self.actor_mut(id) {
            actor.vel = vel;
            actor.track_heading();
        }
        id
    }

    /// Place a static field actor
    pub fn spawn_field(&mut self, kind: FieldKind, pos: Vec2) -> ActorId {
        let species = match kind {
            FieldKind::PositivePole => Species::PositivePole,
            FieldKind::NegativePole => Species::NegativePole,
            FieldKind::RepelPoint => Species::RepelPoint,
        };
        self.spawn_species(species, pos, Vec2::ZERO)
    }

    /// Scatter the opening atoms over the arena
    fn populate(&mut self) {
        for _ in 0..self.config.initial_atoms {
            let pick = self.rng.random_range(0..Species::STARTING_ATOMS.len());
            let species = Species::STARTING_ATOMS[pick];
            let mut actor = self.create(species);
            let max_spin = species.info().max_spin;
            actor.spin = self.rng.random_range(-max_spin..=max_spin);
            let id = self.add(actor, true);

            let heading = from_angle(self.rng.random_range(0.0..std::f32::consts::TAU));
            let speed = ATOM_DRIFT_SPEED * self.config.scale * self.rng.random_range(0.25..1.0);
            if let Some(actor) = self.actor_mut(id) {
                actor.vel = heading * speed;
                actor.direction = heading;
            }
        }
    }

    // === Lifecycle (index based, used inside a tick) ===

    /// Spawn: dead → alive. No-op on a live actor.
    pub(crate) fn spawn_at(&mut self, idx: usize, find_spawn_point: bool) {
        if !self.actors[idx].dead {
            return;
        }
        self.actors[idx].vel = Vec2::ZERO;
        if find_spawn_point {
            let point = self.find_spawn_point(idx);
            self.actors[idx].pos = point;
        }
        let actor = &mut self.actors[idx];
        actor.dead = false;
        actor.collided_this_frame = false;
        actor.last_pos = actor.pos;

        if actor.nanobot().is_some() {
            self.nanobot_spawned(idx);
        }
    }

    /// Die: alive → dead. No-op on a dead actor.
    ///
    /// Compounds break apart into their fragments on the way out.
    pub(crate) fn die_at(&mut self, idx: usize, source: Option<ActorId>) {
        if self.actors[idx].dead {
            return;
        }
        match self.actors[idx].kind {
            ActorKind::NanoBot(_) => self.nanobot_die(idx, source),
            _ if self.actors[idx].species.unbond_recipe().is_some() => {
                self.unbond_at(idx);
            }
            _ => self.base_die(idx),
        }
    }

    /// Generic death: flag and queue for removal
    pub(crate) fn base_die(&mut self, idx: usize) {
        let actor = &mut self.actors[idx];
        if actor.dead {
            return;
        }
        actor.dead = true;
        self.garbage.push(actor.id);
    }

    /// Damage: returns whether the hit was accepted
    pub(crate) fn damage_at(&mut self, idx: usize, source: Option<ActorId>, amount: f32) -> bool {
        if self.actors[idx].dead {
            return false;
        }
        match self.actors[idx].kind {
            ActorKind::NanoBot(_) => self.nanobot_damage(idx, source, amount),
            ActorKind::FreeRadical => self.base_damage(idx, source, amount),
            // Nothing hurts atoms, fields or shots
            _ => false,
        }
    }

    fn base_damage(&mut self, idx: usize, source: Option<ActorId>, amount: f32) -> bool {
        self.actors[idx].life -= amount;
        if self.actors[idx].life < 0.0 {
            self.die_at(idx, source);
        }
        true
    }

    // === Public id-based operations ===

    /// Run both sides of a touch between two actors; true when both accept
    pub fn touch(&mut self, id: ActorId, other: ActorId) -> Result<bool, SimError> {
        let a = self.index_of(id).ok_or(SimError::UnknownActor(id))?;
        let b = self.index_of(other).ok_or(SimError::UnknownActor(other))?;
        let first = self.touch_at(a, b);
        let second = self.touch_at(b, a);
        Ok(first && second)
    }

    /// Apply damage from an optional source
    pub fn damage(
        &mut self,
        id: ActorId,
        source: Option<ActorId>,
        amount: f32,
    ) -> Result<bool, SimError> {
        let idx = self.index_of(id).ok_or(SimError::UnknownActor(id))?;
        Ok(self.damage_at(idx, source, amount))
    }

    /// Kill an actor (idempotent)
    pub fn kill(&mut self, id: ActorId, source: Option<ActorId>) -> Result<(), SimError> {
        let idx = self.index_of(id).ok_or(SimError::UnknownActor(id))?;
        self.die_at(idx, source);
        Ok(())
    }

    /// Spawn a registered dead actor again (idempotent)
    pub fn respawn(&mut self, id: ActorId, find_spawn_point: bool) -> Result<(), SimError> {
        let idx = self.index_of(id).ok_or(SimError::UnknownActor(id))?;
        self.spawn_at(idx, find_spawn_point);
        Ok(())
    }

    // === Collaborators ===

    /// Queue a particle burst and keep it alive until it fades
    pub(crate) fn emit(&mut self, burst: ParticleBurst) {
        self.particles.emit(&burst);
        self.particle_systems.push(ParticleSystem::new(burst));
    }

    pub(crate) fn play(&mut self, cue: Cue) {
        self.audio.play_cue(cue.name());
    }

    pub(crate) fn refocus(&mut self, target: Vec2) {
        self.focus = target;
        self.atmosphere.set_focus(target);
    }

    /// Remove collected actors and faded particle systems
    pub(crate) fn collect(&mut self) {
        if !self.garbage.is_empty() {
            let garbage = std::mem::take(&mut self.garbage);
            self.actors
                .retain(|actor| !(actor.dead && garbage.contains(&actor.id)));
        }
        self.particle_systems.retain(|system| system.active);
    }

    /// Uniform sample in `[0, 1)`
    pub(crate) fn random_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}
