//! NanoBot player avatars
//!
//! One permanent NanoBot per player slot. It is never removed from the
//! registry: leaving the match or dying only flips `dead`, and the join,
//! respawn and leave transitions run off held inputs and timers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use super::field::{FieldRule, NEGATIVE_CHARGE_RULES, POSITIVE_CHARGE_RULES};
use super::geometry::circles_overlap;
use super::input::InputIntent;
use super::particles::ParticleBurst;
use super::projectile::ProjectileKind;
use super::species::{Category, Species};
use super::state::{SimError, World};
use crate::audio::Cue;
use crate::consts::*;
use crate::{angle_of, rotate};

/// Which charge field the bot is projecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeMode {
    Neutral,
    /// Heavier and slower; pushes gases, radicals and other players away
    Negative,
    /// Lighter and faster; pulls in collectibles
    Positive,
}

impl ChargeMode {
    pub fn speed_multiplier(self) -> f32 {
        match self {
            ChargeMode::Neutral => 1.0,
            ChargeMode::Negative => 0.7,
            ChargeMode::Positive => 1.25,
        }
    }

    pub fn mass_multiplier(self) -> f32 {
        match self {
            ChargeMode::Neutral => 1.0,
            ChargeMode::Negative => 2.0,
            ChargeMode::Positive => 0.8,
        }
    }

    pub fn rules(self) -> &'static [FieldRule] {
        match self {
            ChargeMode::Neutral => &[],
            ChargeMode::Negative => NEGATIVE_CHARGE_RULES,
            ChargeMode::Positive => POSITIVE_CHARGE_RULES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmmoKind {
    Oxygen,
    Carbon,
    Hydrogen,
}

impl AmmoKind {
    pub fn max(self) -> u32 {
        match self {
            AmmoKind::Oxygen => MAX_OXYGEN_AMMO,
            AmmoKind::Carbon => MAX_CARBON_AMMO,
            AmmoKind::Hydrogen => MAX_HYDROGEN_AMMO,
        }
    }
}

/// What absorbing a collectible is worth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub ammo: AmmoKind,
    pub amount: u32,
    /// Rumble intensity on pickup
    pub rumble: f32,
}

/// Ammo granted for absorbing `species`; `None` if it cannot be collected
pub fn pickup_for(species: Species) -> Option<Pickup> {
    let (ammo, amount, rumble) = match species {
        Species::Oxygen => (AmmoKind::Oxygen, 1, 0.15),
        Species::OxygenTwo => (AmmoKind::Oxygen, 2, 0.25),
        Species::Carbon => (AmmoKind::Carbon, 1, 0.15),
        Species::Hydrogen => (AmmoKind::Hydrogen, 1, 0.1),
        Species::Deuterium => (AmmoKind::Hydrogen, 2, 0.2),
        _ => return None,
    };
    Some(Pickup {
        ammo,
        amount,
        rumble,
    })
}

/// Player-specific state carried by a NanoBot actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NanoBot {
    pub slot: usize,
    /// In the match (dead bots can still be playing while they respawn)
    pub playing: bool,
    pub score: i32,
    pub kills: u32,
    pub deaths: u32,
    pub shield: f32,
    pub oxygen_ammo: u32,
    pub carbon_ammo: u32,
    pub hydrogen_ammo: u32,
    pub negative_charge: bool,
    pub positive_charge: bool,
    /// Spawn protection left (seconds)
    pub safe_timer: f32,
    pub respawn_timer: f32,
    /// Seconds since the last accepted hit
    pub since_damage: f32,
    pub fire_cooldown: f32,
    /// Speed cap lifted while positive
    pub boost_timer: f32,
    pub join_held: f32,
    pub leave_held: f32,
    /// Controller rumble intensity in `[0, 1]`
    pub rumble: f32,
    #[serde(skip)]
    pub input: InputIntent,
}

impl NanoBot {
    pub fn new(slot: usize) -> Self {
        Self {
            slot,
            playing: false,
            score: 0,
            kills: 0,
            deaths: 0,
            shield: 0.0,
            oxygen_ammo: 0,
            carbon_ammo: 0,
            hydrogen_ammo: 0,
            negative_charge: false,
            positive_charge: false,
            safe_timer: 0.0,
            respawn_timer: 0.0,
            since_damage: 0.0,
            fire_cooldown: 0.0,
            boost_timer: 0.0,
            join_held: 0.0,
            leave_held: 0.0,
            rumble: 0.0,
            input: InputIntent::default(),
        }
    }

    pub fn charge_mode(&self) -> ChargeMode {
        match (self.negative_charge, self.positive_charge) {
            (true, false) => ChargeMode::Negative,
            (false, true) => ChargeMode::Positive,
            _ => ChargeMode::Neutral,
        }
    }

    pub fn ammo(&self, kind: AmmoKind) -> u32 {
        match kind {
            AmmoKind::Oxygen => self.oxygen_ammo,
            AmmoKind::Carbon => self.carbon_ammo,
            AmmoKind::Hydrogen => self.hydrogen_ammo,
        }
    }

    fn ammo_mut(&mut self, kind: AmmoKind) -> &mut u32 {
        match kind {
            AmmoKind::Oxygen => &mut self.oxygen_ammo,
            AmmoKind::Carbon => &mut self.carbon_ammo,
            AmmoKind::Hydrogen => &mut self.hydrogen_ammo,
        }
    }

    /// Add ammo up to the cap; returns how much was actually granted
    pub fn credit(&mut self, kind: AmmoKind, amount: u32) -> u32 {
        let slot = self.ammo_mut(kind);
        let granted = amount.min(kind.max().saturating_sub(*slot));
        *slot += granted;
        granted
    }

    /// Take ammo if there is enough of it
    fn spend(&mut self, kind: AmmoKind, amount: u32) -> bool {
        let slot = self.ammo_mut(kind);
        if *slot < amount {
            return false;
        }
        *slot -= amount;
        true
    }

    /// Spawn protection active
    pub fn is_safe(&self) -> bool {
        self.safe_timer > 0.0
    }

    pub fn bump_rumble(&mut self, amount: f32) {
        self.rumble = self.rumble.max(amount).min(1.0);
    }

    /// Full shield, fresh ammo and spawn protection
    fn reset_for_spawn(&mut self) {
        self.shield = NANOBOT_MAX_SHIELD;
        self.safe_timer = SAFE_TIME;
        self.respawn_timer = 0.0;
        self.since_damage = 0.0;
        self.fire_cooldown = 0.0;
        self.boost_timer = 0.0;
        self.oxygen_ammo = STARTING_AMMO;
        self.carbon_ammo = STARTING_AMMO;
        self.hydrogen_ammo = STARTING_AMMO;
        self.negative_charge = false;
        self.positive_charge = false;
    }

    /// Count down timers and regenerate the shield after the grace period
    fn tick_timers(&mut self, dt: f32) {
        self.safe_timer = (self.safe_timer - dt).max(0.0);
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.boost_timer = (self.boost_timer - dt).max(0.0);
        self.rumble = (self.rumble - RUMBLE_DECAY * dt).max(0.0);
        self.since_damage += dt;
        if self.since_damage >= SHIELD_REGEN_DELAY {
            self.shield = (self.shield + SHIELD_REGEN_RATE * dt).min(NANOBOT_MAX_SHIELD);
        }
    }
}

impl World {
    /// Feed one tick of input to a player slot
    pub fn set_input(&mut self, slot: usize, input: InputIntent) -> Result<(), SimError> {
        let id = self.nanobot_id(slot)?;
        if let Some(bot) = self.actor_mut(id).and_then(|actor| actor.nanobot_mut()) {
            bot.input = input;
        }
        Ok(())
    }

    pub(crate) fn update_nanobot(&mut self, idx: usize, dt: f32) {
        if !self.update_membership(idx, dt) {
            return;
        }
        if self.actors[idx].dead {
            self.tick_respawn(idx, dt);
            return;
        }
        if let Some(bot) = self.actors[idx].nanobot_mut() {
            bot.tick_timers(dt);
        }
        self.steer(idx, dt);
        self.project_charge(idx, dt);
        self.scan_pickups(idx);
        self.fire_weapons(idx);
    }

    /// Handle held join/leave; returns whether the bot is in the match
    fn update_membership(&mut self, idx: usize, dt: f32) -> bool {
        let Some(bot) = self.actors[idx].nanobot_mut() else {
            return false;
        };
        let input = bot.input;

        if !bot.playing {
            bot.join_held = if input.join { bot.join_held + dt } else { 0.0 };
            if bot.join_held >= JOIN_HOLD_TIME {
                bot.join_held = 0.0;
                self.join(idx);
            }
            return false;
        }

        bot.leave_held = if input.leave { bot.leave_held + dt } else { 0.0 };
        if bot.leave_held >= LEAVE_HOLD_TIME {
            bot.leave_held = 0.0;
            self.leave(idx);
            return false;
        }
        true
    }

    fn join(&mut self, idx: usize) {
        let Some(bot) = self.actors[idx].nanobot_mut() else {
            return;
        };
        bot.playing = true;
        bot.score = 0;
        bot.kills = 0;
        bot.deaths = 0;
        let slot = bot.slot;
        self.actors[idx].dead = true;
        self.spawn_at(idx, true);
        self.play(Cue::PlayerJoin);
        log::info!("Player {} joined", slot + 1);
    }

    fn leave(&mut self, idx: usize) {
        let actor = &mut self.actors[idx];
        let (pos, vel) = (actor.pos, actor.vel);
        let was_alive = !actor.dead;
        actor.dead = true;
        actor.vel = Vec2::ZERO;
        let Some(bot) = actor.nanobot_mut() else {
            return;
        };
        bot.playing = false;
        bot.negative_charge = false;
        bot.positive_charge = false;
        bot.rumble = 0.0;
        let slot = bot.slot;

        if was_alive {
            let scale = self.config.scale;
            self.emit(ParticleBurst::sparks(pos, vel, Species::NanoBot.colors(), scale));
        }
        self.play(Cue::PlayerLeave);
        log::info!("Player {} left", slot + 1);
    }

    fn tick_respawn(&mut self, idx: usize, dt: f32) {
        let Some(bot) = self.actors[idx].nanobot_mut() else {
            return;
        };
        bot.respawn_timer -= dt;
        if bot.respawn_timer <= 0.0 {
            self.spawn_at(idx, true);
        }
    }

    /// Called by `spawn_at` once a NanoBot is alive again
    pub(crate) fn nanobot_spawned(&mut self, idx: usize) {
        let scale = self.config.scale;
        let actor = &mut self.actors[idx];
        actor.life = NANOBOT_MAX_LIFE;
        actor.mass = NANOBOT_MASS;
        actor.max_speed = NANOBOT_MAX_SPEED * scale;
        let pos = actor.pos;
        if let Some(bot) = actor.nanobot_mut() {
            bot.reset_for_spawn();
        }
        self.emit(ParticleBurst::bond_flash(pos, Vec2::ZERO, Species::NanoBot.colors(), scale));
        self.play(Cue::PlayerSpawn);
    }

    /// Charge mode, thrust, drag and heading
    fn steer(&mut self, idx: usize, dt: f32) {
        let scale = self.config.scale;
        let actor = &mut self.actors[idx];
        let Some(bot) = actor.nanobot_mut() else {
            return;
        };
        let input = bot.input;
        bot.negative_charge = input.charge_negative && !input.charge_positive;
        bot.positive_charge = input.charge_positive && !input.charge_negative;
        let mode = bot.charge_mode();
        let boosting = bot.boost_timer > 0.0;

        actor.mass = NANOBOT_MASS * mode.mass_multiplier();
        actor.max_speed = NANOBOT_MAX_SPEED * scale * mode.speed_multiplier();

        let thrust = input.thrust();
        if let Some(dir) = thrust.try_normalize() {
            actor.vel += thrust * NANOBOT_ACCELERATION * scale * mode.speed_multiplier() * dt;
            actor.direction = dir;
            actor.rotation = angle_of(dir);
        } else {
            actor.vel *= NANOBOT_DRAG.powf(dt);
        }
        if !boosting {
            actor.clamp_speed();
        }
    }

    fn project_charge(&mut self, idx: usize, dt: f32) {
        let Some(bot) = self.actors[idx].nanobot() else {
            return;
        };
        let mode = bot.charge_mode();
        if mode == ChargeMode::Neutral {
            return;
        }
        let radius = self.actors[idx].collision_radius;
        let strength = CHARGE_FIELD_STRENGTH * self.config.scale;
        self.apply_field(idx, radius, strength, mode.rules(), dt);
    }

    /// Absorb every collectible resting against the hull
    ///
    /// Swept contacts only fire on movement; this catches pickups that
    /// already overlap the bot.
    fn scan_pickups(&mut self, idx: usize) {
        if !self.actors[idx].is_playing() {
            return;
        }
        let (pos, radius) = (self.actors[idx].pos, self.actors[idx].radius);
        for other in 0..self.actors.len() {
            let target = &self.actors[other];
            if other == idx || target.dead {
                continue;
            }
            let Some(pickup) = pickup_for(target.species) else {
                continue;
            };
            if circles_overlap(pos, radius, target.pos, target.radius) {
                self.absorb(idx, other, pickup);
            }
        }
    }

    fn fire_weapons(&mut self, idx: usize) {
        let Some(bot) = self.actors[idx].nanobot_mut() else {
            return;
        };
        let input = bot.input;

        if input.fire_boost && bot.spend(AmmoKind::Hydrogen, 1) {
            bot.boost_timer = BOOST_GRACE;
            self.hydrogen_boost(idx);
        }

        let Some(bot) = self.actors[idx].nanobot_mut() else {
            return;
        };
        if bot.fire_cooldown > 0.0 {
            return;
        }
        if input.fire_special && bot.oxygen_ammo >= 3 && bot.hydrogen_ammo >= 1 {
            bot.spend(AmmoKind::Oxygen, 3);
            bot.spend(AmmoKind::Hydrogen, 1);
            bot.fire_cooldown = FIRE_COOLDOWN;
            self.fire_spread(idx, ProjectileKind::OzoneShell, OZONE_SHELLS, OZONE_SPREAD);
            self.play(Cue::OzoneVolley);
        } else if input.fire_blast && bot.spend(AmmoKind::Carbon, 1) {
            bot.fire_cooldown = FIRE_COOLDOWN;
            self.fire_spread(idx, ProjectileKind::AtomicMole, MOLE_PELLETS, MOLE_SPREAD);
            self.play(Cue::AtomicMoleBlast);
        }
    }

    /// Fan `count` projectiles around the bot's heading
    fn fire_spread(&mut self, idx: usize, kind: ProjectileKind, count: usize, spread: f32) {
        let scale = self.config.scale;
        let actor = &self.actors[idx];
        let (owner, pos, vel, heading) = (actor.id, actor.pos, actor.vel, actor.direction);
        let clearance = actor.radius + kind.species().info().radius * scale + 2.0 * scale;
        let middle = (count as f32 - 1.0) * 0.5;

        for k in 0..count {
            let dir = rotate(heading, (k as f32 - middle) * spread);
            let muzzle = pos + dir * clearance;
            self.fire_projectile(kind, owner, muzzle, vel + dir * kind.speed() * scale);
        }
    }

    fn hydrogen_boost(&mut self, idx: usize) {
        let scale = self.config.scale;
        let actor = &mut self.actors[idx];
        let dir = actor.direction;
        actor.vel += dir * HYDROGEN_BOOST_SPEED * scale;
        let tail = actor.pos - dir * actor.radius;
        let plume = -dir * HYDROGEN_BOOST_SPEED * 0.5 * scale;
        self.emit(ParticleBurst::exhaust(tail, plume, scale));
        self.play(Cue::HydrogenBoost);
    }

    /// A playing bot absorbs collectibles and bounces off everything else
    pub(crate) fn nanobot_touch(&mut self, idx: usize, other: usize) -> bool {
        if !self.actors[idx].is_playing() {
            return false;
        }
        let species = self.actors[other].species;
        if let Some(pickup) = pickup_for(species) {
            self.absorb(idx, other, pickup);
            return true;
        }
        match species.category() {
            Category::Field => false,
            Category::FreeRadical | Category::GreenhouseGas => {
                if let Some(bot) = self.actors[idx].nanobot_mut() {
                    bot.bump_rumble(0.3);
                }
                true
            }
            _ => true,
        }
    }

    /// Destroy a collectible; credit ammo only while positively charged
    fn absorb(&mut self, idx: usize, other: usize, pickup: Pickup) {
        let Some(bot) = self.actors[idx].nanobot_mut() else {
            return;
        };
        let granted = if bot.positive_charge {
            bot.credit(pickup.ammo, pickup.amount)
        } else {
            0
        };
        bot.bump_rumble(pickup.rumble);
        let slot = bot.slot;

        let target = &self.actors[other];
        let (species, pos, vel) = (target.species, target.pos, target.vel);
        // Collected whole; pickups never split into fragments
        self.base_die(other);
        let scale = self.config.scale;
        self.emit(ParticleBurst::sparks(pos, vel, species.colors(), scale));
        self.play(Cue::Collect);
        log::debug!(
            "Player {} absorbed {} (+{} {:?})",
            slot + 1,
            species.info().formula,
            granted,
            pickup.ammo
        );
    }

    pub(crate) fn nanobot_damage(&mut self, idx: usize, source: Option<ActorId>, amount: f32) -> bool {
        let actor = &mut self.actors[idx];
        let Some(bot) = actor.nanobot_mut() else {
            return false;
        };
        if !bot.playing || bot.is_safe() {
            return false;
        }

        let shield_before = bot.shield;
        bot.shield -= amount;
        bot.since_damage = 0.0;
        bot.bump_rumble(0.3 + amount / NANOBOT_MAX_LIFE);
        let overflow = if bot.shield < 0.0 {
            let overflow = -bot.shield;
            bot.shield = 0.0;
            overflow
        } else {
            0.0
        };
        let shield_broke = shield_before > 0.0 && bot.shield <= 0.0;
        actor.life -= overflow;
        let life = actor.life;

        self.play(Cue::PlayerHit);
        if shield_broke {
            self.play(Cue::ShieldDown);
        }
        if life <= 0.0 {
            self.die_at(idx, source);
        }
        true
    }

    /// The NanoBot that should be credited for a hit from `source`
    fn resolve_attacker(&self, source: Option<ActorId>) -> Option<ActorId> {
        let actor = self.actor(source?)?;
        if let Some(projectile) = actor.projectile() {
            return Some(projectile.owner);
        }
        actor.nanobot().map(|_| actor.id)
    }

    /// NanoBots stay registered; they only go dark until the respawn timer runs out
    pub(crate) fn nanobot_die(&mut self, idx: usize, source: Option<ActorId>) {
        let attacker = self.resolve_attacker(source);
        let scale = self.config.scale;
        let actor = &mut self.actors[idx];
        let (victim, pos, vel) = (actor.id, actor.pos, actor.vel);
        actor.dead = true;
        actor.vel = Vec2::ZERO;
        let Some(bot) = actor.nanobot_mut() else {
            return;
        };
        bot.respawn_timer = RESPAWN_TIME;
        bot.deaths += 1;
        bot.shield = 0.0;
        bot.negative_charge = false;
        bot.positive_charge = false;
        bot.rumble = 1.0;
        let slot = bot.slot;

        match attacker {
            Some(killer) if killer == victim => {
                bot.score -= 1;
                log::info!("Player {} destroyed themselves", slot + 1);
            }
            Some(killer) => {
                let credited = self
                    .actor_mut(killer)
                    .and_then(|actor| actor.nanobot_mut())
                    .map(|bot| {
                        bot.score += 1;
                        bot.kills += 1;
                        bot.slot
                    });
                match credited {
                    Some(by) => log::info!("Player {} destroyed by player {}", slot + 1, by + 1),
                    None => log::info!("Player {} destroyed", slot + 1),
                }
            }
            None => log::info!("Player {} destroyed", slot + 1),
        }

        self.emit(ParticleBurst::explosion(pos, vel, Species::NanoBot.colors(), scale));
        self.play(Cue::ExplosionLarge);
    }
}
