//! Cosmetic effect boundary
//!
//! The simulation queues particle bursts and a camera focus point. Hosts turn
//! them into pixels; nothing here is ever read back into gameplay.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(140, 140, 150);
    pub const CHARCOAL: Color = Color::rgb(70, 70, 80);
    pub const RED: Color = Color::rgb(235, 60, 50);
    pub const ORANGE: Color = Color::rgb(250, 150, 40);
    pub const YELLOW: Color = Color::rgb(250, 230, 80);
    pub const BLUE: Color = Color::rgb(70, 110, 245);
    pub const SKY: Color = Color::rgb(120, 200, 255);
    pub const CYAN: Color = Color::rgb(60, 230, 230);
    pub const GREEN: Color = Color::rgb(80, 220, 90);
    pub const PALE_GREEN: Color = Color::rgb(180, 250, 160);
    pub const BROWN: Color = Color::rgb(150, 60, 30);
    pub const PURPLE: Color = Color::rgb(170, 80, 230);
    pub const MAGENTA: Color = Color::rgb(240, 70, 200);
}

/// A request for a burst of cosmetic particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub origin: Vec2,
    /// Velocity inherited by every particle
    pub velocity: Vec2,
    pub count: u32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Seconds each particle lives
    pub lifetime: f32,
    /// Size shrink per second
    pub size_decay: f32,
    pub colors: Vec<Color>,
}

impl ParticleBurst {
    /// Large radial blast (molecule split, NanoBot destroyed)
    pub fn explosion(origin: Vec2, velocity: Vec2, colors: &[Color], scale: f32) -> Self {
        Self {
            origin,
            velocity,
            count: 40,
            min_speed: 40.0 * scale,
            max_speed: 220.0 * scale,
            lifetime: 0.9,
            size_decay: 1.2,
            colors: colors.to_vec(),
        }
    }

    /// Soft inward flash when atoms join
    pub fn bond_flash(origin: Vec2, velocity: Vec2, colors: &[Color], scale: f32) -> Self {
        Self {
            origin,
            velocity,
            count: 18,
            min_speed: 10.0 * scale,
            max_speed: 70.0 * scale,
            lifetime: 0.6,
            size_decay: 2.0,
            colors: colors.to_vec(),
        }
    }

    /// Small spray used for pickups and projectile hits
    pub fn sparks(origin: Vec2, velocity: Vec2, colors: &[Color], scale: f32) -> Self {
        Self {
            origin,
            velocity,
            count: 10,
            min_speed: 30.0 * scale,
            max_speed: 120.0 * scale,
            lifetime: 0.35,
            size_decay: 3.0,
            colors: colors.to_vec(),
        }
    }

    /// Thruster plume pushed opposite to travel
    pub fn exhaust(origin: Vec2, velocity: Vec2, scale: f32) -> Self {
        Self {
            origin,
            velocity,
            count: 24,
            min_speed: 60.0 * scale,
            max_speed: 160.0 * scale,
            lifetime: 0.5,
            size_decay: 2.5,
            colors: vec![Color::WHITE, Color::SKY, Color::CYAN],
        }
    }

    /// Longest-lived particle in the burst
    pub fn duration(&self) -> f32 {
        self.lifetime
    }
}

/// Consumer of particle bursts (renderer side)
pub trait ParticleSink {
    fn emit(&mut self, burst: &ParticleBurst);
}

/// Drops every burst
#[derive(Debug, Default)]
pub struct NullParticles;

impl ParticleSink for NullParticles {
    fn emit(&mut self, _burst: &ParticleBurst) {}
}

/// Records bursts into a shared list
#[derive(Debug, Clone, Default)]
pub struct BurstRecorder {
    bursts: Rc<RefCell<Vec<ParticleBurst>>>,
}

impl BurstRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bursts(&self) -> Vec<ParticleBurst> {
        self.bursts.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.bursts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.bursts.borrow_mut().clear();
    }
}

impl ParticleSink for BurstRecorder {
    fn emit(&mut self, burst: &ParticleBurst) {
        self.bursts.borrow_mut().push(burst.clone());
    }
}

/// Background effect that follows the players (starfield, atmosphere)
pub trait Atmosphere {
    fn set_focus(&mut self, target: Vec2);
}

/// Ignores focus updates
#[derive(Debug, Default)]
pub struct StillAtmosphere;

impl Atmosphere for StillAtmosphere {
    fn set_focus(&mut self, _target: Vec2) {}
}

/// A burst the world keeps alive until its particles have faded
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub burst: ParticleBurst,
    pub age: f32,
    pub active: bool,
}

impl ParticleSystem {
    pub fn new(burst: ParticleBurst) -> Self {
        Self {
            burst,
            age: 0.0,
            active: true,
        }
    }

    /// Advance age; flags the system inactive once its lifetime is spent
    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        if self.age >= self.burst.duration() {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_expires_after_duration() {
        let burst = ParticleBurst::sparks(Vec2::ZERO, Vec2::ZERO, &[Color::RED], 1.0);
        let mut system = ParticleSystem::new(burst);
        system.update(0.1);
        assert!(system.active);
        system.update(0.3);
        assert!(!system.active);
    }

    #[test]
    fn test_recorder_clone_sees_emits() {
        let recorder = BurstRecorder::new();
        let mut sink = recorder.clone();
        sink.emit(&ParticleBurst::exhaust(Vec2::ONE, Vec2::ZERO, 1.0));
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.bursts()[0].origin, Vec2::ONE);
    }

    #[test]
    fn test_presets_scale_speeds() {
        let small = ParticleBurst::explosion(Vec2::ZERO, Vec2::ZERO, &[Color::WHITE], 0.5);
        let big = ParticleBurst::explosion(Vec2::ZERO, Vec2::ZERO, &[Color::WHITE], 1.0);
        assert!((big.max_speed - small.max_speed * 2.0).abs() < 1e-4);
    }
}
