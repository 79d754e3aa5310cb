//! Per-player input intents
//!
//! Devices are polled elsewhere; the simulation only sees these intents, one
//! per player slot per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a player wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    /// Thrust direction, already dead-zoned; length at most 1
    pub movement: Vec2,
    /// Edge-triggered: carbon pellet spread
    pub fire_blast: bool,
    /// Edge-triggered: hydrogen boost
    pub fire_boost: bool,
    /// Edge-triggered: ozone volley
    pub fire_special: bool,
    /// Held: positive charge field
    pub charge_positive: bool,
    /// Held: negative charge field
    pub charge_negative: bool,
    /// Held: join the match (duration tracked by the NanoBot)
    pub join: bool,
    /// Held: leave the match (duration tracked by the NanoBot)
    pub leave: bool,
}

impl InputIntent {
    /// Thrust vector clamped to unit length
    pub fn thrust(&self) -> Vec2 {
        if !self.movement.is_finite() {
            return Vec2::ZERO;
        }
        self.movement.clamp_length_max(1.0)
    }

    pub fn moving(direction: Vec2) -> Self {
        Self {
            movement: direction,
            ..Default::default()
        }
    }

    pub fn joining() -> Self {
        Self {
            join: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thrust_clamped() {
        let input = InputIntent::moving(Vec2::new(3.0, 4.0));
        assert!((input.thrust().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_thrust_rejects_nan() {
        let input = InputIntent::moving(Vec2::new(f32::NAN, 0.0));
        assert_eq!(input.thrust(), Vec2::ZERO);
    }
}
