//! Arena configuration
//!
//! Supplied at World construction. Loaded from JSON by hosts; every field has
//! a default so partial files work.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating an [`ArenaConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Field actor kinds that can be placed by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    PositivePole,
    NegativePole,
    RepelPoint,
}

/// A static field actor placed at arena construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPlacement {
    pub kind: FieldKind,
    /// Position in arena units (not scaled)
    pub pos: Vec2,
}

/// Arena dimensions and wave tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    // === Dimensions ===
    /// Outer arena width
    pub width: f32,
    /// Outer arena height
    pub height: f32,
    /// Resolution-independent scale applied to sizes and speeds
    pub scale: f32,
    /// Inset of the spawn-safe rectangle from the outer bounds (unscaled)
    pub safe_inset: f32,

    // === Waves ===
    /// Seconds between free-radical spawns
    pub free_radical_interval: f32,
    /// Seconds between greenhouse-gas spawns
    pub greenhouse_interval: f32,
    /// Live free radicals at which the wave skips its spawn
    pub free_radical_cap: usize,
    /// Live greenhouse gases at which the wave skips its spawn
    pub greenhouse_cap: usize,

    // === Population ===
    /// Random atoms placed when the world is built
    pub initial_atoms: usize,
    /// Rejection-sampling budget for the spawn-point search
    pub spawn_search_attempts: u32,
    /// Static field actors
    pub fields: Vec<FieldPlacement>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            scale: 1.0,
            safe_inset: SAFE_INSET,

            free_radical_interval: FREE_RADICAL_INTERVAL,
            greenhouse_interval: GREENHOUSE_INTERVAL,
            free_radical_cap: FREE_RADICAL_CAP,
            greenhouse_cap: GREENHOUSE_CAP,

            initial_atoms: INITIAL_ATOMS,
            spawn_search_attempts: SPAWN_SEARCH_ATTEMPTS,
            fields: Vec::new(),
        }
    }
}

impl ArenaConfig {
    /// An arena with no initial population, handy for scripted scenarios
    pub fn empty(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            initial_atoms: 0,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded arena config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and greater than zero",
                })
            }
        }

        positive(self.width, "width")?;
        positive(self.height, "height")?;
        positive(self.scale, "scale")?;
        positive(self.free_radical_interval, "free_radical_interval")?;
        positive(self.greenhouse_interval, "greenhouse_interval")?;

        if !self.safe_inset.is_finite() || self.safe_inset < 0.0 {
            return Err(ConfigError::Invalid {
                field: "safe_inset",
                reason: "must be finite and not negative",
            });
        }
        let inset = self.scaled_inset();
        if inset * 2.0 >= self.width || inset * 2.0 >= self.height {
            return Err(ConfigError::Invalid {
                field: "safe_inset",
                reason: "leaves no safe rectangle inside the arena",
            });
        }
        if self.spawn_search_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "spawn_search_attempts",
                reason: "must allow at least one attempt",
            });
        }
        for field in &self.fields {
            if !field.pos.is_finite() {
                return Err(ConfigError::Invalid {
                    field: "fields",
                    reason: "field positions must be finite",
                });
            }
        }
        Ok(())
    }

    /// Safe-rectangle inset after scaling
    pub fn scaled_inset(&self) -> f32 {
        self.safe_inset * self.scale
    }

    /// Centre of the arena
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Outer bounds as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    /// Inset spawn-safe rectangle as (min, max)
    pub fn safe_rect(&self) -> (Vec2, Vec2) {
        let inset = Vec2::splat(self.scaled_inset());
        (inset, Vec2::new(self.width, self.height) - inset)
    }

    /// Whether a point lies within the outer bounds
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ArenaConfig::from_json_str(r#"{ "width": 800.0, "height": 600.0 }"#).unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.greenhouse_cap, GREENHOUSE_CAP);
        assert_eq!(config.scale, 1.0);
    }

    #[test]
    fn test_rejects_zero_scale() {
        let config = ArenaConfig {
            scale: 0.0,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "scale", .. })
        ));
    }

    #[test]
    fn test_rejects_inset_that_swallows_arena() {
        let config = ArenaConfig {
            width: 100.0,
            height: 100.0,
            safe_inset: 60.0,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "safe_inset",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            ArenaConfig::from_json_str("{ width: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_field_placements_parse() {
        let json = r#"{ "fields": [ { "kind": "RepelPoint", "pos": [640.0, 360.0] } ] }"#;
        let config = ArenaConfig::from_json_str(json).unwrap();
        assert_eq!(config.fields.len(), 1);
        assert_eq!(config.fields[0].kind, FieldKind::RepelPoint);
        assert_eq!(config.fields[0].pos, Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_safe_rect_scales_inset() {
        let config = ArenaConfig {
            scale: 0.5,
            ..ArenaConfig::default()
        };
        let (min, max) = config.safe_rect();
        assert_eq!(min, Vec2::splat(SAFE_INSET * 0.5));
        assert_eq!(max.x, ARENA_WIDTH - SAFE_INSET * 0.5);
    }

    #[test]
    fn test_json_round_trip_keeps_fields() {
        let mut config = ArenaConfig::default();
        config.fields.push(FieldPlacement {
            kind: FieldKind::PositivePole,
            pos: Vec2::new(10.0, 20.0),
        });
        let json = config.to_json().unwrap();
        let back = ArenaConfig::from_json_str(&json).unwrap();
        assert_eq!(back.fields, config.fields);
    }
}
