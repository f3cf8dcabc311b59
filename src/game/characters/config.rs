// Character configuration - tuning data loaded once per character

use super::attack::{AttackStage, AttackTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration failures that prevent a state machine from starting
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("invalid {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

/// Ground locomotion tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundData {
    /// Movement speed before modifiers (units/second)
    pub base_speed: f32,
    /// Rate at which facing turns towards the movement direction
    pub base_rotation_damping: f32,
    /// Speed modifier while walking
    pub walk_speed_modifier: f32,
    /// Speed modifier while running
    pub run_speed_modifier: f32,
}

/// Airborne tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirData {
    /// Upward velocity added on jump (units/second)
    pub jump_force: f32,
    /// Multiplier applied to standard gravity
    pub gravity_scale: f32,
}

/// Immutable per-character tuning, shared by every state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub ground: GroundData,
    pub air: AirData,
    pub attacks: AttackTable,
}

/// Ground tuning used when nothing else is configured
pub const BASE_GROUND: GroundData = GroundData {
    base_speed: 5.0,
    base_rotation_damping: 10.0,
    walk_speed_modifier: 1.0,
    run_speed_modifier: 2.0,
};

/// Air tuning used when nothing else is configured
pub const BASE_AIR: AirData = AirData {
    jump_force: 5.0,
    gravity_scale: 1.0,
};

impl Default for GroundData {
    fn default() -> Self {
        BASE_GROUND
    }
}

impl Default for AirData {
    fn default() -> Self {
        BASE_AIR
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be a finite, non-negative number",
        })
    }
}

impl CharacterConfig {
    /// Default tuning with a three-stage combo
    pub fn standard() -> Self {
        Self {
            attacks: AttackTable::new(vec![
                AttackStage::new("Slash", 0, 0.8, 10)
                    .with_force(0.1, 2.0)
                    .with_damage_window(0.3, 0.6)
                    .with_animation_length(0.6),
                AttackStage::new("Backslash", 1, 0.8, 12)
                    .with_force(0.1, 2.0)
                    .with_damage_window(0.3, 0.6)
                    .with_animation_length(0.6),
                AttackStage::new("Thrust", 2, 0.0, 20)
                    .with_force(0.2, 4.0)
                    .with_damage_window(0.4, 0.7)
                    .with_animation_length(0.8),
            ]),
            ..Self::default()
        }
    }

    /// Check the numeric tuning. Attack stages are validated separately and
    /// only disable themselves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("ground.base_speed", self.ground.base_speed)?;
        non_negative(
            "ground.base_rotation_damping",
            self.ground.base_rotation_damping,
        )?;
        non_negative("ground.walk_speed_modifier", self.ground.walk_speed_modifier)?;
        non_negative("ground.run_speed_modifier", self.ground.run_speed_modifier)?;
        non_negative("air.jump_force", self.air.jump_force)?;
        non_negative("air.gravity_scale", self.air.gravity_scale)?;
        Ok(())
    }

    /// Parse and validate a configuration from RON text
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: CharacterConfig =
            ron::from_str(source).context("Failed to parse character config RON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_ron_str(&source).with_context(|| format!("Invalid config {}", path.display()))
    }
}
