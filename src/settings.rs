//! Level settings
//!
//! Loaded by the host from JSON. Every field has a default, so a partial file
//! only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::SimError;

/// Level tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Broad-phase ===
    /// Width of one map tile in world units
    pub tile_width: f32,
    /// Tiles per grid chunk
    pub chunk_length: u32,

    // === Timing ===
    /// Step the demo driver hands to `tick` (seconds)
    pub fixed_step: f32,

    // === Randomness ===
    /// Seed for the level RNG (ambush rolls, bounce-death launch side)
    pub seed: u64,
    /// Chance that an emptied mystery box releases an ambush instead of its reward
    pub ambush_chance: f32,

    // === Flow ===
    /// Start with the debug overlay on
    pub debug_overlay: bool,
    /// Hold the level until the first directional input
    pub wait_for_input: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_width: 16.0,
            chunk_length: 4,

            fixed_step: 0.016,

            seed: 0,
            ambush_chance: 0.01,

            debug_overlay: false,
            wait_for_input: true,
        }
    }
}

impl Settings {
    /// Width of one grid chunk in world units
    pub fn chunk_width(&self) -> f32 {
        self.tile_width * self.chunk_length as f32
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| SimError::Settings(e.to_string()))?;
        settings.validate()?;
        log::info!(
            "Loaded settings (seed {}, chunk width {})",
            settings.seed,
            settings.chunk_width()
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Settings(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.tile_width > 0.0) {
            return Err(SimError::Settings(format!(
                "tile_width must be positive, got {}",
                self.tile_width
            )));
        }
        if self.chunk_length == 0 {
            return Err(SimError::Settings("chunk_length must be at least 1".into()));
        }
        if !(self.fixed_step > 0.0) {
            return Err(SimError::Settings(format!(
                "fixed_step must be positive, got {}",
                self.fixed_step
            )));
        }
        if !(0.0..=1.0).contains(&self.ambush_chance) {
            return Err(SimError::Settings(format!(
                "ambush_chance must be within [0, 1], got {}",
                self.ambush_chance
            )));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chunk_width(), 64.0);
        assert!(settings.wait_for_input);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "ambush_chance": 0.0 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.ambush_chance, 0.0);
        assert_eq!(settings.tile_width, 16.0);
        assert_eq!(settings.chunk_length, 4);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "chunk_length": 0 }"#),
            Err(SimError::Settings(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "ambush_chance": 1.5 }"#),
            Err(SimError::Settings(_))
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SimError::Settings(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default().with_seed(42);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
