use serde::{Deserialize, Serialize};

use crate::api::error::EngineError;

/// Tunable parameters for one game session.
/// Each variant profile provides a base; hosts override fields via JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Length of a round in milliseconds (default: 10000).
    pub game_duration_ms: u32,
    /// A target spawns every N processed frames (default: 30).
    pub spawn_interval_frames: u32,
    /// Effective touch radius of a tracked point, in pixels (default: 8).
    pub landmark_hit_radius_px: f32,
    /// Length of the catch animation in frames (default: 30).
    pub vanish_frames: u32,
    /// Vertical target speed in pixels per frame at the display refresh rate (default: 3).
    pub fall_speed_px: f32,
    /// Run the detector every N frames and reuse the last result otherwise (default: 1).
    pub detect_every_n_frames: u32,
    /// Uniform scale applied to the fitted viewport to lower render cost (default: 1.0).
    pub resolution_scale: f32,
    /// Seed for spawn randomness. The browser bridge draws one per session
    /// unless the host pins it.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_duration_ms: 10_000,
            spawn_interval_frames: 30,
            landmark_hit_radius_px: 8.0,
            vanish_frames: 30,
            fall_speed_px: 3.0,
            detect_every_n_frames: 1,
            resolution_scale: 1.0,
            seed: 42,
        }
    }
}

impl SessionConfig {
    /// Parse a complete config; missing fields take the global defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_duration_ms(mut self, ms: u32) -> Self {
        self.game_duration_ms = ms;
        self
    }

    pub fn with_detect_every(mut self, frames: u32) -> Self {
        self.detect_every_n_frames = frames;
        self
    }

    pub fn with_resolution_scale(mut self, scale: f32) -> Self {
        self.resolution_scale = scale;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Apply host overrides on top of this config, then validate.
    pub fn apply(mut self, overrides: &ConfigOverrides) -> Result<Self, EngineError> {
        if let Some(v) = overrides.game_duration_ms {
            self.game_duration_ms = v;
        }
        if let Some(v) = overrides.spawn_interval_frames {
            self.spawn_interval_frames = v;
        }
        if let Some(v) = overrides.landmark_hit_radius_px {
            self.landmark_hit_radius_px = v;
        }
        if let Some(v) = overrides.vanish_frames {
            self.vanish_frames = v;
        }
        if let Some(v) = overrides.fall_speed_px {
            self.fall_speed_px = v;
        }
        if let Some(v) = overrides.detect_every_n_frames {
            self.detect_every_n_frames = v;
        }
        if let Some(v) = overrides.resolution_scale {
            self.resolution_scale = v;
        }
        if let Some(v) = overrides.seed {
            self.seed = v;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values the frame loop cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.spawn_interval_frames == 0 {
            return Err(invalid("spawn_interval_frames", "must be at least 1"));
        }
        if self.vanish_frames == 0 {
            return Err(invalid("vanish_frames", "must be at least 1"));
        }
        if self.detect_every_n_frames == 0 {
            return Err(invalid("detect_every_n_frames", "must be at least 1"));
        }
        if !(self.fall_speed_px.is_finite() && self.fall_speed_px > 0.0) {
            return Err(invalid("fall_speed_px", "must be a positive number"));
        }
        if !(self.resolution_scale.is_finite() && self.resolution_scale > 0.0) {
            return Err(invalid("resolution_scale", "must be a positive number"));
        }
        if !(self.landmark_hit_radius_px.is_finite() && self.landmark_hit_radius_px >= 0.0) {
            return Err(invalid("landmark_hit_radius_px", "must be zero or positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> EngineError {
    EngineError::ConfigValue {
        field,
        reason: reason.to_string(),
    }
}

/// Partial config sent by the host. Absent fields keep the variant's base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub game_duration_ms: Option<u32>,
    pub spawn_interval_frames: Option<u32>,
    pub landmark_hit_radius_px: Option<f32>,
    pub vanish_frames: Option<u32>,
    pub fall_speed_px: Option<f32>,
    pub detect_every_n_frames: Option<u32>,
    pub resolution_scale: Option<f32>,
    pub seed: Option<u64>,
}

impl ConfigOverrides {
    /// Parse overrides; an empty string means "no overrides".
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Use `seed` unless the host already pinned one.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.seed.get_or_insert(seed);
        self
    }
}
