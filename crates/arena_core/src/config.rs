use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use clap::Args;

use crate::error::{ArenaError, Result};

/// Adaptive quality loop tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Args))]
#[serde(default)]
pub struct QualitySettings {
    /// Rolling window capacity (training rows for the regressor)
    #[cfg_attr(feature = "cli", arg(long, global = true, default_value_t = 120))]
    pub window_capacity: usize,

    /// L2 regularisation strength for the ridge regressor
    #[cfg_attr(feature = "cli", arg(long, global = true, default_value_t = 1e-2))]
    pub ridge_alpha: f64,

    /// Frame time budget in milliseconds
    #[cfg_attr(feature = "cli", arg(long, global = true, default_value_t = 16.0))]
    pub target_frame_time_ms: f64,

    /// Half-width of the no-action band around zero margin, in milliseconds
    #[cfg_attr(feature = "cli", arg(long, global = true, default_value_t = 1.0))]
    pub margin_tolerance_ms: f64,

    /// Samples stored before the model is trained
    #[cfg_attr(feature = "cli", arg(long, global = true, default_value_t = 5))]
    pub warmup_samples: usize,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            window_capacity: 120,
            ridge_alpha: 1e-2,
            target_frame_time_ms: 16.0,
            margin_tolerance_ms: 1.0,
            warmup_samples: 5,
        }
    }
}

impl QualitySettings {
    pub fn validate(&self) -> Result<()> {
        if self.window_capacity == 0 {
            return Err(ArenaError::InvalidCapacity);
        }
        if !(self.ridge_alpha >= 0.0) || !self.ridge_alpha.is_finite() {
            return Err(ArenaError::invalid_parameter(
                "ridge_alpha",
                "must be finite and non-negative",
            ));
        }
        if !(self.target_frame_time_ms > 0.0) || !self.target_frame_time_ms.is_finite() {
            return Err(ArenaError::invalid_parameter(
                "target_frame_time_ms",
                "must be positive",
            ));
        }
        if !(self.margin_tolerance_ms >= 0.0) || !self.margin_tolerance_ms.is_finite() {
            return Err(ArenaError::invalid_parameter(
                "margin_tolerance_ms",
                "must be finite and non-negative",
            ));
        }
        if self.warmup_samples == 0 {
            return Err(ArenaError::invalid_parameter(
                "warmup_samples",
                "must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    pub target_fps: f64,
    pub history: usize,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            history: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachSettings {
    pub history: usize,
}

impl Default for CoachSettings {
    fn default() -> Self {
        Self { history: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub window_size: usize,
    /// `[low, high)` band in Hz treated as event energy
    pub event_band_hz: (f64, f64),
    pub intensity_threshold: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            window_size: 512,
            event_band_hz: (200.0, 2000.0),
            intensity_threshold: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    pub motion_threshold: f64,
    pub smoothing: f64,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            motion_threshold: 0.12,
            smoothing: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    /// Per-task CPU limit, percent
    pub cpu_limit: f64,
    /// Per-task memory limit, MB
    pub memory_limit_mb: f64,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            cpu_limit: 10.0,
            memory_limit_mb: 300.0,
        }
    }
}

/// Top-level configuration. Every section falls back to its defaults when
/// missing from the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ArenaConfig {
    #[serde(default)]
    pub quality: QualitySettings,
    #[serde(default)]
    pub performance: PerformanceSettings,
    #[serde(default)]
    pub coach: CoachSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub vision: VisionSettings,
    #[serde(default)]
    pub system: SystemSettings,
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<()> {
        self.quality.validate()?;

        if !(self.performance.target_fps > 0.0) {
            return Err(ArenaError::invalid_parameter("performance.target_fps", "must be positive"));
        }
        if self.performance.history == 0 {
            return Err(ArenaError::invalid_parameter("performance.history", "must be positive"));
        }
        if self.coach.history == 0 {
            return Err(ArenaError::invalid_parameter("coach.history", "must be positive"));
        }
        if self.audio.sample_rate == 0 {
            return Err(ArenaError::invalid_parameter("audio.sample_rate", "must be positive"));
        }
        if self.audio.window_size == 0 {
            return Err(ArenaError::invalid_parameter("audio.window_size", "must be positive"));
        }
        let (low, high) = self.audio.event_band_hz;
        if !(low < high) {
            return Err(ArenaError::invalid_parameter(
                "audio.event_band_hz",
                "must be (low, high) with low < high",
            ));
        }
        if !(0.0..=1.0).contains(&self.vision.motion_threshold) {
            return Err(ArenaError::invalid_parameter(
                "vision.motion_threshold",
                "must be within [0, 1]",
            ));
        }
        if !(self.vision.smoothing > 0.0 && self.vision.smoothing <= 1.0) {
            return Err(ArenaError::invalid_parameter("vision.smoothing", "must be within (0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let json = r#"{"quality":{"window_capacity":30},"vision":{"smoothing":0.5}}"#;
        let config: ArenaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.quality.window_capacity, 30);
        assert_eq!(config.quality.target_frame_time_ms, 16.0);
        assert_eq!(config.vision.smoothing, 0.5);
        assert_eq!(config.vision.motion_threshold, 0.12);
        assert_eq!(config.audio.sample_rate, 48_000);
    }

    #[test]
    fn test_validation_catches_bad_values() {
        let mut config = ArenaConfig::default();
        config.quality.window_capacity = 0;
        assert_eq!(config.validate(), Err(ArenaError::InvalidCapacity));

        let mut config = ArenaConfig::default();
        config.quality.ridge_alpha = -1.0;
        assert!(config.validate().is_err());

        let mut config = ArenaConfig::default();
        config.audio.event_band_hz = (2000.0, 200.0);
        assert!(config.validate().is_err());

        let mut config = ArenaConfig::default();
        config.vision.smoothing = 0.0;
        assert!(config.validate().is_err());
    }
}
