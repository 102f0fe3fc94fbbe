use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};

/// Number of regression features extracted from one sample.
pub const FEATURE_COUNT: usize = 4;

/// One observation captured from the game and hardware sensors.
///
/// Plain `Copy` value: the producer creates one per tick and the rolling
/// window keeps its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Frames per second (> 0)
    pub fps: f64,
    /// GPU temperature in degrees Celsius
    pub gpu_temp: f64,
    /// CPU utilisation percentage in [0, 100]
    pub cpu_usage: f64,
    /// Frame time in milliseconds (> 0)
    pub frame_time_ms: f64,
}

impl TelemetrySample {
    /// Build a sample, rejecting values a sane producer would never emit.
    ///
    /// The quality manager accepts unchecked samples as well; validation is the
    /// producer's job and this constructor is the place to do it.
    pub fn new(fps: f64, gpu_temp: f64, cpu_usage: f64, frame_time_ms: f64) -> Result<Self> {
        let sample = Self {
            fps,
            gpu_temp,
            cpu_usage,
            frame_time_ms,
        };
        sample.validate()?;
        Ok(sample)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite()
            && self.gpu_temp.is_finite()
            && self.cpu_usage.is_finite()
            && self.frame_time_ms.is_finite())
        {
            return Err(ArenaError::InvalidSample(
                "all fields must be finite".to_string(),
            ));
        }
        if self.fps <= 0.0 {
            return Err(ArenaError::InvalidSample("fps must be positive".to_string()));
        }
        if self.frame_time_ms <= 0.0 {
            return Err(ArenaError::InvalidSample(
                "frame_time_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.cpu_usage) {
            return Err(ArenaError::InvalidSample(
                "cpu_usage must be within [0, 100]".to_string(),
            ));
        }
        Ok(())
    }

    /// Spare frame time against `target_frame_time_ms`.
    /// Positive means headroom, negative means the frame ran long.
    pub fn performance_margin(&self, target_frame_time_ms: f64) -> f64 {
        target_frame_time_ms - self.frame_time_ms
    }

    /// Regression features in fixed order: fps, gpu_temp, cpu_usage, frame_time_ms.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [self.fps, self.gpu_temp, self.cpu_usage, self.frame_time_ms]
    }
}
