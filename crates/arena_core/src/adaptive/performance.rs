//! Rule-based performance advisor.
//!
//! Complements the learned quality loop with a stateless-per-tick heuristic:
//! fps ratio, combined CPU/GPU load and frame pressure map to a render scaling
//! factor and a coarse quality shift. History only feeds the confidence score.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::PerformanceSettings;
use crate::error::{ArenaError, Result};

/// Telemetry snapshot for the rule-based advisor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub fps: f64,
    pub frame_time_ms: f64,
    /// CPU utilisation, percent
    pub cpu_util: f64,
    /// GPU utilisation, percent
    pub gpu_util: f64,
}

impl PerformanceSample {
    pub fn validate(&self) -> Result<()> {
        if !(self.fps > 0.0 && self.frame_time_ms > 0.0) {
            return Err(ArenaError::InvalidSample(
                "fps and frame_time_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.cpu_util) || !(0.0..=100.0).contains(&self.gpu_util) {
            return Err(ArenaError::InvalidSample(
                "cpu_util and gpu_util must be within [0, 100]".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecommendation {
    /// Render scaling factor in [0.5, 1.25]
    pub scaling_factor: f64,
    /// Quality preset delta in [-2, 1]
    pub quality_shift: i8,
    /// Grows with history length, saturates at 1.0
    pub confidence: f64,
    pub narrative: String,
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

pub struct AdaptivePerformanceManager {
    target_fps: f64,
    capacity: usize,
    history: VecDeque<PerformanceSample>,
}

impl AdaptivePerformanceManager {
    pub fn new(target_fps: f64, history: usize) -> Result<Self> {
        if !(target_fps > 0.0) || !target_fps.is_finite() {
            return Err(ArenaError::invalid_parameter(
                "target_fps",
                "must be positive",
            ));
        }
        if history == 0 {
            return Err(ArenaError::invalid_parameter("history", "must be positive"));
        }
        Ok(Self {
            target_fps,
            capacity: history,
            history: VecDeque::with_capacity(history),
        })
    }

    pub fn from_settings(settings: &PerformanceSettings) -> Result<Self> {
        Self::new(settings.target_fps, settings.history)
    }

    /// Ingest telemetry and emit a fresh recommendation.
    pub fn update(&mut self, sample: &PerformanceSample) -> Result<PerformanceRecommendation> {
        sample.validate()?;

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(*sample);

        let fps_ratio = sample.fps / self.target_fps;
        let load = (sample.cpu_util + sample.gpu_util) / 200.0;
        let frame_pressure = sample.frame_time_ms / (1000.0 / self.target_fps);

        let scaling_factor = compute_scaling(fps_ratio, load, frame_pressure);
        let quality_shift = quality_shift(fps_ratio, load);

        Ok(PerformanceRecommendation {
            scaling_factor: round_to(scaling_factor, 3),
            quality_shift,
            confidence: round_to(self.confidence(), 3),
            narrative: compose_narrative(fps_ratio, quality_shift),
        })
    }

    fn confidence(&self) -> f64 {
        (self.history.len() as f64 / (0.35 * self.capacity as f64)).min(1.0)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

fn compute_scaling(fps_ratio: f64, load: f64, frame_pressure: f64) -> f64 {
    let mut adjustment = 1.0;
    adjustment -= (1.0 - fps_ratio).max(0.0) * 0.2;
    adjustment -= (load - 0.85).max(0.0) * 0.3;
    adjustment -= (frame_pressure - 1.0).max(0.0) * 0.25;
    adjustment += (fps_ratio - 1.2).max(0.0) * 0.1;
    adjustment.clamp(0.5, 1.25)
}

fn quality_shift(fps_ratio: f64, load: f64) -> i8 {
    if fps_ratio < 0.92 || load > 0.95 {
        -2
    } else if fps_ratio < 0.98 || load > 0.9 {
        -1
    } else if fps_ratio > 1.25 && load < 0.7 {
        1
    } else {
        0
    }
}

fn compose_narrative(fps_ratio: f64, quality_shift: i8) -> String {
    let tone = match quality_shift {
        s if s < 0 => "Pare visuals back; stability precedes spectacle.",
        s if s > 0 => "Performance headroom invites richer detail; paint the battlefield vivid.",
        _ => "Hold the line; balance between clarity and velocity is on point.",
    };
    let momentum = if fps_ratio < 1.0 {
        "Under target"
    } else if fps_ratio < 1.15 {
        "At pace"
    } else {
        "Surplus"
    };
    format!("{momentum}: {tone}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(fps: f64, cpu: f64, gpu: f64) -> PerformanceSample {
        PerformanceSample {
            fps,
            frame_time_ms: 1000.0 / fps,
            cpu_util: cpu,
            gpu_util: gpu,
        }
    }

    #[test]
    fn test_low_fps_recommends_downshift() {
        let mut mgr = AdaptivePerformanceManager::new(60.0, 30).unwrap();
        let rec = mgr.update(&sample(45.0, 80.0, 90.0)).unwrap();
        assert!(rec.scaling_factor < 1.0);
        assert_eq!(rec.quality_shift, -2);
        assert!(rec.narrative.starts_with("Under target"));
    }

    #[test]
    fn test_high_headroom_recommends_upshift() {
        let mut mgr = AdaptivePerformanceManager::new(60.0, 30).unwrap();
        let rec = mgr.update(&sample(90.0, 30.0, 40.0)).unwrap();
        assert_eq!(rec.quality_shift, 1);
        assert!(rec.scaling_factor >= 1.0);
        assert!(rec.narrative.starts_with("Surplus"));
    }

    #[test]
    fn test_confidence_grows_with_history() {
        let mut mgr = AdaptivePerformanceManager::new(60.0, 20).unwrap();
        let first = mgr.update(&sample(60.0, 50.0, 50.0)).unwrap();
        for _ in 0..10 {
            mgr.update(&sample(60.0, 50.0, 50.0)).unwrap();
        }
        let later = mgr.update(&sample(60.0, 50.0, 50.0)).unwrap();
        assert!(later.confidence > first.confidence);
        assert_eq!(later.confidence, 1.0);

        mgr.reset();
        assert!(mgr.is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut mgr = AdaptivePerformanceManager::new(60.0, 5).unwrap();
        for _ in 0..12 {
            mgr.update(&sample(60.0, 50.0, 50.0)).unwrap();
        }
        assert_eq!(mgr.len(), 5);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(AdaptivePerformanceManager::new(0.0, 10).is_err());
        assert!(AdaptivePerformanceManager::new(60.0, 0).is_err());

        let mut mgr = AdaptivePerformanceManager::new(60.0, 10).unwrap();
        assert!(mgr.update(&sample(60.0, 120.0, 50.0)).is_err());
        let mut bad = sample(60.0, 50.0, 50.0);
        bad.frame_time_ms = 0.0;
        assert!(mgr.update(&bad).is_err());
    }
}
