//! Synthetic telemetry for closed-loop runs.
//!
//! Each scenario sets a baseline frame time for the default graphics config.
//! The generator scales it by the render cost of the config that is active on
//! the tick, so quality changes made by the manager feed back into the next
//! sample.

use arena_core::{AmbientOcclusion, GraphicsConfig, ShadowDistance, TelemetrySample};
use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Scene too heavy for the budget (~20 ms at default quality)
    Overloaded,
    /// Plenty of spare frame time (~12 ms)
    Headroom,
    /// Load swings around the budget
    Oscillating,
    /// GPU heats up and frame time creeps upward
    ThermalRamp,
}

impl Scenario {
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Overloaded => "overloaded",
            Scenario::Headroom => "headroom",
            Scenario::Oscillating => "oscillating",
            Scenario::ThermalRamp => "thermal_ramp",
        }
    }

    /// Frame time at default quality and the GPU temperature for `tick`.
    fn baseline(self, tick: u64) -> (f64, f64) {
        let t = tick as f64;
        match self {
            Scenario::Overloaded => (20.0, 72.0),
            Scenario::Headroom => (12.0, 58.0),
            Scenario::Oscillating => (16.0 + 5.0 * (t / 8.0).sin(), 66.0),
            Scenario::ThermalRamp => {
                let heat = (t * 0.25).min(30.0);
                (14.0 + heat * 0.2, 62.0 + heat)
            }
        }
    }
}

/// Relative render cost of `config`; 1.0 for `GraphicsConfig::default()`.
pub fn render_cost(config: &GraphicsConfig) -> f64 {
    let config = config.clamp();
    let ao = match config.ambient_occlusion {
        AmbientOcclusion::Off => 0.0,
        AmbientOcclusion::Low => 0.04,
        AmbientOcclusion::Medium => 0.08,
        AmbientOcclusion::High => 0.14,
    };
    let shadows = match config.shadow_distance {
        ShadowDistance::Short => 0.04,
        ShadowDistance::Medium => 0.12,
        ShadowDistance::Long => 0.2,
    };
    0.3 + 0.5 * config.resolution_scale.powi(2) + ao + shadows
}

pub struct TelemetryGenerator {
    scenario: Scenario,
    rng: ChaCha8Rng,
    tick: u64,
    jitter_ms: f64,
}

impl TelemetryGenerator {
    pub fn new(scenario: Scenario, seed: u64) -> Self {
        Self {
            scenario,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
            jitter_ms: 0.5,
        }
    }

    /// Frame time noise is uniform in `[-jitter_ms, jitter_ms]`.
    pub fn with_jitter(mut self, jitter_ms: f64) -> Self {
        self.jitter_ms = jitter_ms.abs();
        self
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Produce the sample observed while `config` is active.
    pub fn next_sample(&mut self, config: &GraphicsConfig) -> TelemetrySample {
        let (base_ms, gpu_temp) = self.scenario.baseline(self.tick);
        self.tick += 1;

        let jitter = if self.jitter_ms > 0.0 {
            self.rng.gen_range(-self.jitter_ms..=self.jitter_ms)
        } else {
            0.0
        };
        let frame_time_ms = (base_ms * render_cost(config) + jitter).max(1.0);
        let cpu_usage = (35.0 + frame_time_ms * 1.5 + self.rng.gen_range(-5.0..=5.0)).clamp(0.0, 100.0);

        TelemetrySample {
            fps: 1000.0 / frame_time_ms,
            gpu_temp: gpu_temp + self.rng.gen_range(-1.0..=1.0),
            cpu_usage,
            frame_time_ms,
        }
    }
}
