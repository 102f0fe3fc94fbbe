//! Drives an `AdaptiveQualityManager` over recorded or synthetic telemetry.
//!
//! In both modes the config recommended on one tick is the active config on
//! the next, the way a game would apply it.

use arena_core::{AdaptiveQualityManager, GraphicsConfig, QualityAction, TelemetrySample};
use serde::Serialize;
use tracing::debug;

use crate::scenario::TelemetryGenerator;
use crate::trace::DecisionRow;

/// Replay a fixed trace. Frame times do not react to the recommendations.
pub fn replay(
    manager: &mut AdaptiveQualityManager,
    samples: &[TelemetrySample],
    start: GraphicsConfig,
) -> arena_core::Result<Vec<DecisionRow>> {
    let mut config = start;
    let mut rows = Vec::with_capacity(samples.len());
    for (tick, sample) in samples.iter().enumerate() {
        let decision = manager.evaluate(sample, &config)?;
        rows.push(DecisionRow::new(tick as u64, sample, &decision));
        config = decision.config;
    }
    Ok(rows)
}

/// Closed loop: each sample is generated under the currently active config.
pub fn simulate(
    manager: &mut AdaptiveQualityManager,
    generator: &mut TelemetryGenerator,
    ticks: u64,
    start: GraphicsConfig,
) -> arena_core::Result<(Vec<TelemetrySample>, Vec<DecisionRow>)> {
    let mut config = start;
    let mut samples = Vec::with_capacity(ticks as usize);
    let mut rows = Vec::with_capacity(ticks as usize);
    for tick in 0..ticks {
        let sample = generator.next_sample(&config);
        let decision = manager.evaluate(&sample, &config)?;
        if let Some(knob) = decision.knob {
            debug!(tick, knob = knob.label(), config = %decision.config, "ladder moved");
        }
        rows.push(DecisionRow::new(tick, &sample, &decision));
        samples.push(sample);
        config = decision.config;
    }
    Ok((samples, rows))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: usize,
    pub scale_downs: usize,
    pub scale_ups: usize,
    pub holds: usize,
    /// Ticks whose frame time exceeded the target
    pub over_budget: usize,
    pub mean_frame_time_ms: f64,
    pub final_config: Option<GraphicsConfig>,
}

impl RunSummary {
    pub fn from_rows(rows: &[DecisionRow], target_frame_time_ms: f64) -> Self {
        let count = |action: QualityAction| rows.iter().filter(|r| r.action == action).count();
        let mean_frame_time_ms = if rows.is_empty() {
            0.0
        } else {
            rows.iter().map(|r| r.frame_time_ms).sum::<f64>() / rows.len() as f64
        };
        Self {
            ticks: rows.len(),
            scale_downs: count(QualityAction::ScaleDown),
            scale_ups: count(QualityAction::ScaleUp),
            holds: count(QualityAction::Hold),
            over_budget: rows
                .iter()
                .filter(|r| r.frame_time_ms > target_frame_time_ms)
                .count(),
            mean_frame_time_ms,
            final_config: rows.last().map(|r| {
                GraphicsConfig::new(r.resolution_scale, r.ambient_occlusion, r.shadow_distance)
            }),
        }
    }
}
