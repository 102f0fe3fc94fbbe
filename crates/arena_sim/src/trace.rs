//! CSV telemetry traces and decision logs.
//!
//! Input traces carry one `fps,gpu_temp,cpu_usage,frame_time_ms` row per tick.
//! Decision logs carry one row per manager tick.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use arena_core::{
    AmbientOcclusion, Knob, QualityAction, QualityDecision, ShadowDistance, TelemetrySample,
};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRow {
    pub fps: f64,
    pub gpu_temp: f64,
    pub cpu_usage: f64,
    pub frame_time_ms: f64,
}

impl From<&TelemetrySample> for TraceRow {
    fn from(s: &TelemetrySample) -> Self {
        Self {
            fps: s.fps,
            gpu_temp: s.gpu_temp,
            cpu_usage: s.cpu_usage,
            frame_time_ms: s.frame_time_ms,
        }
    }
}

impl TryFrom<TraceRow> for TelemetrySample {
    type Error = arena_core::ArenaError;

    fn try_from(row: TraceRow) -> arena_core::Result<Self> {
        TelemetrySample::new(row.fps, row.gpu_temp, row.cpu_usage, row.frame_time_ms)
    }
}

/// Parse and validate a telemetry trace with a header row.
pub fn read_trace<R: Read>(reader: R) -> Result<Vec<TelemetrySample>> {
    let mut rdr = Reader::from_reader(reader);
    let mut samples = Vec::new();
    for (idx, result) in rdr.deserialize::<TraceRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = result.with_context(|| format!("malformed trace row at line {line}"))?;
        let sample = TelemetrySample::try_from(row)
            .with_context(|| format!("invalid telemetry at line {line}"))?;
        samples.push(sample);
    }
    Ok(samples)
}

pub fn write_trace<W: Write>(writer: W, samples: &[TelemetrySample]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for sample in samples {
        wtr.serialize(TraceRow::from(sample))?;
    }
    wtr.flush().context("flushing trace")?;
    Ok(())
}

/// One manager tick as written to the decision log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRow {
    pub tick: u64,
    pub frame_time_ms: f64,
    pub observed_margin: f64,
    pub predicted_margin: Option<f64>,
    pub action: QualityAction,
    pub knob: Option<Knob>,
    pub resolution_scale: f64,
    pub ambient_occlusion: AmbientOcclusion,
    pub shadow_distance: ShadowDistance,
}

impl DecisionRow {
    pub fn new(tick: u64, sample: &TelemetrySample, decision: &QualityDecision) -> Self {
        Self {
            tick,
            frame_time_ms: sample.frame_time_ms,
            observed_margin: decision.observed_margin,
            predicted_margin: decision.predicted_margin,
            action: decision.action,
            knob: decision.knob,
            resolution_scale: decision.config.resolution_scale,
            ambient_occlusion: decision.config.ambient_occlusion,
            shadow_distance: decision.config.shadow_distance,
        }
    }
}

pub fn write_decisions<W: Write>(writer: W, rows: &[DecisionRow]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().context("flushing decision log")?;
    Ok(())
}
