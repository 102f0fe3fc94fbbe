//! Orchestrator that fuses every subsystem into one overlay payload.
//!
//! `ArenaHelper` owns one instance of each analyzer, remembers the latest
//! report from each and turns them into short commentary for a UI layer.
//! Delivering the payload is up to the caller.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::adaptive::{
    AdaptivePerformanceManager, AdaptiveQualityManager, PerformanceRecommendation,
    PerformanceSample, QualityDecision,
};
use crate::audio::{AudioAnalyzer, AudioReport};
use crate::coach::{CognitiveCoach, PracticeRecommendation, SessionMetrics};
use crate::config::ArenaConfig;
use crate::error::Result;
use crate::graphics::GraphicsConfig;
use crate::telemetry::TelemetrySample;
use crate::vision::{Pixel, VisionAnalyzer, VisionReport};

const IDLE_COMMENTARY: &str = "Awaiting telemetry; embrace stillness before the storm.";

/// Combined helper output for UI layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPayload {
    pub vision: Option<VisionReport>,
    pub audio: Option<AudioReport>,
    pub performance: Option<PerformanceRecommendation>,
    pub practice: Option<PracticeRecommendation>,
    pub graphics: Option<QualityDecision>,
    pub commentary: String,
}

impl OverlayPayload {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub struct ArenaHelper {
    vision: VisionAnalyzer,
    audio: AudioAnalyzer,
    performance: AdaptivePerformanceManager,
    coach: CognitiveCoach,
    quality: AdaptiveQualityManager,

    last_vision: Option<VisionReport>,
    last_audio: Option<AudioReport>,
    last_performance: Option<PerformanceRecommendation>,
    last_practice: Option<PracticeRecommendation>,
    last_graphics: Option<QualityDecision>,
}

impl ArenaHelper {
    pub fn new(
        vision: VisionAnalyzer,
        audio: AudioAnalyzer,
        performance: AdaptivePerformanceManager,
        coach: CognitiveCoach,
        quality: AdaptiveQualityManager,
    ) -> Self {
        Self {
            vision,
            audio,
            performance,
            coach,
            quality,
            last_vision: None,
            last_audio: None,
            last_performance: None,
            last_practice: None,
            last_graphics: None,
        }
    }

    pub fn from_config(config: &ArenaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            VisionAnalyzer::from_settings(&config.vision)?,
            AudioAnalyzer::from_settings(&config.audio)?,
            AdaptivePerformanceManager::from_settings(&config.performance)?,
            CognitiveCoach::new(config.coach.history)?,
            AdaptiveQualityManager::new(&config.quality)?,
        ))
    }

    pub fn process_frame(&mut self, frame: &[Vec<Pixel>]) -> Result<&VisionReport> {
        let report = self.vision.analyze_frame(frame)?;
        Ok(self.last_vision.insert(report))
    }

    pub fn process_audio(&mut self, samples: &[f64]) -> Result<&AudioReport> {
        let report = self.audio.analyze(samples)?;
        Ok(self.last_audio.insert(report))
    }

    pub fn process_performance(
        &mut self,
        sample: &PerformanceSample,
    ) -> Result<&PerformanceRecommendation> {
        let rec = self.performance.update(sample)?;
        Ok(self.last_performance.insert(rec))
    }

    /// Run one quality-loop tick.
    ///
    /// Never fails: if the model cannot be refit the last good recommendation
    /// is returned (or the clamped input when there is none yet).
    pub fn process_graphics(
        &mut self,
        sample: &TelemetrySample,
        config: &GraphicsConfig,
    ) -> GraphicsConfig {
        match self.quality.evaluate(sample, config) {
            Ok(decision) => self.last_graphics.insert(decision).config,
            Err(err) => {
                let fallback = self
                    .last_graphics
                    .map_or_else(|| config.clamp(), |d| d.config);
                warn!(error = %err, config = %fallback, "quality refit failed, keeping last config");
                fallback
            }
        }
    }

    pub fn record_session(&mut self, metrics: SessionMetrics) -> Result<&PracticeRecommendation> {
        self.coach.record_session(metrics)?;
        Ok(self.last_practice.insert(self.coach.recommend_practice()))
    }

    pub fn overlay_payload(&self) -> OverlayPayload {
        OverlayPayload {
            vision: self.last_vision.clone(),
            audio: self.last_audio.clone(),
            performance: self.last_performance.clone(),
            practice: self.last_practice.clone(),
            graphics: self.last_graphics,
            commentary: self.compose_commentary(),
        }
    }

    pub fn quality_manager(&self) -> &AdaptiveQualityManager {
        &self.quality
    }

    fn compose_commentary(&self) -> String {
        let mut pieces: Vec<String> = Vec::new();
        if let Some(first) = self.last_vision.as_ref().and_then(|v| v.annotations.first()) {
            pieces.push(first.clone());
        }
        if let Some(audio) = &self.last_audio {
            pieces.push(format!(
                "Audio pulse {} Hz with confidence {}.",
                audio.dominant_frequency, audio.event_confidence
            ));
        }
        if let Some(perf) = &self.last_performance {
            pieces.push(perf.narrative.clone());
        }
        if let Some(decision) = &self.last_graphics {
            pieces.push(format!(
                "Quality {}: {}.",
                decision.action.label(),
                decision.config
            ));
        }
        if let Some(practice) = &self.last_practice {
            pieces.push(practice.prompt.clone());
        }

        if pieces.is_empty() {
            IDLE_COMMENTARY.to_string()
        } else {
            pieces.join(" ")
        }
    }
}
