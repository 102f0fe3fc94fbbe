use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::ladder::{Direction, Knob, SettingsLadder};
use super::window::RollingWindow;
use crate::config::QualitySettings;
use crate::error::Result;
use crate::graphics::GraphicsConfig;
use crate::regression::RidgeRegressor;
use crate::telemetry::{TelemetrySample, FEATURE_COUNT};

/// Samples required before the regressor is trained.
pub const DEFAULT_WARMUP_SAMPLES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityAction {
    ScaleDown,
    Hold,
    ScaleUp,
}

impl QualityAction {
    pub fn direction(self) -> Option<Direction> {
        match self {
            QualityAction::ScaleDown => Some(Direction::Down),
            QualityAction::Hold => None,
            QualityAction::ScaleUp => Some(Direction::Up),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityAction::ScaleDown => "scale_down",
            QualityAction::Hold => "hold",
            QualityAction::ScaleUp => "scale_up",
        }
    }
}

/// Full outcome of one `evaluate` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityDecision {
    pub action: QualityAction,
    /// `target - frame_time` of the newest sample
    pub observed_margin: f64,
    /// Regressor output; `None` while warming up
    pub predicted_margin: Option<f64>,
    /// Setting that changed, if any
    pub knob: Option<Knob>,
    /// Recommended config, always clamped
    pub config: GraphicsConfig,
}

/// Deadband rule on observed and predicted margin.
///
/// Outside the deadband the observed margin decides on its own. Inside it the
/// prediction may still push the action past the band.
pub fn decide(observed_margin: f64, predicted_margin: f64, tolerance: f64) -> QualityAction {
    let within_band = observed_margin.abs() <= tolerance;
    if observed_margin < -tolerance || (within_band && predicted_margin < -tolerance) {
        QualityAction::ScaleDown
    } else if observed_margin > tolerance || (within_band && predicted_margin > tolerance) {
        QualityAction::ScaleUp
    } else {
        QualityAction::Hold
    }
}

/// Learns how to tune graphics settings for smooth frame delivery.
///
/// Each tick the whole window is used to refit a ridge model that maps a
/// sample's features to its own frame-time margin. The model output smooths
/// decisions that fall inside the tolerance band; it is not a forecast of the
/// next tick.
#[derive(Debug, Clone)]
pub struct AdaptiveQualityManager {
    window: RollingWindow,
    regressor: RidgeRegressor,
    ladder: SettingsLadder,
    target_frame_time_ms: f64,
    margin_tolerance_ms: f64,
    warmup_samples: usize,
}

impl AdaptiveQualityManager {
    pub fn new(settings: &QualitySettings) -> Result<Self> {
        settings.validate()?;
        let window = RollingWindow::new(settings.window_capacity)?;
        Ok(Self::from_parts(
            window,
            RidgeRegressor::new(settings.ridge_alpha),
            settings.target_frame_time_ms,
            settings.margin_tolerance_ms,
        )
        .with_warmup(settings.warmup_samples))
    }

    pub fn from_parts(
        window: RollingWindow,
        regressor: RidgeRegressor,
        target_frame_time_ms: f64,
        margin_tolerance_ms: f64,
    ) -> Self {
        Self {
            window,
            regressor,
            ladder: SettingsLadder::default(),
            target_frame_time_ms,
            margin_tolerance_ms,
            warmup_samples: DEFAULT_WARMUP_SAMPLES,
        }
    }

    pub fn with_warmup(mut self, warmup_samples: usize) -> Self {
        self.warmup_samples = warmup_samples.max(1);
        self
    }

    pub fn with_ladder(mut self, ladder: SettingsLadder) -> Self {
        self.ladder = ladder;
        self
    }

    /// Store telemetry and return the next configuration recommendation.
    pub fn update(&mut self, sample: &TelemetrySample, config: &GraphicsConfig) -> Result<GraphicsConfig> {
        Ok(self.evaluate(sample, config)?.config)
    }

    /// Like `update`, but returns the margins and the knob that moved.
    pub fn evaluate(
        &mut self,
        sample: &TelemetrySample,
        config: &GraphicsConfig,
    ) -> Result<QualityDecision> {
        self.window.append(*sample, config);
        let observed_margin = sample.performance_margin(self.target_frame_time_ms);

        if self.window.len() < self.warmup_samples {
            trace!(
                stored = self.window.len(),
                required = self.warmup_samples,
                "warming up, holding config"
            );
            return Ok(QualityDecision {
                action: QualityAction::Hold,
                observed_margin,
                predicted_margin: None,
                knob: None,
                config: config.clamp(),
            });
        }

        self.train()?;
        let predicted_margin = self.regressor.predict(&sample.features())?;
        let action = decide(observed_margin, predicted_margin, self.margin_tolerance_ms);

        let (next, knob) = match action.direction() {
            Some(direction) => {
                let transition = self.ladder.step(config, direction);
                (transition.config, transition.knob)
            }
            None => (config.clamp(), None),
        };

        debug!(
            observed_margin,
            predicted_margin,
            action = action.label(),
            knob = ?knob,
            config = %next,
            "quality decision"
        );

        Ok(QualityDecision {
            action,
            observed_margin,
            predicted_margin: Some(predicted_margin),
            knob,
            config: next,
        })
    }

    fn train(&mut self) -> Result<()> {
        let (features, targets): (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) = self
            .window
            .items()
            .map(|(s, _)| (s.features(), s.performance_margin(self.target_frame_time_ms)))
            .unzip();
        self.regressor.fit(&features, &targets)
    }

    /// Forget all history and the fitted model.
    pub fn reset(&mut self) {
        self.window.clear();
        self.regressor = RidgeRegressor::new(self.regressor.alpha());
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn regressor(&self) -> &RidgeRegressor {
        &self.regressor
    }

    pub fn target_frame_time_ms(&self) -> f64 {
        self.target_frame_time_ms
    }

    pub fn margin_tolerance_ms(&self) -> f64 {
        self.margin_tolerance_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptive::ladder::LadderRule;
    use crate::graphics::{AmbientOcclusion, Ladder, ShadowDistance};

    fn make_sample(frame_time: f64) -> TelemetrySample {
        TelemetrySample {
            fps: 1000.0 / frame_time,
            gpu_temp: 65.0,
            cpu_usage: 55.0,
            frame_time_ms: frame_time,
        }
    }

    fn manager(capacity: usize) -> AdaptiveQualityManager {
        AdaptiveQualityManager::from_parts(
            RollingWindow::new(capacity).unwrap(),
            RidgeRegressor::new(1e-2),
            16.0,
            1.0,
        )
    }

    #[test]
    fn test_decide_deadband() {
        assert_eq!(decide(-1.5, 5.0, 1.0), QualityAction::ScaleDown);
        assert_eq!(decide(-0.5, -1.5, 1.0), QualityAction::ScaleDown);
        assert_eq!(decide(1.5, -5.0, 1.0), QualityAction::ScaleUp);
        assert_eq!(decide(0.5, 1.5, 1.0), QualityAction::ScaleUp);
        assert_eq!(decide(0.5, 0.9, 1.0), QualityAction::Hold);
        // Band edges are inclusive.
        assert_eq!(decide(1.0, 0.0, 1.0), QualityAction::Hold);
        assert_eq!(decide(-1.0, 0.0, 1.0), QualityAction::Hold);
    }

    #[test]
    fn test_warmup_returns_clamped_input() {
        let mut mgr = manager(10);
        let config = GraphicsConfig::from_labels(1.3, "high", "bogus");
        for frame_time in [30.0, 31.0, 29.0, 32.0] {
            let out = mgr.update(&make_sample(frame_time), &config).unwrap();
            assert_eq!(out, config.clamp());
        }
        assert!(!mgr.regressor().is_fitted());
    }

    #[test]
    fn test_small_window_never_models() {
        let mut mgr = manager(4);
        let config = GraphicsConfig::new(0.9, AmbientOcclusion::High, ShadowDistance::Long);
        for _ in 0..20 {
            let decision = mgr.evaluate(&make_sample(40.0), &config).unwrap();
            assert_eq!(decision.action, QualityAction::Hold);
            assert_eq!(decision.config, config.clamp());
        }
        assert!(!mgr.regressor().is_fitted());
    }

    #[test]
    fn test_scales_down_when_frame_time_is_high() {
        let mut mgr = manager(10);
        let config = GraphicsConfig::new(0.95, AmbientOcclusion::High, ShadowDistance::Long);
        for frame_time in [18.0, 19.0, 17.5, 18.5, 20.0] {
            mgr.update(&make_sample(frame_time), &config).unwrap();
        }

        let decision = mgr.evaluate(&make_sample(21.0), &config).unwrap();
        assert_eq!(decision.action, QualityAction::ScaleDown);
        assert_eq!(decision.knob, Some(Knob::ResolutionScale));
        assert!(decision.config.resolution_scale < config.resolution_scale);
        assert!(mgr.regressor().is_fitted());
    }

    #[test]
    fn test_scales_up_when_margin_is_positive() {
        let mut mgr = manager(10);
        let config = GraphicsConfig::new(0.85, AmbientOcclusion::Medium, ShadowDistance::Medium);
        for frame_time in [12.0, 13.0, 12.5, 13.5, 12.8] {
            mgr.update(&make_sample(frame_time), &config).unwrap();
        }

        let out = mgr.update(&make_sample(12.2), &config).unwrap();
        assert!(out.resolution_scale > config.resolution_scale);
        assert_eq!(out.resolution_scale, 0.9);
    }

    #[test]
    fn test_out_of_range_scale_moves_one_step() {
        let mut mgr = manager(10);
        let config = GraphicsConfig::new(1.2, AmbientOcclusion::High, ShadowDistance::Long);
        let mut out = config;
        for _ in 0..5 {
            out = mgr.update(&make_sample(20.0), &config).unwrap();
        }
        assert_eq!(out.resolution_scale, 1.0);
        assert_eq!(out.ambient_occlusion, AmbientOcclusion::High);

        let mut mgr = manager(10);
        let config = GraphicsConfig::new(0.3, AmbientOcclusion::Low, ShadowDistance::Short);
        for _ in 0..5 {
            out = mgr.update(&make_sample(12.0), &config).unwrap();
        }
        assert_eq!(out.resolution_scale, 0.5);
        assert_eq!(out.ambient_occlusion, AmbientOcclusion::Low);
    }

    #[test]
    fn test_custom_ladder_trims_shadows_first() {
        let ladder = SettingsLadder::new(
            vec![
                LadderRule::new(Knob::ShadowDistance, |c| {
                    c.shadow_distance.lower().map(|sd| c.with_shadow_distance(sd))
                }),
                LadderRule::new(Knob::ResolutionScale, |c| {
                    (c.resolution_scale > 0.5).then(|| c.with_resolution_scale(c.resolution_scale - 0.1))
                }),
            ],
            vec![LadderRule::new(Knob::ShadowDistance, |c| {
                c.shadow_distance.higher().map(|sd| c.with_shadow_distance(sd))
            })],
        );
        let mut mgr = manager(10).with_ladder(ladder);
        let config = GraphicsConfig::new(1.0, AmbientOcclusion::High, ShadowDistance::Long);
        for _ in 0..4 {
            mgr.update(&make_sample(22.0), &config).unwrap();
        }

        let decision = mgr.evaluate(&make_sample(22.0), &config).unwrap();
        assert_eq!(decision.action, QualityAction::ScaleDown);
        assert_eq!(decision.knob, Some(Knob::ShadowDistance));
        assert_eq!(decision.knob.map(Knob::label), Some("shadow_distance"));
        assert_eq!(decision.config.shadow_distance, ShadowDistance::Medium);
        assert_eq!(decision.config.resolution_scale, 1.0);
        assert_eq!(decision.config.ambient_occlusion, AmbientOcclusion::High);

        // Shadows exhausted: the next rule in the table takes over.
        let short = config.with_shadow_distance(ShadowDistance::Short);
        let decision = mgr.evaluate(&make_sample(22.0), &short).unwrap();
        assert_eq!(decision.knob, Some(Knob::ResolutionScale));
        assert_eq!(decision.config.shadow_distance, ShadowDistance::Short);
        assert!(decision.config.resolution_scale < 1.0);
    }

    #[test]
    fn test_reset_clears_model() {
        let mut mgr = manager(10);
        let config = GraphicsConfig::default();
        for frame_time in [18.0, 19.0, 17.5, 18.5, 20.0] {
            mgr.update(&make_sample(frame_time), &config).unwrap();
        }
        assert!(mgr.regressor().is_fitted());

        mgr.reset();
        assert!(mgr.window().is_empty());
        assert!(!mgr.regressor().is_fitted());
        assert_eq!(mgr.regressor().alpha(), 1e-2);
    }
}
