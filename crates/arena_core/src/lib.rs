//! # arena_core
//!
//! Adaptive graphics quality control for real-time games, plus the heuristic
//! advisors that share its telemetry.
//!
//! The centre of the crate is [`AdaptiveQualityManager`]: every tick it takes
//! one [`TelemetrySample`] and the active [`GraphicsConfig`], stores them in a
//! bounded [`RollingWindow`], refits a [`RidgeRegressor`] over the window and
//! moves at most one rung on the settings ladder.
//!
//! ```no_run
//! use arena_core::{AdaptiveQualityManager, GraphicsConfig, QualitySettings, TelemetrySample};
//!
//! # fn main() -> arena_core::Result<()> {
//! let mut manager = AdaptiveQualityManager::new(&QualitySettings::default())?;
//! let mut config = GraphicsConfig::default();
//! for frame_time in [18.0, 19.0, 17.5, 18.5, 20.0, 21.0] {
//!     let sample = TelemetrySample::new(1000.0 / frame_time, 65.0, 55.0, frame_time)?;
//!     config = manager.update(&sample, &config)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Around it sit independent subsystems: a rule-based performance advisor,
//! audio and vision analyzers, a practice coach and a system optimizer, all
//! fused by [`ArenaHelper`] into an overlay payload.

pub mod adaptive;
pub mod audio;
pub mod coach;
pub mod config;
pub mod error;
pub mod graphics;
pub mod helper;
pub mod regression;
pub mod system;
pub mod telemetry;
pub mod vision;

pub use adaptive::{
    AdaptivePerformanceManager, AdaptiveQualityManager, Direction, Knob, PerformanceRecommendation,
    PerformanceSample, QualityAction, QualityDecision, RollingWindow, SettingsLadder,
};
pub use config::{ArenaConfig, QualitySettings};
pub use error::{ArenaError, Result};
pub use graphics::{AmbientOcclusion, GraphicsConfig, ShadowDistance};
pub use helper::{ArenaHelper, OverlayPayload};
pub use regression::RidgeRegressor;
pub use telemetry::TelemetrySample;
