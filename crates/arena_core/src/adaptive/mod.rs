pub mod ladder;
pub mod performance;
pub mod quality_manager;
pub mod window;

pub use ladder::{Direction, Knob, SettingsLadder};
pub use performance::{AdaptivePerformanceManager, PerformanceRecommendation, PerformanceSample};
pub use quality_manager::{AdaptiveQualityManager, QualityAction, QualityDecision};
pub use window::RollingWindow;
