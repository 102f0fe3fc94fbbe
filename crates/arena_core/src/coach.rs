//! Cognitive feedback loop for player-oriented coaching.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};

/// Outcome metrics from a play session or drill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Seconds, > 0
    pub reaction_time: f64,
    /// Hit ratio in [0, 1]
    pub accuracy: f64,
    /// Self-reported or derived stress in [0, 1]
    pub stress_index: f64,
}

impl SessionMetrics {
    pub fn validate(&self) -> Result<()> {
        if !(self.reaction_time > 0.0) {
            return Err(ArenaError::InvalidSample(
                "reaction_time must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.accuracy) {
            return Err(ArenaError::InvalidSample(
                "accuracy must be within [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.stress_index) {
            return Err(ArenaError::InvalidSample(
                "stress_index must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusArea {
    Baseline,
    Reflex,
    Precision,
    Calm,
    Refine,
}

impl FocusArea {
    /// Drill length in minutes.
    pub fn drill_minutes(self) -> u32 {
        match self {
            FocusArea::Reflex => 6,
            FocusArea::Precision => 7,
            FocusArea::Calm => 4,
            FocusArea::Baseline | FocusArea::Refine => 5,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            FocusArea::Baseline => {
                "Warm up with precision flicks; collect metrics before tailoring guidance."
            }
            FocusArea::Reflex => {
                "Time-slice drills: track flick targets for 6 minutes; embrace disciplined breathing between bursts."
            }
            FocusArea::Precision => {
                "Grid micro-corrections: slow deliberate shots for 7 minutes to align muscle memory."
            }
            FocusArea::Calm => {
                "Breathing cadence plus low-intensity tracking; center yourself, let tension dissolve before live rounds."
            }
            FocusArea::Refine => {
                "Consistency weave: alternate high/low sensitivity scenarios; stay curious, narrate each adjustment like a strategist."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeRecommendation {
    pub focus_area: FocusArea,
    pub drill_minutes: u32,
    pub prompt: String,
}

impl From<FocusArea> for PracticeRecommendation {
    fn from(focus_area: FocusArea) -> Self {
        Self {
            focus_area,
            drill_minutes: focus_area.drill_minutes(),
            prompt: focus_area.prompt().to_string(),
        }
    }
}

// Focus thresholds on session averages
const SLOW_REACTION_SECS: f64 = 0.32;
const LOW_ACCURACY: f64 = 0.55;
const HIGH_STRESS: f64 = 0.65;

/// Learns player tendencies and proposes targeted practice.
pub struct CognitiveCoach {
    capacity: usize,
    history: VecDeque<SessionMetrics>,
}

impl CognitiveCoach {
    pub fn new(history: usize) -> Result<Self> {
        if history == 0 {
            return Err(ArenaError::invalid_parameter("history", "must be positive"));
        }
        Ok(Self {
            capacity: history,
            history: VecDeque::with_capacity(history),
        })
    }

    pub fn record_session(&mut self, metrics: SessionMetrics) -> Result<()> {
        metrics.validate()?;
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(metrics);
        Ok(())
    }

    pub fn recommend_practice(&self) -> PracticeRecommendation {
        if self.history.is_empty() {
            return FocusArea::Baseline.into();
        }

        let n = self.history.len() as f64;
        let (reaction, accuracy, stress) = self.history.iter().fold((0.0, 0.0, 0.0), |acc, m| {
            (
                acc.0 + m.reaction_time,
                acc.1 + m.accuracy,
                acc.2 + m.stress_index,
            )
        });
        select_focus(reaction / n, accuracy / n, stress / n).into()
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

fn select_focus(reaction: f64, accuracy: f64, stress: f64) -> FocusArea {
    if reaction > SLOW_REACTION_SECS {
        FocusArea::Reflex
    } else if accuracy < LOW_ACCURACY {
        FocusArea::Precision
    } else if stress > HIGH_STRESS {
        FocusArea::Calm
    } else {
        FocusArea::Refine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(reaction_time: f64, accuracy: f64, stress_index: f64) -> SessionMetrics {
        SessionMetrics {
            reaction_time,
            accuracy,
            stress_index,
        }
    }

    #[test]
    fn test_empty_history_is_baseline() {
        let coach = CognitiveCoach::new(10).unwrap();
        let rec = coach.recommend_practice();
        assert_eq!(rec.focus_area, FocusArea::Baseline);
        assert_eq!(rec.drill_minutes, 5);
    }

    #[test]
    fn test_focus_priority() {
        let mut coach = CognitiveCoach::new(10).unwrap();
        coach.record_session(metrics(0.40, 0.40, 0.90)).unwrap();
        assert_eq!(coach.recommend_practice().focus_area, FocusArea::Reflex);

        coach.reset();
        coach.record_session(metrics(0.25, 0.40, 0.90)).unwrap();
        assert_eq!(coach.recommend_practice().focus_area, FocusArea::Precision);

        coach.reset();
        coach.record_session(metrics(0.25, 0.80, 0.90)).unwrap();
        let rec = coach.recommend_practice();
        assert_eq!(rec.focus_area, FocusArea::Calm);
        assert_eq!(rec.drill_minutes, 4);

        coach.reset();
        coach.record_session(metrics(0.25, 0.80, 0.20)).unwrap();
        assert_eq!(coach.recommend_practice().focus_area, FocusArea::Refine);
    }

    #[test]
    fn test_history_drops_oldest() {
        let mut coach = CognitiveCoach::new(2).unwrap();
        coach.record_session(metrics(0.9, 0.9, 0.1)).unwrap();
        coach.record_session(metrics(0.2, 0.9, 0.1)).unwrap();
        coach.record_session(metrics(0.2, 0.9, 0.1)).unwrap();
        assert_eq!(coach.len(), 2);
        // The slow session has been evicted.
        assert_eq!(coach.recommend_practice().focus_area, FocusArea::Refine);
    }

    #[test]
    fn test_rejects_out_of_range_metrics() {
        let mut coach = CognitiveCoach::new(5).unwrap();
        assert!(coach.record_session(metrics(0.0, 0.5, 0.5)).is_err());
        assert!(coach.record_session(metrics(0.3, 1.5, 0.5)).is_err());
        assert!(coach.record_session(metrics(0.3, 0.5, -0.1)).is_err());
        assert!(coach.is_empty());
        assert!(CognitiveCoach::new(0).is_err());
    }
}
