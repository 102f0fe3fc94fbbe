//! Settings ladder: ordered transition rules applied one rung per tick.
//!
//! Resolution scale moves first (finest granularity), then ambient
//! occlusion, then shadow distance. The first rule that applies wins; if none
//! does the config is returned clamped and unchanged.

use serde::{Deserialize, Serialize};

use crate::graphics::{GraphicsConfig, Ladder};

/// Resolution change per rung.
pub const RESOLUTION_STEP: f64 = 0.05;
/// Scaling down stops touching resolution once it reaches this value.
pub const RESOLUTION_DOWN_FLOOR: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Up,
}

/// The setting a ladder rule adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Knob {
    ResolutionScale,
    AmbientOcclusion,
    ShadowDistance,
}

impl Knob {
    pub fn label(self) -> &'static str {
        match self {
            Knob::ResolutionScale => "resolution_scale",
            Knob::AmbientOcclusion => "ambient_occlusion",
            Knob::ShadowDistance => "shadow_distance",
        }
    }
}

/// One rule of the ladder: returns the stepped config, or `None` when the
/// rule does not apply to `config`.
#[derive(Clone, Copy)]
pub struct LadderRule {
    pub knob: Knob,
    apply: fn(&GraphicsConfig) -> Option<GraphicsConfig>,
}

impl LadderRule {
    pub const fn new(knob: Knob, apply: fn(&GraphicsConfig) -> Option<GraphicsConfig>) -> Self {
        Self { knob, apply }
    }

    pub fn apply(&self, config: &GraphicsConfig) -> Option<GraphicsConfig> {
        (self.apply)(config)
    }
}

impl core::fmt::Debug for LadderRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LadderRule").field("knob", &self.knob).finish()
    }
}

/// Result of one ladder step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub config: GraphicsConfig,
    /// `None` when every rule was exhausted (no-op)
    pub knob: Option<Knob>,
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn reduce_resolution(config: &GraphicsConfig) -> Option<GraphicsConfig> {
    (config.resolution_scale > RESOLUTION_DOWN_FLOOR).then(|| {
        config.with_resolution_scale(round_hundredths(config.resolution_scale - RESOLUTION_STEP))
    })
}

fn raise_resolution(config: &GraphicsConfig) -> Option<GraphicsConfig> {
    (config.resolution_scale < 1.0).then(|| {
        config.with_resolution_scale(round_hundredths(config.resolution_scale + RESOLUTION_STEP))
    })
}

fn lower_ambient_occlusion(config: &GraphicsConfig) -> Option<GraphicsConfig> {
    config
        .ambient_occlusion
        .lower()
        .map(|ao| config.with_ambient_occlusion(ao))
}

fn raise_ambient_occlusion(config: &GraphicsConfig) -> Option<GraphicsConfig> {
    config
        .ambient_occlusion
        .higher()
        .map(|ao| config.with_ambient_occlusion(ao))
}

fn shorten_shadows(config: &GraphicsConfig) -> Option<GraphicsConfig> {
    config
        .shadow_distance
        .lower()
        .map(|sd| config.with_shadow_distance(sd))
}

fn lengthen_shadows(config: &GraphicsConfig) -> Option<GraphicsConfig> {
    config
        .shadow_distance
        .higher()
        .map(|sd| config.with_shadow_distance(sd))
}

pub const DOWN_RULES: &[LadderRule] = &[
    LadderRule::new(Knob::ResolutionScale, reduce_resolution),
    LadderRule::new(Knob::AmbientOcclusion, lower_ambient_occlusion),
    LadderRule::new(Knob::ShadowDistance, shorten_shadows),
];

pub const UP_RULES: &[LadderRule] = &[
    LadderRule::new(Knob::ResolutionScale, raise_resolution),
    LadderRule::new(Knob::AmbientOcclusion, raise_ambient_occlusion),
    LadderRule::new(Knob::ShadowDistance, lengthen_shadows),
];

/// Ordered rule tables for both directions.
#[derive(Debug, Clone)]
pub struct SettingsLadder {
    down: Vec<LadderRule>,
    up: Vec<LadderRule>,
}

impl Default for SettingsLadder {
    fn default() -> Self {
        Self::new(DOWN_RULES.to_vec(), UP_RULES.to_vec())
    }
}

impl SettingsLadder {
    pub fn new(down: Vec<LadderRule>, up: Vec<LadderRule>) -> Self {
        Self { down, up }
    }

    pub fn rules(&self, direction: Direction) -> &[LadderRule] {
        match direction {
            Direction::Down => &self.down,
            Direction::Up => &self.up,
        }
    }

    /// Apply the first matching rule for `direction` to `config` as given.
    ///
    /// Only the result is clamped, so an out-of-range scale moves one step
    /// and then lands on the nearest bound.
    pub fn step(&self, config: &GraphicsConfig, direction: Direction) -> Transition {
        self.rules(direction)
            .iter()
            .find_map(|rule| {
                rule.apply(config).map(|next| Transition {
                    config: next.clamp(),
                    knob: Some(rule.knob),
                })
            })
            .unwrap_or(Transition {
                config: config.clamp(),
                knob: None,
            })
    }
}
