//! Safe-to-edit graphics settings.
//!
//! `GraphicsConfig` is the tunable output of the quality loop. Discrete
//! settings are ordered rungs (`Ladder`) the manager walks one level at a time.
//! Unknown labels coming from a game or a config file are coerced to `Medium`
//! rather than rejected.

use core::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_RESOLUTION_SCALE: f64 = 0.5;
pub const MAX_RESOLUTION_SCALE: f64 = 1.0;

/// An ordered set of discrete setting levels, lowest first.
pub trait Ladder: Copy + PartialEq + 'static {
    const RUNGS: &'static [Self];

    fn rung(self) -> usize {
        Self::RUNGS.iter().position(|r| *r == self).unwrap_or(0)
    }

    /// One level lower, or `None` at the bottom rung.
    fn lower(self) -> Option<Self> {
        self.rung().checked_sub(1).map(|i| Self::RUNGS[i])
    }

    /// One level higher, or `None` at the top rung.
    fn higher(self) -> Option<Self> {
        Self::RUNGS.get(self.rung() + 1).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AmbientOcclusion {
    Off,
    Low,
    #[default]
    Medium,
    High,
}

impl AmbientOcclusion {
    /// Lenient parse: unrecognised labels become `Medium`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "off" => Self::Off,
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Ladder for AmbientOcclusion {
    const RUNGS: &'static [Self] = &[Self::Off, Self::Low, Self::Medium, Self::High];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShadowDistance {
    Short,
    #[default]
    Medium,
    Long,
}

impl ShadowDistance {
    /// Lenient parse: unrecognised labels become `Medium`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "short" => Self::Short,
            "medium" => Self::Medium,
            "long" => Self::Long,
            _ => Self::Medium,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl Ladder for ShadowDistance {
    const RUNGS: &'static [Self] = &[Self::Short, Self::Medium, Self::Long];
}

macro_rules! label_conversions {
    ($($ty:ty),*) => {$(
        impl From<String> for $ty {
            fn from(label: String) -> Self {
                Self::from_label(&label)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.label().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    )*};
}

label_conversions!(AmbientOcclusion, ShadowDistance);

/// Graphics settings recommended to the rendering pipeline.
///
/// Never mutated by the quality loop: every transition builds a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphicsConfig {
    pub resolution_scale: f64,
    #[serde(default)]
    pub ambient_occlusion: AmbientOcclusion,
    #[serde(default)]
    pub shadow_distance: ShadowDistance,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            resolution_scale: MAX_RESOLUTION_SCALE,
            ambient_occlusion: AmbientOcclusion::Medium,
            shadow_distance: ShadowDistance::Medium,
        }
    }
}

impl GraphicsConfig {
    pub fn new(
        resolution_scale: f64,
        ambient_occlusion: AmbientOcclusion,
        shadow_distance: ShadowDistance,
    ) -> Self {
        Self {
            resolution_scale,
            ambient_occlusion,
            shadow_distance,
        }
    }

    /// Build from free-form labels as reported by a game profile.
    pub fn from_labels(resolution_scale: f64, ambient_occlusion: &str, shadow_distance: &str) -> Self {
        Self::new(
            resolution_scale,
            AmbientOcclusion::from_label(ambient_occlusion),
            ShadowDistance::from_label(shadow_distance),
        )
    }

    /// Return a config constrained to safe bounds.
    ///
    /// Resolution scale is clamped into `[0.5, 1.0]`; a non-finite scale maps
    /// to native resolution. Enum fields are already drawn from their allowed
    /// sets by construction.
    pub fn clamp(&self) -> Self {
        let resolution_scale = if self.resolution_scale.is_nan() {
            MAX_RESOLUTION_SCALE
        } else {
            self.resolution_scale
                .clamp(MIN_RESOLUTION_SCALE, MAX_RESOLUTION_SCALE)
        };
        Self {
            resolution_scale,
            ..*self
        }
    }

    pub fn is_clamped(&self) -> bool {
        (MIN_RESOLUTION_SCALE..=MAX_RESOLUTION_SCALE).contains(&self.resolution_scale)
    }

    pub fn with_resolution_scale(&self, resolution_scale: f64) -> Self {
        Self {
            resolution_scale,
            ..*self
        }
    }

    pub fn with_ambient_occlusion(&self, ambient_occlusion: AmbientOcclusion) -> Self {
        Self {
            ambient_occlusion,
            ..*self
        }
    }

    pub fn with_shadow_distance(&self, shadow_distance: ShadowDistance) -> Self {
        Self {
            shadow_distance,
            ..*self
        }
    }
}

impl fmt::Display for GraphicsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scale={:.2} ao={} shadows={}",
            self.resolution_scale, self.ambient_occlusion, self.shadow_distance
        )
    }
}
