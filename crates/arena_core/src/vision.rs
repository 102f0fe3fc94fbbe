//! Frame-level visual cues: smoothed motion and a coarse luminance palette.

use serde::{Deserialize, Serialize};

use crate::config::VisionSettings;
use crate::error::{ArenaError, Result};

/// RGB pixel, one byte per channel.
pub type Pixel = [u8; 3];

const LUMINANCE_BUCKETS: usize = 5;
const BUCKET_WIDTH: f64 = 51.0;
const MIN_CLUSTER_COVERAGE: f64 = 0.05;
const MAX_CLUSTERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorCluster {
    /// Mean colour, each channel normalised to [0, 1]
    pub mean_color: [f64; 3],
    /// Fraction of the frame's pixels in this cluster
    pub coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionReport {
    pub movement_score: f64,
    pub color_clusters: Vec<ColorCluster>,
    pub annotations: Vec<String>,
}

/// Stateful analyzer. Motion is measured against the previous frame, so one
/// analyzer serves one capture stream.
#[derive(Debug, Clone)]
pub struct VisionAnalyzer {
    motion_threshold: f64,
    smoothing: f64,
    previous: Option<Vec<Pixel>>,
    smoothed_motion: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

impl VisionAnalyzer {
    pub fn new(motion_threshold: f64, smoothing: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&motion_threshold) {
            return Err(ArenaError::invalid_parameter(
                "motion_threshold",
                "must be within [0, 1]",
            ));
        }
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            return Err(ArenaError::invalid_parameter("smoothing", "must be within (0, 1]"));
        }
        Ok(Self {
            motion_threshold,
            smoothing,
            previous: None,
            smoothed_motion: 0.0,
        })
    }

    pub fn from_settings(settings: &VisionSettings) -> Result<Self> {
        Self::new(settings.motion_threshold, settings.smoothing)
    }

    /// Analyze one frame given as rows of pixels.
    pub fn analyze_frame(&mut self, frame: &[Vec<Pixel>]) -> Result<VisionReport> {
        let flat: Vec<Pixel> = frame.iter().flatten().copied().collect();
        if flat.is_empty() {
            return Err(ArenaError::InvalidSample(
                "frame must contain at least one pixel".to_string(),
            ));
        }

        let color_clusters = cluster_colors(&flat);
        let movement_score = self.update_motion(flat);
        let annotations = self.annotate(movement_score, &color_clusters);

        Ok(VisionReport {
            movement_score,
            color_clusters,
            annotations,
        })
    }

    /// Forget the previous frame and the motion integrator.
    pub fn reset(&mut self) {
        self.previous = None;
        self.smoothed_motion = 0.0;
    }

    pub fn motion_threshold(&self) -> f64 {
        self.motion_threshold
    }

    fn update_motion(&mut self, flat: Vec<Pixel>) -> f64 {
        let movement = match &self.previous {
            Some(prev) if prev.len() == flat.len() => {
                let total: f64 = prev
                    .iter()
                    .zip(&flat)
                    .map(|(a, b)| {
                        let diff: u32 = a
                            .iter()
                            .zip(b)
                            .map(|(&x, &y)| u32::from(x.abs_diff(y)))
                            .sum();
                        diff as f64 / 3.0
                    })
                    .sum();
                total / flat.len() as f64 / 255.0
            }
            _ => 0.0,
        };
        self.previous = Some(flat);
        self.smoothed_motion =
            self.smoothing * self.smoothed_motion + (1.0 - self.smoothing) * movement;
        round_to(self.smoothed_motion, 4)
    }

    fn annotate(&self, movement: f64, clusters: &[ColorCluster]) -> Vec<String> {
        let motion_line = if movement >= self.motion_threshold {
            "High kinetic activity detected. Stabilize aim and anticipate contact."
        } else if movement >= self.motion_threshold * 0.5 {
            "Moderate motion. Prepare for engagements."
        } else {
            "Scene calm. Scout lanes and reposition deliberately."
        };

        let palette_line = match clusters.first() {
            Some(dominant) => {
                let [r, g, b] = dominant.mean_color;
                format!("Dominant palette intensity ({r}, {g}, {b}): leverage contrast for visibility.")
            }
            None => "Palette uniform. Use audio cues to compensate for visual ambiguity.".to_string(),
        };

        vec![motion_line.to_string(), palette_line]
    }
}

fn cluster_colors(pixels: &[Pixel]) -> Vec<ColorCluster> {
    // (pixel count, channel sums) per bucket
    let mut buckets = [(0usize, [0u64; 3]); LUMINANCE_BUCKETS];
    for pixel in pixels {
        let luminance = pixel.iter().map(|&c| f64::from(c)).sum::<f64>() / 3.0;
        let index = ((luminance / BUCKET_WIDTH) as usize).min(LUMINANCE_BUCKETS - 1);
        let (count, sums) = &mut buckets[index];
        *count += 1;
        for (sum, &channel) in sums.iter_mut().zip(pixel) {
            *sum += u64::from(channel);
        }
    }

    let total = pixels.len() as f64;
    let mut clusters: Vec<ColorCluster> = buckets
        .iter()
        .filter(|(count, _)| *count > 0)
        .filter_map(|&(count, sums)| {
            let coverage = count as f64 / total;
            if coverage < MIN_CLUSTER_COVERAGE {
                return None;
            }
            let mean_color = sums.map(|s| round_to(s as f64 / count as f64 / 255.0, 3));
            Some(ColorCluster {
                mean_color,
                coverage: round_to(coverage, 3),
            })
        })
        .collect();

    // Stable sort keeps darker buckets first on ties.
    clusters.sort_by(|a, b| b.coverage.total_cmp(&a.coverage));
    clusters.truncate(MAX_CLUSTERS);
    clusters
}
