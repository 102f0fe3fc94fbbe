//! Spectral audio cues.
//!
//! A Hann-windowed FFT of one analysis window yields the dominant frequency,
//! coarse band energies and a confidence that something is happening in the
//! configured event band (footsteps, gunfire, ...).

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::config::AudioSettings;
use crate::error::{ArenaError, Result};

const LOW_BAND_TOP_HZ: f64 = 250.0;
const MID_BAND_TOP_HZ: f64 = 2000.0;

/// Summed spectral magnitude per band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandEnergy {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioReport {
    pub dominant_frequency: f64,
    pub band_energy: BandEnergy,
    pub event_confidence: f64,
}

pub struct AudioAnalyzer {
    sample_rate: u32,
    window_size: usize,
    event_band: (f64, f64),
    intensity_threshold: f64,
    window: Vec<f64>,
    fft: Arc<dyn Fft<f64>>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

fn hann_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    let denom = (size - 1) as f64;
    (0..size)
        .map(|n| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * n as f64 / denom).cos())
        .collect()
}

impl AudioAnalyzer {
    pub fn new(
        sample_rate: u32,
        window_size: usize,
        event_band: (f64, f64),
        intensity_threshold: f64,
    ) -> Result<Self> {
        if sample_rate == 0 {
            return Err(ArenaError::invalid_parameter("sample_rate", "must be positive"));
        }
        if window_size == 0 {
            return Err(ArenaError::invalid_parameter("window_size", "must be positive"));
        }
        if !(event_band.0 < event_band.1) {
            return Err(ArenaError::invalid_parameter(
                "event_band",
                "must be (low, high) with low < high",
            ));
        }
        if !(intensity_threshold > 0.0) {
            return Err(ArenaError::invalid_parameter(
                "intensity_threshold",
                "must be positive",
            ));
        }

        let fft = FftPlanner::new().plan_fft_forward(window_size);
        Ok(Self {
            sample_rate,
            window_size,
            event_band,
            intensity_threshold,
            window: hann_window(window_size),
            fft,
        })
    }

    pub fn from_settings(settings: &AudioSettings) -> Result<Self> {
        Self::new(
            settings.sample_rate,
            settings.window_size,
            settings.event_band_hz,
            settings.intensity_threshold,
        )
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Analyze the first `window_size` samples.
    pub fn analyze(&self, samples: &[f64]) -> Result<AudioReport> {
        if samples.len() < self.window_size {
            return Err(ArenaError::InvalidSample(format!(
                "need at least {} samples, got {}",
                self.window_size,
                samples.len()
            )));
        }

        let mut buffer: Vec<Complex<f64>> = samples[..self.window_size]
            .iter()
            .zip(&self.window)
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        // One-sided spectrum, bins 0..=n/2
        let half = self.window_size / 2;
        let magnitudes: Vec<f64> = buffer[..=half].iter().map(|c| c.norm()).collect();
        let freq_step = self.sample_rate as f64 / self.window_size as f64;
        let freqs: Vec<f64> = (0..magnitudes.len()).map(|i| i as f64 * freq_step).collect();

        let dominant_idx = magnitudes
            .iter()
            .enumerate()
            .fold(0, |best, (i, &m)| if m > magnitudes[best] { i } else { best });

        let total: f64 = magnitudes.iter().sum();
        let total = if total == 0.0 { 1.0 } else { total };

        let nyquist = self.sample_rate as f64 / 2.0;
        let band = |low: f64, high: f64| band_energy(&freqs, &magnitudes, low, high);
        let bands = BandEnergy {
            low: round_to(band(0.0, LOW_BAND_TOP_HZ), 4),
            mid: round_to(band(LOW_BAND_TOP_HZ, MID_BAND_TOP_HZ), 4),
            high: round_to(band(MID_BAND_TOP_HZ, nyquist), 4),
        };
        let event = band(self.event_band.0, self.event_band.1);
        let event_confidence = ((event / total) / self.intensity_threshold).min(1.0);

        Ok(AudioReport {
            dominant_frequency: round_to(freqs[dominant_idx], 2),
            band_energy: bands,
            event_confidence: round_to(event_confidence, 3),
        })
    }
}

fn band_energy(freqs: &[f64], magnitudes: &[f64], low: f64, high: f64) -> f64 {
    freqs
        .iter()
        .zip(magnitudes)
        .filter(|&(&f, _)| low <= f && f < high)
        .map(|(_, &m)| m)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 0.6 * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_dominant_frequency() {
        // 8 kHz / 512 gives 15.625 Hz bins; 1 kHz sits exactly on bin 64.
        let analyzer = AudioAnalyzer::new(8000, 512, (200.0, 2000.0), 0.15).unwrap();
        let report = analyzer.analyze(&sine(1000.0, 8000.0, 512)).unwrap();
        assert_eq!(report.dominant_frequency, 1000.0);
        assert_eq!(report.event_confidence, 1.0);
        assert!(report.band_energy.mid > report.band_energy.low);
        assert!(report.band_energy.mid > report.band_energy.high);
    }

    #[test]
    fn test_low_rumble_is_not_an_event() {
        let analyzer = AudioAnalyzer::new(8000, 512, (200.0, 2000.0), 0.15).unwrap();
        let report = analyzer.analyze(&sine(100.0, 8000.0, 600)).unwrap();
        assert!(report.dominant_frequency < 150.0);
        assert!(report.band_energy.low > report.band_energy.mid);
        assert!(report.event_confidence < 0.5);
    }

    #[test]
    fn test_silence() {
        let analyzer = AudioAnalyzer::new(48_000, 256, (200.0, 2000.0), 0.15).unwrap();
        let report = analyzer.analyze(&[0.0; 256]).unwrap();
        assert_eq!(report.dominant_frequency, 0.0);
        assert_eq!(report.event_confidence, 0.0);
    }

    #[test]
    fn test_rejects_short_input_and_bad_params() {
        let analyzer = AudioAnalyzer::new(48_000, 512, (200.0, 2000.0), 0.15).unwrap();
        assert!(analyzer.analyze(&[0.0; 100]).is_err());
        assert!(AudioAnalyzer::new(0, 512, (200.0, 2000.0), 0.15).is_err());
        assert!(AudioAnalyzer::new(48_000, 0, (200.0, 2000.0), 0.15).is_err());
        assert!(AudioAnalyzer::new(48_000, 512, (2000.0, 200.0), 0.15).is_err());
    }
}
