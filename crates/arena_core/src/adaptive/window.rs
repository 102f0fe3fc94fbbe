use std::collections::VecDeque;

use crate::error::{ArenaError, Result};
use crate::graphics::GraphicsConfig;
use crate::telemetry::TelemetrySample;

/// Fixed-capacity FIFO of `(sample, config)` pairs.
///
/// Iteration order (oldest to newest) is the training-row order used by the
/// regressor. Capacity is fixed at construction and never resized.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    buffer: VecDeque<(TelemetrySample, GraphicsConfig)>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ArenaError::InvalidCapacity);
        }
        Ok(Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
        })
    }

    /// Store the pair with `config` clamped; evicts the oldest pair when full.
    pub fn append(&mut self, sample: TelemetrySample, config: &GraphicsConfig) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back((sample, config.clamp()));
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pairs in insertion order, oldest first.
    pub fn items(&self) -> impl DoubleEndedIterator<Item = &(TelemetrySample, GraphicsConfig)> + ExactSizeIterator {
        self.buffer.iter()
    }

    pub fn latest(&self) -> Option<&(TelemetrySample, GraphicsConfig)> {
        self.buffer.back()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
