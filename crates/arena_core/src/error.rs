use thiserror::Error;

/// Errors raised by the advisory core.
///
/// Every failure is terminal for the call that produced it. Callers that want
/// to ride through a bad tick keep the last good `GraphicsConfig` and move on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArenaError {
    // --- Construction ---
    #[error("capacity must be positive")]
    InvalidCapacity,

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    // --- Shape ---
    #[error("features must not be empty")]
    EmptyFeatures,

    #[error("feature rows must be uniform length: row {row} has {found} columns, expected {expected}")]
    RaggedFeatures {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("target count {targets} does not match feature row count {rows}")]
    TargetCountMismatch { rows: usize, targets: usize },

    #[error("feature vector has unexpected length: expected {expected}, got {found}")]
    FeatureLengthMismatch { expected: usize, found: usize },

    // --- Numerical ---
    #[error("matrix is singular (pivot magnitude {magnitude:e} at column {column})")]
    SingularMatrix { column: usize, magnitude: f64 },

    // --- Model state ---
    #[error("model must be fitted before prediction")]
    NotFitted,

    // --- Input validation ---
    #[error("invalid sample: {0}")]
    InvalidSample(String),
}

impl ArenaError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        ArenaError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// True for errors caused by malformed training or prediction input.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            ArenaError::EmptyFeatures
                | ArenaError::RaggedFeatures { .. }
                | ArenaError::TargetCountMismatch { .. }
                | ArenaError::FeatureLengthMismatch { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, ArenaError>;
