//! Online model fitting for the quality loop.
//!
//! The regressor is refit from scratch on every tick over the bounded
//! telemetry window; the window keeps the cost small.
pub mod linalg;
pub mod ridge;

pub use ridge::RidgeRegressor;
