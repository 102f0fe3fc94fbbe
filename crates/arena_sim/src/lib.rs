//! Simulation and replay engine for the adaptive quality loop.
//!
//! - [`scenario`]: seeded synthetic telemetry that reacts to the active config
//! - [`trace`]: CSV telemetry traces and decision logs
//! - [`engine`]: replay / closed-loop drivers and run summaries
//! - [`settings`]: TOML configuration loading

pub mod engine;
pub mod scenario;
pub mod settings;
pub mod trace;

pub use engine::{replay, simulate, RunSummary};
pub use scenario::{Scenario, TelemetryGenerator};
pub use trace::{read_trace, write_decisions, write_trace, DecisionRow, TraceRow};
