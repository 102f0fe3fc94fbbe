//! Safe system-level recommendations: background tasks, driver versions and
//! the power profile. Nothing here touches the OS; callers act on the plan.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::SystemSettings;
use crate::error::{ArenaError, Result};

const RECOMMENDED_POWER_PROFILE: &str = "High Performance";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundTask {
    pub name: String,
    pub cpu_percent: f64,
    pub memory_mb: f64,
    #[serde(default)]
    pub is_critical: bool,
}

impl BackgroundTask {
    pub fn exceeds_limits(&self, cpu_limit: f64, memory_limit_mb: f64) -> bool {
        self.cpu_percent > cpu_limit || self.memory_mb > memory_limit_mb
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationPlan {
    pub terminate: Vec<BackgroundTask>,
    pub update_driver: bool,
    pub power_profile: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemOptimizer {
    cpu_limit: f64,
    memory_limit_mb: f64,
}

impl SystemOptimizer {
    pub fn new(cpu_limit: f64, memory_limit_mb: f64) -> Result<Self> {
        if !(cpu_limit >= 0.0) {
            return Err(ArenaError::invalid_parameter("cpu_limit", "must be non-negative"));
        }
        if !(memory_limit_mb >= 0.0) {
            return Err(ArenaError::invalid_parameter(
                "memory_limit_mb",
                "must be non-negative",
            ));
        }
        Ok(Self {
            cpu_limit,
            memory_limit_mb,
        })
    }

    pub fn from_settings(settings: &SystemSettings) -> Result<Self> {
        Self::new(settings.cpu_limit, settings.memory_limit_mb)
    }

    /// Non-critical tasks over either limit, in input order.
    pub fn tasks_to_close<'a, I>(&self, tasks: I) -> Vec<BackgroundTask>
    where
        I: IntoIterator<Item = &'a BackgroundTask>,
    {
        tasks
            .into_iter()
            .filter(|t| !t.is_critical && t.exceeds_limits(self.cpu_limit, self.memory_limit_mb))
            .cloned()
            .collect()
    }

    pub fn plan(
        &self,
        tasks: &[BackgroundTask],
        current_driver: &str,
        latest_driver: &str,
        current_power_profile: &str,
    ) -> OptimizationPlan {
        OptimizationPlan {
            terminate: self.tasks_to_close(tasks),
            update_driver: is_driver_update_required(current_driver, latest_driver),
            power_profile: recommend_power_profile(current_power_profile),
        }
    }
}

pub fn is_driver_update_required(current: &str, latest: &str) -> bool {
    compare_versions(current, latest) == Ordering::Less
}

/// Keep a performance-oriented profile as-is; otherwise recommend High Performance.
pub fn recommend_power_profile(current: &str) -> String {
    match current.trim().to_ascii_lowercase().as_str() {
        "high performance" | "ultimate performance" => current.to_string(),
        _ => RECOMMENDED_POWER_PROFILE.to_string(),
    }
}

/// Compare dotted versions such as `"546.17"` or `"31.0.15-3"`.
///
/// `-` counts as a separator, non-digits inside a part are dropped and the
/// shorter version is padded with zeros.
pub fn compare_versions(current: &str, latest: &str) -> Ordering {
    let a = parse_version(current);
    let b = parse_version(latest);
    let len = a.len().max(b.len());
    let part = |v: &[u64], i: usize| v.get(i).copied().unwrap_or(0);
    (0..len)
        .map(|i| part(&a, i).cmp(&part(&b, i)))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn parse_version(version: &str) -> Vec<u64> {
    let parts: Vec<u64> = version
        .split(['.', '-'])
        .filter(|token| !token.is_empty())
        .map(|token| {
            let digits: String = token.chars().filter(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        })
        .collect();
    if parts.is_empty() {
        vec![0]
    } else {
        parts
    }
}
