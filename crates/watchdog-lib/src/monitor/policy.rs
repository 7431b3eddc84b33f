//! CPU utilization and restart policy
//!
//! Utilization is `(cpu_delta / system_delta) * online_cpus * 100`, so a
//! container saturating two of four cores reads 200%.

use super::MonitorConfig;
use crate::models::CpuStats;

/// What the watchdog should do with a stats snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Utilization is at or below the threshold
    Hold { utilization: f64 },
    /// Utilization is above the threshold
    Restart { utilization: f64 },
    /// The snapshot cannot produce a utilization value
    NoReading,
}

/// Compute CPU utilization in percent
///
/// Returns `None` when the system delta is not positive (no time elapsed, or
/// the host counter went backwards) or the container delta is negative (the
/// container was recreated between samples). Such snapshots never trigger a
/// restart.
pub fn cpu_utilization(stats: &CpuStats) -> Option<f64> {
    if stats.system_delta <= 0 || stats.cpu_delta < 0 {
        return None;
    }

    let ratio = stats.cpu_delta as f64 / stats.system_delta as f64;
    let utilization = ratio * f64::from(stats.online_cpus) * 100.0;

    utilization.is_finite().then_some(utilization)
}

/// Strictly greater-than comparison against the threshold
pub fn exceeds_threshold(utilization: f64, threshold: f64) -> bool {
    utilization > threshold
}

/// Decide the action for one snapshot
pub fn decide(config: &MonitorConfig, stats: &CpuStats) -> Decision {
    match cpu_utilization(stats) {
        Some(utilization) if exceeds_threshold(utilization, config.cpu_threshold) => {
            Decision::Restart { utilization }
        }
        Some(utilization) => Decision::Hold { utilization },
        None => Decision::NoReading,
    }
}
