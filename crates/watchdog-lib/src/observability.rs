//! Structured logging for watchdog events
//!
//! Every significant occurrence is a single `tracing` event with an `event`
//! field, so JSON output can be filtered per event type.

use crate::error::WatchdogError;
use crate::models::CpuStats;
use tracing::{info, warn};

/// Structured logger for watchdog events
///
/// Each event carries the configured tracked and restarted name fragments.
#[derive(Clone)]
pub struct StructuredLogger {
    tracked: String,
    restarted: String,
}

impl StructuredLogger {
    pub fn new(tracked: impl Into<String>, restarted: impl Into<String>) -> Self {
        Self {
            tracked: tracked.into(),
            restarted: restarted.into(),
        }
    }

    /// Log watchdog startup
    pub fn log_startup(&self, version: &str, interval_secs: u64, cpu_threshold: f64) {
        info!(
            event = "watchdog_started",
            tracked = %self.tracked,
            restarted = %self.restarted,
            version = %version,
            interval_secs = interval_secs,
            cpu_threshold = cpu_threshold,
            "Container watchdog started"
        );
    }

    /// Log a CPU reading of the tracked container
    pub fn log_cpu_sample(&self, container_id: &str, utilization: f64, threshold: f64) {
        info!(
            event = "cpu_sample",
            tracked = %self.tracked,
            container_id = %container_id,
            utilization = utilization,
            threshold = threshold,
            over_threshold = utilization > threshold,
            "CPU utilization sampled"
        );
    }

    /// Log a snapshot that could not produce a utilization value
    pub fn log_no_reading(&self, container_id: &str, stats: &CpuStats) {
        warn!(
            event = "cpu_sample",
            tracked = %self.tracked,
            container_id = %container_id,
            cpu_delta = %stats.cpu_delta,
            system_delta = %stats.system_delta,
            online_cpus = stats.online_cpus,
            "CPU utilization undefined for snapshot, skipping restart check"
        );
    }

    /// Log a successful restart
    pub fn log_restart(&self, container_id: &str, utilization: f64) {
        warn!(
            event = "container_restarted",
            tracked = %self.tracked,
            restarted = %self.restarted,
            container_id = %container_id,
            utilization = utilization,
            "Restarted container after CPU threshold was exceeded"
        );
    }

    /// Log an error that ended an iteration early
    pub fn log_iteration_failure(&self, stage: &str, error: &WatchdogError) {
        warn!(
            event = "iteration_failed",
            tracked = %self.tracked,
            restarted = %self.restarted,
            stage = %stage,
            error = %error,
            "Watchdog iteration failed"
        );
    }

    /// Log watchdog shutdown
    pub fn log_shutdown(&self, reason: &str, iterations: u64) {
        info!(
            event = "watchdog_shutdown",
            tracked = %self.tracked,
            restarted = %self.restarted,
            reason = %reason,
            iterations = iterations,
            "Container watchdog shutting down"
        );
    }
}
