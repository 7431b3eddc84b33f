//! Watchdog monitor loop
//!
//! Each iteration resolves the tracked container, samples its CPU, and
//! restarts the second container when the threshold is exceeded. Iterations
//! share no state; every failure is logged and the loop carries on after the
//! normal sleep.

use super::policy::{decide, Decision};
use super::resolve::resolve_container_id;
use crate::error::{Result, WatchdogError};
use crate::observability::StructuredLogger;
use crate::runtime::ContainerRuntime;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Configuration for the monitor loop
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Name fragment of the container whose CPU is measured
    pub tracked_container: String,
    /// Name fragment of the container restarted on overload
    pub restarted_container: String,
    /// Sleep between iterations
    pub interval: Duration,
    /// Utilization percentage above which a restart triggers
    pub cpu_threshold: f64,
}

impl MonitorConfig {
    /// Create a validated configuration; both fragments must be non-empty
    pub fn new(
        tracked_container: impl Into<String>,
        restarted_container: impl Into<String>,
        interval: Duration,
        cpu_threshold: f64,
    ) -> Result<Self> {
        let tracked_container = tracked_container.into();
        let restarted_container = restarted_container.into();

        if tracked_container.is_empty() || restarted_container.is_empty() {
            return Err(WatchdogError::InvalidConfig(
                "TRACKED_CONTAINER and RESTARTED_CONTAINER environment variables are required"
                    .to_string(),
            ));
        }

        Ok(Self {
            tracked_container,
            restarted_container,
            interval,
            cpu_threshold,
        })
    }
}

/// What a single iteration did
#[derive(Debug, Clone, PartialEq)]
pub enum IterationOutcome {
    /// Utilization was at or below the threshold
    Healthy { utilization: f64 },
    /// Threshold exceeded and the restart request succeeded
    Restarted {
        container_id: String,
        utilization: f64,
    },
    /// Snapshot produced no utilization value (zero system delta)
    NoReading,
    /// Tracked container could not be resolved (not found or listing failed)
    TrackedUnresolved(String),
    /// Stats snapshot could not be fetched or decoded
    StatsFailed(String),
    /// Threshold exceeded but the restart target could not be resolved
    RestartTargetUnresolved(String),
    /// Threshold exceeded and the restart request failed
    RestartFailed { container_id: String, error: String },
}

impl IterationOutcome {
    /// True when the iteration ended early because of an error
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            IterationOutcome::TrackedUnresolved(_)
                | IterationOutcome::StatsFailed(_)
                | IterationOutcome::RestartTargetUnresolved(_)
                | IterationOutcome::RestartFailed { .. }
        )
    }
}

/// Monitor loop that periodically checks the tracked container
pub struct Monitor {
    /// Runtime implementation
    runtime: Arc<dyn ContainerRuntime>,
    /// Configuration
    config: MonitorConfig,
    logger: StructuredLogger,
    /// Stop after this many iterations (`None` runs until shutdown)
    max_iterations: Option<u64>,
}

impl Monitor {
    /// Create a new monitor that runs until shutdown
    pub fn new(runtime: Arc<dyn ContainerRuntime>, config: MonitorConfig) -> Self {
        let logger = StructuredLogger::new(&config.tracked_container, &config.restarted_container);
        Self {
            runtime,
            config,
            logger,
            max_iterations: None,
        }
    }

    /// Run until the shutdown channel fires or the iteration limit is reached
    ///
    /// Returns the number of completed iterations.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> u64 {
        debug!("Starting watchdog monitor loop");

        let mut iterations = 0u64;

        loop {
            if self.max_iterations.is_some_and(|max| iterations >= max) {
                debug!(iterations, "Iteration limit reached");
                break;
            }

            let outcome = self.run_once().await;
            iterations += 1;
            if outcome.is_failure() {
                debug!(iteration = iterations, outcome = ?outcome, "Iteration ended early");
            } else {
                debug!(iteration = iterations, outcome = ?outcome, "Iteration complete");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = shutdown.recv() => {
                    info!("Shutting down watchdog monitor loop");
                    break;
                }
            }
        }

        iterations
    }

    /// Run a single iteration against the runtime
    pub async fn run_once(&self) -> IterationOutcome {
        let tracked_id = match self.resolve(&self.config.tracked_container).await {
            Ok(id) => id,
            Err(e) => {
                self.logger.log_iteration_failure("resolve_tracked", &e);
                return IterationOutcome::TrackedUnresolved(e.to_string());
            }
        };

        let stats = match self.runtime.cpu_stats(&tracked_id).await {
            Ok(stats) => stats,
            Err(e) => {
                self.logger.log_iteration_failure("fetch_stats", &e);
                return IterationOutcome::StatsFailed(e.to_string());
            }
        };

        let utilization = match decide(&self.config, &stats) {
            Decision::Hold { utilization } => {
                self.logger
                    .log_cpu_sample(&tracked_id, utilization, self.config.cpu_threshold);
                return IterationOutcome::Healthy { utilization };
            }
            Decision::NoReading => {
                self.logger.log_no_reading(&tracked_id, &stats);
                return IterationOutcome::NoReading;
            }
            Decision::Restart { utilization } => {
                self.logger
                    .log_cpu_sample(&tracked_id, utilization, self.config.cpu_threshold);
                utilization
            }
        };

        let restart_id = match self.resolve(&self.config.restarted_container).await {
            Ok(id) => id,
            Err(e) => {
                self.logger.log_iteration_failure("resolve_restarted", &e);
                return IterationOutcome::RestartTargetUnresolved(e.to_string());
            }
        };

        match self.runtime.restart(&restart_id).await {
            Ok(()) => {
                self.logger.log_restart(&restart_id, utilization);
                IterationOutcome::Restarted {
                    container_id: restart_id,
                    utilization,
                }
            }
            Err(e) => {
                self.logger.log_iteration_failure("restart", &e);
                IterationOutcome::RestartFailed {
                    container_id: restart_id,
                    error: e.to_string(),
                }
            }
        }
    }

    /// List containers and resolve a name fragment to an id
    async fn resolve(&self, fragment: &str) -> Result<String> {
        let containers = self.runtime.list_containers().await?;
        resolve_container_id(&containers, fragment)
            .ok_or_else(|| WatchdogError::ContainerNotFound(fragment.to_string()))
    }
}

/// Builder for creating the monitor loop
pub struct MonitorBuilder {
    runtime: Option<Arc<dyn ContainerRuntime>>,
    config: MonitorConfig,
    max_iterations: Option<u64>,
}

impl MonitorBuilder {
    /// Create a new builder for a validated configuration
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            runtime: None,
            config,
            max_iterations: None,
        }
    }

    /// Set the container runtime
    pub fn runtime(mut self, runtime: Arc<dyn ContainerRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Override the sleep interval
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Stop after `iterations` iterations; zero runs none
    pub fn max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Build the monitor
    pub fn build(self) -> Result<Monitor> {
        let runtime = self
            .runtime
            .ok_or_else(|| WatchdogError::InvalidConfig("runtime is required".to_string()))?;

        let mut monitor = Monitor::new(runtime, self.config);
        monitor.max_iterations = self.max_iterations;
        Ok(monitor)
    }
}
