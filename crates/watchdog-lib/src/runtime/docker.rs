//! Docker runtime using bollard
//!
//! Talks to the daemon found via `DOCKER_HOST`, or the local socket when the
//! variable is unset.

use super::ContainerRuntime;
use crate::error::{Result, WatchdogError};
use crate::models::{ContainerSummary, CpuStats};
use async_trait::async_trait;
use bollard::models::{ContainerCpuStats, ContainerStatsResponse};
use bollard::query_parameters::{
    ListContainersOptionsBuilder, RestartContainerOptionsBuilder, StatsOptionsBuilder,
};
use bollard::Docker;
use futures_util::StreamExt;
use tracing::debug;

/// [`ContainerRuntime`] backed by the Docker Engine API
#[derive(Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Build a client from the environment without contacting the daemon
    pub fn connect() -> Result<Self> {
        let docker = Docker::connect_with_defaults()?;
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let options = ListContainersOptionsBuilder::new().all(false).build();
        let containers = self.docker.list_containers(Some(options)).await?;

        Ok(containers
            .into_iter()
            .filter_map(|c| {
                Some(ContainerSummary {
                    id: c.id?,
                    names: c.names.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn cpu_stats(&self, container_id: &str) -> Result<CpuStats> {
        // Non-streaming without one-shot makes the daemon wait for a second
        // sample, so precpu_stats is populated.
        let options = StatsOptionsBuilder::new()
            .stream(false)
            .one_shot(false)
            .build();

        let mut stream = self.docker.stats(container_id, Some(options));
        let response = match stream.next().await {
            Some(result) => result?,
            None => {
                return Err(WatchdogError::MissingStats {
                    container_id: container_id.to_string(),
                    field: "snapshot",
                })
            }
        };

        let stats = cpu_stats_from_response(container_id, &response)?;
        debug!(
            container_id = %container_id,
            cpu_delta = %stats.cpu_delta,
            system_delta = %stats.system_delta,
            online_cpus = stats.online_cpus,
            "Fetched stats snapshot"
        );
        Ok(stats)
    }

    async fn restart(&self, container_id: &str) -> Result<()> {
        let options = RestartContainerOptionsBuilder::new().build();
        self.docker
            .restart_container(container_id, Some(options))
            .await?;
        Ok(())
    }
}

/// Convert a Docker stats response into CPU deltas
///
/// A missing `precpu_stats` section counts as zero counters, which is what
/// the daemon reports for the first sample of a fresh container.
pub fn cpu_stats_from_response(
    container_id: &str,
    response: &ContainerStatsResponse,
) -> Result<CpuStats> {
    let current = response
        .cpu_stats
        .as_ref()
        .ok_or_else(|| WatchdogError::MissingStats {
            container_id: container_id.to_string(),
            field: "cpu_stats",
        })?;

    let total_usage = current
        .cpu_usage
        .as_ref()
        .and_then(|u| u.total_usage)
        .ok_or_else(|| WatchdogError::MissingStats {
            container_id: container_id.to_string(),
            field: "cpu_stats.cpu_usage.total_usage",
        })?;
    let system_usage = current
        .system_cpu_usage
        .ok_or_else(|| WatchdogError::MissingStats {
            container_id: container_id.to_string(),
            field: "cpu_stats.system_cpu_usage",
        })?;

    let previous = response.precpu_stats.as_ref();
    let pre_total_usage = previous
        .and_then(|p| p.cpu_usage.as_ref())
        .and_then(|u| u.total_usage)
        .unwrap_or(0);
    let pre_system_usage = previous.and_then(|p| p.system_cpu_usage).unwrap_or(0);

    Ok(CpuStats::from_counters(
        total_usage,
        pre_total_usage,
        system_usage,
        pre_system_usage,
        online_cpus(current),
    ))
}

/// Online CPU count, falling back to the per-CPU counter length (cgroup v1
/// daemons) and finally to a single CPU
fn online_cpus(stats: &ContainerCpuStats) -> u32 {
    match stats.online_cpus {
        Some(n) if n > 0 => n,
        _ => stats
            .cpu_usage
            .as_ref()
            .and_then(|u| u.percpu_usage.as_ref())
            .map(|p| p.len() as u32)
            .filter(|&n| n > 0)
            .unwrap_or(1),
    }
}
